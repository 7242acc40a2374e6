//! Row streaming and pagination.
//!
//! [`RowStreamer`] pours one table's records into the page instances. The
//! cursor is the pair `(start, row)`: `start` is the table's first row in
//! the active page instance and `row` counts rows written below it. Every
//! record, header or data, consumes one of the table's `items_per_page`
//! slots; after the record that fills the last slot the cursor moves to
//! the next page instance.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::dataset::RowKind;
use super::image::{Embedded, ImageEmbedder};
use crate::canvas::Canvas;
use crate::error::Result;
use crate::model::{CellRange, CellRef, TableLayout};

/// Streaming state of one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Cursor at the table's start cell in page instance 0
    AtTableStart,
    /// Writing records into the active page instance
    StreamingBody,
    /// The active page instance is full
    AtPageBoundary,
    /// All records written
    Done,
}

/// What streaming one table did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamReport {
    /// Table name
    pub table: String,
    /// Records read
    pub records: usize,
    /// Header rows written as merged labels
    pub headers: usize,
    /// Data rows written field by field
    pub data_rows: usize,
    /// Images placed
    pub images: usize,
    /// Image references whose file was missing
    pub missing_images: usize,
    /// Page instances that received at least one record
    pub pages_used: usize,
}

/// Writes a table's records into the page instances.
pub struct RowStreamer<'a> {
    embedder: &'a ImageEmbedder,
}

impl<'a> RowStreamer<'a> {
    /// Create a streamer that hands image references to `embedder`.
    pub fn new(embedder: &'a ImageEmbedder) -> Self {
        Self { embedder }
    }

    /// Stream `records` of `table` onto the canvas.
    ///
    /// Stops at the first error, leaving whatever was already written.
    pub fn stream<C, I>(&self, canvas: &mut C, table: &TableLayout, records: I) -> Result<StreamReport>
    where
        C: Canvas + ?Sized,
        I: IntoIterator<Item = Result<Vec<String>>>,
    {
        let mut records = records.into_iter();
        let mut report = StreamReport {
            table: table.name.clone(),
            ..StreamReport::default()
        };

        let mut state = StreamState::AtTableStart;
        let mut start = table.start_cell;
        let mut row: u32 = 0;
        let mut item: usize = 0;

        loop {
            state = match state {
                StreamState::AtTableStart => {
                    start = table.start_cell;
                    row = 0;
                    item = 0;
                    StreamState::StreamingBody
                }
                StreamState::StreamingBody => match records.next() {
                    None => StreamState::Done,
                    Some(record) => {
                        let fields = record?;
                        item += 1;
                        self.write_record(canvas, table, start.offset(row, 0), &fields, &mut report)?;

                        if item % table.items_per_page == 0 {
                            StreamState::AtPageBoundary
                        } else {
                            row += 1;
                            StreamState::StreamingBody
                        }
                    }
                },
                StreamState::AtPageBoundary => {
                    start = self.next_page(canvas, table, start)?;
                    row = 0;
                    debug!(
                        "Table '{}' reached a page boundary after record {}, continuing at {}",
                        table.name, item, start
                    );
                    StreamState::StreamingBody
                }
                StreamState::Done => break,
            };
        }

        report.records = item;
        report.pages_used = item.div_ceil(table.items_per_page);
        debug!(
            "Table '{}' streamed: {} records over {} pages",
            table.name, report.records, report.pages_used
        );
        Ok(report)
    }

    fn write_record<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        table: &TableLayout,
        cell: CellRef,
        fields: &[String],
        report: &mut StreamReport,
    ) -> Result<()> {
        match RowKind::classify(fields) {
            RowKind::Header(label) => {
                let span = header_span(table, cell);
                if !span.is_single() {
                    canvas.merge(span)?;
                }
                canvas.set_cell_text(cell, &label)?;
                trace!("Header '{}' written at {}", label, span);
                report.headers += 1;
            }
            RowKind::Data => {
                for (index, value) in fields.iter().enumerate() {
                    let target = cell.offset(0, index as u32);
                    if self.embedder.is_image_reference(value) {
                        match self.embedder.embed(canvas, target, value)? {
                            Embedded::Placed(_) => report.images += 1,
                            Embedded::Missing(_) => report.missing_images += 1,
                        }
                    } else {
                        canvas.set_cell_text(target, value)?;
                    }
                }
                trace!("Record of {} fields written at {}", fields.len(), cell);
                report.data_rows += 1;
            }
        }
        Ok(())
    }

    /// Move the start cell to the next page instance.
    ///
    /// A merged start cell is unmerged before the move and its header span
    /// merged again afterwards, so the finished page keeps its merge.
    fn next_page<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        table: &TableLayout,
        start: CellRef,
    ) -> Result<CellRef> {
        let next = start.offset(table.row_offset, table.column_offset);
        if canvas.merged_range(start)?.is_some() {
            canvas.unmerge(start)?;
            let span = header_span(table, start);
            if !span.is_single() {
                canvas.merge(span)?;
            }
        }
        Ok(next)
    }
}

/// The full-width span of a table row starting at `cell`.
fn header_span(table: &TableLayout, cell: CellRef) -> CellRange {
    CellRange::with_size(cell, 1, table.column_count.max(1) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::MemoryCanvas;
    use crate::layout::LayoutOptions;

    fn records(rows: &[&[&str]]) -> Vec<Result<Vec<String>>> {
        rows.iter()
            .map(|r| Ok(r.iter().map(|f| f.to_string()).collect()))
            .collect()
    }

    fn table(rows: usize, cols: usize, per_page: usize) -> TableLayout {
        TableLayout::new("parts", "parts.csv", CellRef::new(1, 0), per_page)
            .unwrap()
            .with_dimensions(rows, cols)
            .with_page_offset(0, 5)
    }

    fn embedder() -> ImageEmbedder {
        ImageEmbedder::new(&LayoutOptions::default()).unwrap()
    }

    #[test]
    fn test_rows_advance_down() {
        let embedder = embedder();
        let mut canvas = MemoryCanvas::new();
        let data = records(&[&["1", "bolt"], &["2", "nut"]]);

        let report = RowStreamer::new(&embedder)
            .stream(&mut canvas, &table(2, 2, 5), data)
            .unwrap();

        assert_eq!(canvas.text(CellRef::new(1, 0)), "1");
        assert_eq!(canvas.text(CellRef::new(2, 1)), "nut");
        assert_eq!(report.data_rows, 2);
        assert_eq!(report.pages_used, 1);
        assert!(canvas.merges().is_empty());
    }

    #[test]
    fn test_page_boundary_shifts_block() {
        let embedder = embedder();
        let mut canvas = MemoryCanvas::new();
        let rows: Vec<Vec<String>> = (1..=5).map(|i| vec![i.to_string(), "x".to_string()]).collect();
        let data: Vec<Result<Vec<String>>> = rows.into_iter().map(Ok).collect();

        let report = RowStreamer::new(&embedder)
            .stream(&mut canvas, &table(5, 2, 2), data)
            .unwrap();

        assert_eq!(canvas.text(CellRef::new(1, 0)), "1");
        assert_eq!(canvas.text(CellRef::new(2, 0)), "2");
        assert_eq!(canvas.text(CellRef::new(1, 5)), "3");
        assert_eq!(canvas.text(CellRef::new(2, 5)), "4");
        assert_eq!(canvas.text(CellRef::new(1, 10)), "5");
        assert_eq!(canvas.text(CellRef::new(3, 0)), "");
        assert_eq!(report.pages_used, 3);
    }

    #[test]
    fn test_header_merges_table_width() {
        let embedder = embedder();
        let mut canvas = MemoryCanvas::new();
        let data = records(&[&["SECTION A", "", ""], &["1", "bolt", "M8"]]);

        let report = RowStreamer::new(&embedder)
            .stream(&mut canvas, &table(2, 3, 5), data)
            .unwrap();

        assert_eq!(canvas.merges(), &[CellRange::parse("A2:C2").unwrap()]);
        assert_eq!(canvas.text(CellRef::new(1, 0)), "SECTION A");
        assert_eq!(canvas.text(CellRef::new(2, 2)), "M8");
        assert_eq!(report.headers, 1);
        assert_eq!(report.data_rows, 1);
    }

    #[test]
    fn test_header_on_boundary_keeps_merge() {
        let embedder = embedder();
        let mut canvas = MemoryCanvas::new();
        let data = records(&[&["SECTION A", ""], &["1", "bolt"]]);

        RowStreamer::new(&embedder)
            .stream(&mut canvas, &table(2, 2, 1), data)
            .unwrap();

        assert_eq!(canvas.merges(), &[CellRange::parse("A2:B2").unwrap()]);
        assert_eq!(canvas.text(CellRef::new(1, 0)), "SECTION A");
        assert_eq!(canvas.text(CellRef::new(1, 5)), "1");
    }

    #[test]
    fn test_single_column_header_not_merged() {
        let embedder = embedder();
        let mut canvas = MemoryCanvas::new();
        let data = records(&[&["alpha"], &["beta"]]);

        let report = RowStreamer::new(&embedder)
            .stream(&mut canvas, &table(2, 1, 5), data)
            .unwrap();

        assert!(canvas.merges().is_empty());
        assert_eq!(canvas.text(CellRef::new(2, 0)), "beta");
        assert_eq!(report.headers, 2);
    }

    #[test]
    fn test_missing_image_counted() {
        let embedder = embedder();
        let mut canvas = MemoryCanvas::new();
        let data = records(&[&["1", "no_such_file.jpg"]]);

        let report = RowStreamer::new(&embedder)
            .stream(&mut canvas, &table(1, 2, 5), data)
            .unwrap();

        assert_eq!(canvas.text(CellRef::new(1, 1)), "");
        assert_eq!(report.missing_images, 1);
        assert_eq!(report.images, 0);
    }

    #[test]
    fn test_record_error_stops_stream() {
        let embedder = embedder();
        let mut canvas = MemoryCanvas::new();
        let data = vec![
            Ok(vec!["1".to_string(), "a".to_string()]),
            Err(crate::Error::Other("broken record".to_string())),
            Ok(vec!["3".to_string(), "c".to_string()]),
        ];

        let result = RowStreamer::new(&embedder).stream(&mut canvas, &table(3, 2, 5), data);
        assert!(result.is_err());
        assert_eq!(canvas.text(CellRef::new(1, 0)), "1");
        assert_eq!(canvas.text(CellRef::new(3, 0)), "");
    }

    #[test]
    fn test_empty_stream() {
        let embedder = embedder();
        let mut canvas = MemoryCanvas::new();
        let report = RowStreamer::new(&embedder)
            .stream(&mut canvas, &table(0, 0, 5), Vec::new())
            .unwrap();
        assert_eq!(report.records, 0);
        assert_eq!(report.pages_used, 0);
        assert_eq!(canvas.cell_count(), 0);
    }
}
