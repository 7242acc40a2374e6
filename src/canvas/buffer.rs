//! Caller-owned copy buffer used when stamping page instances.

use serde::{Deserialize, Serialize};

use crate::model::{CellFormat, CellRange};

/// One captured cell, addressed relative to the copied range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CopiedCell {
    /// Row offset from the top of the source range
    pub row: u32,
    /// Column offset from the left of the source range
    pub col: u32,
    /// Cell text
    pub text: String,
    /// Cell formatting
    pub format: CellFormat,
}

/// Content, formatting, merges and sizes captured from a range.
///
/// The buffer is a plain value: whoever runs the layout owns it, and the
/// canvas only reads from or writes into it. Nothing is shared between
/// runs unless the caller reuses the same buffer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CopyBuffer {
    source: Option<CellRange>,
    cells: Vec<CopiedCell>,
    merges: Vec<CellRange>,
    column_widths: Vec<Option<f32>>,
    row_heights: Vec<Option<f32>>,
}

impl CopyBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop any previous capture and start a new one for `source`.
    pub fn begin(&mut self, source: CellRange) {
        self.clear();
        self.source = Some(source);
        self.column_widths = vec![None; source.columns() as usize];
        self.row_heights = vec![None; source.rows() as usize];
    }

    /// Forget the captured content.
    pub fn clear(&mut self) {
        self.source = None;
        self.cells.clear();
        self.merges.clear();
        self.column_widths.clear();
        self.row_heights.clear();
    }

    /// Check whether anything has been captured.
    pub fn is_empty(&self) -> bool {
        self.source.is_none()
    }

    /// The range the buffer was captured from.
    pub fn source(&self) -> Option<CellRange> {
        self.source
    }

    /// Rows captured (0 when empty).
    pub fn rows(&self) -> u32 {
        self.source.map(|r| r.rows()).unwrap_or(0)
    }

    /// Columns captured (0 when empty).
    pub fn columns(&self) -> u32 {
        self.source.map(|r| r.columns()).unwrap_or(0)
    }

    /// Record a cell at a relative position.
    pub fn push_cell(&mut self, row: u32, col: u32, text: impl Into<String>, format: CellFormat) {
        self.cells.push(CopiedCell {
            row,
            col,
            text: text.into(),
            format,
        });
    }

    /// Record a merge, relative to the source top-left.
    pub fn push_merge(&mut self, relative: CellRange) {
        self.merges.push(relative);
    }

    /// Record the width of a captured column.
    pub fn set_column_width(&mut self, index: u32, width: f32) {
        if let Some(slot) = self.column_widths.get_mut(index as usize) {
            *slot = Some(width);
        }
    }

    /// Record the height of a captured row.
    pub fn set_row_height(&mut self, index: u32, height: f32) {
        if let Some(slot) = self.row_heights.get_mut(index as usize) {
            *slot = Some(height);
        }
    }

    /// Forget the captured column widths and row heights, keeping content.
    ///
    /// Pasting the buffer afterwards leaves the destination sizes alone.
    pub fn discard_sizes(&mut self) {
        self.column_widths.iter_mut().for_each(|width| *width = None);
        self.row_heights.iter_mut().for_each(|height| *height = None);
    }

    /// Captured cells.
    pub fn cells(&self) -> &[CopiedCell] {
        &self.cells
    }

    /// Captured merges (relative).
    pub fn merges(&self) -> &[CellRange] {
        &self.merges
    }

    /// Captured column widths; `None` means host default.
    pub fn column_widths(&self) -> &[Option<f32>] {
        &self.column_widths
    }

    /// Captured row heights; `None` means host default.
    pub fn row_heights(&self) -> &[Option<f32>] {
        &self.row_heights
    }
}
