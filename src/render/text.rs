//! Plain text preview of a canvas region.

use crate::canvas::MemoryCanvas;
use crate::model::{CellRange, CellRef};

/// Render `range` as tab-separated rows.
///
/// Merged spans show their text once, in the anchor cell. Cells holding an
/// image show `[image:<file>]`. Trailing empty cells are dropped from each
/// row and trailing empty rows from the output.
pub fn to_text(canvas: &MemoryCanvas, range: CellRange) -> String {
    let mut lines = Vec::with_capacity(range.rows() as usize);

    for row in range.start.row..=range.end.row {
        let cells: Vec<String> = (range.start.col..=range.end.col)
            .map(|col| cell_text(canvas, CellRef::new(row, col)))
            .collect();
        lines.push(cells.join("\t").trim_end_matches('\t').to_string());
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

fn cell_text(canvas: &MemoryCanvas, cell: CellRef) -> String {
    let text = canvas.text(cell);
    let images: Vec<String> = canvas
        .images()
        .iter()
        .filter(|i| i.anchor == cell)
        .map(|i| format!("[image:{}]", i.file_name().unwrap_or("?")))
        .collect();

    match (text.is_empty(), images.is_empty()) {
        (_, true) => text.to_string(),
        (true, false) => images.join(" "),
        (false, false) => format!("{} {}", text, images.join(" ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::model::{CellRect, ImagePlacement};

    #[test]
    fn test_to_text_grid() {
        let mut canvas = MemoryCanvas::new();
        canvas.set_text(CellRef::new(0, 0), "SECTION A");
        canvas.merge(CellRange::parse("A1:C1").unwrap()).unwrap();
        canvas.set_text(CellRef::new(1, 0), "1");
        canvas.set_text(CellRef::new(1, 1), "bolt");
        canvas
            .place_image(&ImagePlacement::new(
                "images/bolt.jpg",
                CellRef::new(1, 2),
                CellRect::default(),
            ))
            .unwrap();

        let text = to_text(&canvas, CellRange::parse("A1:D5").unwrap());
        assert_eq!(text, "SECTION A\n1\tbolt\t[image:bolt.jpg]");
    }

    #[test]
    fn test_to_text_empty() {
        let canvas = MemoryCanvas::new();
        assert_eq!(to_text(&canvas, CellRange::parse("A1:B2").unwrap()), "");
    }
}
