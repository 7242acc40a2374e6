//! The cell-addressable canvas the engine writes to.
//!
//! [`Canvas`] is the whole contract the layout engine needs from its host:
//! text read/write, range copy with formatting, merge bookkeeping, cell
//! geometry and image placement. Every call is synchronous and takes effect
//! immediately. An `Err` from any method is treated as a fatal host failure
//! and aborts the run without rollback.
//!
//! [`MemoryCanvas`] is an in-memory implementation used by tests, the
//! benchmarks and the command-line tool.

mod buffer;
mod memory;

pub use buffer::{CopiedCell, CopyBuffer};
pub use memory::{Cell, MemoryCanvas, DEFAULT_COLUMN_WIDTH, DEFAULT_ROW_HEIGHT};

use crate::error::Result;
use crate::model::{CellRange, CellRect, CellRef, ImagePlacement};

/// Host surface the layout engine writes to.
pub trait Canvas {
    /// Current text of a cell; empty when the cell holds nothing.
    fn cell_text(&self, cell: CellRef) -> Result<String>;

    /// Replace the text of a cell.
    fn set_cell_text(&mut self, cell: CellRef, text: &str) -> Result<()>;

    /// Capture text, formatting, merges, column widths and row heights of
    /// `range` into `buffer`, replacing whatever it held.
    fn copy_range(&self, range: CellRange, buffer: &mut CopyBuffer) -> Result<()>;

    /// Stamp `buffer` with `dest` as its top-left cell.
    ///
    /// Column widths travel with the content. Returns the range written.
    fn paste(&mut self, buffer: &CopyBuffer, dest: CellRef) -> Result<CellRange>;

    /// Remove text, formatting, merges and images within `range`.
    fn clear_range(&mut self, range: CellRange) -> Result<()>;

    /// Merge `range` into one cell, keeping the top-left text.
    fn merge(&mut self, range: CellRange) -> Result<()>;

    /// Undo the merge containing `cell`, if any.
    fn unmerge(&mut self, cell: CellRef) -> Result<()>;

    /// The merged span containing `cell`, if any.
    fn merged_range(&self, cell: CellRef) -> Result<Option<CellRange>>;

    /// Geometry of a cell in points.
    fn cell_rect(&self, cell: CellRef) -> Result<CellRect>;

    /// Place an image with the requested placement semantics.
    fn place_image(&mut self, image: &ImagePlacement) -> Result<()>;
}
