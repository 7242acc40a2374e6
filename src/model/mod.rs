//! Value types shared by the canvas contract and the layout engine.
//!
//! Everything here is plain data: addresses, geometry, per-table layout
//! facts and image placement requests. None of it talks to a canvas.

mod cell;
mod geometry;
mod image;
mod table;
mod template;

pub use cell::{column_index, column_name, CellRange, CellRef};
pub use geometry::{CellFormat, CellRect, HorizontalAlignment};
pub use image::{ImagePlacement, Placement};
pub use table::TableLayout;
pub use template::{PageTemplate, ReplicationDirection};
