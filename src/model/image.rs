//! Image placement requests.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{CellRect, CellRef};

/// How a placed image follows its anchor cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Move and resize together with the cell
    #[default]
    MoveAndSize,
    /// Move with the cell, keep its own size
    Move,
    /// Stay where it was placed
    FreeFloating,
}

/// An image anchored inside a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagePlacement {
    /// Image file on disk
    pub path: PathBuf,

    /// Cell the image is anchored to
    pub anchor: CellRef,

    /// Image bounds in canvas points
    pub bounds: CellRect,

    /// Placement semantics requested from the host
    pub placement: Placement,
}

impl ImagePlacement {
    /// Create a placement that moves and sizes with its cell.
    pub fn new(path: impl Into<PathBuf>, anchor: CellRef, bounds: CellRect) -> Self {
        Self {
            path: path.into(),
            anchor,
            bounds,
            placement: Placement::MoveAndSize,
        }
    }

    /// File name of the image, if any.
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }
}
