//! Page template geometry.

use serde::{Deserialize, Serialize};

use super::{CellRange, CellRef};
use crate::error::Result;

/// Direction in which page instances are stamped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplicationDirection {
    /// Instances placed side by side, left to right
    #[default]
    Across,
    /// Instances stacked top to bottom
    Down,
}

/// The anchor region that every page instance is copied from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageTemplate {
    /// Template region on the canvas (instance 0)
    pub range: CellRange,
    /// Where instances 1.. are placed relative to instance 0
    pub direction: ReplicationDirection,
}

impl PageTemplate {
    /// Create a template that replicates sideways.
    pub fn new(range: CellRange) -> Self {
        Self {
            range,
            direction: ReplicationDirection::Across,
        }
    }

    /// Parse a template region such as `"A1:K17"`.
    pub fn parse(a1: &str) -> Result<Self> {
        Ok(Self::new(CellRange::parse(a1)?))
    }

    /// Set the replication direction.
    pub fn with_direction(mut self, direction: ReplicationDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Number of rows in one page instance.
    pub fn rows(&self) -> u32 {
        self.range.rows()
    }

    /// Number of columns in one page instance.
    pub fn columns(&self) -> u32 {
        self.range.columns()
    }

    /// Top-left cell of page instance `index`.
    pub fn instance_origin(&self, index: u32) -> CellRef {
        match self.direction {
            ReplicationDirection::Across => self.range.start.offset(0, index * self.columns()),
            ReplicationDirection::Down => self.range.start.offset(index * self.rows(), 0),
        }
    }

    /// Full region of page instance `index`.
    pub fn instance_range(&self, index: u32) -> CellRange {
        CellRange::with_size(self.instance_origin(index), self.rows(), self.columns())
    }
}
