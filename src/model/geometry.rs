//! Cell geometry and formatting.

use serde::{Deserialize, Serialize};

/// Position and size of a cell on the canvas, in points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CellRect {
    /// Distance from the canvas left edge
    pub left: f32,
    /// Distance from the canvas top edge
    pub top: f32,
    /// Cell width
    pub width: f32,
    /// Cell height
    pub height: f32,
}

impl CellRect {
    /// Create a new rectangle.
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Shrink the rectangle by `padding` on all four sides.
    ///
    /// Width and height never go below zero.
    pub fn inset(&self, padding: f32) -> Self {
        Self {
            left: self.left + padding,
            top: self.top + padding,
            width: (self.width - 2.0 * padding).max(0.0),
            height: (self.height - 2.0 * padding).max(0.0),
        }
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// Horizontal text alignment within a cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlignment {
    /// Host default (text left, numbers right)
    #[default]
    General,
    /// Left alignment
    Left,
    /// Center alignment
    Center,
    /// Right alignment
    Right,
}

/// Visual formatting carried by a cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellFormat {
    /// Bold text
    pub bold: bool,
    /// Italic text
    pub italic: bool,
    /// Font size in points (host default if unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    /// Background fill as `#rrggbb`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    /// Thin border on all sides
    pub border: bool,
    /// Horizontal alignment
    pub align: HorizontalAlignment,
}

impl CellFormat {
    /// Check whether the format is the host default.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}
