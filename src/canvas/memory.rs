//! In-memory canvas.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Canvas, CopyBuffer};
use crate::error::{Error, Result};
use crate::model::{CellFormat, CellRange, CellRect, CellRef, ImagePlacement};

/// Default column width in points.
pub const DEFAULT_COLUMN_WIDTH: f32 = 48.0;

/// Default row height in points.
pub const DEFAULT_ROW_HEIGHT: f32 = 15.0;

/// Content of one cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Cell text
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,

    /// Cell formatting
    #[serde(default, skip_serializing_if = "CellFormat::is_default")]
    pub format: CellFormat,
}

impl Cell {
    /// Create a cell with text only.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: CellFormat::default(),
        }
    }

    /// Check whether the cell carries neither text nor formatting.
    pub fn is_blank(&self) -> bool {
        self.text.is_empty() && self.format.is_default()
    }
}

/// A sparse grid of cells held in memory.
///
/// Serializes to JSON with cells keyed by their A1 address, so a template
/// can be written by hand:
///
/// ```
/// use sheetfill::canvas::MemoryCanvas;
///
/// let canvas = MemoryCanvas::from_json(
///     r#"{ "cells": { "A1": { "text": "Mark" }, "A2": { "text": "{first-cell:'bars'}" } } }"#,
/// ).unwrap();
/// assert_eq!(canvas.text("A1".parse().unwrap()), "Mark");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryCanvas {
    default_column_width: f32,
    default_row_height: f32,
    column_widths: BTreeMap<u32, f32>,
    row_heights: BTreeMap<u32, f32>,
    cells: BTreeMap<CellRef, Cell>,
    merges: Vec<CellRange>,
    images: Vec<ImagePlacement>,
}

impl Default for MemoryCanvas {
    fn default() -> Self {
        Self {
            default_column_width: DEFAULT_COLUMN_WIDTH,
            default_row_height: DEFAULT_ROW_HEIGHT,
            column_widths: BTreeMap::new(),
            row_heights: BTreeMap::new(),
            cells: BTreeMap::new(),
            merges: Vec::new(),
            images: Vec::new(),
        }
    }
}

impl MemoryCanvas {
    /// Create an empty canvas with default cell sizes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a canvas from its JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a canvas from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Text of a cell (empty when unset).
    pub fn text(&self, cell: CellRef) -> &str {
        self.cells.get(&cell).map(|c| c.text.as_str()).unwrap_or("")
    }

    /// Set the text of a cell, keeping its formatting.
    pub fn set_text(&mut self, cell: CellRef, text: impl Into<String>) {
        let text = text.into();
        let entry = self.cells.entry(cell).or_default();
        entry.text = text;
        if entry.is_blank() {
            self.cells.remove(&cell);
        }
    }

    /// Formatting of a cell.
    pub fn format(&self, cell: CellRef) -> CellFormat {
        self.cells
            .get(&cell)
            .map(|c| c.format.clone())
            .unwrap_or_default()
    }

    /// Set the formatting of a cell, keeping its text.
    pub fn set_format(&mut self, cell: CellRef, format: CellFormat) {
        let entry = self.cells.entry(cell).or_default();
        entry.format = format;
        if entry.is_blank() {
            self.cells.remove(&cell);
        }
    }

    /// Width of a column in points.
    pub fn column_width(&self, col: u32) -> f32 {
        self.column_widths
            .get(&col)
            .copied()
            .unwrap_or(self.default_column_width)
    }

    /// Set the width of a column in points.
    pub fn set_column_width(&mut self, col: u32, width: f32) {
        self.column_widths.insert(col, width);
    }

    /// Height of a row in points.
    pub fn row_height(&self, row: u32) -> f32 {
        self.row_heights
            .get(&row)
            .copied()
            .unwrap_or(self.default_row_height)
    }

    /// Set the height of a row in points.
    pub fn set_row_height(&mut self, row: u32, height: f32) {
        self.row_heights.insert(row, height);
    }

    /// All merged spans, in creation order.
    pub fn merges(&self) -> &[CellRange] {
        &self.merges
    }

    /// All placed images, in placement order.
    pub fn images(&self) -> &[ImagePlacement] {
        &self.images
    }

    /// Number of non-blank cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Iterate over non-blank cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (&CellRef, &Cell)> {
        self.cells.iter()
    }

    /// Smallest range holding every cell, merge and image anchor.
    pub fn used_range(&self) -> Option<CellRange> {
        let mut corners = self
            .cells
            .keys()
            .copied()
            .chain(self.merges.iter().flat_map(|m| [m.start, m.end]))
            .chain(self.images.iter().map(|i| i.anchor));
        let first = corners.next()?;
        Some(corners.fold(CellRange::single(first), |acc, cell| {
            CellRange::new(
                CellRef::new(acc.start.row.min(cell.row), acc.start.col.min(cell.col)),
                CellRef::new(acc.end.row.max(cell.row), acc.end.col.max(cell.col)),
            )
        }))
    }

    fn span_rect(&self, range: CellRange) -> CellRect {
        let left: f32 = (0..range.start.col).map(|c| self.column_width(c)).sum();
        let top: f32 = (0..range.start.row).map(|r| self.row_height(r)).sum();
        let width: f32 = (range.start.col..=range.end.col)
            .map(|c| self.column_width(c))
            .sum();
        let height: f32 = (range.start.row..=range.end.row)
            .map(|r| self.row_height(r))
            .sum();
        CellRect::new(left, top, width, height)
    }

    fn remove_cells_in(&mut self, range: CellRange) {
        self.cells.retain(|cell, _| !range.contains(*cell));
    }
}

impl Canvas for MemoryCanvas {
    fn cell_text(&self, cell: CellRef) -> Result<String> {
        Ok(self.text(cell).to_string())
    }

    fn set_cell_text(&mut self, cell: CellRef, text: &str) -> Result<()> {
        self.set_text(cell, text);
        Ok(())
    }

    fn copy_range(&self, range: CellRange, buffer: &mut CopyBuffer) -> Result<()> {
        buffer.begin(range);

        for (cell, data) in self.cells.iter().filter(|(c, _)| range.contains(**c)) {
            buffer.push_cell(
                cell.row - range.start.row,
                cell.col - range.start.col,
                data.text.clone(),
                data.format.clone(),
            );
        }

        for merge in self.merges.iter().filter(|m| range.contains_range(m)) {
            buffer.push_merge(CellRange::new(
                CellRef::new(merge.start.row - range.start.row, merge.start.col - range.start.col),
                CellRef::new(merge.end.row - range.start.row, merge.end.col - range.start.col),
            ));
        }

        for col in range.start.col..=range.end.col {
            if let Some(width) = self.column_widths.get(&col) {
                buffer.set_column_width(col - range.start.col, *width);
            }
        }
        for row in range.start.row..=range.end.row {
            if let Some(height) = self.row_heights.get(&row) {
                buffer.set_row_height(row - range.start.row, *height);
            }
        }

        Ok(())
    }

    fn paste(&mut self, buffer: &CopyBuffer, dest: CellRef) -> Result<CellRange> {
        if buffer.is_empty() {
            return Err(Error::Canvas("paste from an empty copy buffer".to_string()));
        }
        let target = CellRange::with_size(dest, buffer.rows(), buffer.columns());

        for (index, width) in buffer.column_widths().iter().enumerate() {
            if let Some(width) = width {
                self.set_column_width(dest.col + index as u32, *width);
            }
        }
        for (index, height) in buffer.row_heights().iter().enumerate() {
            if let Some(height) = height {
                self.set_row_height(dest.row + index as u32, *height);
            }
        }

        self.clear_range(target)?;

        for copied in buffer.cells() {
            let cell = dest.offset(copied.row, copied.col);
            self.cells.insert(
                cell,
                Cell {
                    text: copied.text.clone(),
                    format: copied.format.clone(),
                },
            );
        }
        for relative in buffer.merges() {
            self.merges.push(relative.offset(dest.row, dest.col));
        }

        Ok(target)
    }

    fn clear_range(&mut self, range: CellRange) -> Result<()> {
        self.remove_cells_in(range);
        self.merges.retain(|m| !m.intersects(&range));
        self.images.retain(|i| !range.contains(i.anchor));
        Ok(())
    }

    fn merge(&mut self, range: CellRange) -> Result<()> {
        if range.is_single() {
            return Ok(());
        }
        self.merges.retain(|m| !m.intersects(&range));

        let anchor = range.start;
        let others: Vec<CellRef> = range.cells().filter(|c| *c != anchor).collect();
        for cell in others {
            if let Some(entry) = self.cells.get_mut(&cell) {
                entry.text.clear();
                if entry.is_blank() {
                    self.cells.remove(&cell);
                }
            }
        }

        self.merges.push(range);
        Ok(())
    }

    fn unmerge(&mut self, cell: CellRef) -> Result<()> {
        self.merges.retain(|m| !m.contains(cell));
        Ok(())
    }

    fn merged_range(&self, cell: CellRef) -> Result<Option<CellRange>> {
        Ok(self.merges.iter().find(|m| m.contains(cell)).copied())
    }

    fn cell_rect(&self, cell: CellRef) -> Result<CellRect> {
        let span = self
            .merges
            .iter()
            .find(|m| m.start == cell)
            .copied()
            .unwrap_or_else(|| CellRange::single(cell));
        Ok(self.span_rect(span))
    }

    fn place_image(&mut self, image: &ImagePlacement) -> Result<()> {
        let bounds = image.bounds;
        if !(bounds.left.is_finite()
            && bounds.top.is_finite()
            && bounds.width.is_finite()
            && bounds.height.is_finite())
        {
            return Err(Error::Canvas(format!(
                "image bounds for {} are not finite",
                image.anchor
            )));
        }
        self.images.push(image.clone());
        Ok(())
    }
}
