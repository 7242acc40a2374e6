//! Per-dataset layout facts.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::CellRef;
use crate::error::{Error, Result};

/// Resolved layout of one dataset within the page template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableLayout {
    /// Table name (dataset file stem)
    pub name: String,

    /// Dataset the rows are read from
    pub source_path: PathBuf,

    /// Number of records, headers included
    pub row_count: usize,

    /// Field count of the first record
    pub column_count: usize,

    /// Where row 1 of the table sits in page instance 0
    pub start_cell: CellRef,

    /// Rows available to the table in one page instance
    pub items_per_page: usize,

    /// Columns between the table's position in instance K and K+1
    pub column_offset: u32,

    /// Rows between the table's position in instance K and K+1
    pub row_offset: u32,
}

impl TableLayout {
    /// Create a table layout.
    ///
    /// Fails when `items_per_page` is zero, since no page could hold a row.
    pub fn new(
        name: impl Into<String>,
        source_path: impl Into<PathBuf>,
        start_cell: CellRef,
        items_per_page: usize,
    ) -> Result<Self> {
        let name = name.into();
        if items_per_page == 0 {
            return Err(Error::InvalidConfig(format!(
                "table '{}' has no rows available per page",
                name
            )));
        }
        Ok(Self {
            name,
            source_path: source_path.into(),
            row_count: 0,
            column_count: 0,
            start_cell,
            items_per_page,
            column_offset: 0,
            row_offset: 0,
        })
    }

    /// Set the dataset dimensions.
    pub fn with_dimensions(mut self, row_count: usize, column_count: usize) -> Self {
        self.row_count = row_count;
        self.column_count = column_count;
        self
    }

    /// Set the offset between consecutive page instances.
    pub fn with_page_offset(mut self, row_offset: u32, column_offset: u32) -> Self {
        self.row_offset = row_offset;
        self.column_offset = column_offset;
        self
    }

    /// Pages this table needs on its own. Empty tables need none.
    pub fn page_count(&self) -> usize {
        self.row_count.div_ceil(self.items_per_page)
    }

    /// Check if the dataset has no records.
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Start cell of the table in page instance `page`.
    pub fn start_cell_on_page(&self, page: u32) -> CellRef {
        self.start_cell
            .offset(page * self.row_offset, page * self.column_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(rows: usize, per_page: usize) -> TableLayout {
        TableLayout::new("parts", "parts.csv", CellRef::new(1, 0), per_page)
            .unwrap()
            .with_dimensions(rows, 3)
    }

    #[test]
    fn test_page_count() {
        assert_eq!(layout(12, 5).page_count(), 3);
        assert_eq!(layout(10, 5).page_count(), 2);
        assert_eq!(layout(1, 5).page_count(), 1);
    }

    #[test]
    fn test_empty_table_needs_no_pages() {
        let table = layout(0, 5);
        assert!(table.is_empty());
        assert_eq!(table.page_count(), 0);
    }

    #[test]
    fn test_zero_items_per_page_rejected() {
        let result = TableLayout::new("parts", "parts.csv", CellRef::new(0, 0), 0);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_start_cell_on_page() {
        let table = layout(12, 5).with_page_offset(0, 11);
        assert_eq!(table.start_cell_on_page(0).to_string(), "A2");
        assert_eq!(table.start_cell_on_page(2).to_string(), "W2");
    }
}
