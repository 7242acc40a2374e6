//! Document page count resolution.

use crate::model::TableLayout;

/// Number of page instances the document needs.
///
/// The largest per-table page count wins. Empty tables need no pages, so a
/// document whose tables are all empty (or that has none) resolves to zero.
pub fn resolve_page_count(tables: &[TableLayout]) -> usize {
    tables.iter().map(TableLayout::page_count).max().unwrap_or(0)
}
