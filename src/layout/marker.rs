//! Table markers embedded in template cells.
//!
//! A template reserves rows for a table by placing two tokens in its cells:
//! `{first-cell:'parts'}` on the first row the table may use and
//! `{last-cell:'parts'}` on the last one. The quotes are optional and the
//! keyword is case-insensitive. Table names are matched exactly, ignoring
//! case, so several tables can share one template without interfering.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::canvas::Canvas;
use crate::error::{Error, Result};
use crate::model::{CellRange, CellRef};

/// Which end of a table's row span a marker denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    /// First row of the table
    First,
    /// Last row of the table
    Last,
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerKind::First => f.write_str("first"),
            MarkerKind::Last => f.write_str("last"),
        }
    }
}

/// A parsed marker token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    /// Marker kind
    pub kind: MarkerKind,
    /// Table the marker belongs to
    pub table: String,
}

impl Marker {
    /// A first-row marker for `table`.
    pub fn first(table: impl Into<String>) -> Self {
        Self {
            kind: MarkerKind::First,
            table: table.into(),
        }
    }

    /// A last-row marker for `table`.
    pub fn last(table: impl Into<String>) -> Self {
        Self {
            kind: MarkerKind::Last,
            table: table.into(),
        }
    }

    /// Check whether this marker belongs to `table`.
    pub fn is_for(&self, table: &str) -> bool {
        self.table.to_lowercase() == table.trim().to_lowercase()
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}-cell:'{}'}}", self.kind, self.table)
    }
}

/// Parser for the marker micro-format.
///
/// Works on plain strings so it can be used without a canvas.
pub struct MarkerParser {
    pattern: Regex,
}

impl MarkerParser {
    /// Create a new parser.
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(
                r"(?i)\{\s*(first|last)-cell\s*:\s*(?:'([^{}]*?)'|'?([^'{}]*?)'?)\s*\}",
            )
            .expect("marker pattern is valid"),
        }
    }

    /// All markers in `text`, in order of appearance.
    pub fn parse(&self, text: &str) -> Vec<Marker> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| {
                let kind = if caps[1].eq_ignore_ascii_case("first") {
                    MarkerKind::First
                } else {
                    MarkerKind::Last
                };
                let table = table_name(&caps);
                if table.is_empty() {
                    return None;
                }
                Some(Marker {
                    kind,
                    table: table.to_string(),
                })
            })
            .collect()
    }

    /// Check whether `text` holds a marker of `kind` for `table`.
    pub fn contains(&self, text: &str, kind: MarkerKind, table: &str) -> bool {
        self.parse(text)
            .iter()
            .any(|m| m.kind == kind && m.is_for(table))
    }

    /// Remove every marker for `table` from `text`.
    ///
    /// Markers of other tables and surrounding text are kept; the result is
    /// trimmed.
    pub fn strip(&self, text: &str, table: &str) -> String {
        let stripped = self.pattern.replace_all(text, |caps: &regex::Captures<'_>| {
            let name = table_name(caps);
            if !name.is_empty() && Marker::first(name).is_for(table) {
                String::new()
            } else {
                caps[0].to_string()
            }
        });
        stripped.trim().to_string()
    }
}

/// Table name of a matched token; a quoted name may contain apostrophes.
fn table_name<'t>(caps: &regex::Captures<'t>) -> &'t str {
    caps.get(2)
        .or_else(|| caps.get(3))
        .map(|m| m.as_str().trim())
        .unwrap_or_default()
}

impl Default for MarkerParser {
    fn default() -> Self {
        Self::new()
    }
}

/// The located first/last marker cells of one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerSpan {
    /// Table name
    pub table: String,
    /// Cell holding the first-row marker
    pub first: CellRef,
    /// Cell holding the last-row marker
    pub last: CellRef,
}

impl MarkerSpan {
    /// Rows between the two markers, both ends included.
    pub fn items_per_page(&self) -> usize {
        (self.last.row - self.first.row + 1) as usize
    }
}

/// Finds table markers on a canvas.
pub struct MarkerLocator {
    parser: MarkerParser,
}

impl MarkerLocator {
    /// Create a new locator.
    pub fn new() -> Self {
        Self {
            parser: MarkerParser::new(),
        }
    }

    /// The underlying string parser.
    pub fn parser(&self) -> &MarkerParser {
        &self.parser
    }

    /// First cell in `region`, row by row, holding a `kind` marker for `table`.
    pub fn find<C: Canvas + ?Sized>(
        &self,
        canvas: &C,
        region: CellRange,
        table: &str,
        kind: MarkerKind,
    ) -> Result<Option<CellRef>> {
        for cell in region.cells() {
            let text = canvas.cell_text(cell)?;
            if !text.is_empty() && self.parser.contains(&text, kind, table) {
                return Ok(Some(cell));
            }
        }
        Ok(None)
    }

    /// Locate both markers of `table` within `region`.
    ///
    /// A missing marker is a configuration error: without it the table has
    /// no usable row budget.
    pub fn locate<C: Canvas + ?Sized>(
        &self,
        canvas: &C,
        region: CellRange,
        table: &str,
    ) -> Result<MarkerSpan> {
        let not_found = |kind| Error::MarkerNotFound {
            table: table.to_string(),
            kind,
        };
        let first = self
            .find(canvas, region, table, MarkerKind::First)?
            .ok_or_else(|| not_found(MarkerKind::First))?;
        let last = self
            .find(canvas, region, table, MarkerKind::Last)?
            .ok_or_else(|| not_found(MarkerKind::Last))?;

        if last.row < first.row {
            return Err(Error::InvalidMarkerSpan {
                table: table.to_string(),
                first: first.to_string(),
                last: last.to_string(),
            });
        }

        Ok(MarkerSpan {
            table: table.to_string(),
            first,
            last,
        })
    }

    /// Remove the marker text of `span` from the canvas.
    ///
    /// Running [`locate`](Self::locate) afterwards fails with
    /// [`Error::MarkerNotFound`].
    pub fn clear<C: Canvas + ?Sized>(&self, canvas: &mut C, span: &MarkerSpan) -> Result<()> {
        for cell in [span.first, span.last] {
            let text = canvas.cell_text(cell)?;
            let stripped = self.parser.strip(&text, &span.table);
            if stripped != text {
                canvas.set_cell_text(cell, &stripped)?;
            }
        }
        Ok(())
    }

    /// Every marker in `region`, row by row.
    pub fn scan<C: Canvas + ?Sized>(
        &self,
        canvas: &C,
        region: CellRange,
    ) -> Result<Vec<(CellRef, Marker)>> {
        let mut found = Vec::new();
        for cell in region.cells() {
            let text = canvas.cell_text(cell)?;
            if text.is_empty() {
                continue;
            }
            found.extend(self.parser.parse(&text).into_iter().map(|m| (cell, m)));
        }
        Ok(found)
    }
}

impl Default for MarkerLocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::MemoryCanvas;

    fn cell(a1: &str) -> CellRef {
        CellRef::parse(a1).unwrap()
    }

    #[test]
    fn test_parse_quoted_and_bare() {
        let parser = MarkerParser::new();
        let markers = parser.parse("{first-cell:'parts'} and {LAST-CELL: bars }");
        assert_eq!(markers, vec![Marker::first("parts"), Marker::last("bars")]);
    }

    #[test]
    fn test_parse_ignores_other_text() {
        let parser = MarkerParser::new();
        assert!(parser.parse("Mark {first-cell:''} {middle-cell:'x'}").is_empty());
        assert!(parser.parse("plain text").is_empty());
    }

    #[test]
    fn test_exact_name_match() {
        let parser = MarkerParser::new();
        let text = "{first-cell:'parts2'}";
        assert!(!parser.contains(text, MarkerKind::First, "parts"));
        assert!(parser.contains(text, MarkerKind::First, "PARTS2"));
        assert!(!parser.contains(text, MarkerKind::Last, "parts2"));
    }

    #[test]
    fn test_display_round_trip() {
        let marker = Marker::last("rebar schedule");
        let token = marker.to_string();
        assert_eq!(token, "{last-cell:'rebar schedule'}");
        assert_eq!(MarkerParser::new().parse(&token), vec![marker]);

        let marker = Marker::first("o'neil");
        let token = marker.to_string();
        assert_eq!(token, "{first-cell:'o'neil'}");
        assert_eq!(MarkerParser::new().parse(&token), vec![marker]);
        assert_eq!(MarkerParser::new().strip(&token, "O'Neil"), "");
    }

    #[test]
    fn test_strip_keeps_other_content() {
        let parser = MarkerParser::new();
        assert_eq!(parser.strip("{first-cell:'a'}", "a"), "");
        assert_eq!(
            parser.strip("Mark {first-cell:'a'} {first-cell:'b'}", "a"),
            "Mark  {first-cell:'b'}"
        );
    }

    #[test]
    fn test_locate_span() {
        let mut canvas = MemoryCanvas::new();
        canvas.set_text(cell("B3"), Marker::first("bars").to_string());
        canvas.set_text(cell("B7"), Marker::last("bars").to_string());

        let locator = MarkerLocator::new();
        let span = locator
            .locate(&canvas, CellRange::parse("A1:D10").unwrap(), "bars")
            .unwrap();
        assert_eq!(span.first, cell("B3"));
        assert_eq!(span.last, cell("B7"));
        assert_eq!(span.items_per_page(), 5);
    }

    #[test]
    fn test_locate_outside_region_fails() {
        let mut canvas = MemoryCanvas::new();
        canvas.set_text(cell("F3"), Marker::first("bars").to_string());
        canvas.set_text(cell("F7"), Marker::last("bars").to_string());

        let result = MarkerLocator::new().locate(&canvas, CellRange::parse("A1:D10").unwrap(), "bars");
        assert!(matches!(
            result,
            Err(Error::MarkerNotFound {
                kind: MarkerKind::First,
                ..
            })
        ));
    }

    #[test]
    fn test_locate_inverted_span() {
        let mut canvas = MemoryCanvas::new();
        canvas.set_text(cell("A5"), Marker::first("bars").to_string());
        canvas.set_text(cell("B2"), Marker::last("bars").to_string());

        let result = MarkerLocator::new().locate(&canvas, CellRange::parse("A1:D10").unwrap(), "bars");
        assert!(matches!(result, Err(Error::InvalidMarkerSpan { .. })));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut canvas = MemoryCanvas::new();
        canvas.set_text(cell("A2"), Marker::first("bars").to_string());
        canvas.set_text(cell("A4"), Marker::last("bars").to_string());
        let region = CellRange::parse("A1:C5").unwrap();

        let locator = MarkerLocator::new();
        let span = locator.locate(&canvas, region, "bars").unwrap();
        locator.clear(&mut canvas, &span).unwrap();

        assert_eq!(canvas.text(cell("A2")), "");
        assert!(matches!(
            locator.locate(&canvas, region, "bars"),
            Err(Error::MarkerNotFound { .. })
        ));
        locator.clear(&mut canvas, &span).unwrap();
        assert_eq!(canvas.cell_count(), 0);
    }

    #[test]
    fn test_scan_lists_all_markers() {
        let mut canvas = MemoryCanvas::new();
        canvas.set_text(cell("A2"), Marker::first("a").to_string());
        canvas.set_text(cell("C2"), Marker::first("b").to_string());
        canvas.set_text(cell("A4"), Marker::last("a").to_string());

        let found = MarkerLocator::new()
            .scan(&canvas, CellRange::parse("A1:C5").unwrap())
            .unwrap();
        let cells: Vec<String> = found.iter().map(|(c, _)| c.to_string()).collect();
        assert_eq!(cells, vec!["A2", "C2", "A4"]);
    }
}
