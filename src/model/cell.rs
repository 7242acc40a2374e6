//! Cell addressing in A1 notation.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// A single cell on a canvas (zero-based row and column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellRef {
    /// Zero-based row index
    pub row: u32,
    /// Zero-based column index
    pub col: u32,
}

impl CellRef {
    /// Create a cell reference from zero-based indices.
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Parse an A1 reference such as `"K17"` or `"$B$2"`.
    pub fn parse(a1: &str) -> Result<Self> {
        let invalid = || Error::InvalidCellReference(a1.to_string());
        let trimmed = a1.trim();

        let mut letters = String::new();
        let mut digits = String::new();
        for ch in trimmed.chars() {
            if ch == '$' {
                continue;
            }
            if ch.is_ascii_alphabetic() {
                if !digits.is_empty() {
                    return Err(invalid());
                }
                letters.push(ch);
            } else if ch.is_ascii_digit() {
                digits.push(ch);
            } else {
                return Err(invalid());
            }
        }

        let col = column_index(&letters).ok_or_else(invalid)?;
        let row: u32 = digits.parse().map_err(|_| invalid())?;
        if row == 0 {
            return Err(invalid());
        }
        Ok(Self::new(row - 1, col))
    }

    /// Move by the given number of rows and columns.
    pub fn offset(self, rows: u32, cols: u32) -> Self {
        Self::new(self.row + rows, self.col + cols)
    }

    /// Letters of this cell's column (`0` → `"A"`).
    pub fn column_name(&self) -> String {
        column_name(self.col)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_name(self.col), self.row + 1)
    }
}

impl FromStr for CellRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Convert column letters to a zero-based index (`"AA"` → 26).
pub fn column_index(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    let mut val: u32 = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let digit = (ch.to_ascii_uppercase() as u8 - b'A') as u32 + 1;
        val = val.checked_mul(26)?.checked_add(digit)?;
    }
    Some(val - 1)
}

/// Convert a zero-based column index to letters (26 → `"AA"`).
pub fn column_name(col: u32) -> String {
    let mut n = col as u64 + 1;
    let mut out = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        out.push((b'A' + rem) as char);
        n = (n - 1) / 26;
    }
    out.iter().rev().collect()
}

/// A rectangular block of cells, always stored top-left to bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellRange {
    /// Top-left cell
    pub start: CellRef,
    /// Bottom-right cell (inclusive)
    pub end: CellRef,
}

impl CellRange {
    /// Create a range from two corners in any order.
    pub fn new(a: CellRef, b: CellRef) -> Self {
        Self {
            start: CellRef::new(a.row.min(b.row), a.col.min(b.col)),
            end: CellRef::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    /// A range covering a single cell.
    pub fn single(cell: CellRef) -> Self {
        Self {
            start: cell,
            end: cell,
        }
    }

    /// A range starting at `start` spanning `rows` × `cols` cells.
    pub fn with_size(start: CellRef, rows: u32, cols: u32) -> Self {
        Self::new(
            start,
            start.offset(rows.saturating_sub(1), cols.saturating_sub(1)),
        )
    }

    /// Parse `"A1:K17"`; a lone `"B2"` yields a 1×1 range.
    pub fn parse(a1: &str) -> Result<Self> {
        let parts: Vec<&str> = a1.split(':').collect();
        match parts.as_slice() {
            [single] => Ok(Self::single(CellRef::parse(single)?)),
            [first, second] => Ok(Self::new(CellRef::parse(first)?, CellRef::parse(second)?)),
            _ => Err(Error::InvalidRange(a1.to_string())),
        }
    }

    /// Number of rows in the range.
    pub fn rows(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    /// Number of columns in the range.
    pub fn columns(&self) -> u32 {
        self.end.col - self.start.col + 1
    }

    /// Whether the range covers exactly one cell.
    pub fn is_single(&self) -> bool {
        self.start == self.end
    }

    /// Check whether a cell lies inside the range.
    pub fn contains(&self, cell: CellRef) -> bool {
        cell.row >= self.start.row
            && cell.row <= self.end.row
            && cell.col >= self.start.col
            && cell.col <= self.end.col
    }

    /// Check whether another range lies entirely inside this one.
    pub fn contains_range(&self, other: &CellRange) -> bool {
        self.contains(other.start) && self.contains(other.end)
    }

    /// Check whether two ranges share at least one cell.
    pub fn intersects(&self, other: &CellRange) -> bool {
        self.start.row <= other.end.row
            && other.start.row <= self.end.row
            && self.start.col <= other.end.col
            && other.start.col <= self.end.col
    }

    /// Move the whole range.
    pub fn offset(&self, rows: u32, cols: u32) -> Self {
        Self {
            start: self.start.offset(rows, cols),
            end: self.end.offset(rows, cols),
        }
    }

    /// Iterate over every cell, row by row.
    pub fn cells(&self) -> impl Iterator<Item = CellRef> {
        let range = *self;
        (range.start.row..=range.end.row).flat_map(move |row| {
            (range.start.col..=range.end.col).map(move |col| CellRef::new(row, col))
        })
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

// Both types serialize as A1 strings so they can key JSON maps.

impl Serialize for CellRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Serialize for CellRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct A1Visitor<T>(std::marker::PhantomData<T>);

impl<'de, T> Visitor<'de> for A1Visitor<T>
where
    T: FromStr<Err = Error>,
{
    type Value = T;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an A1-style cell reference")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<T, E> {
        v.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for CellRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_str(A1Visitor(std::marker::PhantomData))
    }
}

impl<'de> Deserialize<'de> for CellRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_str(A1Visitor(std::marker::PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_a1() {
        assert_eq!(CellRef::parse("A1").unwrap(), CellRef::new(0, 0));
        assert_eq!(CellRef::parse("K17").unwrap(), CellRef::new(16, 10));
        assert_eq!(CellRef::parse("aa3").unwrap(), CellRef::new(2, 26));
        assert_eq!(CellRef::parse("$B$2").unwrap(), CellRef::new(1, 1));
    }

    #[test]
    fn test_parse_a1_invalid() {
        assert!(CellRef::parse("").is_err());
        assert!(CellRef::parse("A0").is_err());
        assert!(CellRef::parse("12").is_err());
        assert!(CellRef::parse("1A").is_err());
        assert!(CellRef::parse("A-1").is_err());
    }

    #[test]
    fn test_column_names() {
        assert_eq!(column_name(0), "A");
        assert_eq!(column_name(25), "Z");
        assert_eq!(column_name(26), "AA");
        assert_eq!(column_name(701), "ZZ");
        assert_eq!(column_name(702), "AAA");
        assert_eq!(column_index("ZZ"), Some(701));
        assert_eq!(column_index(""), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(CellRef::new(16, 10).to_string(), "K17");
        let range = CellRange::parse("K17:A1").unwrap();
        assert_eq!(range.to_string(), "A1:K17");
    }

    #[test]
    fn test_range_dimensions() {
        let range = CellRange::parse("A1:K17").unwrap();
        assert_eq!(range.rows(), 17);
        assert_eq!(range.columns(), 11);
        assert!(range.contains(CellRef::new(16, 10)));
        assert!(!range.contains(CellRef::new(17, 10)));

        let single = CellRange::parse("C3").unwrap();
        assert!(single.is_single());
        assert_eq!(single.rows(), 1);
    }

    #[test]
    fn test_range_intersects() {
        let a = CellRange::parse("A1:C3").unwrap();
        let b = CellRange::parse("C3:E5").unwrap();
        let c = CellRange::parse("D1:E2").unwrap();
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert!(a.contains_range(&CellRange::parse("B2:C3").unwrap()));
    }

    #[test]
    fn test_range_cells_row_major() {
        let range = CellRange::parse("A1:B2").unwrap();
        let cells: Vec<String> = range.cells().map(|c| c.to_string()).collect();
        assert_eq!(cells, vec!["A1", "B1", "A2", "B2"]);
    }

    #[test]
    fn test_serde_as_string() {
        let cell = CellRef::new(1, 2);
        assert_eq!(serde_json::to_string(&cell).unwrap(), "\"C2\"");
        let back: CellRange = serde_json::from_str("\"A1:B4\"").unwrap();
        assert_eq!(back.rows(), 4);
    }
}
