//! Error types for sheetfill library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::layout::MarkerKind;

/// Result type alias for sheetfill operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while laying out datasets on a canvas.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading datasets or settings.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The dataset could not be parsed as delimited text.
    #[error("Dataset parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A cell reference is not valid A1 notation.
    #[error("Invalid cell reference: {0}")]
    InvalidCellReference(String),

    /// A cell range is not valid A1 notation.
    #[error("Invalid cell range: {0}")]
    InvalidRange(String),

    /// A required table marker is missing from the template.
    #[error("Marker {{{kind}-cell:'{table}'}} not found in template")]
    MarkerNotFound {
        /// Table name the marker belongs to
        table: String,
        /// Which of the two markers is missing
        kind: MarkerKind,
    },

    /// The last-row marker sits above the first-row marker.
    #[error("Markers for table '{table}' are inverted: first at {first}, last at {last}")]
    InvalidMarkerSpan {
        /// Table name
        table: String,
        /// Location of the first-row marker (A1)
        first: String,
        /// Location of the last-row marker (A1)
        last: String,
    },

    /// Two datasets resolve to the same table name.
    #[error("Duplicate table name: {0}")]
    DuplicateTable(String),

    /// The dataset file type is not supported.
    #[error("Unsupported dataset file: {}", .0.display())]
    UnsupportedDataset(PathBuf),

    /// The configuration is inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The host canvas rejected an operation.
    #[error("Canvas error: {0}")]
    Canvas(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether the error aborts a whole generation run.
    ///
    /// Only [`Error::UnsupportedDataset`] is recoverable; the engine skips
    /// the dataset and carries on.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::UnsupportedDataset(_))
    }
}
