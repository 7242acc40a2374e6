//! Dataset format detection.

use crate::error::{Error, Result};
use std::path::Path;

/// Check whether a path has the accepted dataset extension.
///
/// The comparison ignores case and a leading dot in `extension`.
///
/// # Example
/// ```
/// use sheetfill::detect::is_supported_dataset;
///
/// assert!(is_supported_dataset("parts.CSV", "csv"));
/// assert!(!is_supported_dataset("parts.txt", "csv"));
/// ```
pub fn is_supported_dataset<P: AsRef<Path>>(path: P, extension: &str) -> bool {
    let wanted = extension.trim_start_matches('.');
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(wanted))
        .unwrap_or(false)
}

/// Table name of a dataset: its file stem.
///
/// # Returns
/// * `Some(name)` for paths with a non-empty UTF-8 stem
/// * `None` otherwise
pub fn dataset_name<P: AsRef<Path>>(path: P) -> Option<String> {
    path.as_ref()
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Validate a dataset path and return its table name.
///
/// # Returns
/// * `Ok(name)` if the file has the accepted extension and a usable stem
/// * `Err(Error::UnsupportedDataset)` otherwise
pub fn check_dataset<P: AsRef<Path>>(path: P, extension: &str) -> Result<String> {
    let path = path.as_ref();
    if !is_supported_dataset(path, extension) {
        return Err(Error::UnsupportedDataset(path.to_path_buf()));
    }
    dataset_name(path).ok_or_else(|| Error::UnsupportedDataset(path.to_path_buf()))
}
