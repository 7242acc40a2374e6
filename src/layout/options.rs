//! Layout options and configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::ReplicationDirection;

/// Default inset between an embedded image and its cell border, in points.
pub const DEFAULT_IMAGE_PADDING: f32 = 1.0;

/// Image extensions recognised in dataset fields by default.
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "tif", "tiff"];

/// Options for laying out datasets on a canvas.
///
/// Built once by the caller and passed to every component. Can also be read
/// from a JSON settings file where every field is optional:
///
/// ```
/// use sheetfill::LayoutOptions;
///
/// let options = LayoutOptions::from_json(r#"{ "image_padding": 2.5, "image_dir": "pics" }"#).unwrap();
/// assert_eq!(options.image_padding, 2.5);
/// assert_eq!(options.dataset_extension, "csv");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Base directory for relative dataset and image paths
    pub root_dir: Option<PathBuf>,

    /// Directory image file names are resolved against
    pub image_dir: PathBuf,

    /// Inset between an image and its cell border, in points
    pub image_padding: f32,

    /// Extensions (without dot) that mark a field as an image reference
    pub image_extensions: Vec<String>,

    /// Extension (without dot) of accepted dataset files
    pub dataset_extension: String,

    /// Field delimiter of dataset files
    pub delimiter: char,

    /// Direction page instances are stamped in
    pub direction: ReplicationDirection,
}

impl LayoutOptions {
    /// Create new layout options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Read options from a JSON settings file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Set the base directory for relative paths.
    pub fn with_root_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.root_dir = Some(dir.into());
        self
    }

    /// Set the image directory.
    pub fn with_image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.image_dir = dir.into();
        self
    }

    /// Set the image padding.
    pub fn with_image_padding(mut self, padding: f32) -> Self {
        self.image_padding = padding;
        self
    }

    /// Replace the recognised image extensions.
    pub fn with_image_extensions<S: Into<String>>(
        mut self,
        extensions: impl IntoIterator<Item = S>,
    ) -> Self {
        self.image_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Set the accepted dataset extension.
    pub fn with_dataset_extension(mut self, extension: impl Into<String>) -> Self {
        self.dataset_extension = extension.into();
        self
    }

    /// Set the field delimiter.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the replication direction.
    pub fn with_direction(mut self, direction: ReplicationDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Check the options for values no run could use.
    pub fn validate(&self) -> Result<()> {
        if !self.image_padding.is_finite() || self.image_padding < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "image padding must be a non-negative number, got {}",
                self.image_padding
            )));
        }
        self.delimiter_byte()?;
        if self.dataset_extension.trim_start_matches('.').is_empty() {
            return Err(Error::InvalidConfig(
                "dataset extension must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// The delimiter as a single byte.
    pub fn delimiter_byte(&self) -> Result<u8> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(Error::InvalidConfig(format!(
                "delimiter must be ASCII, got '{}'",
                self.delimiter
            )))
        }
    }

    /// Resolve a path against the root directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.root_dir {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Directory images are looked up in, with the root applied.
    pub fn image_root(&self) -> PathBuf {
        self.resolve_path(&self.image_dir)
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            root_dir: None,
            image_dir: PathBuf::from("images"),
            image_padding: DEFAULT_IMAGE_PADDING,
            image_extensions: DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
            dataset_extension: "csv".to_string(),
            delimiter: ',',
            direction: ReplicationDirection::Across,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_options_builder() {
        let options = LayoutOptions::new()
            .with_root_dir("/data")
            .with_image_dir("pics")
            .with_image_padding(2.0)
            .with_delimiter(';')
            .with_direction(ReplicationDirection::Down);

        assert_eq!(options.image_root(), PathBuf::from("/data/pics"));
        assert_eq!(options.image_padding, 2.0);
        assert_eq!(options.delimiter_byte().unwrap(), b';');
        assert_eq!(options.direction, ReplicationDirection::Down);
    }

    #[test]
    fn test_default_options() {
        let options = LayoutOptions::default();
        assert_eq!(options.image_padding, DEFAULT_IMAGE_PADDING);
        assert_eq!(options.dataset_extension, "csv");
        assert!(options.image_extensions.iter().any(|e| e == "jpg"));
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_absolute_paths_ignore_root() {
        let options = LayoutOptions::new().with_root_dir("/data");
        assert_eq!(
            options.resolve_path(Path::new("/tmp/a.csv")),
            PathBuf::from("/tmp/a.csv")
        );
        assert_eq!(
            options.resolve_path(Path::new("a.csv")),
            PathBuf::from("/data/a.csv")
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let negative = LayoutOptions::new().with_image_padding(-1.0);
        assert!(matches!(negative.validate(), Err(Error::InvalidConfig(_))));

        let unicode = LayoutOptions::new().with_delimiter('§');
        assert!(matches!(unicode.validate(), Err(Error::InvalidConfig(_))));

        let empty = LayoutOptions::new().with_dataset_extension(".");
        assert!(matches!(empty.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_from_json_partial() {
        let options = LayoutOptions::from_json(r#"{ "direction": "down" }"#).unwrap();
        assert_eq!(options.direction, ReplicationDirection::Down);
        assert_eq!(options.image_dir, PathBuf::from("images"));

        assert!(LayoutOptions::from_json(r#"{ "image_padding": -3 }"#).is_err());
    }
}
