//! Image embedding for filename-valued fields.

use std::path::{Path, PathBuf};

use log::{trace, warn};
use regex::Regex;

use super::LayoutOptions;
use crate::canvas::Canvas;
use crate::error::{Error, Result};
use crate::model::{CellRef, ImagePlacement};

/// Outcome of embedding one image reference.
#[derive(Debug, Clone, PartialEq)]
pub enum Embedded {
    /// The image was placed inside the cell
    Placed(ImagePlacement),
    /// The referenced file does not exist; the cell was left blank
    Missing(PathBuf),
}

/// Replaces image file names in cells with anchored pictures.
pub struct ImageEmbedder {
    pattern: Option<Regex>,
    image_root: PathBuf,
    padding: f32,
}

impl ImageEmbedder {
    /// Create an embedder from layout options.
    pub fn new(options: &LayoutOptions) -> Result<Self> {
        let alternatives: Vec<String> = options
            .image_extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.'))
            .filter(|e| !e.is_empty())
            .map(regex::escape)
            .collect();

        let pattern = if alternatives.is_empty() {
            None
        } else {
            let source = format!(r"(?i)\.(?:{})$", alternatives.join("|"));
            Some(Regex::new(&source).map_err(|e| Error::InvalidConfig(e.to_string()))?)
        };

        Ok(Self {
            pattern,
            image_root: options.image_root(),
            padding: options.image_padding,
        })
    }

    /// Check whether a field value names an image file.
    pub fn is_image_reference(&self, value: &str) -> bool {
        let value = value.trim();
        match &self.pattern {
            Some(pattern) => !value.is_empty() && pattern.is_match(value),
            None => false,
        }
    }

    /// Where the image named by `value` is looked up.
    pub fn resolve(&self, value: &str) -> PathBuf {
        let path = Path::new(value.trim());
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.image_root.join(path)
        }
    }

    /// Clear `cell` and anchor the image named by `value` inside it.
    ///
    /// The picture is inset by the configured padding on all four sides and
    /// moves and sizes with the cell. A missing file is not an error: the
    /// cell stays blank and a warning is logged.
    pub fn embed<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        cell: CellRef,
        value: &str,
    ) -> Result<Embedded> {
        canvas.set_cell_text(cell, "")?;

        let path = self.resolve(value);
        if !path.is_file() {
            warn!("Image {} for cell {} not found", path.display(), cell);
            return Ok(Embedded::Missing(path));
        }

        let bounds = canvas.cell_rect(cell)?.inset(self.padding);
        let placement = ImagePlacement::new(path, cell, bounds);
        canvas.place_image(&placement)?;
        trace!("Placed image {} in {}", placement.path.display(), cell);

        Ok(Embedded::Placed(placement))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{MemoryCanvas, DEFAULT_COLUMN_WIDTH, DEFAULT_ROW_HEIGHT};
    use crate::model::{CellRect, Placement};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_image_reference_detection() {
        let embedder = ImageEmbedder::new(&LayoutOptions::default()).unwrap();
        assert!(embedder.is_image_reference("bar_12.jpg"));
        assert!(embedder.is_image_reference("Photo.PNG"));
        assert!(!embedder.is_image_reference("notes.txt"));
        assert!(!embedder.is_image_reference("jpg"));
        assert!(!embedder.is_image_reference(""));
    }

    #[test]
    fn test_custom_extensions() {
        let options = LayoutOptions::new().with_image_extensions([".svg"]);
        let embedder = ImageEmbedder::new(&options).unwrap();
        assert!(embedder.is_image_reference("a.svg"));
        assert!(!embedder.is_image_reference("a.jpg"));

        let none = ImageEmbedder::new(&LayoutOptions::new().with_image_extensions(Vec::<String>::new())).unwrap();
        assert!(!none.is_image_reference("a.jpg"));
    }

    #[test]
    fn test_embed_inset_by_padding() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bolt.jpg"), b"jpeg").unwrap();

        let options = LayoutOptions::new()
            .with_image_dir(dir.path())
            .with_image_padding(2.0);
        let embedder = ImageEmbedder::new(&options).unwrap();

        let mut canvas = MemoryCanvas::new();
        let cell = CellRef::new(1, 1);
        canvas.set_text(cell, "bolt.jpg");

        let outcome = embedder.embed(&mut canvas, cell, "bolt.jpg").unwrap();
        let Embedded::Placed(placement) = outcome else {
            panic!("image should be placed");
        };

        assert_eq!(canvas.text(cell), "");
        assert_eq!(placement.placement, Placement::MoveAndSize);
        assert_eq!(
            placement.bounds,
            CellRect::new(
                DEFAULT_COLUMN_WIDTH + 2.0,
                DEFAULT_ROW_HEIGHT + 2.0,
                DEFAULT_COLUMN_WIDTH - 4.0,
                DEFAULT_ROW_HEIGHT - 4.0
            )
        );
        assert_eq!(canvas.images().len(), 1);
    }

    #[test]
    fn test_missing_image_leaves_cell_blank() {
        let dir = TempDir::new().unwrap();
        let embedder = ImageEmbedder::new(&LayoutOptions::new().with_image_dir(dir.path())).unwrap();

        let mut canvas = MemoryCanvas::new();
        let cell = CellRef::new(0, 0);
        canvas.set_text(cell, "gone.png");

        let outcome = embedder.embed(&mut canvas, cell, "gone.png").unwrap();
        assert!(matches!(outcome, Embedded::Missing(_)));
        assert_eq!(canvas.text(cell), "");
        assert!(canvas.images().is_empty());
    }
}
