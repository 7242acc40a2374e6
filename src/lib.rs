//! # sheetfill
//!
//! Template-driven pagination of delimited datasets onto a cell canvas.
//!
//! A page template is a block of cells holding the page furniture plus, for
//! every table, a pair of markers (`{first-cell:'parts'}` and
//! `{last-cell:'parts'}`) reserving the rows that table may use on one page.
//! sheetfill reads one CSV dataset per table, works out how many pages the
//! longest table needs, stamps that many copies of the template side by side
//! and pours every table into its rows, wrapping to the next copy when a
//! page is full.
//!
//! ## Quick Start
//!
//! ```no_run
//! use sheetfill::canvas::MemoryCanvas;
//! use sheetfill::{fill, render};
//!
//! fn main() -> sheetfill::Result<()> {
//!     let mut canvas = MemoryCanvas::from_json_file("template.json")?;
//!
//!     let report = fill(&mut canvas, "A1:K17", &["parts.csv", "bars.csv"])?;
//!     println!("{} pages", report.page_count);
//!
//!     std::fs::write("filled.json", render::to_json(&canvas, render::JsonFormat::Pretty)?)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Multiple tables per page**: each table has its own row budget
//! - **Header rows**: a record with only a first field becomes a merged label
//! - **Images**: fields naming an image file become pictures inset in the cell
//! - **Host agnostic**: any surface implementing [`canvas::Canvas`] works

pub mod canvas;
pub mod detect;
pub mod engine;
pub mod error;
pub mod layout;
pub mod model;
pub mod render;

// Re-export commonly used types
pub use canvas::{Canvas, CopyBuffer, MemoryCanvas};
pub use detect::{check_dataset, dataset_name, is_supported_dataset};
pub use engine::{FillPlan, FillReport, PageEngine};
pub use error::{Error, Result};
pub use layout::{LayoutOptions, Marker, MarkerKind, StreamReport};
pub use model::{
    CellRange, CellRect, CellRef, ImagePlacement, PageTemplate, Placement, ReplicationDirection,
    TableLayout,
};
pub use render::JsonFormat;

use std::path::{Path, PathBuf};

/// Fill a canvas from datasets using default options.
///
/// # Arguments
///
/// * `canvas` - Canvas holding the template
/// * `template` - Template region in A1 notation, e.g. `"A1:K17"`
/// * `paths` - One dataset per table; the file stem is the table name
///
/// # Example
///
/// ```no_run
/// use sheetfill::{fill, MemoryCanvas};
///
/// let mut canvas = MemoryCanvas::from_json_file("template.json").unwrap();
/// let report = fill(&mut canvas, "A1:K17", &["parts.csv"]).unwrap();
/// println!("Pages: {}", report.page_count);
/// ```
pub fn fill<C, P>(canvas: &mut C, template: &str, paths: &[P]) -> Result<FillReport>
where
    C: Canvas + ?Sized,
    P: AsRef<Path>,
{
    fill_with_options(canvas, template, paths, LayoutOptions::default())
}

/// Fill a canvas from datasets with custom options.
///
/// # Example
///
/// ```no_run
/// use sheetfill::{fill_with_options, LayoutOptions, MemoryCanvas};
///
/// let options = LayoutOptions::new()
///     .with_image_dir("./images")
///     .with_image_padding(2.0);
/// let mut canvas = MemoryCanvas::from_json_file("template.json").unwrap();
/// fill_with_options(&mut canvas, "A1:K17", &["parts.csv"], options).unwrap();
/// ```
pub fn fill_with_options<C, P>(
    canvas: &mut C,
    template: &str,
    paths: &[P],
    options: LayoutOptions,
) -> Result<FillReport>
where
    C: Canvas + ?Sized,
    P: AsRef<Path>,
{
    let engine = PageEngine::new(PageTemplate::parse(template)?, options)?;
    engine.run(canvas, paths, &mut CopyBuffer::new())
}

/// Measure datasets against a template without touching the canvas.
///
/// The measurement runs on a copy, so `canvas` keeps its markers.
pub fn plan<C, P>(canvas: &C, template: &str, paths: &[P], options: LayoutOptions) -> Result<FillPlan>
where
    C: Canvas + Clone,
    P: AsRef<Path>,
{
    let engine = PageEngine::new(PageTemplate::parse(template)?, options)?;
    let mut scratch = canvas.clone();
    engine.prepare(&mut scratch, paths, &mut CopyBuffer::new())
}

/// Builder for filling canvases.
///
/// # Example
///
/// ```no_run
/// use sheetfill::{MemoryCanvas, Sheetfill};
///
/// let mut canvas = MemoryCanvas::from_json_file("template.json")?;
/// let report = Sheetfill::new()
///     .with_root_dir("./schedules")
///     .with_image_dir("images")
///     .with_dataset("parts.csv")
///     .with_dataset("bars.csv")
///     .fill(&mut canvas, "A1:K17")?;
/// # Ok::<(), sheetfill::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Sheetfill {
    options: LayoutOptions,
    datasets: Vec<PathBuf>,
}

impl Sheetfill {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all options.
    pub fn with_options(mut self, options: LayoutOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the base directory for relative paths.
    pub fn with_root_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.options = self.options.with_root_dir(dir);
        self
    }

    /// Set the image directory.
    pub fn with_image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.options = self.options.with_image_dir(dir);
        self
    }

    /// Set the image padding in points.
    pub fn with_image_padding(mut self, padding: f32) -> Self {
        self.options = self.options.with_image_padding(padding);
        self
    }

    /// Set the dataset field delimiter.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.options = self.options.with_delimiter(delimiter);
        self
    }

    /// Stack page instances downwards instead of sideways.
    pub fn down(mut self) -> Self {
        self.options = self.options.with_direction(ReplicationDirection::Down);
        self
    }

    /// Add a dataset.
    pub fn with_dataset(mut self, path: impl Into<PathBuf>) -> Self {
        self.datasets.push(path.into());
        self
    }

    /// Add several datasets.
    pub fn with_datasets<P: Into<PathBuf>>(mut self, paths: impl IntoIterator<Item = P>) -> Self {
        self.datasets.extend(paths.into_iter().map(Into::into));
        self
    }

    /// The options the builder will run with.
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Measure the datasets against `template` on a copy of `canvas`.
    pub fn plan<C: Canvas + Clone>(&self, canvas: &C, template: &str) -> Result<FillPlan> {
        plan(canvas, template, &self.datasets, self.options.clone())
    }

    /// Fill `canvas` from the datasets.
    pub fn fill<C: Canvas + ?Sized>(&self, canvas: &mut C, template: &str) -> Result<FillReport> {
        fill_with_options(canvas, template, &self.datasets, self.options.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn template_canvas() -> MemoryCanvas {
        let mut canvas = MemoryCanvas::new();
        canvas.set_text(CellRef::new(0, 0), "Parts");
        canvas.set_text(CellRef::new(1, 0), Marker::first("parts").to_string());
        canvas.set_text(CellRef::new(2, 0), Marker::last("parts").to_string());
        canvas
    }

    #[test]
    fn test_sheetfill_builder() {
        let builder = Sheetfill::new()
            .with_image_padding(3.0)
            .with_delimiter(';')
            .down()
            .with_dataset("a.csv")
            .with_datasets(["b.csv", "c.csv"]);

        assert_eq!(builder.options().image_padding, 3.0);
        assert_eq!(builder.options().delimiter, ';');
        assert_eq!(builder.options().direction, ReplicationDirection::Down);
        assert_eq!(builder.datasets.len(), 3);
    }

    #[test]
    fn test_plan_leaves_canvas_untouched() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("parts.csv");
        fs::write(&data, "1,a\n2,b\n3,c\n").unwrap();

        let canvas = template_canvas();
        let plan = plan(&canvas, "A1:B3", &[&data], LayoutOptions::default()).unwrap();
        assert_eq!(plan.page_count, 2);
        assert_eq!(canvas, template_canvas());
    }

    #[test]
    fn test_fill_writes_rows() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("parts.csv"), "1,a\n2,b\n3,c\n").unwrap();

        let mut canvas = template_canvas();
        let report = Sheetfill::new()
            .with_root_dir(dir.path())
            .with_dataset("parts.csv")
            .fill(&mut canvas, "A1:B3")
            .unwrap();

        assert_eq!(report.page_count, 2);
        assert_eq!(canvas.text(CellRef::new(1, 0)), "1");
        assert_eq!(canvas.text(CellRef::new(2, 1)), "b");
        assert_eq!(canvas.text(CellRef::new(0, 2)), "Parts");
        assert_eq!(canvas.text(CellRef::new(1, 2)), "3");
    }

    #[test]
    fn test_fill_invalid_template() {
        let mut canvas = MemoryCanvas::new();
        let result = fill(&mut canvas, "A1:B2:C3", &["parts.csv"]);
        assert!(matches!(result, Err(Error::InvalidRange(_))));
    }

    #[test]
    fn test_fill_without_datasets() {
        let mut canvas = template_canvas();
        let report = fill::<_, &str>(&mut canvas, "A1:B3", &[]).unwrap();
        assert_eq!(report.page_count, 0);
        assert!(report.tables.is_empty());
    }
}
