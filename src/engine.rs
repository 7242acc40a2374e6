//! The page engine: measures datasets against the template, stamps page
//! instances and streams every table into them.
//!
//! A run has two phases. [`PageEngine::prepare`] builds one [`TableLayout`]
//! per dataset: it stamps a probe copy of the template at instance 1, finds
//! each table's markers in the template and in the probe to learn the row
//! budget and the repeat offset, strips the consumed markers and removes
//! the probe. [`PageEngine::create_pages`] then stamps the resolved number
//! of page instances and streams the tables one after another.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::canvas::{Canvas, CopyBuffer};
use crate::detect;
use crate::error::{Error, Result};
use crate::layout::{
    resolve_page_count, DatasetSummary, ImageEmbedder, LayoutOptions, MarkerLocator,
    RecordStream, RowStreamer, StreamReport, TemplateReplicator,
};
use crate::model::{CellRange, PageTemplate, TableLayout};

/// Measured layout of a run, before any page is created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillPlan {
    /// One layout per accepted dataset, in input order
    pub tables: Vec<TableLayout>,
    /// Page instances the document needs
    pub page_count: usize,
    /// Datasets skipped for an unsupported file type
    pub skipped: Vec<PathBuf>,
}

impl FillPlan {
    /// Find a table by name, ignoring case.
    pub fn table(&self, name: &str) -> Option<&TableLayout> {
        self.tables.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }
}

/// Outcome of a complete run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillReport {
    /// Page instances in the document
    pub page_count: usize,
    /// Per-table streaming results, in input order
    pub tables: Vec<StreamReport>,
    /// Datasets skipped for an unsupported file type
    pub skipped: Vec<PathBuf>,
}

impl FillReport {
    /// Records written across all tables.
    pub fn total_records(&self) -> usize {
        self.tables.iter().map(|t| t.records).sum()
    }

    /// Images placed across all tables.
    pub fn total_images(&self) -> usize {
        self.tables.iter().map(|t| t.images).sum()
    }

    /// Image references whose file was missing.
    pub fn total_missing_images(&self) -> usize {
        self.tables.iter().map(|t| t.missing_images).sum()
    }
}

/// Lays out delimited datasets on a canvas using a page template.
pub struct PageEngine {
    template: PageTemplate,
    options: LayoutOptions,
    locator: MarkerLocator,
    embedder: ImageEmbedder,
}

impl PageEngine {
    /// Create an engine for `template`.
    ///
    /// The replication direction comes from `options`.
    pub fn new(template: PageTemplate, options: LayoutOptions) -> Result<Self> {
        options.validate()?;
        let embedder = ImageEmbedder::new(&options)?;
        Ok(Self {
            template: template.with_direction(options.direction),
            options,
            locator: MarkerLocator::new(),
            embedder,
        })
    }

    /// The template pages are stamped from.
    pub fn template(&self) -> &PageTemplate {
        &self.template
    }

    /// The options the engine runs with.
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Measure every dataset against the template.
    ///
    /// Datasets with an unsupported extension are skipped with a warning.
    /// Consumed markers are removed from the template; the canvas is
    /// otherwise unchanged.
    pub fn prepare<C, P>(
        &self,
        canvas: &mut C,
        paths: &[P],
        buffer: &mut CopyBuffer,
    ) -> Result<FillPlan>
    where
        C: Canvas + ?Sized,
        P: AsRef<Path>,
    {
        info!(
            "Preparing {} dataset(s) against template {}",
            paths.len(),
            self.template.range
        );

        let replicator = TemplateReplicator::new(self.template);
        let probe = replicator.probe(canvas, buffer)?;
        let measured = self.measure(canvas, paths, probe);
        replicator.clear_probe(canvas)?;
        buffer.clear();

        let (tables, skipped) = measured?;
        let page_count = resolve_page_count(&tables);
        info!(
            "{} table(s) need {} page(s), {} dataset(s) skipped",
            tables.len(),
            page_count,
            skipped.len()
        );

        Ok(FillPlan {
            tables,
            page_count,
            skipped,
        })
    }

    fn measure<C, P>(
        &self,
        canvas: &mut C,
        paths: &[P],
        probe: CellRange,
    ) -> Result<(Vec<TableLayout>, Vec<PathBuf>)>
    where
        C: Canvas + ?Sized,
        P: AsRef<Path>,
    {
        let delimiter = self.options.delimiter_byte()?;
        let mut tables: Vec<TableLayout> = Vec::with_capacity(paths.len());
        let mut skipped = Vec::new();

        for path in paths {
            let path = path.as_ref();
            let name = match detect::check_dataset(path, &self.options.dataset_extension) {
                Ok(name) => name,
                Err(err) if !err.is_fatal() => {
                    warn!("Skipping dataset: {}", err);
                    skipped.push(path.to_path_buf());
                    continue;
                }
                Err(err) => return Err(err),
            };
            if tables.iter().any(|t| t.name.eq_ignore_ascii_case(&name)) {
                return Err(Error::DuplicateTable(name));
            }

            let source = self.options.resolve_path(path);
            let summary = DatasetSummary::scan(&source, delimiter)?;

            let span = self.locator.locate(canvas, self.template.range, &name)?;
            let copy = self.locator.locate(canvas, probe, &name)?;
            let row_offset = copy.first.row.saturating_sub(span.first.row);
            let column_offset = copy.first.col.saturating_sub(span.first.col);

            let table = TableLayout::new(name, source, span.first, span.items_per_page())?
                .with_dimensions(summary.row_count, summary.column_count)
                .with_page_offset(row_offset, column_offset);
            debug!(
                "Table '{}': start {}, {} row(s) x {} column(s), {} per page, offset ({}, {}), {} page(s)",
                table.name,
                table.start_cell,
                table.row_count,
                table.column_count,
                table.items_per_page,
                table.row_offset,
                table.column_offset,
                table.page_count()
            );

            self.locator.clear(canvas, &span)?;
            tables.push(table);
        }

        Ok((tables, skipped))
    }

    /// Stamp the page instances a plan needs. Returns the number of copies.
    pub fn replicate<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        plan: &FillPlan,
        buffer: &mut CopyBuffer,
    ) -> Result<usize> {
        TemplateReplicator::new(self.template).replicate(canvas, plan.page_count, buffer)
    }

    /// Stream one table's dataset onto the canvas.
    pub fn stream_table<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        table: &TableLayout,
    ) -> Result<StreamReport> {
        let records = RecordStream::open(&table.source_path, self.options.delimiter_byte()?)?;
        let report = RowStreamer::new(&self.embedder).stream(canvas, table, records)?;
        if report.missing_images > 0 {
            warn!(
                "Table '{}': {} image(s) not found",
                table.name, report.missing_images
            );
        }
        Ok(report)
    }

    /// Create the page instances and stream every table of `plan`.
    ///
    /// Tables are written strictly one after another. The first error
    /// aborts the run and leaves the canvas partly written.
    pub fn create_pages<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        plan: &FillPlan,
        buffer: &mut CopyBuffer,
    ) -> Result<FillReport> {
        let copies = self.replicate(canvas, plan, buffer)?;
        debug!("Stamped {} page instance(s)", copies);

        let mut report = FillReport {
            page_count: plan.page_count,
            tables: Vec::with_capacity(plan.tables.len()),
            skipped: plan.skipped.clone(),
        };
        for table in &plan.tables {
            report.tables.push(self.stream_table(canvas, table)?);
        }

        info!(
            "Filled {} page(s) with {} record(s)",
            report.page_count,
            report.total_records()
        );
        Ok(report)
    }

    /// Prepare and create pages in one go.
    pub fn run<C, P>(&self, canvas: &mut C, paths: &[P], buffer: &mut CopyBuffer) -> Result<FillReport>
    where
        C: Canvas + ?Sized,
        P: AsRef<Path>,
    {
        let plan = self.prepare(canvas, paths, buffer)?;
        self.create_pages(canvas, &plan, buffer)
    }
}
