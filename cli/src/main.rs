//! sheetfill CLI - pour CSV datasets into paginated sheet templates

mod sample;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;

use sheetfill::canvas::MemoryCanvas;
use sheetfill::layout::MarkerLocator;
use sheetfill::{
    CellRange, CopyBuffer, FillReport, JsonFormat, LayoutOptions, PageEngine, PageTemplate,
    ReplicationDirection,
};

#[derive(Parser)]
#[command(name = "sheetfill")]
#[command(version)]
#[command(about = "Pour CSV datasets into a paginated sheet template", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill a template canvas from datasets
    Fill {
        /// Canvas JSON holding the template
        #[arg(value_name = "CANVAS")]
        canvas: PathBuf,

        /// Template region (e.g., "A1:K17")
        #[arg(short, long, default_value = sample::SAMPLE_TEMPLATE)]
        template: String,

        /// Dataset files, one per table
        #[arg(short, long, value_name = "CSV", num_args = 1.., required = true)]
        data: Vec<PathBuf>,

        /// Output file (default: <CANVAS>_filled.json)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        layout: LayoutArgs,

        /// Print a text preview of every page
        #[arg(long)]
        preview: bool,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Measure datasets against a template without filling
    Plan {
        /// Canvas JSON holding the template
        #[arg(value_name = "CANVAS")]
        canvas: PathBuf,

        /// Template region (e.g., "A1:K17")
        #[arg(short, long, default_value = sample::SAMPLE_TEMPLATE)]
        template: String,

        /// Dataset files, one per table
        #[arg(short, long, value_name = "CSV", num_args = 1.., required = true)]
        data: Vec<PathBuf>,

        #[command(flatten)]
        layout: LayoutArgs,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// List table markers in a template
    Markers {
        /// Canvas JSON holding the template
        #[arg(value_name = "CANVAS")]
        canvas: PathBuf,

        /// Template region (e.g., "A1:K17")
        #[arg(short, long, default_value = sample::SAMPLE_TEMPLATE)]
        template: String,
    },

    /// Write a sample template and datasets
    Sample {
        /// Output directory
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Records per dataset
        #[arg(long, default_value = "40")]
        rows: usize,
    },

    /// Show version information
    Version,
}

#[derive(clap::Args)]
struct LayoutArgs {
    /// Settings file (JSON)
    #[arg(short, long, value_name = "FILE", env = "SHEETFILL_CONFIG")]
    config: Option<PathBuf>,

    /// Directory image file names are resolved against
    #[arg(long, value_name = "DIR")]
    image_dir: Option<PathBuf>,

    /// Image inset in points
    #[arg(long, value_name = "PT")]
    padding: Option<f32>,

    /// Stack page instances downwards instead of sideways
    #[arg(long)]
    down: bool,
}

impl LayoutArgs {
    fn options(&self) -> Result<LayoutOptions, Box<dyn std::error::Error>> {
        let mut options = match &self.config {
            Some(path) => {
                debug!("Loading settings from {}", path.display());
                LayoutOptions::from_json_file(path)?
            }
            None => LayoutOptions::default(),
        };
        if let Some(dir) = &self.image_dir {
            options = options.with_image_dir(dir);
        }
        if let Some(padding) = self.padding {
            options = options.with_image_padding(padding);
        }
        if self.down {
            options = options.with_direction(ReplicationDirection::Down);
        }
        options.validate()?;
        Ok(options)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Fill {
            canvas,
            template,
            data,
            output,
            layout,
            preview,
            compact,
        }) => cmd_fill(
            &canvas,
            &template,
            &data,
            output.as_deref(),
            &layout,
            preview,
            compact,
        ),
        Some(Commands::Plan {
            canvas,
            template,
            data,
            layout,
            json,
        }) => cmd_plan(&canvas, &template, &data, &layout, json),
        Some(Commands::Markers { canvas, template }) => cmd_markers(&canvas, &template),
        Some(Commands::Sample { dir, rows }) => cmd_sample(&dir, rows),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!(
                "{}",
                "Usage: sheetfill fill <CANVAS> --data <CSV>...".yellow()
            );
            println!("       sheetfill --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_fill(
    input: &Path,
    template: &str,
    data: &[PathBuf],
    output: Option<&Path>,
    layout: &LayoutArgs,
    preview: bool,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let output = output.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        input.with_file_name(format!("{}_filled.json", stem))
    });

    let mut canvas = MemoryCanvas::from_json_file(input)?;
    let engine = PageEngine::new(PageTemplate::parse(template)?, layout.options()?)?;
    let mut buffer = CopyBuffer::new();

    let pb = ProgressBar::new(2);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    pb.set_message("Measuring datasets...");
    let plan = engine.prepare(&mut canvas, data, &mut buffer)?;
    pb.set_length(2 + plan.tables.len() as u64);
    pb.inc(1);

    pb.set_message(format!("Stamping {} pages...", plan.page_count));
    engine.replicate(&mut canvas, &plan, &mut buffer)?;
    pb.inc(1);

    let mut report = FillReport {
        page_count: plan.page_count,
        tables: Vec::with_capacity(plan.tables.len()),
        skipped: plan.skipped.clone(),
    };
    for table in &plan.tables {
        pb.set_message(format!("Filling {}...", table.name));
        report.tables.push(engine.stream_table(&mut canvas, table)?);
        pb.inc(1);
    }
    pb.finish_with_message("Done!");

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    fs::write(&output, sheetfill::render::to_json(&canvas, format)?)?;

    print_report(&report);
    println!("{} {}", "Saved to".green(), output.display());

    if preview {
        for page in 0..report.page_count.max(1) {
            let range = engine.template().instance_range(page as u32);
            println!();
            println!("{}", format!("Page {} ({})", page + 1, range).cyan().bold());
            println!("{}", "─".repeat(40).dimmed());
            println!("{}", sheetfill::render::to_text(&canvas, range));
        }
    }

    Ok(())
}

fn print_report(report: &FillReport) {
    println!("\n{}", "Fill Summary".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Pages".bold(), report.page_count);
    println!(
        "{}: {} records, {} images",
        "Total".bold(),
        report.total_records(),
        report.total_images()
    );
    if report.total_missing_images() > 0 {
        println!(
            "{} {} image file(s) not found",
            "Warning:".yellow().bold(),
            report.total_missing_images()
        );
    }

    for table in &report.tables {
        println!(
            "  {} {}: {} records ({} headers, {} rows), {} images",
            "├─".dimmed(),
            table.table.bold(),
            table.records,
            table.headers,
            table.data_rows,
            table.images
        );
        if table.missing_images > 0 {
            println!(
                "  {}   {} {} missing",
                "│".dimmed(),
                "images:".yellow(),
                table.missing_images
            );
        }
    }
    for path in &report.skipped {
        println!("  {} {} {}", "└─".dimmed(), "skipped".yellow(), path.display());
    }
}

fn cmd_plan(
    input: &Path,
    template: &str,
    data: &[PathBuf],
    layout: &LayoutArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let canvas = MemoryCanvas::from_json_file(input)?;
    let plan = sheetfill::plan(&canvas, template, data, layout.options()?)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    println!("{}", "Layout Plan".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Template".bold(), template);
    println!("{}: {}", "Pages".bold(), plan.page_count);
    println!();

    for table in &plan.tables {
        println!("{}", table.name.bold());
        println!("  {}: {}", "Source".dimmed(), table.source_path.display());
        println!("  {}: {}", "Start".dimmed(), table.start_cell);
        println!(
            "  {}: {} x {}",
            "Records".dimmed(),
            table.row_count,
            table.column_count
        );
        println!("  {}: {}", "Per page".dimmed(), table.items_per_page);
        println!(
            "  {}: {} rows, {} columns",
            "Page offset".dimmed(),
            table.row_offset,
            table.column_offset
        );
        println!("  {}: {}", "Pages".dimmed(), table.page_count());
    }

    for path in &plan.skipped {
        println!("{} {}", "Skipped".yellow(), path.display());
    }

    Ok(())
}

fn cmd_markers(input: &Path, template: &str) -> Result<(), Box<dyn std::error::Error>> {
    let canvas = MemoryCanvas::from_json_file(input)?;
    let region = CellRange::parse(template)?;
    let markers = MarkerLocator::new().scan(&canvas, region)?;

    if markers.is_empty() {
        println!("{} in {}", "No markers found".yellow(), region);
        return Ok(());
    }

    for (cell, marker) in &markers {
        println!("{:>6}  {}", cell.to_string().bold(), marker);
    }
    println!("\n{} {} markers", "Found".green().bold(), markers.len());

    Ok(())
}

fn cmd_sample(dir: &Path, rows: usize) -> Result<(), Box<dyn std::error::Error>> {
    let files = sample::write_sample(dir, rows)?;

    println!("{}", "Sample files:".green().bold());
    println!("  {} {}", "├─".dimmed(), files.canvas.display());
    for (index, path) in files.datasets.iter().enumerate() {
        let branch = if index + 1 == files.datasets.len() {
            "└─"
        } else {
            "├─"
        };
        println!("  {} {}", branch.dimmed(), path.display());
    }

    println!();
    println!(
        "Try: sheetfill fill {} --data {}",
        files.canvas.display(),
        files
            .datasets
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(" ")
    );

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "sheetfill".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Template-driven pagination of CSV datasets");
    println!();
    println!("License: MIT");
}
