//! Sample template and datasets for trying the tool out.

use std::fs;
use std::path::{Path, PathBuf};

use sheetfill::canvas::MemoryCanvas;
use sheetfill::model::CellFormat;
use sheetfill::{Canvas, CellRange, CellRef, JsonFormat, Marker};

/// Template region of the sample canvas.
pub const SAMPLE_TEMPLATE: &str = "A1:K17";

const WORDS: &[&str] = &[
    "anchor", "bracket", "column", "dowel", "flange", "gusset", "hanger", "joist", "lintel",
    "mullion", "purlin", "rafter", "sill", "stud", "truss", "wedge",
];

/// Files written by [`write_sample`].
pub struct SampleFiles {
    /// Template canvas JSON
    pub canvas: PathBuf,
    /// Dataset files, one per table
    pub datasets: Vec<PathBuf>,
}

/// Write a template canvas and two datasets into `dir`.
///
/// `parts.csv` has three columns with a section header every sixth record
/// and an image reference on every third data row. `bars.csv` is a single
/// column list, so every record is laid out as a label.
pub fn write_sample(dir: &Path, rows: usize) -> Result<SampleFiles, Box<dyn std::error::Error>> {
    fs::create_dir_all(dir)?;

    let canvas = dir.join("template.json");
    let json = sheetfill::render::to_json(&sample_canvas()?, JsonFormat::Pretty)?;
    fs::write(&canvas, json)?;

    let parts = dir.join("parts.csv");
    fs::write(&parts, parts_csv(rows))?;

    let bars = dir.join("bars.csv");
    fs::write(&bars, bars_csv(rows))?;

    Ok(SampleFiles {
        canvas,
        datasets: vec![parts, bars],
    })
}

fn sample_canvas() -> sheetfill::Result<MemoryCanvas> {
    let mut canvas = MemoryCanvas::new();
    let bold = CellFormat {
        bold: true,
        ..CellFormat::default()
    };
    let cell = |a1: &str| CellRef::parse(a1);

    canvas.set_text(cell("A1")?, "SCHEDULE");
    canvas.set_format(cell("A1")?, bold.clone());
    canvas.merge(CellRange::parse("A1:K1")?)?;

    for (a1, title) in [("A2", "Mark"), ("B2", "Description"), ("C2", "Image"), ("G2", "Bar")] {
        canvas.set_text(cell(a1)?, title);
        canvas.set_format(cell(a1)?, bold.clone());
    }

    canvas.set_text(cell("A3")?, Marker::first("parts").to_string());
    canvas.set_text(cell("A16")?, Marker::last("parts").to_string());
    canvas.set_text(cell("G3")?, Marker::first("bars").to_string());
    canvas.set_text(cell("G12")?, Marker::last("bars").to_string());
    canvas.set_text(cell("A17")?, "Sheet");

    canvas.set_column_width(1, 120.0);
    canvas.set_column_width(2, 60.0);
    canvas.set_column_width(6, 90.0);
    Ok(canvas)
}

fn word(index: usize) -> &'static str {
    WORDS[(index * 7 + 3) % WORDS.len()]
}

fn parts_csv(rows: usize) -> String {
    let mut out = String::new();
    let mut section = 0;
    for index in 0..rows {
        if index % 6 == 0 {
            section += 1;
            out.push_str(&format!("SECTION {},,\n", section));
            continue;
        }
        let mark = format!("P-{:03}", index);
        let image = if index % 3 == 0 {
            format!("{}.jpg", mark.to_lowercase())
        } else {
            String::new()
        };
        out.push_str(&format!(
            "{},{} {},{}\n",
            mark,
            word(index),
            word(index + 5),
            image
        ));
    }
    out
}

fn bars_csv(rows: usize) -> String {
    (0..rows)
        .map(|index| format!("{}-{}\n", word(index * 3), index + 1))
        .collect()
}
