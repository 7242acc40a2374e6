//! Benchmarks for sheetfill layout performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks stream synthetic datasets into an in-memory template.

use std::fs;
use std::path::{Path, PathBuf};

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sheetfill::canvas::MemoryCanvas;
use sheetfill::layout::{MarkerParser, RowKind};
use sheetfill::{CellRef, Marker};
use tempfile::TempDir;

/// Template A1:K40 with a 36-row table and a 20-row table.
fn create_template() -> MemoryCanvas {
    let mut canvas = MemoryCanvas::new();
    canvas.set_text(CellRef::new(0, 0), "SCHEDULE");
    canvas.set_text(CellRef::new(2, 0), Marker::first("parts").to_string());
    canvas.set_text(CellRef::new(37, 0), Marker::last("parts").to_string());
    canvas.set_text(CellRef::new(2, 7), Marker::first("bars").to_string());
    canvas.set_text(CellRef::new(21, 7), Marker::last("bars").to_string());
    canvas
}

/// Writes a dataset with a section header every tenth record.
fn create_dataset(dir: &Path, name: &str, rows: usize) -> PathBuf {
    let mut content = String::new();
    for i in 0..rows {
        if i % 10 == 0 {
            content.push_str(&format!("SECTION {},,\n", i / 10 + 1));
        } else {
            content.push_str(&format!("{}-{:04},member {},{}\n", name, i, i % 17, i * 3));
        }
    }
    let path = dir.join(format!("{}.csv", name));
    fs::write(&path, content).unwrap();
    path
}

/// Benchmark a full fill at various dataset sizes.
fn bench_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill");
    let root = TempDir::new().unwrap();
    let template = create_template();

    for rows in [100, 1_000, 5_000].iter() {
        let dir = root.path().join(rows.to_string());
        fs::create_dir(&dir).unwrap();
        let datasets = [
            create_dataset(&dir, "parts", *rows),
            create_dataset(&dir, "bars", rows / 2),
        ];

        group.bench_function(format!("{}_rows", rows), |b| {
            b.iter(|| {
                let mut canvas = template.clone();
                sheetfill::fill(&mut canvas, "A1:K40", black_box(&datasets[..])).unwrap()
            });
        });
    }

    group.finish();
}

/// Benchmark marker parsing and row classification.
fn bench_parsing(c: &mut Criterion) {
    let parser = MarkerParser::new();
    let text = "Parts {first-cell:'parts'} and {last-cell:'bars'}";

    c.bench_function("marker_parse", |b| {
        b.iter(|| parser.parse(black_box(text)));
    });

    let header: Vec<String> = vec!["SECTION A".into(), String::new(), String::new()];
    let record: Vec<String> = vec!["P-0001".into(), "member".into(), "12".into()];
    c.bench_function("row_classify", |b| {
        b.iter(|| {
            RowKind::classify(black_box(&header));
            RowKind::classify(black_box(&record))
        });
    });
}

criterion_group!(benches, bench_fill, bench_parsing);
criterion_main!(benches);
