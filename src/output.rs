//! CLI output formatting.
//!
//! Each run prints one line per thumbnail written, then a summary:
//!
//! ```text
//! 001 photos/thumbnail.dawn.jpg
//! 002 photos/thumbnail.dusk.jpg
//! Wrote 2 thumbnails from 3 images (1 skipped)
//! ```
//!
//! With `--json` the same information is printed as a single JSON object.
//!
//! `format_*` functions return lines (or a string) and do no I/O; `print_*`
//! wrappers write them to stdout.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// What a CLI run did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Number of source images given to the run.
    pub inputs: usize,
    /// Thumbnails written, in source order.
    pub written: Vec<PathBuf>,
}

impl RunSummary {
    pub fn new(inputs: usize, written: Vec<PathBuf>) -> Self {
        Self { inputs, written }
    }

    /// Sources whose destination already existed and were left alone.
    pub fn skipped(&self) -> usize {
        self.inputs.saturating_sub(self.written.len())
    }
}

fn format_index(pos: usize) -> String {
    format!("{:03}", pos)
}

/// `path` relative to `base` when it is inside it.
fn display_path(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

pub fn format_run_output(summary: &RunSummary, base: &Path) -> Vec<String> {
    let mut lines: Vec<String> = summary
        .written
        .iter()
        .enumerate()
        .map(|(i, path)| format!("{} {}", format_index(i + 1), display_path(path, base)))
        .collect();

    let mut total = format!(
        "Wrote {} from {}",
        plural(summary.written.len(), "thumbnail"),
        plural(summary.inputs, "image")
    );
    if summary.skipped() > 0 {
        total.push_str(&format!(" ({} skipped)", summary.skipped()));
    }
    lines.push(total);
    lines
}

pub fn print_run_output(summary: &RunSummary, base: &Path) {
    for line in format_run_output(summary, base) {
        println!("{}", line);
    }
}

pub fn format_run_json(summary: &RunSummary) -> serde_json::Result<String> {
    #[derive(Serialize)]
    struct Json<'a> {
        #[serde(flatten)]
        summary: &'a RunSummary,
        skipped: usize,
    }
    serde_json::to_string_pretty(&Json {
        summary,
        skipped: summary.skipped(),
    })
}

pub fn print_run_json(summary: &RunSummary) -> serde_json::Result<()> {
    println!("{}", format_run_json(summary)?);
    Ok(())
}
