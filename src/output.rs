//! CLI output formatting for all commands.
//!
//! # Information-First Display
//!
//! Every page is shown by its position and title first, with file paths and
//! metadata as indented context lines underneath. The same header shape is used by
//! `check` and `build`, so one notebook reads the same in both.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! 001 Intro to NumPy → 01-intro.html
//!     Source: 01-intro.ipynb
//!     Permalink: /intro-to-numpy/
//!     Topics: Arrays, Broadcasting
//!     Next: Pandas Basics
//! 002 Scratch -- SKIPPED
//!     Source: scratch.ipynb
//!
//! 1 page to build, 1 skipped
//! ```
//!
//! ## Build
//!
//! ```text
//! Wrote docs/_notebooks/01-intro.html
//!
//! Warnings
//!     scratch: no heading cell found, using title "scratch"
//!
//! Built 1 page, 1 skipped, 1 warning
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions do no I/O.

use crate::pipeline::{BuildReport, CopyReport};
use crate::types::{Page, PageSet};
use std::path::{Path, PathBuf};

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 page`, `2 pages`.
fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn page_header(index: usize, page: &Page) -> String {
    if page.skip {
        format!("{} {} -- SKIPPED", format_index(index), page.title)
    } else {
        format!(
            "{} {} → {}",
            format_index(index),
            page.title,
            page.file_name()
        )
    }
}

// ============================================================================
// Check
// ============================================================================

/// Per-page summary of a prepared (not yet written) page set.
pub fn format_check_output(pages: &PageSet) -> Vec<String> {
    let mut lines = Vec::new();
    let buildable: Vec<&Page> = pages.buildable().collect();

    for (i, page) in pages.iter().enumerate() {
        lines.push(page_header(i + 1, page));
        lines.push(format!(
            "{}Source: {}",
            indent(1),
            file_name(&page.source_path)
        ));
        if page.skip {
            continue;
        }
        lines.push(format!("{}Permalink: /{}/", indent(1), page.permalink));
        if !page.topics.is_empty() {
            lines.push(format!("{}Topics: {}", indent(1), page.topics.join(", ")));
        }

        let pos = buildable.iter().position(|p| p.id == page.id);
        if let Some(prev) = pos.and_then(|p| p.checked_sub(1)).map(|p| buildable[p]) {
            lines.push(format!("{}Prev: {}", indent(1), prev.title));
        }
        if let Some(next) = pos.and_then(|p| buildable.get(p + 1)) {
            lines.push(format!("{}Next: {}", indent(1), next.title));
        }
        for warning in &page.warnings {
            lines.push(format!("{}Warning: {}", indent(1), warning));
        }
    }

    let skipped = pages.len() - buildable.len();
    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "{} to build, {} skipped",
        plural(buildable.len(), "page"),
        skipped
    ));
    lines
}

pub fn print_check_output(pages: &PageSet) {
    for line in format_check_output(pages) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .written
        .iter()
        .map(|path| format!("Wrote {}", path.display()))
        .collect();

    if report.has_warnings() {
        lines.push(String::new());
        lines.push("Warnings".to_string());
        for (id, warning) in &report.warnings {
            lines.push(format!("{}{}: {}", indent(1), id, warning));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Built {}, {} skipped, {}",
        plural(report.written.len(), "page"),
        report.skipped.len(),
        plural(report.warnings.len(), "warning")
    ));
    lines
}

pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Clean
// ============================================================================

/// Listing for `clean`: what was removed, or what would be without `--yes`.
pub fn format_clean_output(files: &[PathBuf], removed: bool) -> Vec<String> {
    if files.is_empty() {
        return vec!["Output directory is already empty".to_string()];
    }
    let verb = if removed { "Removed" } else { "Would remove" };
    let mut lines: Vec<String> = files
        .iter()
        .map(|f| format!("{} {}", verb, f.display()))
        .collect();
    if !removed {
        lines.push(String::new());
        lines.push("Re-run with --yes to delete these files".to_string());
    }
    lines
}

pub fn print_clean_output(files: &[PathBuf], removed: bool) {
    for line in format_clean_output(files, removed) {
        println!("{}", line);
    }
}

// ============================================================================
// Assets
// ============================================================================

pub fn format_copy_output(report: &CopyReport) -> Vec<String> {
    let mut lines = Vec::new();
    for path in &report.copied {
        lines.push(format!("Copied {}", path.display()));
    }
    for path in &report.skipped {
        lines.push(format!("{}Exists, skipped: {}", indent(1), path.display()));
    }
    for subdir in &report.missing {
        lines.push(format!("{}Not found: {}/", indent(1), subdir));
    }
    lines.push(format!(
        "Copied {}, {} already present",
        plural(report.copied.len(), "asset"),
        report.skipped.len()
    ));
    lines
}

pub fn print_copy_output(report: &CopyReport) {
    for line in format_copy_output(report) {
        println!("{}", line);
    }
}
