//! Shared test utilities for the nbpages test suite.
//!
//! Provides notebook builders, a ready-made site layout in a temp directory, and
//! a bare page record for navigation and page-set tests.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let site = setup_site();
//! let config = site_config(site.path());
//! let report = build_all(&config, &BasicRenderer).unwrap();
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::config::SiteConfig;
use crate::types::{INFO_MARKER, Page};

/// Bytes of the fake image placed under `images/`.
pub const PLOT_PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake image data";

// =========================================================================
// Notebook builders
// =========================================================================

/// nbformat 4 JSON for a notebook made of markdown cells.
pub fn notebook_json(markdown_cells: &[&str]) -> String {
    let cells: Vec<serde_json::Value> = markdown_cells
        .iter()
        .map(|source| {
            serde_json::json!({
                "cell_type": "markdown",
                "metadata": {},
                "source": source,
            })
        })
        .collect();
    serde_json::json!({
        "cells": cells,
        "metadata": {"language_info": {"name": "python"}},
        "nbformat": 4,
        "nbformat_minor": 5,
    })
    .to_string()
}

/// Write a markdown-only notebook into `dir`.
pub fn write_notebook(dir: &Path, file_name: &str, markdown_cells: &[&str]) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(file_name);
    fs::write(&path, notebook_json(markdown_cells)).unwrap();
    path
}

// =========================================================================
// Site fixture
// =========================================================================

/// A temp directory laid out as a small notebook site:
///
/// ```text
/// notebooks/
/// ├── a.ipynb          "Alpha Notebook", links images/plot.png
/// ├── b.ipynb          "Beta Notebook"
/// ├── c.ipynb          "Gamma Notebook"
/// └── images/
///     └── plot.png
/// ```
pub fn setup_site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let notebooks = tmp.path().join("notebooks");

    write_notebook(
        &notebooks,
        "a.ipynb",
        &[
            "# Alpha Notebook\n\n**Topics Covered**\n* Arrays\n* Plotting",
            "![plot](images/plot.png)",
        ],
    );
    write_notebook(
        &notebooks,
        "b.ipynb",
        &["# Beta Notebook\n\n**Topics Covered**\n* Series"],
    );
    write_notebook(
        &notebooks,
        "c.ipynb",
        &["# Gamma Notebook!\n\n**Topics Covered**\n* Frames\n* Joins"],
    );

    fs::create_dir_all(notebooks.join("images")).unwrap();
    fs::write(notebooks.join("images/plot.png"), PLOT_PNG).unwrap();
    tmp
}

/// Config pointing every path inside `root`.
pub fn site_config(root: &Path) -> SiteConfig {
    let mut config = SiteConfig::default();
    config.paths.notebooks = root.join("notebooks");
    config.paths.pages = root.join("docs/_notebooks");
    config.paths.assets = root.join("docs/assets");
    config
}

// =========================================================================
// Page records
// =========================================================================

/// A minimal, non-skipped page with a permalink derived from its title.
pub fn page(id: &str, title: &str) -> Page {
    Page {
        id: id.to_string(),
        skip: false,
        source_path: PathBuf::from(format!("notebooks/{id}.ipynb")),
        output_dir: PathBuf::from("out"),
        title: title.to_string(),
        permalink: crate::metadata::extract_permalink(title),
        topics: Vec::new(),
        body_html: String::new(),
        nav_html: None,
        info_marker: INFO_MARKER.to_string(),
        front_matter: String::new(),
        warnings: Vec::new(),
    }
}
