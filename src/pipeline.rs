//! Build pipeline: notebooks in, pages out.
//!
//! ## Stages
//!
//! ```text
//! discover_inputs   notebooks/*.ipynb, sorted by path
//! collect_pages     per notebook: load → extract metadata → render body → front matter
//! add_navigation    prev/next across non-skipped pages, in discovery order
//! write_pages       <pages>/<id>.html = front matter + info marker + nav + body
//! ```
//!
//! [`build_all`] runs all four. [`prepare_pages`] stops before writing, which is
//! what `check` uses.
//!
//! ## Failure Handling
//!
//! - A missing or unreadable notebook directory fails immediately.
//! - Missing title or topics never fail a page: the extractor falls back and the
//!   warning is collected in the [`BuildReport`].
//! - A notebook that cannot be parsed or rendered aborts the build, naming the file.
//! - A failed write aborts the remaining writes. Files already written stay.
//!
//! ## Housekeeping
//!
//! [`clean_output_dir`] and [`copy_assets`] are separate operations the caller
//! invokes explicitly; neither runs as part of [`build_all`].

use crate::config::{OverwritePolicy, SiteConfig};
use crate::front_matter::front_matter;
use crate::links::LinkRewriter;
use crate::metadata::{self, ExtractionWarning};
use crate::naming::page_id;
use crate::nav::add_navigation;
use crate::notebook::{Notebook, NotebookError};
use crate::render::{NotebookRenderer, RenderError, render_page};
use crate::types::{DuplicatePageId, INFO_MARKER, Page, PageSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Notebook file extension (matched case-insensitively).
pub const NOTEBOOK_EXTENSION: &str = "ipynb";

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("cannot read notebook directory {path}: {source}")]
    InputDir { path: PathBuf, source: io::Error },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to load notebook {path}: {source}")]
    Notebook { path: PathBuf, source: NotebookError },
    #[error("failed to render notebook {path}: {source}")]
    Render { path: PathBuf, source: RenderError },
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("Invalid asset subdirectory pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error(transparent)]
    Duplicate(#[from] DuplicatePageId),
}

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("cannot walk asset directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("asset already exists: {0}")]
    Exists(PathBuf),
}

/// Outcome of a full build.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Files written, in navigation order
    pub written: Vec<PathBuf>,
    /// Ids excluded by configuration
    pub skipped: Vec<String>,
    /// Degraded metadata, by page id
    pub warnings: Vec<(String, ExtractionWarning)>,
}

impl BuildReport {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Outcome of an asset copy.
#[derive(Debug, Default, PartialEq)]
pub struct CopyReport {
    /// Destination paths written
    pub copied: Vec<PathBuf>,
    /// Destination paths left alone because they already existed
    pub skipped: Vec<PathBuf>,
    /// Configured subdirectories with no input directory
    pub missing: Vec<String>,
}

// ============================================================================
// Discovery
// ============================================================================

/// Notebook files in `dir`, sorted by path.
pub fn discover_inputs(dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
    debug!(dir = %dir.display(), "discovering notebooks");
    let entries = fs::read_dir(dir).map_err(|source| BuildError::InputDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .map(|e| e.eq_ignore_ascii_case(NOTEBOOK_EXTENSION))
                    .unwrap_or(false)
        })
        .collect();
    paths.sort();

    debug!(count = paths.len(), "found notebooks");
    Ok(paths)
}

/// Files currently in the output directory, sorted. Empty if it doesn't exist.
pub fn discover_outputs(dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    paths.sort();
    Ok(paths)
}

// ============================================================================
// Page construction
// ============================================================================

/// Build the page record for one notebook.
///
/// Skipped notebooks are loaded and their metadata extracted for reporting, but
/// they are not rendered.
pub fn build_page<R: NotebookRenderer + ?Sized>(
    path: &Path,
    config: &SiteConfig,
    renderer: &R,
    rewriter: &LinkRewriter,
) -> Result<Page, BuildError> {
    let id = page_id(path);
    debug!(id = %id, "gathering notebook");

    let notebook = Notebook::load(path).map_err(|source| BuildError::Notebook {
        path: path.to_path_buf(),
        source,
    })?;
    let meta = metadata::extract(&id, &notebook);
    let skip = config.is_skipped(&id);

    let body_html = if skip {
        String::new()
    } else {
        render_page(renderer, &notebook, rewriter).map_err(|source| BuildError::Render {
            path: path.to_path_buf(),
            source,
        })?
    };

    let front_matter = front_matter(&meta.title, &meta.permalink, &meta.topics);

    Ok(Page {
        id,
        skip,
        source_path: path.to_path_buf(),
        output_dir: config.paths.pages.clone(),
        title: meta.title,
        permalink: meta.permalink,
        topics: meta.topics,
        body_html,
        nav_html: None,
        info_marker: INFO_MARKER.to_string(),
        front_matter,
        warnings: meta.warnings,
    })
}

/// Discover every notebook and build its page record, without navigation.
pub fn collect_pages<R: NotebookRenderer + ?Sized>(
    config: &SiteConfig,
    renderer: &R,
) -> Result<PageSet, BuildError> {
    let rewriter = LinkRewriter::new(&config.assets.subdirs)?;
    let mut pages = PageSet::new();
    for path in discover_inputs(&config.paths.notebooks)? {
        let page = build_page(&path, config, renderer, &rewriter)?;
        for warning in &page.warnings {
            warn!(id = %page.id, "{warning}");
        }
        pages.insert(page)?;
    }
    Ok(pages)
}

/// Collect pages and assign navigation. Nothing is written.
pub fn prepare_pages<R: NotebookRenderer + ?Sized>(
    config: &SiteConfig,
    renderer: &R,
) -> Result<PageSet, BuildError> {
    let mut pages = collect_pages(config, renderer)?;
    add_navigation(&mut pages);
    Ok(pages)
}

// ============================================================================
// Output
// ============================================================================

/// Write every non-skipped page to its output file.
pub fn write_pages(pages: &PageSet) -> Result<Vec<PathBuf>, BuildError> {
    let mut written = Vec::new();
    for page in pages.buildable() {
        let path = page.output_path();
        let write = |path: &Path| -> io::Result<()> {
            fs::create_dir_all(&page.output_dir)?;
            fs::write(path, page.document())
        };
        write(&path).map_err(|source| BuildError::Write {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "wrote page");
        written.push(path);
    }
    Ok(written)
}

/// Run the whole pipeline and write the pages.
pub fn build_all<R: NotebookRenderer + ?Sized>(
    config: &SiteConfig,
    renderer: &R,
) -> Result<BuildReport, BuildError> {
    let pages = prepare_pages(config, renderer)?;
    let written = write_pages(&pages)?;

    Ok(BuildReport {
        written,
        skipped: pages
            .iter()
            .filter(|p| p.skip)
            .map(|p| p.id.clone())
            .collect(),
        warnings: pages
            .iter()
            .flat_map(|p| p.warnings.iter().map(|w| (p.id.clone(), w.clone())))
            .collect(),
    })
}

/// Delete every file in the output directory. Subdirectories are kept.
///
/// Returns the removed paths.
pub fn clean_output_dir(dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
    let files = discover_outputs(dir)?;
    for file in &files {
        fs::remove_file(file)?;
        debug!(path = %file.display(), "removed");
    }
    Ok(files)
}

// ============================================================================
// Assets
// ============================================================================

/// Mirror every configured asset subdirectory into the assets output directory.
///
/// Files are found recursively under `<notebooks>/<subdir>/` and copied to
/// `<assets>/<subdir>/` with the same relative layout. Existing destination files
/// are handled according to `policy`.
pub fn copy_assets(config: &SiteConfig, policy: OverwritePolicy) -> Result<CopyReport, AssetError> {
    let mut report = CopyReport::default();

    for subdir in &config.assets.subdirs {
        let source_root = config.paths.notebooks.join(subdir);
        if !source_root.is_dir() {
            warn!(subdir = %subdir, "asset directory not found, skipping");
            report.missing.push(subdir.clone());
            continue;
        }
        let dest_root = config.paths.assets.join(subdir);
        debug!(from = %source_root.display(), to = %dest_root.display(), "copying assets");

        for entry in WalkDir::new(&source_root).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&source_root) else {
                continue;
            };
            let dest = dest_root.join(relative);

            if dest.exists() {
                match policy {
                    OverwritePolicy::Skip => {
                        debug!(path = %dest.display(), "exists, skipped");
                        report.skipped.push(dest);
                        continue;
                    }
                    OverwritePolicy::Fail => return Err(AssetError::Exists(dest)),
                    OverwritePolicy::Overwrite => {}
                }
            }

            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &dest)?;
            debug!(path = %dest.display(), "copied");
            report.copied.push(dest);
        }
    }

    Ok(report)
}
