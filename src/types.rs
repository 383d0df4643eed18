//! Page records shared by every pipeline stage.
//!
//! A [`Page`] is created per discovered notebook and filled in stage by stage
//! (extraction → rendering → front matter → navigation). The [`PageSet`] owning
//! them is passed explicitly between stages and keeps discovery order, which is
//! also navigation order.

use crate::metadata::ExtractionWarning;
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

/// Info placeholder written between the front matter and the navigation.
pub const INFO_MARKER: &str = "{{site.nb_info}}";

#[derive(Error, Debug, PartialEq)]
#[error("duplicate page id {0:?}")]
pub struct DuplicatePageId(pub String);

/// One notebook's page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Filename stem, unique across the set
    pub id: String,
    /// Excluded from navigation and output
    pub skip: bool,
    /// Notebook the page was built from
    pub source_path: PathBuf,
    /// Directory the page is written to
    pub output_dir: PathBuf,
    pub title: String,
    pub permalink: String,
    pub topics: Vec<String>,
    /// Rendered, link-rewritten body fragment
    pub body_html: String,
    /// Navigation fragment, set by the navigation stage for non-skipped pages
    pub nav_html: Option<String>,
    pub info_marker: String,
    pub front_matter: String,
    pub warnings: Vec<ExtractionWarning>,
}

impl Page {
    /// Output filename, `<id>.html`.
    pub fn file_name(&self) -> String {
        format!("{}.html", self.id)
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(self.file_name())
    }

    /// Final file content: front matter, info marker, navigation, body.
    pub fn document(&self) -> String {
        let nav = self.nav_html.as_deref().unwrap_or_default();
        let mut out = String::with_capacity(
            self.front_matter.len() + self.info_marker.len() + nav.len() + self.body_html.len(),
        );
        out.push_str(&self.front_matter);
        out.push_str(&self.info_marker);
        out.push_str(nav);
        out.push_str(&self.body_html);
        out
    }
}

/// Pages in discovery order, indexed by id.
#[derive(Debug, Clone, Default)]
pub struct PageSet {
    pages: Vec<Page>,
    index: BTreeMap<String, usize>,
}

impl PageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a page. Ids must be unique.
    pub fn insert(&mut self, page: Page) -> Result<(), DuplicatePageId> {
        if self.index.contains_key(&page.id) {
            return Err(DuplicatePageId(page.id));
        }
        self.index.insert(page.id.clone(), self.pages.len());
        self.pages.push(page);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Page> {
        self.index.get(id).map(|&i| &self.pages[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter()
    }

    /// Mutable access for stages that fill in fields. Ids must not change.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Page> {
        self.pages.iter_mut()
    }

    /// Non-skipped pages, in order.
    pub fn buildable(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter().filter(|p| !p.skip)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
