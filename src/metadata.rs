//! Page metadata extraction from notebook content.
//!
//! Three fields are derived from the raw cell text, never from notebook metadata:
//!
//! - **Title**: the first line of the first cell that starts with a `#` heading
//!   marker. Punctuation is removed so the title is safe to reuse as a slug source.
//! - **Permalink**: the title lowercased with spaces turned into hyphens.
//! - **Topics**: the bullet list following a `**Topics Covered**` marker in the
//!   first cell.
//!
//! ```text
//! # Intro to NumPy!          → title "Intro to NumPy", permalink "intro-to-numpy"
//!
//! **Topics Covered**
//! * Arrays                   → topics ["Arrays", "Broadcasting"]
//! * Broadcasting
//! ```
//!
//! ## Missing metadata
//!
//! Every lookup returns an explicit "not found" (`None`) instead of an empty match.
//! [`extract`] turns those into [`ExtractionWarning`]s and degrades gracefully: a
//! notebook without a heading is titled after its filename, a notebook without a
//! topics marker gets an empty topic list. The page is still built.
//!
//! A title with no letters or digits (`++`) slugs to nothing. The permalink then
//! comes from the filename, and failing that from a hex encoding of the id
//! (`page-2b2b`), so every page keeps a distinct, non-empty URL.

use crate::naming::display_title;
use crate::notebook::{Cell, Notebook};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Marker line introducing the topics bullet list.
pub const TOPICS_MARKER: &str = "**Topics Covered**";

static NON_WORD_REGEX: OnceLock<Regex> = OnceLock::new();
static TOPICS_REGEX: OnceLock<Regex> = OnceLock::new();

fn non_word_regex() -> &'static Regex {
    NON_WORD_REGEX.get_or_init(|| Regex::new(r"[^\w\s]").expect("valid non-word regex"))
}

fn topics_regex() -> &'static Regex {
    TOPICS_REGEX.get_or_init(|| Regex::new(r"\*\*Topics\s+Covered\*\*").expect("valid topics regex"))
}

/// A metadata field that could not be found and was filled with a fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionWarning {
    /// No cell starts with a heading; the title fell back to the filename.
    MissingTitle { fallback: String },
    /// The first cell has no topics marker, or the marker has no bullets.
    MissingTopics,
    /// The title slugs to nothing; the permalink was derived from the id.
    EmptyPermalink { fallback: String },
}

impl fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionWarning::MissingTitle { fallback } => {
                write!(f, "no heading cell found, using title {fallback:?}")
            }
            ExtractionWarning::MissingTopics => {
                write!(f, "no {TOPICS_MARKER} list in the first cell")
            }
            ExtractionWarning::EmptyPermalink { fallback } => {
                write!(f, "title has no usable characters, using permalink {fallback:?}")
            }
        }
    }
}

/// Metadata extracted from one notebook.
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted {
    pub title: String,
    pub permalink: String,
    pub topics: Vec<String>,
    pub warnings: Vec<ExtractionWarning>,
}

/// Extract title, permalink and topics, recording a warning for each fallback.
///
/// `id` is the notebook's filename stem, used for the fallback title.
pub fn extract(id: &str, notebook: &Notebook) -> Extracted {
    let mut warnings = Vec::new();

    let title = extract_title(&notebook.cells).unwrap_or_else(|| {
        let fallback = display_title(id);
        warnings.push(ExtractionWarning::MissingTitle {
            fallback: fallback.clone(),
        });
        fallback
    });

    let topics = notebook
        .first_cell_text()
        .and_then(find_topics)
        .unwrap_or_default();
    if topics.is_empty() {
        warnings.push(ExtractionWarning::MissingTopics);
    }

    let mut permalink = extract_permalink(&title);
    if permalink.is_empty() {
        permalink = fallback_permalink(id);
        warnings.push(ExtractionWarning::EmptyPermalink {
            fallback: permalink.clone(),
        });
    }

    Extracted {
        permalink,
        title,
        topics,
        warnings,
    }
}

/// Title from the first cell whose source begins with a heading marker.
///
/// Takes the first line after the marker (`#`, `##`, ...), trims it and strips every
/// character that is neither a word character nor whitespace. Returns `None` when
/// no cell starts with `#` or the cleaned line is empty.
pub fn extract_title(cells: &[Cell]) -> Option<String> {
    let cell = cells.iter().find(|c| c.source.starts_with('#'))?;
    let line = cell
        .source
        .trim_start_matches('#')
        .lines()
        .next()
        .unwrap_or_default();
    let cleaned = non_word_regex().replace_all(line.trim(), "");
    let cleaned = cleaned.trim();
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

/// URL slug for a title: lowercased, spaces → hyphens.
///
/// Anything other than alphanumerics, `-` and `_` is dropped so the result is
/// always a valid path segment.
pub fn extract_permalink(title: &str) -> String {
    title
        .to_lowercase()
        .replace(' ', "-")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

/// Permalink for a page whose title slugs to nothing.
///
/// Uses the filename's display title when that has usable characters, otherwise
/// `page-` plus the hex bytes of the id. Ids are unique, so the result is too.
fn fallback_permalink(id: &str) -> String {
    let from_name = extract_permalink(&display_title(id));
    if !from_name.is_empty() {
        return from_name;
    }
    let hex: String = id.bytes().map(|b| format!("{b:02x}")).collect();
    if hex.is_empty() {
        "page".to_string()
    } else {
        format!("page-{hex}")
    }
}

/// Topics listed after the `**Topics Covered**` marker, or an empty list.
pub fn extract_topics(first_cell_text: &str) -> Vec<String> {
    find_topics(first_cell_text).unwrap_or_default()
}

/// Bullet items (`* item`) following the topics marker.
///
/// Blank lines between the marker and the first bullet are allowed; the list
/// ends at the first line that is not a bullet. Returns `None` when the marker is
/// absent and `Some(vec![])` when it is present without bullets.
pub fn find_topics(text: &str) -> Option<Vec<String>> {
    let marker = topics_regex().find(text)?;
    let mut topics = Vec::new();
    for line in text[marker.end()..].lines() {
        let line = line.trim();
        if let Some(item) = line.strip_prefix("* ") {
            let item = item.trim();
            if !item.is_empty() {
                topics.push(item.to_string());
            }
        } else if line.is_empty() && topics.is_empty() {
            continue;
        } else {
            break;
        }
    }
    Some(topics)
}
