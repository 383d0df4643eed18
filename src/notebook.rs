//! Notebook document model.
//!
//! Notebooks are read from nbformat 4 JSON (`.ipynb`) into an explicit structure:
//! an ordered list of cells, each with a type tag, its source text, and (for code
//! cells) the outputs recorded when it was last executed.
//!
//! ## Multiline strings
//!
//! nbformat stores `source` and stream `text` either as one string or as a list of
//! lines that must be concatenated as-is (each line keeps its trailing `\n`). Both
//! forms are accepted and normalized to a single `String`.
//!
//! ```json
//! { "cell_type": "markdown", "metadata": {}, "source": ["# Title\n", "Intro"] }
//! ```
//!
//! Unknown fields are ignored. Notebooks older than nbformat 4 are rejected rather
//! than upgraded.

use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Oldest nbformat major version the model understands.
pub const MIN_NBFORMAT: u32 = 4;

#[derive(Error, Debug)]
pub enum NotebookError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported nbformat version {0} (need 4 or later)")]
    UnsupportedVersion(u32),
}

/// A parsed notebook document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Notebook {
    pub cells: Vec<Cell>,
    #[serde(default)]
    pub metadata: NotebookMetadata,
    pub nbformat: u32,
    #[serde(default)]
    pub nbformat_minor: u32,
}

impl Notebook {
    /// Build an in-memory nbformat 4 notebook from cells.
    pub fn new(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            metadata: NotebookMetadata::default(),
            nbformat: MIN_NBFORMAT,
            nbformat_minor: 5,
        }
    }

    /// Parse a notebook from its JSON text.
    pub fn from_json(json: &str) -> Result<Self, NotebookError> {
        let notebook: Notebook = serde_json::from_str(json)?;
        if notebook.nbformat < MIN_NBFORMAT {
            return Err(NotebookError::UnsupportedVersion(notebook.nbformat));
        }
        Ok(notebook)
    }

    /// Read and parse a `.ipynb` file.
    pub fn load(path: &Path) -> Result<Self, NotebookError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Source text of the first cell, if the notebook has any cells.
    pub fn first_cell_text(&self) -> Option<&str> {
        self.cells.first().map(|c| c.source.as_str())
    }

    /// Kernel language name, used to tag code blocks (`python` when unknown).
    pub fn language(&self) -> &str {
        self.metadata
            .language_info
            .as_ref()
            .map(|l| l.name.as_str())
            .or_else(|| {
                self.metadata
                    .kernelspec
                    .as_ref()
                    .and_then(|k| k.language.as_deref())
            })
            .filter(|name| !name.is_empty())
            .unwrap_or("python")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NotebookMetadata {
    #[serde(default)]
    pub kernelspec: Option<KernelSpec>,
    #[serde(default)]
    pub language_info: Option<LanguageInfo>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KernelSpec {
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LanguageInfo {
    pub name: String,
}

/// Cell type tag. Tags outside the nbformat set are preserved so the renderer can
/// report them instead of failing the whole parse.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum CellType {
    Markdown,
    Code,
    Raw,
    Other(String),
}

impl From<String> for CellType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "markdown" => CellType::Markdown,
            "code" => CellType::Code,
            "raw" => CellType::Raw,
            _ => CellType::Other(tag),
        }
    }
}

impl std::fmt::Display for CellType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellType::Markdown => write!(f, "markdown"),
            CellType::Code => write!(f, "code"),
            CellType::Raw => write!(f, "raw"),
            CellType::Other(tag) => write!(f, "{tag}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Cell {
    pub cell_type: CellType,
    #[serde(deserialize_with = "multiline")]
    pub source: String,
    #[serde(default)]
    pub outputs: Vec<Output>,
    #[serde(default)]
    pub execution_count: Option<u32>,
}

impl Cell {
    pub fn markdown(source: impl Into<String>) -> Self {
        Self::with_type(CellType::Markdown, source)
    }

    pub fn code(source: impl Into<String>) -> Self {
        Self::with_type(CellType::Code, source)
    }

    pub fn raw(source: impl Into<String>) -> Self {
        Self::with_type(CellType::Raw, source)
    }

    fn with_type(cell_type: CellType, source: impl Into<String>) -> Self {
        Self {
            cell_type,
            source: source.into(),
            outputs: Vec::new(),
            execution_count: None,
        }
    }

    pub fn with_output(mut self, output: Output) -> Self {
        self.outputs.push(output);
        self
    }
}

/// A recorded code cell output, tagged by nbformat's `output_type`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "output_type", rename_all = "snake_case")]
pub enum Output {
    Stream {
        #[serde(default)]
        name: String,
        #[serde(deserialize_with = "multiline")]
        text: String,
    },
    ExecuteResult {
        #[serde(default)]
        data: MimeBundle,
    },
    DisplayData {
        #[serde(default)]
        data: MimeBundle,
    },
    Error {
        ename: String,
        evalue: String,
        /// Formatted traceback lines, usually carrying ANSI colour codes
        #[serde(default)]
        traceback: Vec<String>,
    },
}

/// MIME type → payload map of a rich output.
///
/// Payloads are multiline strings for text and base64 types; JSON types keep their
/// structured value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct MimeBundle(pub BTreeMap<String, serde_json::Value>);

impl MimeBundle {
    /// Text payload for a MIME type, joining list-of-lines payloads.
    pub fn text(&self, mime: &str) -> Option<String> {
        match self.0.get(mime)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Array(lines) => Some(
                lines
                    .iter()
                    .filter_map(|line| line.as_str())
                    .collect::<String>(),
            ),
            _ => None,
        }
    }
}

impl<const N: usize> From<[(&str, &str); N]> for MimeBundle {
    fn from(entries: [(&str, &str); N]) -> Self {
        MimeBundle(
            entries
                .into_iter()
                .map(|(mime, payload)| (mime.to_string(), serde_json::Value::from(payload)))
                .collect(),
        )
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MultilineString {
    One(String),
    Lines(Vec<String>),
}

fn multiline<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match MultilineString::deserialize(deserializer)? {
        MultilineString::One(s) => s,
        MultilineString::Lines(lines) => lines.concat(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"{
        "cells": [
            {
                "cell_type": "markdown",
                "metadata": {},
                "source": ["# Intro to NumPy\n", "\n", "Some text"]
            },
            {
                "cell_type": "code",
                "execution_count": 3,
                "metadata": {},
                "outputs": [
                    {"output_type": "stream", "name": "stdout", "text": ["hello\n", "world\n"]},
                    {"output_type": "execute_result", "execution_count": 3, "metadata": {},
                     "data": {"text/plain": ["42"]}}
                ],
                "source": "print('hello')"
            }
        ],
        "metadata": {"language_info": {"name": "python", "version": "3.11"}},
        "nbformat": 4,
        "nbformat_minor": 5
    }"##;

    #[test]
    fn parses_list_and_string_sources() {
        let nb = Notebook::from_json(SAMPLE).unwrap();
        assert_eq!(nb.cells.len(), 2);
        assert_eq!(nb.cells[0].source, "# Intro to NumPy\n\nSome text");
        assert_eq!(nb.cells[1].source, "print('hello')");
        assert_eq!(nb.cells[1].execution_count, Some(3));
    }

    #[test]
    fn parses_outputs() {
        let nb = Notebook::from_json(SAMPLE).unwrap();
        let outputs = &nb.cells[1].outputs;
        assert_eq!(
            outputs[0],
            Output::Stream {
                name: "stdout".to_string(),
                text: "hello\nworld\n".to_string()
            }
        );
        match &outputs[1] {
            Output::ExecuteResult { data } => {
                assert_eq!(data.text("text/plain").as_deref(), Some("42"))
            }
            other => panic!("expected execute_result, got {other:?}"),
        }
    }

    #[test]
    fn first_cell_text_of_empty_notebook_is_none() {
        let nb = Notebook::new(vec![]);
        assert_eq!(nb.first_cell_text(), None);
    }

    #[test]
    fn language_from_metadata() {
        let nb = Notebook::from_json(SAMPLE).unwrap();
        assert_eq!(nb.language(), "python");

        let json = r#"{"cells": [], "metadata": {"kernelspec": {"language": "julia"}}, "nbformat": 4}"#;
        assert_eq!(Notebook::from_json(json).unwrap().language(), "julia");
    }

    #[test]
    fn unknown_cell_type_is_preserved() {
        let json = r#"{"cells": [{"cell_type": "heading", "source": "x"}], "nbformat": 4}"#;
        let nb = Notebook::from_json(json).unwrap();
        assert_eq!(nb.cells[0].cell_type, CellType::Other("heading".to_string()));
    }

    #[test]
    fn old_nbformat_is_rejected() {
        let json = r#"{"cells": [], "nbformat": 3}"#;
        assert!(matches!(
            Notebook::from_json(json),
            Err(NotebookError::UnsupportedVersion(3))
        ));
    }

    #[test]
    fn malformed_json_is_error() {
        assert!(matches!(
            Notebook::from_json("{\"cells\": ["),
            Err(NotebookError::Json(_))
        ));
    }

    #[test]
    fn mime_bundle_joins_lines() {
        let mut bundle = MimeBundle::default();
        bundle.0.insert(
            "text/html".to_string(),
            serde_json::json!(["<b>", "bold", "</b>"]),
        );
        assert_eq!(bundle.text("text/html").as_deref(), Some("<b>bold</b>"));
        assert_eq!(bundle.text("image/png"), None);
    }
}
