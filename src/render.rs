//! Notebook body rendering.
//!
//! The rendering engine sits behind [`NotebookRenderer`]: a notebook goes in, an
//! embeddable HTML fragment comes out. [`render_page`] runs an engine and passes
//! its output through the [`LinkRewriter`], producing a page's final body.
//!
//! ## BasicRenderer
//!
//! The bundled engine mirrors the "basic" template of classic notebook exporters:
//! no `<html>`/`<head>` wrapper, one `div.cell` per cell, so the fragment can be
//! dropped into a site layout.
//!
//! ```text
//! div.cell.text_cell      markdown cell, rendered with pulldown-cmark
//! div.cell.code_cell      input prompt + highlighted-ready <pre><code>, then outputs
//! (raw cells)             passed through verbatim
//! ```
//!
//! Rich outputs pick the first available MIME type in this order:
//! `text/html`, `application/javascript`, `image/svg+xml`, `image/png`,
//! `image/jpeg`, `image/gif`, `text/latex`, `text/markdown`, `text/plain`. Images
//! are inlined as data URIs from the notebook's base64 payload. An output carrying
//! none of these (a widget state, an empty bundle) is left out of the page.
//!
//! Error outputs show the traceback with terminal colour codes removed.
//!
//! An unsupported cell type fails the whole notebook.

use crate::links::LinkRewriter;
use crate::notebook::{Cell, CellType, MimeBundle, Notebook, Output};
use maud::{Markup, PreEscaped, html};
use pulldown_cmark::{Options, Parser, html as md_html};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, PartialEq)]
pub enum RenderError {
    #[error("cell {index}: unsupported cell type {cell_type:?}")]
    UnsupportedCellType { index: usize, cell_type: String },
}

/// A notebook-to-HTML rendering engine.
pub trait NotebookRenderer {
    /// Render the notebook body as an embeddable HTML fragment.
    fn render(&self, notebook: &Notebook) -> Result<String, RenderError>;
}

/// Render `notebook` and rewrite its local asset links.
pub fn render_page<R: NotebookRenderer + ?Sized>(
    renderer: &R,
    notebook: &Notebook,
    rewriter: &LinkRewriter,
) -> Result<String, RenderError> {
    let body = renderer.render(notebook)?;
    Ok(rewriter.rewrite(&body))
}

/// Built-in engine producing basic-template fragments.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicRenderer;

impl NotebookRenderer for BasicRenderer {
    fn render(&self, notebook: &Notebook) -> Result<String, RenderError> {
        let language = notebook.language();
        let cells = notebook
            .cells
            .iter()
            .enumerate()
            .map(|(index, cell)| render_cell(index, cell, language))
            .collect::<Result<Vec<_>, _>>()?;

        let body = html! {
            @for cell in &cells {
                (cell)
            }
        };
        Ok(body.into_string())
    }
}

const IMAGE_MIME_TYPES: &[&str] = &["image/png", "image/jpeg", "image/gif"];

static ANSI_ESCAPE_REGEX: OnceLock<Regex> = OnceLock::new();

fn ansi_escape_regex() -> &'static Regex {
    ANSI_ESCAPE_REGEX
        .get_or_init(|| Regex::new(r"\x1b\[[0-9;?]*[A-Za-z]").expect("valid ANSI escape regex"))
}

fn render_cell(index: usize, cell: &Cell, language: &str) -> Result<Markup, RenderError> {
    match &cell.cell_type {
        CellType::Markdown => Ok(html! {
            div.cell.text_cell {
                div.inner_cell {
                    div.text_cell_render.rendered_html {
                        (PreEscaped(markdown_to_html(&cell.source)))
                    }
                }
            }
        }),
        CellType::Raw => Ok(PreEscaped(cell.source.clone())),
        CellType::Code => {
            let outputs = cell
                .outputs
                .iter()
                .filter_map(|output| render_output(index, output))
                .collect::<Vec<_>>();
            let prompt = cell
                .execution_count
                .map(|n| n.to_string())
                .unwrap_or_else(|| " ".to_string());

            Ok(html! {
                div.cell.code_cell {
                    div.input {
                        div.prompt.input_prompt { "In [" (prompt) "]:" }
                        div.inner_cell {
                            div.input_area {
                                pre { code class={ "language-" (language) } { (cell.source) } }
                            }
                        }
                    }
                    @if !outputs.is_empty() {
                        div.output_wrapper {
                            div.output {
                                @for output in &outputs {
                                    div.output_area { (output) }
                                }
                            }
                        }
                    }
                }
            })
        }
        CellType::Other(tag) => Err(RenderError::UnsupportedCellType {
            index,
            cell_type: tag.clone(),
        }),
    }
}

/// `None` for rich outputs with no displayable MIME type.
fn render_output(index: usize, output: &Output) -> Option<Markup> {
    match output {
        Output::Stream { name, text } => Some(html! {
            div class={ "output_subarea output_stream output_" (name) } {
                pre { (text) }
            }
        }),
        Output::ExecuteResult { data } | Output::DisplayData { data } => {
            let rendered = render_mime_bundle(data);
            if rendered.is_none() {
                let mimes: Vec<&str> = data.0.keys().map(String::as_str).collect();
                debug!(cell = index, ?mimes, "output has no displayable MIME type, omitted");
            }
            rendered
        }
        Output::Error {
            ename,
            evalue,
            traceback,
        } => {
            let text = if traceback.is_empty() {
                format!("{ename}: {evalue}")
            } else {
                strip_ansi(&traceback.join("\n"))
            };
            Some(html! {
                div.output_subarea.output_error {
                    pre { (text) }
                }
            })
        }
    }
}

/// Remove terminal colour and cursor escape sequences.
pub fn strip_ansi(text: &str) -> String {
    ansi_escape_regex().replace_all(text, "").into_owned()
}

fn render_mime_bundle(data: &MimeBundle) -> Option<Markup> {
    if let Some(html_text) = data.text("text/html") {
        return Some(html! {
            div.output_subarea.output_html.rendered_html { (PreEscaped(html_text)) }
        });
    }
    if let Some(script) = data.text("application/javascript") {
        return Some(html! {
            div.output_subarea.output_javascript {
                script type="text/javascript" { (PreEscaped(script)) }
            }
        });
    }
    if let Some(svg) = data.text("image/svg+xml") {
        return Some(html! {
            div.output_subarea.output_svg { (PreEscaped(svg)) }
        });
    }
    for &mime in IMAGE_MIME_TYPES {
        if let Some(payload) = data.text(mime) {
            let encoded: String = payload.split_whitespace().collect();
            return Some(html! {
                div.output_subarea.output_image {
                    img src={ "data:" (mime) ";base64," (encoded) };
                }
            });
        }
    }
    if let Some(latex) = data.text("text/latex") {
        return Some(html! {
            div.output_subarea.output_latex { (latex) }
        });
    }
    if let Some(markdown) = data.text("text/markdown") {
        return Some(html! {
            div.output_subarea.output_markdown.rendered_html {
                (PreEscaped(markdown_to_html(&markdown)))
            }
        });
    }
    data.text("text/plain").map(|text| {
        html! {
            div.output_subarea.output_text { pre { (text) } }
        }
    })
}

/// Render markdown cell source to HTML.
pub fn markdown_to_html(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(source, options);
    let mut out = String::new();
    md_html::push_html(&mut out, parser);
    out
}
