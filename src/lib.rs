//! # nbpages
//!
//! Turns a directory of Jupyter notebooks into HTML pages for a Jekyll-style site.
//! Each notebook becomes one page carrying a front matter header, an info
//! placeholder, prev/next navigation and the rendered notebook body. Local asset
//! links are rewritten to site-relative placeholders and the asset directories are
//! mirrored next to the site's other assets.
//!
//! # Pipeline
//!
//! ```text
//! notebooks/*.ipynb ─┬─ metadata   title, permalink, topics from the cell text
//!                    ├─ render     body fragment, asset links rewritten
//!                    └─ front_matter
//!                          │
//!                        nav        prev/next across non-skipped pages
//!                          │
//!                    docs/_notebooks/<id>.html
//! ```
//!
//! Placeholders such as `{{ "/" | relative_url }}` and `{{site.nb_info}}` are left
//! for the site generator to resolve at site-build time.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`pipeline`] | Discovery, page construction, writing, output cleanup, asset copying |
//! | [`notebook`] | nbformat 4 document model loaded with serde |
//! | [`metadata`] | Title, permalink and topics extraction |
//! | [`render`] | Rendering engine trait and the built-in basic renderer |
//! | [`links`] | Asset link rewriting to `relative_url` placeholders |
//! | [`nav`] | Prev/next navigation fragments |
//! | [`front_matter`] | Header block serialization |
//! | [`types`] | Page records and the page set passed between stages |
//! | [`naming`] | Filename stem conventions (page ids, fallback titles) |
//! | [`config`] | `nbpages.toml` loading, validation, and merging |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Pages Keyed by Filename
//!
//! Titles come from notebook content and can repeat, so pages are keyed by their
//! filename stem. The same stem names the output file, which keeps rebuilds
//! deterministic: unchanged notebooks produce byte-identical pages.
//!
//! ## Degrade on Metadata, Fail on Content
//!
//! A notebook without a heading or topics list still gets a page (titled after its
//! filename) and a warning in the build report. A notebook that cannot be parsed or
//! rendered stops the build: publishing a half-rendered page is worse than not
//! publishing.
//!
//! ## Explicit Housekeeping
//!
//! Deleting old pages and copying assets are separate, explicitly requested steps.
//! Asset copies never replace existing files unless the overwrite policy says so.

pub mod config;
pub mod front_matter;
pub mod links;
pub mod metadata;
pub mod naming;
pub mod nav;
pub mod notebook;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
