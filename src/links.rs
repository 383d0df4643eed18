//! Asset link rewriting.
//!
//! Rendered notebooks reference local assets relative to the notebook directory
//! (`<img src="images/plot.png">`). On the published site those files live under
//! `/assets/<subdir>/`, and the final URL depends on the site's base URL, so links
//! are rewritten to a placeholder the host templating system resolves later:
//!
//! ```text
//! src="images/plot.png"      →  src={{ "/assets/images/plot.png" | relative_url }}
//! source="/Images/clip.mp4"  →  src={{ "/assets/images/clip.mp4" | relative_url }}
//! ```
//!
//! Only `src`/`source` attributes pointing directly into a configured asset
//! subdirectory are touched. Matching ignores case for the attribute and the
//! subdirectory; the emitted subdirectory is the configured spelling and the
//! filename keeps its case. Rewritten output no longer matches, so rewriting is
//! idempotent.

use regex::{Captures, Regex};

#[derive(Debug, Clone)]
pub struct LinkRewriter {
    subdirs: Vec<String>,
    pattern: Option<Regex>,
}

impl LinkRewriter {
    /// Compile a rewriter for the given asset subdirectory names.
    pub fn new<S: AsRef<str>>(subdirs: &[S]) -> Result<Self, regex::Error> {
        let subdirs: Vec<String> = subdirs
            .iter()
            .map(|s| s.as_ref().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let pattern = if subdirs.is_empty() {
            None
        } else {
            let alternation = subdirs
                .iter()
                .map(|s| regex::escape(s))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&format!(
                r#"(?i)(?:source|src)="/?({alternation})/([\w\-.]+)""#
            ))?)
        };

        Ok(Self { subdirs, pattern })
    }

    /// Rewrite every matching asset link in `html`.
    pub fn rewrite(&self, html: &str) -> String {
        let Some(pattern) = &self.pattern else {
            return html.to_string();
        };
        pattern
            .replace_all(html, |caps: &Captures| {
                let subdir = self.canonical_subdir(&caps[1]);
                asset_placeholder(subdir, &caps[2])
            })
            .into_owned()
    }

    fn canonical_subdir<'a>(&'a self, matched: &'a str) -> &'a str {
        self.subdirs
            .iter()
            .find(|s| s.to_lowercase() == matched.to_lowercase())
            .map(String::as_str)
            .unwrap_or(matched)
    }
}

/// `src=` attribute pointing at a site asset through the `relative_url` filter.
pub fn asset_placeholder(subdir: &str, filename: &str) -> String {
    format!(r#"src={{{{ "/assets/{subdir}/{filename}" | relative_url }}}}"#)
}
