//! Notebook filename conventions.
//!
//! Page ids are notebook filename stems and are used verbatim for output files
//! (`01-intro.ipynb` → `01-intro.html`). When a notebook has no heading to take a
//! title from, a readable title is derived from the stem instead:
//!
//! - an optional numeric ordering prefix (`NN-`) is dropped
//! - dashes and underscores become spaces
//!
//! ```text
//! 01-intro-to-numpy   → "intro to numpy"
//! data_cleaning       → "data cleaning"
//! 2024                → "2024"            (number-only stems are kept)
//! ```

use std::path::Path;

/// Name part of a stem after an optional `NN-` ordering prefix.
///
/// - `"01-intro"` → `"intro"`
/// - `"intro"` → `"intro"`
/// - `"2024-report"` → `"report"`
/// - `"v2-intro"` → `"v2-intro"`
pub fn strip_order_prefix(stem: &str) -> &str {
    match stem.split_once('-') {
        Some((prefix, rest)) if prefix.parse::<u32>().is_ok() => rest,
        _ => stem,
    }
}

/// Readable title for a stem: prefix dropped, `-`/`_` → spaces.
///
/// Falls back to the full stem when nothing is left after the prefix.
pub fn display_title(stem: &str) -> String {
    let title = strip_order_prefix(stem).replace(['-', '_'], " ");
    let title = title.trim();
    if title.is_empty() {
        stem.to_string()
    } else {
        title.to_string()
    }
}

/// Page id for a notebook path: its filename stem.
pub fn page_id(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_stem() {
        assert_eq!(strip_order_prefix("01-intro-to-numpy"), "intro-to-numpy");
        assert_eq!(strip_order_prefix("2024-report"), "report");
    }

    #[test]
    fn unnumbered_stem() {
        assert_eq!(strip_order_prefix("intro"), "intro");
    }

    #[test]
    fn non_numeric_prefix_is_kept() {
        assert_eq!(strip_order_prefix("v2-intro"), "v2-intro");
    }

    #[test]
    fn display_title_drops_prefix_and_separators() {
        assert_eq!(display_title("01-intro-to-numpy"), "intro to numpy");
        assert_eq!(display_title("data_cleaning"), "data cleaning");
    }

    #[test]
    fn display_title_number_only() {
        assert_eq!(display_title("2024"), "2024");
        assert_eq!(display_title("001-"), "001-");
    }

    #[test]
    fn page_id_is_file_stem() {
        assert_eq!(page_id(Path::new("notebooks/01-intro.ipynb")), "01-intro");
        assert_eq!(page_id(Path::new("a.b.ipynb")), "a.b");
    }
}
