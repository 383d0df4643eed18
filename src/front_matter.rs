//! Front matter header for generated pages.
//!
//! ```text
//! ---
//! layout: notebook
//! title: Intro to NumPy
//! permalink: /intro-to-numpy/
//! topics: ['Arrays', 'Broadcasting']
//! ---
//! ```
//!
//! Values are written plain when that is unambiguous YAML and single-quoted
//! otherwise, so a title can never break out of its line or change type. Jekyll
//! reads YAML 1.1, so the type check covers that dialect's wider number, boolean
//! and date forms (`0x1F`, `1_000`, `1:30`, `.inf`, `y`, `2024-01-05`).

use regex::Regex;
use std::sync::OnceLock;

/// Layout every generated page uses.
pub const LAYOUT: &str = "notebook";

/// Header block for a page.
pub fn front_matter(title: &str, permalink: &str, topics: &[String]) -> String {
    format!(
        "---\nlayout: {LAYOUT}\ntitle: {}\npermalink: {}\ntopics: {}\n---\n",
        yaml_scalar(title),
        yaml_scalar(&format!("/{permalink}/")),
        yaml_flow_list(topics)
    )
}

/// `value` as a YAML scalar, quoted only when needed.
pub fn yaml_scalar(value: &str) -> String {
    let value = value.replace(['\n', '\r'], " ");
    if needs_quoting(&value) {
        single_quoted(&value)
    } else {
        value
    }
}

/// Topics as a single-quoted flow sequence, `[]` when empty.
pub fn yaml_flow_list(items: &[String]) -> String {
    let items: Vec<String> = items
        .iter()
        .map(|item| single_quoted(&item.replace(['\n', '\r'], " ")))
        .collect();
    format!("[{}]", items.join(", "))
}

fn single_quoted(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

const INDICATORS: &[char] = &[
    '-', '?', ':', ',', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '\'', '"', '%', '@',
    '`',
];

const RESERVED: &[&str] = &[
    "true", "false", "yes", "no", "on", "off", "y", "n", "null", "~",
];

static YAML_NON_STRING_REGEX: OnceLock<Regex> = OnceLock::new();

/// Plain scalars a YAML 1.1 (or 1.2) loader resolves to int, float or timestamp.
fn yaml_non_string_regex() -> &'static Regex {
    YAML_NON_STRING_REGEX.get_or_init(|| {
        Regex::new(concat!(
            r"^(?:",
            r"[-+]?0b[01_]+",
            r"|[-+]?0o?[0-7_]+",
            r"|[-+]?0x[0-9a-fA-F_]+",
            r"|[-+]?[0-9][0-9_]*(?::[0-5]?[0-9])+(?:\.[0-9_]*)?",
            r"|[-+]?(?:[0-9][0-9_]*)?\.?[0-9_]*(?:[eE][-+]?[0-9]+)?",
            r"|[-+]?\.(?:inf|Inf|INF)",
            r"|\.(?:nan|NaN|NAN)",
            r"|[0-9]{4}-[0-9]{1,2}-[0-9]{1,2}(?:[Tt ].*)?",
            r")$",
        ))
        .expect("valid YAML scalar regex")
    })
}

fn needs_quoting(value: &str) -> bool {
    let Some(first) = value.chars().next() else {
        return true;
    };
    INDICATORS.contains(&first)
        || value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace)
        || value.contains(": ")
        || value.contains(" #")
        || value.ends_with(':')
        || RESERVED.contains(&value.to_lowercase().as_str())
        || looks_non_string(value)
}

fn looks_non_string(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_digit() || c == '.')
        && yaml_non_string_regex().is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_block_layout() {
        let fm = front_matter(
            "Intro to NumPy",
            "intro-to-numpy",
            &["Arrays".to_string(), "Broadcasting".to_string()],
        );
        assert_eq!(
            fm,
            "---\nlayout: notebook\ntitle: Intro to NumPy\npermalink: /intro-to-numpy/\ntopics: ['Arrays', 'Broadcasting']\n---\n"
        );
    }

    #[test]
    fn empty_topics() {
        let fm = front_matter("T", "t", &[]);
        assert!(fm.contains("\ntopics: []\n"));
    }

    #[test]
    fn plain_scalars_stay_plain() {
        assert_eq!(yaml_scalar("Intro to NumPy"), "Intro to NumPy");
        assert_eq!(yaml_scalar("/a-b/"), "/a-b/");
        assert_eq!(yaml_scalar("C# basics"), "C# basics");
    }

    #[test]
    fn unsafe_scalars_are_quoted() {
        assert_eq!(yaml_scalar("Key: value"), "'Key: value'");
        assert_eq!(yaml_scalar("- dash"), "'- dash'");
        assert_eq!(yaml_scalar("it's #1"), "'it''s #1'");
        assert_eq!(yaml_scalar(""), "''");
        assert_eq!(yaml_scalar("Yes"), "'Yes'");
        assert_eq!(yaml_scalar("2024"), "'2024'");
    }

    #[test]
    fn yaml_1_1_numbers_and_dates_are_quoted() {
        for value in [
            "0x1F", "0o17", "017", "1_000", "0b1010", "1:30", "190:20:30.15", "6.8523e+5",
            ".inf", "-.Inf", ".NaN", "2024-01-05", "2001-12-14t21:59:43.10-05:00",
        ] {
            assert_eq!(yaml_scalar(value), format!("'{value}'"), "{value}");
        }
        assert_eq!(yaml_scalar("y"), "'y'");
        assert_eq!(yaml_scalar("N"), "'N'");
    }

    #[test]
    fn text_with_digits_stays_plain() {
        assert_eq!(yaml_scalar("Python 3 basics"), "Python 3 basics");
        assert_eq!(yaml_scalar("0x1F registers"), "0x1F registers");
        assert_eq!(yaml_scalar("1a"), "1a");
        assert_eq!(yaml_scalar("_"), "_");
    }

    #[test]
    fn hex_title_is_quoted_in_header() {
        let fm = front_matter("0x1F", "0x1f", &[]);
        assert!(fm.contains("\ntitle: '0x1F'\n"));
        assert!(fm.contains("\npermalink: /0x1f/\n"));
    }

    #[test]
    fn newlines_cannot_break_the_block() {
        let fm = front_matter("a\n---\nb", "a", &["x\ny".to_string()]);
        assert_eq!(fm.lines().filter(|l| *l == "---").count(), 2);
        assert!(fm.contains("title: a --- b\n"));
        assert!(fm.contains("topics: ['x y']"));
    }

    #[test]
    fn topics_with_quotes_are_escaped() {
        assert_eq!(
            yaml_flow_list(&["Bayes' rule".to_string(), "a, b".to_string()]),
            "['Bayes'' rule', 'a, b']"
        );
    }
}
