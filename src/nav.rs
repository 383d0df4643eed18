//! Prev/next navigation between pages.
//!
//! Every built page gets one line linking to its neighbours in discovery order and
//! to the site's contents page:
//!
//! ```text
//! <!-- NAV --><p style="...">&lt; <a href="...">Prev</a> | <a href="...">Contents</a> | <a href="...">Next</a> &gt;</p>
//! ```
//!
//! The first page has no prev segment, the last no next segment. Skipped pages are
//! not part of the sequence and get no navigation.
//!
//! Hrefs are `relative_url` placeholders. They are assembled as plain strings
//! because the placeholder's inner quotes must reach the output unescaped.

use crate::types::PageSet;
use maud::html;

/// Comment marking the start of the navigation fragment.
pub const NAV_MARKER: &str = "<!-- NAV -->";

const NAV_STYLE: &str = "font-style:italic;font-size:smaller;";

/// A neighbouring page as shown in navigation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavLink<'a> {
    pub title: &'a str,
    pub permalink: &'a str,
}

/// Navigation fragment for a page with the given neighbours.
pub fn nav_fragment(prev: Option<NavLink<'_>>, next: Option<NavLink<'_>>) -> String {
    let prev = prev
        .map(|link| format!("&lt; {} | ", anchor(link.permalink, link.title)))
        .unwrap_or_default();
    let next = next
        .map(|link| format!(" | {} &gt;", anchor(link.permalink, link.title)))
        .unwrap_or_default();
    let contents = anchor("/", "Contents");
    format!("\n{NAV_MARKER}<p style=\"{NAV_STYLE}\">{prev}{contents}{next}</p>")
}

fn anchor(target: &str, text: &str) -> String {
    let text = html! { (text) }.into_string();
    format!(r#"<a href="{{{{ "{target}" | relative_url }}}}">{text}</a>"#)
}

/// Assign navigation to every non-skipped page, clearing it on skipped ones.
pub fn add_navigation(pages: &mut PageSet) {
    let links: Vec<(String, String, String)> = pages
        .buildable()
        .map(|p| (p.id.clone(), p.title.clone(), p.permalink.clone()))
        .collect();
    fn as_link(entry: &(String, String, String)) -> NavLink<'_> {
        NavLink {
            title: &entry.1,
            permalink: &entry.2,
        }
    }

    let mut position = 0;
    for page in pages.iter_mut() {
        if page.skip {
            page.nav_html = None;
            continue;
        }
        debug_assert_eq!(links[position].0, page.id);
        let prev = position.checked_sub(1).map(|i| as_link(&links[i]));
        let next = links.get(position + 1).map(as_link);
        page.nav_html = Some(nav_fragment(prev, next));
        position += 1;
    }
    tracing::debug!(pages = position, "navigation assigned");
}
