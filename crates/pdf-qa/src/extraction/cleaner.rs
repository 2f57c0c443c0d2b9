//! Page text normalization

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Anything that is not a word character, whitespace, or `.,;:!?()-`
static DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s.,;:!?()-]").expect("valid regex"));

/// Clean the raw text of one page.
///
/// Whitespace runs collapse to a single space first; disallowed characters
/// are then replaced by a space each, so a removed symbol between two spaces
/// can leave a double space behind.
pub fn clean_page_text(raw: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(raw, " ");
    let filtered = DISALLOWED.replace_all(&collapsed, " ");
    filtered.trim().to_string()
}

/// Join cleaned pages with single spaces (empty pages included)
pub fn join_pages(pages: &[String]) -> String {
    pages.join(" ")
}
