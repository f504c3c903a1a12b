//! Small text helpers used when showing chapter titles and highlight excerpts

use regex::Regex;
use std::sync::LazyLock;

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"));

/// Truncate to `length` characters, appending `trailing` only when something was cut.
pub fn truncate(text: &str, length: usize, trailing: Option<&str>) -> String {
    match text.char_indices().nth(length) {
        Some((byte_index, _)) => {
            let mut out = text[..byte_index].to_string();
            out.push_str(trailing.unwrap_or_default());
            out
        }
        None => text.to_string(),
    }
}

/// Remove anything that looks like a markup tag
pub fn strip_html(text: &str) -> String {
    HTML_TAG.replace_all(text, "").into_owned()
}

pub fn strip_line_breaks(text: &str) -> String {
    text.replace('\n', "")
}
