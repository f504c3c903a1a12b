//! Container path arithmetic
//!
//! Every path handed out by the parser is relative to the container root, uses
//! `/` separators, and has percent-encoding removed, so manifest hrefs, TOC
//! targets and overlay sources can be compared directly.

/// Directory part of a container path (`OEBPS/content.opf` -> `OEBPS`)
pub(crate) fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

/// Split `ch1.xhtml#sec2` into the path and the fragment
pub(crate) fn split_fragment(href: &str) -> (&str, Option<&str>) {
    match href.split_once('#') {
        Some((path, fragment)) if !fragment.is_empty() => (path, Some(fragment)),
        Some((path, _)) => (path, None),
        None => (href, None),
    }
}

/// Resolve an href found in a document living in `base_dir`
pub(crate) fn resolve(base_dir: &str, href: &str) -> String {
    let decoded = urlencoding::decode(href)
        .map(|d| d.into_owned())
        .unwrap_or_else(|_| href.to_string());

    let joined = if decoded.starts_with('/') || base_dir.is_empty() {
        decoded
    } else {
        format!("{}/{}", base_dir, decoded)
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_dir() {
        assert_eq!(parent_dir("OEBPS/content.opf"), "OEBPS");
        assert_eq!(parent_dir("a/b/c.xhtml"), "a/b");
        assert_eq!(parent_dir("content.opf"), "");
    }

    #[test]
    fn test_split_fragment() {
        assert_eq!(split_fragment("ch1.xhtml#s2"), ("ch1.xhtml", Some("s2")));
        assert_eq!(split_fragment("ch1.xhtml#"), ("ch1.xhtml", None));
        assert_eq!(split_fragment("ch1.xhtml"), ("ch1.xhtml", None));
    }

    #[test]
    fn test_resolve() {
        assert_eq!(resolve("OEBPS", "text/ch1.xhtml"), "OEBPS/text/ch1.xhtml");
        assert_eq!(resolve("OEBPS/text", "../images/a.png"), "OEBPS/images/a.png");
        assert_eq!(resolve("", "./ch1.xhtml"), "ch1.xhtml");
        assert_eq!(resolve("OEBPS", "Chapter%201.xhtml"), "OEBPS/Chapter 1.xhtml");
        assert_eq!(resolve("OEBPS", "/META-INF/x.xml"), "META-INF/x.xml");
        assert_eq!(resolve("OEBPS", "../../escape.xhtml"), "escape.xhtml");
    }
}
