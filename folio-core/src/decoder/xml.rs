//! quick-xml helpers shared by the package, navigation and overlay readers

use quick_xml::events::{BytesStart, BytesText};

/// Attribute value by exact qualified name (e.g. `media-type`, `xml:lang`)
pub(crate) fn attribute(element: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == name)
        .map(|attr| match attr.unescape_value() {
            Ok(value) => value.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        })
}

/// Attribute value by local name, ignoring any namespace prefix (`epub:type` -> `type`)
pub(crate) fn attribute_local(element: &BytesStart<'_>, local: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == local)
        .map(|attr| match attr.unescape_value() {
            Ok(value) => value.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        })
}

/// Unescaped text; XHTML entities unknown to XML fall back to the raw text
pub(crate) fn text(event: &BytesText<'_>) -> String {
    match event.unescape() {
        Ok(text) => text.into_owned(),
        Err(_) => String::from_utf8_lossy(event).into_owned(),
    }
}

/// Collapse runs of whitespace into single spaces and trim
pub(crate) fn normalize_space(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip UTF-8 BOM if present.
pub(crate) fn strip_bom(data: &[u8]) -> &[u8] {
    data.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(data)
}
