//! Table of contents readers: EPUB 3 navigation documents and EPUB 2 NCX files

use super::paths;
use super::xml::{attribute, attribute_local, normalize_space, text};
use crate::error::ParseError;
use crate::types::TocReference;
use quick_xml::events::Event;
use quick_xml::Reader;

/// A TOC node under construction
#[derive(Default)]
struct Frame {
    title: String,
    src: Option<String>,
    children: Vec<TocReference>,
}

impl Frame {
    /// Turn the frame into a reference; entries with neither a label nor a
    /// target carry no information and are dropped (their children are kept).
    fn finish(self, base_dir: &str) -> Vec<TocReference> {
        let title = normalize_space(&self.title);
        let Some(src) = self.src.filter(|s| !s.trim().is_empty()) else {
            if title.is_empty() {
                return self.children;
            }
            return vec![TocReference::root(title, self.children)];
        };

        let (path, fragment) = paths::split_fragment(src.trim());
        let mut entry = TocReference::new(title, paths::resolve(base_dir, path));
        if let Some(fragment) = fragment {
            entry = entry.with_fragment(fragment);
        }
        vec![entry.with_children(self.children)]
    }
}

/// Parse an NCX document located in `base_dir`.
pub(crate) fn parse_ncx(content: &str, base_dir: &str) -> Result<Vec<TocReference>, ParseError> {
    let mut reader = Reader::from_str(content);

    let mut stack: Vec<Frame> = vec![Frame::default()];
    let mut in_nav_map = false;
    let mut in_label_text = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ParseError::malformed("NCX document", e))?;

        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                b"navMap" => in_nav_map = true,
                b"navPoint" if in_nav_map => stack.push(Frame::default()),
                b"text" if in_nav_map && stack.len() > 1 => in_label_text = true,
                b"content" if in_nav_map => {
                    if let Some(frame) = stack.last_mut() {
                        frame.src = attribute(&e, b"src");
                    }
                }
                _ => {}
            },
            Event::Empty(e) => {
                if in_nav_map && e.local_name().as_ref() == b"content" {
                    if let Some(frame) = stack.last_mut() {
                        frame.src = attribute(&e, b"src");
                    }
                }
            }
            Event::Text(e) => {
                if in_label_text {
                    if let Some(frame) = stack.last_mut() {
                        frame.title.push_str(&text(&e));
                    }
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"text" => in_label_text = false,
                b"navMap" => in_nav_map = false,
                b"navPoint" if in_nav_map && stack.len() > 1 => {
                    if let Some(frame) = stack.pop() {
                        let finished = frame.finish(base_dir);
                        if let Some(parent) = stack.last_mut() {
                            parent.children.extend(finished);
                        }
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(stack.into_iter().next().map(|root| root.children).unwrap_or_default())
}

/// Parse the `epub:type="toc"` list of an EPUB 3 navigation document located in `base_dir`.
pub(crate) fn parse_nav(content: &str, base_dir: &str) -> Result<Vec<TocReference>, ParseError> {
    let mut reader = Reader::from_str(content);

    let mut in_toc = false;
    let mut finished_toc = false;
    let mut stack: Vec<Frame> = vec![Frame::default()];
    // Nesting depth inside the current entry label (`<a>` or `<span>`)
    let mut label_depth = 0usize;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ParseError::malformed("navigation document", e))?;

        match event {
            Event::Start(e) => {
                let local = e.local_name();
                match local.as_ref() {
                    b"nav" if !in_toc && !finished_toc => {
                        in_toc = attribute_local(&e, b"type")
                            .is_some_and(|t| t.split_ascii_whitespace().any(|v| v == "toc"));
                    }
                    _ if !in_toc => {}
                    _ if label_depth > 0 => label_depth += 1,
                    b"li" => stack.push(Frame::default()),
                    b"a" if stack.len() > 1 => {
                        if let Some(frame) = stack.last_mut() {
                            frame.src = attribute(&e, b"href");
                        }
                        label_depth = 1;
                    }
                    b"span" if stack.len() > 1 => label_depth = 1,
                    _ => {}
                }
            }
            Event::Text(e) => {
                if in_toc && label_depth > 0 {
                    if let Some(frame) = stack.last_mut() {
                        frame.title.push_str(&text(&e));
                    }
                }
            }
            Event::End(e) => {
                if !in_toc {
                    continue;
                }
                if label_depth > 0 {
                    label_depth -= 1;
                    continue;
                }
                match e.local_name().as_ref() {
                    b"li" if stack.len() > 1 => {
                        if let Some(frame) = stack.pop() {
                            let finished = frame.finish(base_dir);
                            if let Some(parent) = stack.last_mut() {
                                parent.children.extend(finished);
                            }
                        }
                    }
                    b"nav" => {
                        in_toc = false;
                        finished_toc = true;
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(stack.into_iter().next().map(|root| root.children).unwrap_or_default())
}
