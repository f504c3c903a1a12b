//! container.xml and OPF package document parsing

use super::paths;
use super::xml::{attribute, normalize_space, text};
use crate::clock;
use crate::error::ParseError;
use crate::types::{Metadata, Resource, ResourceIndex, SpineItem};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Location of the container descriptor inside every EPUB
pub(crate) const CONTAINER_PATH: &str = "META-INF/container.xml";

/// Parsed OPF package data, paths already resolved against the container root
#[derive(Debug)]
pub(crate) struct Package {
    pub metadata: Metadata,
    pub resources: ResourceIndex,
    pub spine: Vec<SpineItem>,
    /// Manifest id named by the spine's `toc` attribute (EPUB 2 NCX)
    pub ncx_id: Option<String>,
    /// Manifest id carrying the `nav` property (EPUB 3 navigation document)
    pub nav_id: Option<String>,
    /// Manifest id of the cover image, if it is declared and present in the manifest
    pub cover_id: Option<String>,
}

/// Parse META-INF/container.xml to find the package document path.
pub(crate) fn parse_container_xml(content: &str) -> Result<String, ParseError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.local_name().as_ref() == b"rootfile" => {
                if let Some(full_path) = attribute(&e, b"full-path") {
                    return Ok(paths::resolve("", &full_path));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::malformed(CONTAINER_PATH, e)),
            _ => {}
        }
    }

    Err(ParseError::MalformedContainer(
        "no rootfile found in container.xml".to_string(),
    ))
}

/// Metadata element whose text is being collected
enum Capture {
    Dc(String),
    MediaDuration,
    ActiveClass,
}

/// Parse the OPF package document located in `package_dir`.
pub(crate) fn parse_opf(content: &str, package_dir: &str) -> Result<Package, ParseError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut saw_package = false;
    let mut in_metadata = false;
    let mut metadata = Metadata::default();
    let mut resources = ResourceIndex::new();
    let mut spine = Vec::new();
    let mut ncx_id = None;
    let mut epub2_cover_id = None;

    let mut capture: Option<Capture> = None;
    let mut buf_text = String::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ParseError::malformed("package document", e))?;

        match event {
            Event::Start(e) => {
                match e.local_name().as_ref() {
                    b"package" => saw_package = true,
                    b"metadata" => in_metadata = true,
                    b"spine" => ncx_id = attribute(&e, b"toc"),
                    b"meta" if in_metadata => {
                        handle_package_element(
                            &e,
                            package_dir,
                            &mut resources,
                            &mut spine,
                            &mut epub2_cover_id,
                        );
                        capture = match attribute(&e, b"property").as_deref() {
                            Some("media:duration") if attribute(&e, b"refines").is_none() => {
                                Some(Capture::MediaDuration)
                            }
                            Some("media:active-class") => Some(Capture::ActiveClass),
                            _ => None,
                        };
                        buf_text.clear();
                    }
                    local if in_metadata && is_dublin_core(local) => {
                        capture = Some(Capture::Dc(String::from_utf8_lossy(local).into_owned()));
                        buf_text.clear();
                    }
                    _ => handle_package_element(
                        &e,
                        package_dir,
                        &mut resources,
                        &mut spine,
                        &mut epub2_cover_id,
                    ),
                }
            }
            Event::Empty(e) => {
                if e.local_name().as_ref() == b"package" {
                    saw_package = true;
                }
                handle_package_element(
                    &e,
                    package_dir,
                    &mut resources,
                    &mut spine,
                    &mut epub2_cover_id,
                );
            }
            Event::Text(e) => {
                if capture.is_some() {
                    buf_text.push_str(&text(&e));
                }
            }
            Event::CData(e) => {
                if capture.is_some() {
                    buf_text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::End(e) => {
                if e.local_name().as_ref() == b"metadata" {
                    in_metadata = false;
                }

                if let Some(field) = capture.take() {
                    let value = normalize_space(&buf_text);
                    apply_capture(&mut metadata, field, value);
                    buf_text.clear();
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_package {
        return Err(ParseError::MalformedContainer(
            "package document has no <package> element".to_string(),
        ));
    }

    if resources.is_empty() {
        return Err(ParseError::MalformedContainer(
            "package manifest is empty".to_string(),
        ));
    }

    // EPUB 3 cover-image property takes priority over the EPUB 2 meta
    let cover_id = resources
        .iter()
        .find(|(_, r)| r.has_property("cover-image"))
        .map(|(id, _)| id.clone())
        .or_else(|| epub2_cover_id.filter(|id| resources.contains(id)));

    let nav_id = resources
        .iter()
        .find(|(_, r)| r.has_property("nav"))
        .map(|(id, _)| id.clone());

    let ncx_id = ncx_id.filter(|id| resources.contains(id));

    Ok(Package {
        metadata,
        resources,
        spine,
        ncx_id,
        nav_id,
        cover_id,
    })
}

fn is_dublin_core(local: &[u8]) -> bool {
    matches!(
        local,
        b"title"
            | b"creator"
            | b"language"
            | b"identifier"
            | b"publisher"
            | b"description"
            | b"subject"
            | b"rights"
    )
}

fn apply_capture(metadata: &mut Metadata, field: Capture, value: String) {
    if value.is_empty() {
        return;
    }

    match field {
        Capture::Dc(name) => match name.as_str() {
            "title" if metadata.title.is_empty() => metadata.title = value,
            "creator" => metadata.creator.push(value),
            "language" if metadata.language.is_empty() => metadata.language = value,
            "identifier" if metadata.identifier.is_empty() => metadata.identifier = value,
            "publisher" => metadata.publisher = Some(value),
            "description" => metadata.description = Some(value),
            "subject" => metadata.subject.push(value),
            "rights" => metadata.rights = Some(value),
            _ => {}
        },
        Capture::MediaDuration => metadata.duration = clock::try_parse(&value),
        Capture::ActiveClass => metadata.active_class = Some(value),
    }
}

/// Manifest items, spine itemrefs and the EPUB 2 cover meta
fn handle_package_element(
    e: &BytesStart<'_>,
    package_dir: &str,
    resources: &mut ResourceIndex,
    spine: &mut Vec<SpineItem>,
    epub2_cover_id: &mut Option<String>,
) {
    match e.local_name().as_ref() {
        b"item" => {
            let (Some(id), Some(href)) = (attribute(e, b"id"), attribute(e, b"href")) else {
                tracing::debug!("skipping manifest item without id or href");
                return;
            };
            let (path, _) = paths::split_fragment(&href);
            let full_path = paths::resolve(package_dir, path);
            let media_type = attribute(e, b"media-type").unwrap_or_default();

            let mut resource = Resource::new(id, href, full_path, media_type);
            resource.properties = attribute(e, b"properties");
            resource.media_overlay = attribute(e, b"media-overlay");
            resources.insert(resource);
        }
        b"itemref" => {
            if let Some(idref) = attribute(e, b"idref") {
                let linear = attribute(e, b"linear").as_deref() != Some("no");
                spine.push(SpineItem { idref, linear });
            }
        }
        b"meta" => {
            if attribute(e, b"name").as_deref() == Some("cover") {
                if let Some(content) = attribute(e, b"content") {
                    *epub2_cover_id = Some(content);
                }
            }
        }
        _ => {}
    }
}
