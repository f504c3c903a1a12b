//! The main Book type, built once per successful parse and never mutated afterwards

use super::{MediaOverlay, Metadata, Resource, ResourceIndex, TocReference};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// One entry of the reading order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpineItem {
    /// Manifest id of the content document
    pub idref: String,

    /// `false` for auxiliary content declared with `linear="no"`
    pub linear: bool,
}

/// Directory the container's files live under.
///
/// Books parsed from an archive without an unzip root keep their extraction
/// directory alive for as long as any clone of the book exists.
#[derive(Debug, Clone)]
pub enum BookRoot {
    /// An expanded EPUB directory, or a persistent extraction
    Directory(PathBuf),

    /// Temporary extraction removed when the last clone of the book drops
    Extracted(Arc<TempDir>),
}

impl BookRoot {
    pub fn path(&self) -> &Path {
        match self {
            BookRoot::Directory(path) => path,
            BookRoot::Extracted(dir) => dir.path(),
        }
    }
}

/// Everything the parser collects before freezing it into a [`Book`]
pub(crate) struct BookParts {
    pub id: String,
    pub root: BookRoot,
    pub package_path: String,
    pub metadata: Metadata,
    pub toc: TocReference,
    pub resources: ResourceIndex,
    pub spine: Vec<SpineItem>,
    pub cover_resource_id: Option<String>,
    pub media_overlays: HashMap<String, MediaOverlay>,
}

/// A parsed EPUB
#[derive(Debug, Clone)]
pub struct Book {
    id: String,
    root: BookRoot,
    package_path: String,
    metadata: Metadata,
    toc: TocReference,
    resources: ResourceIndex,
    spine: Vec<SpineItem>,
    cover_resource_id: Option<String>,
    media_overlays: HashMap<String, MediaOverlay>,
}

impl Book {
    pub(crate) fn from_parts(parts: BookParts) -> Self {
        Self {
            id: parts.id,
            root: parts.root,
            package_path: parts.package_path,
            metadata: parts.metadata,
            toc: parts.toc,
            resources: parts.resources,
            spine: parts.spine,
            cover_resource_id: parts.cover_resource_id,
            media_overlays: parts.media_overlays,
        }
    }

    /// Identifier used to key saved reader state: the container's file stem
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the book title
    pub fn title(&self) -> &str {
        &self.metadata.title
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Root of the table of contents; its children are the top-level entries
    pub fn toc(&self) -> &TocReference {
        &self.toc
    }

    /// All TOC entries in reading order, excluding the root
    pub fn flatten_toc(&self) -> Vec<&TocReference> {
        self.toc.descendants().collect()
    }

    /// First TOC entry that targets the given resource
    pub fn toc_for_resource(&self, resource_id: &str) -> Option<&TocReference> {
        self.toc.find_by_resource(resource_id)
    }

    pub fn resources(&self) -> &ResourceIndex {
        &self.resources
    }

    /// Get a resource by manifest id
    pub fn resource(&self, id: &str) -> Option<&Resource> {
        self.resources.get(id)
    }

    /// Get a resource by its container-relative path
    pub fn resource_by_path(&self, full_path: &str) -> Option<&Resource> {
        self.resources.get_by_path(full_path)
    }

    pub fn spine(&self) -> &[SpineItem] {
        &self.spine
    }

    /// Content documents in reading order; dangling spine entries are skipped
    pub fn spine_resources(&self) -> impl Iterator<Item = &Resource> {
        self.spine
            .iter()
            .filter_map(|item| self.resources.get(&item.idref))
    }

    /// Position of a resource in the reading order
    pub fn spine_index_of(&self, resource_id: &str) -> Option<usize> {
        self.spine.iter().position(|item| item.idref == resource_id)
    }

    pub fn cover_resource_id(&self) -> Option<&str> {
        self.cover_resource_id.as_deref()
    }

    pub fn cover_resource(&self) -> Option<&Resource> {
        self.cover_resource_id
            .as_deref()
            .and_then(|id| self.resources.get(id))
    }

    /// Overlay documents keyed by their manifest id
    pub fn media_overlays(&self) -> &HashMap<String, MediaOverlay> {
        &self.media_overlays
    }

    /// The overlay synchronised with a content document
    pub fn media_overlay_for(&self, resource_id: &str) -> Option<&MediaOverlay> {
        let overlay_id = self.resources.get(resource_id)?.media_overlay.as_deref()?;
        self.media_overlays.get(overlay_id)
    }

    /// Whether any narration is available
    pub fn has_audio(&self) -> bool {
        !self.media_overlays.is_empty()
    }

    /// Directory containing the expanded container
    pub fn base_dir(&self) -> &Path {
        self.root.path()
    }

    pub fn root(&self) -> &BookRoot {
        &self.root
    }

    /// Container-relative path of the package document
    pub fn package_path(&self) -> &str {
        &self.package_path
    }

    /// Absolute path of a resource on disk
    pub fn resource_path(&self, id: &str) -> Option<PathBuf> {
        self.resources
            .get(id)
            .map(|r| self.root.path().join(&r.full_path))
    }

    /// Read a resource's bytes from the book root
    pub fn read_resource(&self, id: &str) -> std::io::Result<Vec<u8>> {
        let path = self.resource_path(id).ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no resource with id {}", id),
            )
        })?;
        std::fs::read(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_book() -> Book {
        let mut resources = ResourceIndex::new();
        let mut ch1 = Resource::new("ch1", "ch1.xhtml", "OEBPS/ch1.xhtml", "application/xhtml+xml");
        ch1.media_overlay = Some("ch1_smil".into());
        resources.insert(ch1);
        resources.insert(Resource::new("ch2", "ch2.xhtml", "OEBPS/ch2.xhtml", "application/xhtml+xml"));
        resources.insert(Resource::new("img", "cover.png", "OEBPS/cover.png", "image/png"));

        let mut entry = TocReference::new("Chapter 2", "OEBPS/ch2.xhtml");
        entry.resource_id = Some("ch2".into());

        let mut overlays = HashMap::new();
        overlays.insert(
            "ch1_smil".to_string(),
            MediaOverlay {
                resource_id: "ch1_smil".into(),
                full_path: "OEBPS/ch1.smil".into(),
                pars: Vec::new(),
            },
        );

        Book::from_parts(BookParts {
            id: "sample".into(),
            root: BookRoot::Directory(PathBuf::from("/books/sample")),
            package_path: "OEBPS/content.opf".into(),
            metadata: Metadata::new("Sample", "en"),
            toc: TocReference::root("Sample", vec![entry]),
            resources,
            spine: vec![
                SpineItem { idref: "ch1".into(), linear: true },
                SpineItem { idref: "missing".into(), linear: true },
                SpineItem { idref: "ch2".into(), linear: true },
            ],
            cover_resource_id: Some("img".into()),
            media_overlays: overlays,
        })
    }

    #[test]
    fn test_lookups() {
        let book = sample_book();
        assert_eq!(book.id(), "sample");
        assert_eq!(book.title(), "Sample");
        assert_eq!(book.cover_resource().unwrap().media_type, "image/png");
        assert_eq!(book.toc_for_resource("ch2").unwrap().title, "Chapter 2");
        assert_eq!(book.spine_index_of("ch2"), Some(2));
        assert_eq!(
            book.resource_path("ch1").unwrap(),
            PathBuf::from("/books/sample/OEBPS/ch1.xhtml")
        );
    }

    #[test]
    fn test_spine_resources_skip_dangling() {
        let book = sample_book();
        let ids: Vec<&str> = book.spine_resources().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["ch1", "ch2"]);
    }

    #[test]
    fn test_media_overlay_lookup() {
        let book = sample_book();
        assert!(book.has_audio());
        assert_eq!(book.media_overlay_for("ch1").unwrap().full_path, "OEBPS/ch1.smil");
        assert!(book.media_overlay_for("ch2").is_none());
    }
}
