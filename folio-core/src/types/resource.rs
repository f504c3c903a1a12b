//! Manifest resources and the id-keyed index over them

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single manifest item (content document, image, stylesheet, overlay, ...)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resource {
    /// Manifest id
    pub id: String,

    /// The href exactly as declared in the manifest (relative to the package document)
    pub href: String,

    /// Decoded path relative to the container root
    pub full_path: String,

    /// MIME type (e.g., "application/xhtml+xml", "image/jpeg")
    pub media_type: String,

    /// Space-separated `properties` attribute (`nav`, `cover-image`, ...)
    pub properties: Option<String>,

    /// Manifest id of the SMIL overlay synchronised with this resource
    pub media_overlay: Option<String>,
}

impl Resource {
    /// Create a new resource
    pub fn new(
        id: impl Into<String>,
        href: impl Into<String>,
        full_path: impl Into<String>,
        media_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            href: href.into(),
            full_path: full_path.into(),
            media_type: media_type.into(),
            properties: None,
            media_overlay: None,
        }
    }

    /// Whether the `properties` attribute lists `property`
    pub fn has_property(&self, property: &str) -> bool {
        self.properties
            .as_deref()
            .is_some_and(|props| props.split_ascii_whitespace().any(|p| p == property))
    }

    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }
}

/// Resource index keyed by manifest id, with a secondary lookup by container path
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResourceIndex {
    resources: HashMap<String, Resource>,
    by_path: HashMap<String, String>,
    /// Ids in manifest order
    order: Vec<String>,
}

impl ResourceIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource, replacing any previous one with the same id
    pub fn insert(&mut self, resource: Resource) {
        match self.resources.get(&resource.id) {
            Some(previous) => {
                if self.by_path.get(&previous.full_path) == Some(&resource.id) {
                    self.by_path.remove(&previous.full_path);
                }
            }
            None => self.order.push(resource.id.clone()),
        }
        self.by_path
            .insert(resource.full_path.clone(), resource.id.clone());
        self.resources.insert(resource.id.clone(), resource);
    }

    /// Get a resource by manifest id
    pub fn get(&self, id: &str) -> Option<&Resource> {
        self.resources.get(id)
    }

    /// Get a resource by its container-relative path
    pub fn get_by_path(&self, full_path: &str) -> Option<&Resource> {
        self.by_path.get(full_path).and_then(|id| self.resources.get(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.resources.contains_key(id)
    }

    /// Iterate over all resources in manifest order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Resource)> {
        self.order
            .iter()
            .filter_map(|id| self.resources.get_key_value(id))
    }

    /// Resources with the given media type, in manifest order
    pub fn with_media_type<'a>(&'a self, media_type: &'a str) -> impl Iterator<Item = &'a Resource> {
        self.iter()
            .map(|(_, r)| r)
            .filter(move |r| r.media_type == media_type)
    }

    /// Number of resources in the index
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
