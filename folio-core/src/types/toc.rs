//! Table of contents types

use serde::{Deserialize, Serialize};

/// A single node of the table of contents tree.
///
/// Children are owned by their parent, so the tree cannot contain cycles and the
/// root never has a parent. Consumers refer to nodes through resource ids rather
/// than holding on to the nodes themselves.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TocReference {
    /// Display title
    pub title: String,

    /// Target resource path relative to the container root, without fragment
    pub href: Option<String>,

    /// Fragment identifier inside the target resource
    pub fragment: Option<String>,

    /// Manifest id of the target resource, when it resolves
    pub resource_id: Option<String>,

    /// Child entries for nested TOC
    pub children: Vec<TocReference>,
}

impl TocReference {
    /// Create a new TOC entry pointing at `href`
    pub fn new(title: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            href: Some(href.into()),
            fragment: None,
            resource_id: None,
            children: Vec::new(),
        }
    }

    /// Create the synthetic root that holds the top-level entries
    pub fn root(title: impl Into<String>, children: Vec<TocReference>) -> Self {
        Self {
            title: title.into(),
            href: None,
            fragment: None,
            resource_id: None,
            children,
        }
    }

    pub fn with_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragment = Some(fragment.into());
        self
    }

    /// Add child entries
    pub fn with_children(mut self, children: Vec<TocReference>) -> Self {
        self.children = children;
        self
    }

    /// Depth-first, pre-order iterator over this node's descendants (excluding itself)
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// Find the first descendant whose target is the given resource
    pub fn find_by_resource(&self, resource_id: &str) -> Option<&TocReference> {
        self.descendants()
            .find(|entry| entry.resource_id.as_deref() == Some(resource_id))
    }

    /// Number of descendants
    pub fn len(&self) -> usize {
        self.descendants().count()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// Pre-order iterator returned by [`TocReference::descendants`]
pub struct Descendants<'a> {
    stack: Vec<&'a TocReference>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a TocReference;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}
