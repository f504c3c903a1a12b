//! Package metadata (Dublin Core plus the media-overlay extensions)

use crate::clock::Duration;
use serde::{Deserialize, Serialize};

/// Book metadata read from the package document
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Metadata {
    /// Book title
    pub title: String,

    /// Authors/creators
    pub creator: Vec<String>,

    /// Subject/genre tags
    pub subject: Vec<String>,

    /// Book description/summary
    pub description: Option<String>,

    /// Publisher name
    pub publisher: Option<String>,

    /// Language code
    pub language: String,

    /// First `dc:identifier` in the package
    pub identifier: String,

    /// Copyright/rights information
    pub rights: Option<String>,

    /// Total narration length from `media:duration`
    pub duration: Option<Duration>,

    /// CSS class applied to the active overlay fragment (`media:active-class`)
    pub active_class: Option<String>,
}

impl Metadata {
    /// Create new metadata with required fields
    pub fn new(title: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            language: language.into(),
            ..Self::default()
        }
    }

    /// Get the primary author (first creator)
    pub fn primary_author(&self) -> Option<&str> {
        self.creator.first().map(|s| s.as_str())
    }
}
