//! Folio Core Library
//!
//! This crate provides the reading core of the Folio EPUB reader: parsing EPUB
//! containers into an immutable [`Book`] model, SMIL clock-value parsing for
//! media overlays, and persistence of reading positions and preferences.

pub mod clock;
pub mod config;
pub mod context;
pub mod decoder;
pub mod error;
pub mod state;
pub mod storage;
pub mod text;
pub mod types;

pub use clock::Duration;
pub use config::ReaderConfig;
pub use context::{ReaderContext, ReaderSession};
pub use decoder::{cover_image, parse_book, EpubParser};
pub use error::{FolioError, ParseError, Result, StorageError};
pub use state::{
    MediaOverlayStyle, Preference, PreferenceKey, ReaderPosition, ReaderPreferences,
    ReaderStateStore,
};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};
pub use types::{
    Book, BookRoot, CoverImage, MediaOverlay, Metadata, Resource, ResourceIndex, SmilAudio,
    SmilPar, SpineItem, TocReference,
};
