//! Core types for the parsed book model

mod book;
mod cover;
mod metadata;
mod overlay;
mod resource;
mod toc;

pub(crate) use book::BookParts;
pub use book::{Book, BookRoot, SpineItem};
pub use cover::CoverImage;
pub use metadata::Metadata;
pub use overlay::{MediaOverlay, SmilAudio, SmilPar};
pub use resource::{Resource, ResourceIndex};
pub use toc::{Descendants, TocReference};
