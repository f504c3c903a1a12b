//! Error types for Folio Core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using FolioError
pub type Result<T> = std::result::Result<T, FolioError>;

/// Top-level error type for all Folio operations
#[derive(Debug, Error)]
pub enum FolioError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that occur while building a [`Book`](crate::types::Book) from an EPUB container
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("EPUB not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Malformed container: {0}")]
    MalformedContainer(String),

    #[error("Invalid EPUB archive: {0}")]
    InvalidArchive(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    pub(crate) fn malformed(context: impl std::fmt::Display, cause: impl std::fmt::Display) -> Self {
        ParseError::MalformedContainer(format!("{}: {}", context, cause))
    }
}

impl From<zip::result::ZipError> for ParseError {
    fn from(err: zip::result::ZipError) -> Self {
        ParseError::InvalidArchive(err.to_string())
    }
}

/// Errors that occur during state storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
