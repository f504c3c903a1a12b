//! Read access to the files of an EPUB container, expanded or zipped

use super::xml::strip_bom;
use crate::error::ParseError;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Largest buffer reserved from an entry's declared size
const MAX_PREALLOCATION: u64 = 1 << 20;

/// Anything that can hand out container files by container-relative path
pub(crate) trait ContainerSource {
    /// Read a file's bytes
    fn read(&mut self, path: &str) -> Result<Vec<u8>, ParseError>;

    /// Read a file as UTF-8 text, dropping a leading BOM
    fn read_string(&mut self, path: &str) -> Result<String, ParseError> {
        let bytes = self.read(path)?;
        String::from_utf8(strip_bom(&bytes).to_vec())
            .map_err(|e| ParseError::malformed(path, e))
    }
}

/// An expanded container on disk
pub(crate) struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ContainerSource for DirectorySource {
    fn read(&mut self, path: &str) -> Result<Vec<u8>, ParseError> {
        std::fs::read(self.root.join(path)).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                ParseError::MalformedContainer(format!("missing file {}", path))
            }
            _ => ParseError::Io(e),
        })
    }
}

/// A zipped container read in place, without extraction
pub(crate) struct ZipSource<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl ZipSource<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self, ParseError> {
        let file = File::open(path)?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> ZipSource<R> {
    pub fn new(reader: R) -> Result<Self, ParseError> {
        Ok(Self {
            archive: ZipArchive::new(reader)?,
        })
    }
}

impl<R: Read + Seek> ContainerSource for ZipSource<R> {
    fn read(&mut self, path: &str) -> Result<Vec<u8>, ParseError> {
        let mut entry = self.archive.by_name(path).map_err(|e| match e {
            zip::result::ZipError::FileNotFound => {
                ParseError::MalformedContainer(format!("missing file {}", path))
            }
            other => ParseError::from(other),
        })?;

        // The declared size is untrusted; cap the up-front reservation
        let capacity = entry.size().min(MAX_PREALLOCATION) as usize;
        let mut data = Vec::with_capacity(capacity);
        entry.read_to_end(&mut data)?;
        Ok(data)
    }
}
