//! EPUB container parsing into the [`Book`] model
//!
//! A container is either a zipped `.epub` archive or a directory holding the
//! already-expanded tree. Archives are extracted first (to a temporary directory,
//! or to a persistent unzip root when one is configured) and then parsed exactly
//! like a directory.

mod navigation;
mod package;
mod paths;
mod smil;
mod source;
mod xml;

use crate::config::ReaderConfig;
use crate::error::ParseError;
use crate::types::{Book, BookParts, BookRoot, CoverImage, MediaOverlay, ResourceIndex, TocReference};
use package::{Package, CONTAINER_PATH};
use source::{ContainerSource, DirectorySource, ZipSource};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use zip::ZipArchive;

/// Media type of SMIL overlay documents
const SMIL_MEDIA_TYPE: &str = "application/smil+xml";

/// Parser for EPUB 2/3 containers
#[derive(Debug, Clone, Default)]
pub struct EpubParser {
    /// Delete the source archive after a successful parse
    remove_source: bool,

    /// Extract archives under this directory instead of a temporary one
    unzip_root: Option<PathBuf>,
}

impl EpubParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a parser from the reader configuration
    pub fn from_config(config: &ReaderConfig) -> Self {
        Self {
            remove_source: config.remove_source_after_parse,
            unzip_root: config.unzip_root.clone(),
        }
    }

    /// Delete the archive once it has been parsed successfully
    pub fn with_remove_source(mut self, remove: bool) -> Self {
        self.remove_source = remove;
        self
    }

    /// Extract archives to `<root>/<book id>` and reuse that extraction on later opens
    pub fn with_unzip_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.unzip_root = Some(root.into());
        self
    }

    /// Parse the container at `path`.
    ///
    /// With `is_directory` the path is read as an expanded EPUB tree; otherwise it
    /// is treated as a zip archive. The archive is only removed (when configured)
    /// after parsing succeeded.
    pub fn parse(&self, path: impl AsRef<Path>, is_directory: bool) -> Result<Book, ParseError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(path = %path.display(), "EPUB does not exist");
            return Err(ParseError::NotFound(path.to_path_buf()));
        }

        let book_id = book_id_for(path);

        if is_directory {
            if !path.is_dir() {
                return Err(ParseError::MalformedContainer(format!(
                    "{} is not a directory",
                    path.display()
                )));
            }
            return parse_expanded(BookRoot::Directory(path.to_path_buf()), book_id);
        }

        let (root, fresh_extraction) = self.extract(path, &book_id)?;
        let book = match parse_expanded(root, book_id.clone()) {
            Ok(book) => book,
            Err(e) => {
                if let (Some(dir), true) = (self.unzip_root.as_ref(), fresh_extraction) {
                    let dest = dir.join(&book_id);
                    if let Err(cleanup) = std::fs::remove_dir_all(&dest) {
                        tracing::warn!(path = %dest.display(), "Failed to clean up extraction: {}", cleanup);
                    }
                }
                return Err(e);
            }
        };

        if self.remove_source {
            match std::fs::remove_file(path) {
                Ok(()) => tracing::debug!(path = %path.display(), "removed source archive"),
                Err(e) => {
                    tracing::warn!(path = %path.display(), "Failed to remove source archive: {}", e)
                }
            }
        }

        Ok(book)
    }

    /// Read only the cover image of the container at `path`.
    ///
    /// Archives are read in place; nothing is extracted or removed. Returns `None`
    /// when the container cannot be read, declares no cover, or the cover file is
    /// missing.
    pub fn cover_image(&self, path: impl AsRef<Path>) -> Option<CoverImage> {
        let path = path.as_ref();
        let result = if path.is_dir() {
            read_cover(&mut DirectorySource::new(path))
        } else if path.exists() {
            ZipSource::open(path).and_then(|mut source| read_cover(&mut source))
        } else {
            Err(ParseError::NotFound(path.to_path_buf()))
        };

        match result {
            Ok(cover) => cover,
            Err(e) => {
                tracing::debug!(path = %path.display(), "No cover image: {}", e);
                None
            }
        }
    }

    /// Unzip the archive; the flag tells whether a new extraction was written
    fn extract(&self, path: &Path, book_id: &str) -> Result<(BookRoot, bool), ParseError> {
        let Some(unzip_root) = self.unzip_root.as_ref() else {
            let mut archive = open_archive(path)?;
            let temp = tempfile::Builder::new().prefix("folio-").tempdir()?;
            archive.extract(temp.path())?;
            return Ok((BookRoot::Extracted(Arc::new(temp)), true));
        };

        let dest = unzip_root.join(book_id);
        if dest.join(CONTAINER_PATH).is_file() {
            tracing::debug!(path = %dest.display(), "reusing existing extraction");
            return Ok((BookRoot::Directory(dest), false));
        }

        let mut archive = open_archive(path)?;

        // Unpack next to the destination and move it into place only once
        // complete, so a failed extraction never looks reusable
        std::fs::create_dir_all(unzip_root)?;
        let staging = tempfile::Builder::new()
            .prefix(".folio-")
            .tempdir_in(unzip_root)?;
        archive.extract(staging.path())?;

        if dest.exists() {
            tracing::debug!(path = %dest.display(), "replacing incomplete extraction");
            std::fs::remove_dir_all(&dest)?;
        }
        std::fs::rename(staging.path(), &dest)?;
        Ok((BookRoot::Directory(dest), true))
    }
}

fn open_archive(path: &Path) -> Result<ZipArchive<BufReader<File>>, ParseError> {
    let file = File::open(path)?;
    Ok(ZipArchive::new(BufReader::new(file))?)
}

/// Parse with default options
pub fn parse_book(path: impl AsRef<Path>, is_directory: bool) -> Result<Book, ParseError> {
    EpubParser::new().parse(path, is_directory)
}

/// Read a container's cover image without building the full book
pub fn cover_image(path: impl AsRef<Path>) -> Option<CoverImage> {
    EpubParser::new().cover_image(path)
}

/// Book identifier: the container's file name without extension
fn book_id_for(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .unwrap_or("book")
        .to_string()
}

fn read_package(source: &mut dyn ContainerSource) -> Result<(String, Package), ParseError> {
    let container = source.read_string(CONTAINER_PATH)?;
    let package_path = package::parse_container_xml(&container)?;
    let content = source.read_string(&package_path)?;
    let package = package::parse_opf(&content, paths::parent_dir(&package_path))?;
    Ok((package_path, package))
}

fn read_cover(source: &mut dyn ContainerSource) -> Result<Option<CoverImage>, ParseError> {
    let (_, package) = read_package(source)?;

    let Some(resource) = package
        .cover_id
        .as_deref()
        .and_then(|id| package.resources.get(id))
    else {
        return Ok(None);
    };

    match source.read(&resource.full_path) {
        Ok(data) => Ok(Some(CoverImage {
            full_path: resource.full_path.clone(),
            media_type: resource.media_type.clone(),
            data,
        })),
        Err(ParseError::MalformedContainer(reason)) => {
            tracing::debug!("Declared cover is unreadable: {}", reason);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn parse_expanded(root: BookRoot, book_id: String) -> Result<Book, ParseError> {
    let mut source = DirectorySource::new(root.path());
    let (package_path, package) = read_package(&mut source)?;

    let mut entries = read_toc(&mut source, &package)?;
    let media_overlays = read_overlays(&mut source, &package.resources);

    let Package {
        metadata,
        resources,
        spine,
        cover_id,
        ..
    } = package;

    link_resources(&mut entries, &resources);
    let toc = TocReference::root(metadata.title.clone(), entries);

    tracing::info!(
        book_id = %book_id,
        title = %metadata.title,
        resources = resources.len(),
        toc_entries = toc.len(),
        overlays = media_overlays.len(),
        "parsed EPUB"
    );

    Ok(Book::from_parts(BookParts {
        id: book_id,
        root,
        package_path,
        metadata,
        toc,
        resources,
        spine,
        cover_resource_id: cover_id,
        media_overlays,
    }))
}

/// TOC from the EPUB 3 navigation document, falling back to the NCX
fn read_toc(
    source: &mut dyn ContainerSource,
    package: &Package,
) -> Result<Vec<TocReference>, ParseError> {
    if let Some(nav) = package.nav_id.as_deref().and_then(|id| package.resources.get(id)) {
        let content = source.read_string(&nav.full_path)?;
        let entries = navigation::parse_nav(&content, paths::parent_dir(&nav.full_path))?;
        if !entries.is_empty() {
            return Ok(entries);
        }
        tracing::debug!(path = %nav.full_path, "navigation document has no toc entries");
    }

    if let Some(ncx) = package.ncx_id.as_deref().and_then(|id| package.resources.get(id)) {
        let content = source.read_string(&ncx.full_path)?;
        return navigation::parse_ncx(&content, paths::parent_dir(&ncx.full_path));
    }

    tracing::debug!("container has no table of contents");
    Ok(Vec::new())
}

/// Overlays are optional: unreadable ones are logged and skipped
fn read_overlays(
    source: &mut dyn ContainerSource,
    resources: &ResourceIndex,
) -> HashMap<String, MediaOverlay> {
    let mut overlays = HashMap::new();

    for resource in resources.with_media_type(SMIL_MEDIA_TYPE) {
        let parsed = source
            .read_string(&resource.full_path)
            .and_then(|content| smil::parse_smil(&content, &resource.id, &resource.full_path));

        match parsed {
            Ok(overlay) => {
                overlays.insert(resource.id.clone(), overlay);
            }
            Err(e) => {
                tracing::warn!(path = %resource.full_path, "Skipping media overlay: {}", e);
            }
        }
    }

    overlays
}

/// Fill in each entry's manifest id from its target path
fn link_resources(entries: &mut [TocReference], resources: &ResourceIndex) {
    for entry in entries {
        if let Some(href) = entry.href.as_deref() {
            entry.resource_id = resources.get_by_path(href).map(|r| r.id.clone());
            if entry.resource_id.is_none() {
                tracing::debug!(href, "TOC entry targets a resource outside the manifest");
            }
        }
        link_resources(&mut entry.children, resources);
    }
}
