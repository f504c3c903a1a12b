//! EPUB fixtures shared by the integration tests
//!
//! Books are generated on the fly, either as an expanded directory tree or as a
//! zip archive, so the tests need no binary files in the repository.

#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const COVER_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nnot-really-a-png";

pub const CONTAINER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

pub const CONTENT_OPF: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="uid">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:identifier id="uid">urn:uuid:6f1c2a4e-0000-4000-8000-000000000001</dc:identifier>
    <dc:title>The Narrated Voyage</dc:title>
    <dc:creator>Ada Quill</dc:creator>
    <dc:language>en</dc:language>
    <meta property="media:duration">0:00:12.500</meta>
    <meta property="media:active-class">-epub-media-overlay-active</meta>
  </metadata>
  <manifest>
    <item id="nav" href="nav.xhtml" media-type="application/xhtml+xml" properties="nav"/>
    <item id="ncx" href="toc.ncx" media-type="application/x-dtbncx+xml"/>
    <item id="ch1" href="text/ch1.xhtml" media-type="application/xhtml+xml" media-overlay="ch1_overlay"/>
    <item id="ch2" href="text/ch2.xhtml" media-type="application/xhtml+xml"/>
    <item id="ch1_overlay" href="smil/ch1.smil" media-type="application/smil+xml"/>
    <item id="ch1_audio" href="audio/ch1.mp3" media-type="audio/mpeg"/>
    <item id="cover" href="images/cover.png" media-type="image/png" properties="cover-image"/>
  </manifest>
  <spine toc="ncx">
    <itemref idref="ch1"/>
    <itemref idref="ch2"/>
  </spine>
</package>"#;

pub const NAV_XHTML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops">
<body>
  <nav epub:type="toc">
    <ol>
      <li><a href="text/ch1.xhtml">Departure</a>
        <ol>
          <li><a href="text/ch1.xhtml#harbour">The Harbour</a></li>
        </ol>
      </li>
      <li><a href="text/ch2.xhtml">Landfall</a></li>
    </ol>
  </nav>
</body>
</html>"#;

pub const TOC_NCX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <navMap>
    <navPoint id="n1"><navLabel><text>Departure (NCX)</text></navLabel><content src="text/ch1.xhtml"/></navPoint>
  </navMap>
</ncx>"#;

pub const CH1_SMIL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<smil xmlns="http://www.w3.org/ns/SMIL" version="3.0">
  <body>
    <par id="p1">
      <text src="../text/ch1.xhtml#s1"/>
      <audio src="../audio/ch1.mp3" clipBegin="0:00:00.000" clipEnd="0:00:04.000"/>
    </par>
    <par id="p2">
      <text src="../text/ch1.xhtml#s2"/>
      <audio src="../audio/ch1.mp3" clipBegin="4000ms" clipEnd="12.5"/>
    </par>
  </body>
</smil>"#;

fn chapter(title: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><html xmlns="http://www.w3.org/1999/xhtml"><body><h1>{}</h1><p id="s1">One.</p><p id="s2">Two.</p></body></html>"#,
        title
    )
}

/// Every file of the sample book, with `opf` as the package document
pub fn book_files(opf: &str) -> Vec<(&'static str, Vec<u8>)> {
    vec![
        ("mimetype", b"application/epub+zip".to_vec()),
        ("META-INF/container.xml", CONTAINER_XML.as_bytes().to_vec()),
        ("OEBPS/content.opf", opf.as_bytes().to_vec()),
        ("OEBPS/nav.xhtml", NAV_XHTML.as_bytes().to_vec()),
        ("OEBPS/toc.ncx", TOC_NCX.as_bytes().to_vec()),
        ("OEBPS/text/ch1.xhtml", chapter("Departure").into_bytes()),
        ("OEBPS/text/ch2.xhtml", chapter("Landfall").into_bytes()),
        ("OEBPS/smil/ch1.smil", CH1_SMIL.as_bytes().to_vec()),
        ("OEBPS/audio/ch1.mp3", b"ID3-fake-audio".to_vec()),
        ("OEBPS/images/cover.png", COVER_BYTES.to_vec()),
    ]
}

/// Write the sample book as an expanded directory under `root`
pub fn write_directory(root: &Path) {
    write_directory_with(root, CONTENT_OPF);
}

pub fn write_directory_with(root: &Path, opf: &str) {
    for (name, data) in book_files(opf) {
        let path = root.join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, data).unwrap();
    }
}

/// Write the sample book as a zip archive at `path`
pub fn write_archive(path: &Path) {
    write_archive_with(path, CONTENT_OPF);
}

pub fn write_archive_with(path: &Path, opf: &str) {
    let file = File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, data) in book_files(opf) {
        zip.start_file(name, options).unwrap();
        zip.write_all(&data).unwrap();
    }
    zip.finish().unwrap();
}

/// Write the sample book uncompressed with one byte of the cover flipped, so
/// the archive opens but its last entry fails the checksum on extraction
pub fn write_corrupt_archive(path: &Path) {
    let file = File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    for (name, data) in book_files(CONTENT_OPF) {
        zip.start_file(name, options).unwrap();
        zip.write_all(&data).unwrap();
    }
    zip.finish().unwrap();

    let mut bytes = std::fs::read(path).unwrap();
    let offset = bytes
        .windows(COVER_BYTES.len())
        .position(|window| window == COVER_BYTES)
        .unwrap();
    bytes[offset + COVER_BYTES.len() - 1] ^= 0xFF;
    std::fs::write(path, bytes).unwrap();
}
