//! Cover image returned by the stand-alone cover query

/// Raw bytes of a book's cover image
#[derive(Debug, Clone, PartialEq)]
pub struct CoverImage {
    /// Container-relative path of the image
    pub full_path: String,

    /// MIME type (e.g., "image/jpeg")
    pub media_type: String,

    pub data: Vec<u8>,
}

impl CoverImage {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
