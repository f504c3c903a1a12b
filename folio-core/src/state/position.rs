use serde::{Deserialize, Serialize};

/// Where a reader left off in a book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReaderPosition {
    /// Identifies the book; this is the storage key, not part of the stored value
    #[serde(skip)]
    pub book_id: String,

    /// 1-based page in the paginated layout
    pub page_number: u32,

    /// Scroll offset within the page
    #[serde(default)]
    pub page_offset: f64,
}

impl ReaderPosition {
    pub fn new(book_id: impl Into<String>, page_number: u32, page_offset: f64) -> Self {
        Self {
            book_id: book_id.into(),
            page_number,
            page_offset,
        }
    }

    /// Storage key for a book's position
    pub(crate) fn storage_key(book_id: &str) -> String {
        format!("position.{}", book_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_shape() {
        let position = ReaderPosition::new("moby-dick", 12, 340.5);
        insta::assert_json_snapshot!(position, @r###"
        {
          "pageNumber": 12,
          "pageOffset": 340.5
        }
        "###);
        assert_eq!(ReaderPosition::storage_key("moby-dick"), "position.moby-dick");
    }
}
