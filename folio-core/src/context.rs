//! Reader context: the open book session, its persisted state and lifecycle hooks
//!
//! A `ReaderContext` is created once by the host application and passed to
//! whatever needs reader state. It owns the [`ReaderStateStore`] and knows which
//! book is open and on which page, so lifecycle events can save the position.

use crate::config::ReaderConfig;
use crate::decoder::EpubParser;
use crate::error::{ParseError, Result, StorageError};
use crate::state::ReaderStateStore;
use crate::types::Book;
use std::path::Path;

/// The book currently shown by the reader
#[derive(Debug, Clone, PartialEq)]
pub struct ReaderSession {
    pub book_id: String,

    /// 1-based page, `None` until the layout reports one
    pub current_page: Option<u32>,

    /// Scroll offset within the current page
    pub page_offset: f64,
}

/// Explicit reader context passed to the presentation layer
pub struct ReaderContext {
    state: ReaderStateStore,
    parser: EpubParser,
    session: Option<ReaderSession>,
}

impl ReaderContext {
    pub fn new(state: ReaderStateStore) -> Self {
        Self {
            state,
            parser: EpubParser::new(),
            session: None,
        }
    }

    /// Build a context from configuration, opening the state file.
    ///
    /// A state file that is not valid JSON is logged and replaced by a fresh
    /// store at the same path. Any other failure to read it is returned.
    pub fn from_config(config: &ReaderConfig) -> Result<Self> {
        let state = match ReaderStateStore::open(&config.state_path) {
            Ok(state) => state,
            Err(e @ StorageError::Serialization(_)) => {
                tracing::warn!(
                    path = %config.state_path.display(),
                    "Failed to load reader state, starting fresh: {}",
                    e
                );
                std::fs::remove_file(&config.state_path)?;
                ReaderStateStore::open(&config.state_path)?
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self::new(state).with_parser(EpubParser::from_config(config)))
    }

    pub fn with_parser(mut self, parser: EpubParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn state(&self) -> &ReaderStateStore {
        &self.state
    }

    pub fn session(&self) -> Option<&ReaderSession> {
        self.session.as_ref()
    }

    /// Whether a book is currently open
    pub fn is_reader_open(&self) -> bool {
        self.session.is_some()
    }

    /// Start reading `book_id`; replaces any open session without saving it
    pub fn open_session(&mut self, book_id: impl Into<String>) {
        let book_id = book_id.into();
        tracing::debug!(book_id = %book_id, "reader session opened");
        self.session = Some(ReaderSession {
            book_id,
            current_page: None,
            page_offset: 0.0,
        });
    }

    /// Record the visible page; ignored when no session is open or `page` is 0.
    ///
    /// A non-finite offset is stored as 0 so the position stays saveable.
    pub fn set_current_page(&mut self, page: u32, page_offset: f64) {
        let Some(session) = self.session.as_mut() else {
            tracing::debug!(page, "no open session, ignoring page change");
            return;
        };
        if page == 0 {
            tracing::warn!(book_id = %session.book_id, "Ignoring page number 0");
            return;
        }
        session.current_page = Some(page);
        session.page_offset = if page_offset.is_finite() {
            page_offset
        } else {
            tracing::warn!(book_id = %session.book_id, page_offset, "Non-finite page offset, using 0");
            0.0
        };
    }

    /// Save the position and end the session
    pub fn close_session(&mut self) {
        self.save_reader_state();
        if let Some(session) = self.session.take() {
            tracing::debug!(book_id = %session.book_id, "reader session closed");
        }
    }

    /// Persist the current position.
    ///
    /// Does nothing unless a session is open and it has a current page. Returns
    /// whether a position was written.
    pub fn save_reader_state(&self) -> bool {
        let Some(session) = self.session.as_ref() else {
            return false;
        };
        let Some(page) = session.current_page else {
            tracing::debug!(book_id = %session.book_id, "no current page, nothing to save");
            return false;
        };

        self.state
            .save_position(&session.book_id, page, session.page_offset);
        true
    }

    /// The app is about to move to the background
    pub fn application_will_resign_active(&self) {
        self.save_reader_state();
    }

    /// The app is about to exit
    pub fn application_will_terminate(&self) {
        self.save_reader_state();
    }

    /// A book without a saved position opens on its table of contents
    pub fn should_show_toc_on_open(&self, book_id: &str) -> bool {
        !self.state.has_saved_position(book_id)
    }

    /// Parse the EPUB at `path` (archive or expanded directory) and open a session for it
    pub fn load_book(&mut self, path: impl AsRef<Path>) -> std::result::Result<Book, ParseError> {
        let path = path.as_ref();
        let book = self.parser.parse(path, path.is_dir())?;
        self.open_session(book.id());
        Ok(book)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_requires_session_and_page() {
        let mut context = ReaderContext::new(ReaderStateStore::in_memory());

        assert!(!context.save_reader_state());

        context.open_session("book");
        assert!(context.is_reader_open());
        assert!(!context.save_reader_state());
        assert!(context.state().load_position("book").is_none());

        context.set_current_page(7, 15.0);
        assert!(context.save_reader_state());
        assert_eq!(context.state().load_position("book").unwrap().page_number, 7);
    }

    #[test]
    fn test_non_finite_offset_still_saves_page() {
        let mut context = ReaderContext::new(ReaderStateStore::in_memory());
        context.open_session("book");
        context.set_current_page(6, f64::NEG_INFINITY);

        assert!(context.save_reader_state());
        let position = context.state().load_position("book").unwrap();
        assert_eq!((position.page_number, position.page_offset), (6, 0.0));
        assert!(!context.should_show_toc_on_open("book"));
    }

    #[test]
    fn test_page_without_session_is_ignored() {
        let mut context = ReaderContext::new(ReaderStateStore::in_memory());
        context.set_current_page(3, 0.0);
        assert!(context.session().is_none());
    }

    #[test]
    fn test_close_session_saves() {
        let mut context = ReaderContext::new(ReaderStateStore::in_memory());
        assert!(context.should_show_toc_on_open("book"));

        context.open_session("book");
        context.set_current_page(2, 8.0);
        context.close_session();

        assert!(!context.is_reader_open());
        assert!(!context.should_show_toc_on_open("book"));
        // Nothing left to save
        context.application_will_terminate();
        assert_eq!(context.state().load_position("book").unwrap().page_offset, 8.0);
    }
}
