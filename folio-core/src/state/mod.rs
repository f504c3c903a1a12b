//! Persistent reader state: per-book reading positions and global preferences
//!
//! Every mutation is written through to the backing [`KeyValueStore`] before the
//! call returns. Storage failures are logged and swallowed; reads fall back to
//! the registered defaults.

mod position;
mod preferences;

pub use position::ReaderPosition;
pub use preferences::{MediaOverlayStyle, Preference, PreferenceKey, ReaderPreferences};

use crate::storage::{JsonFileStore, KeyValueStore, MemoryStore, StorageResult};
use std::path::PathBuf;
use std::sync::Arc;

/// Reading positions and preferences on top of a key-value store
#[derive(Clone)]
pub struct ReaderStateStore {
    store: Arc<dyn KeyValueStore>,
    defaults: ReaderPreferences,
}

impl ReaderStateStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            defaults: ReaderPreferences::default(),
        }
    }

    /// Open a store persisted as JSON at `path`
    pub fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        Ok(Self::new(Arc::new(JsonFileStore::open(path)?)))
    }

    /// Non-persistent store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Replace the fallback values used for preferences never set
    pub fn with_defaults(mut self, defaults: ReaderPreferences) -> Self {
        self.defaults = defaults;
        self
    }

    /// Record where the reader is in `book_id`, replacing any earlier position.
    ///
    /// Pages are 1-based; page 0 and non-finite offsets are ignored.
    pub fn save_position(&self, book_id: &str, page_number: u32, page_offset: f64) {
        if page_number == 0 {
            tracing::warn!(book_id, "Ignoring reader position with page number 0");
            return;
        }
        if !page_offset.is_finite() {
            tracing::warn!(book_id, page_offset, "Ignoring reader position with non-finite offset");
            return;
        }

        let position = ReaderPosition::new(book_id, page_number, page_offset);
        let result = serde_json::to_value(&position)
            .map_err(Into::into)
            .and_then(|value| self.store.set(&ReaderPosition::storage_key(book_id), value));

        match result {
            Ok(()) => tracing::debug!(book_id, page_number, page_offset, "saved reader position"),
            Err(e) => tracing::warn!(book_id, "Failed to save reader position: {}", e),
        }
    }

    /// Last saved position for `book_id`; `None` means the book was never opened
    pub fn load_position(&self, book_id: &str) -> Option<ReaderPosition> {
        let value = match self.store.get(&ReaderPosition::storage_key(book_id)) {
            Ok(value) => value?,
            Err(e) => {
                tracing::warn!(book_id, "Failed to load reader position: {}", e);
                return None;
            }
        };

        match serde_json::from_value::<ReaderPosition>(value) {
            Ok(mut position) => {
                position.book_id = book_id.to_string();
                Some(position)
            }
            Err(e) => {
                tracing::warn!(book_id, "Discarding unreadable reader position: {}", e);
                None
            }
        }
    }

    pub fn has_saved_position(&self, book_id: &str) -> bool {
        self.load_position(book_id).is_some()
    }

    /// Current value of every preference
    pub fn preferences(&self) -> ReaderPreferences {
        let mut preferences = self.defaults;
        for key in PreferenceKey::ALL {
            preferences.apply(self.preference(key));
        }
        preferences
    }

    /// Current value of one preference, or its default when unset
    pub fn preference(&self, key: PreferenceKey) -> Preference {
        let stored = match self.store.get(key.as_str()) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(key = %key, "Failed to read preference: {}", e);
                None
            }
        };

        stored
            .and_then(|value| {
                let parsed = Preference::from_value(key, &value);
                if parsed.is_none() {
                    tracing::warn!(key = %key, %value, "Ignoring preference with unexpected value");
                }
                parsed
            })
            .unwrap_or_else(|| self.defaults.get(key))
    }

    /// Persist one preference
    pub fn set_preference(&self, preference: Preference) {
        let key = preference.key();
        match self.store.set(key.as_str(), preference.to_value()) {
            Ok(()) => tracing::debug!(key = %key, "saved preference"),
            Err(e) => tracing::warn!(key = %key, "Failed to save preference: {}", e),
        }
    }

    pub fn font_family(&self) -> u32 {
        self.preferences_field(PreferenceKey::FontFamily).font_family
    }

    pub fn set_font_family(&self, font_family: u32) {
        self.set_preference(Preference::FontFamily(font_family));
    }

    pub fn font_size(&self) -> u32 {
        self.preferences_field(PreferenceKey::FontSize).font_size
    }

    pub fn set_font_size(&self, font_size: u32) {
        self.set_preference(Preference::FontSize(font_size));
    }

    pub fn audio_rate(&self) -> u32 {
        self.preferences_field(PreferenceKey::AudioRate).audio_rate
    }

    pub fn set_audio_rate(&self, audio_rate: u32) {
        self.set_preference(Preference::AudioRate(audio_rate));
    }

    pub fn highlight_style(&self) -> u32 {
        self.preferences_field(PreferenceKey::HighlightStyle).highlight_style
    }

    pub fn set_highlight_style(&self, highlight_style: u32) {
        self.set_preference(Preference::HighlightStyle(highlight_style));
    }

    pub fn media_overlay_style(&self) -> MediaOverlayStyle {
        self.preferences_field(PreferenceKey::MediaOverlayStyle)
            .media_overlay_style
    }

    pub fn set_media_overlay_style(&self, style: MediaOverlayStyle) {
        self.set_preference(Preference::MediaOverlayStyle(style));
    }

    pub fn night_mode(&self) -> bool {
        self.preferences_field(PreferenceKey::NightMode).night_mode
    }

    pub fn set_night_mode(&self, night_mode: bool) {
        self.set_preference(Preference::NightMode(night_mode));
    }

    /// Defaults with only `key` read from storage
    fn preferences_field(&self, key: PreferenceKey) -> ReaderPreferences {
        let mut preferences = self.defaults;
        preferences.apply(self.preference(key));
        preferences
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_position_round_trip() {
        let state = ReaderStateStore::in_memory();

        assert!(state.load_position("book").is_none());

        state.save_position("book", 3, 120.0);
        state.save_position("book", 5, 42.5);

        let position = state.load_position("book").unwrap();
        assert_eq!(position, ReaderPosition::new("book", 5, 42.5));
        assert!(!state.has_saved_position("other"));
    }

    #[test]
    fn test_page_zero_is_ignored() {
        let state = ReaderStateStore::in_memory();
        state.save_position("book", 0, 10.0);
        assert!(state.load_position("book").is_none());
    }

    #[test]
    fn test_non_finite_offset_is_ignored() {
        let state = ReaderStateStore::in_memory();
        state.save_position("book", 3, 10.0);

        state.save_position("book", 4, f64::INFINITY);
        state.save_position("book", 5, f64::NAN);

        assert_eq!(state.load_position("book"), Some(ReaderPosition::new("book", 3, 10.0)));
    }

    #[test]
    fn test_defaults_are_not_written() {
        let store = Arc::new(MemoryStore::new());
        let state = ReaderStateStore::new(store.clone());

        assert_eq!(state.preferences(), ReaderPreferences::default());
        assert!(store.keys("").unwrap().is_empty());
    }

    #[test]
    fn test_typed_setters() {
        let state = ReaderStateStore::in_memory();

        state.set_font_family(3);
        state.set_font_size(4);
        state.set_audio_rate(2);
        state.set_highlight_style(1);
        state.set_media_overlay_style(MediaOverlayStyle::Underline);
        state.set_night_mode(true);

        assert_eq!(state.font_family(), 3);
        assert_eq!(state.font_size(), 4);
        assert_eq!(state.audio_rate(), 2);
        assert_eq!(state.highlight_style(), 1);
        assert_eq!(state.media_overlay_style(), MediaOverlayStyle::Underline);
        assert!(state.night_mode());
    }

    #[test]
    fn test_bad_stored_value_falls_back_to_default() {
        let store = Arc::new(MemoryStore::new());
        store.set("font_size", json!("huge")).unwrap();
        store.set("position.book", json!({"page": 1})).unwrap();

        let state = ReaderStateStore::new(store);
        assert_eq!(state.font_size(), 2);
        assert!(state.load_position("book").is_none());
    }

    #[test]
    fn test_custom_defaults() {
        let defaults = ReaderPreferences {
            night_mode: true,
            ..ReaderPreferences::default()
        };
        let state = ReaderStateStore::in_memory().with_defaults(defaults);
        assert!(state.night_mode());

        state.set_night_mode(false);
        assert!(!state.night_mode());
    }
}
