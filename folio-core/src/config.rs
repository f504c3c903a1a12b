//! Reader configuration

use std::path::PathBuf;

/// Default location of the persisted reader state
pub const DEFAULT_STATE_PATH: &str = "./folio_data/state.json";

/// Settings shared by the parser and the state store
#[derive(Debug, Clone, PartialEq)]
pub struct ReaderConfig {
    /// JSON file holding positions and preferences
    pub state_path: PathBuf,

    /// Delete EPUB archives after they were parsed successfully
    pub remove_source_after_parse: bool,

    /// Extract archives here instead of into temporary directories
    pub unzip_root: Option<PathBuf>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
            remove_source_after_parse: false,
            unzip_root: None,
        }
    }
}

impl ReaderConfig {
    /// Defaults overridden by `FOLIO_STATE_PATH`, `FOLIO_UNZIP_ROOT` and
    /// `FOLIO_REMOVE_SOURCE` (`1`/`true`/`yes` enable it).
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("FOLIO_STATE_PATH") {
            config.state_path = PathBuf::from(path);
        }
        if let Ok(root) = std::env::var("FOLIO_UNZIP_ROOT") {
            if !root.is_empty() {
                config.unzip_root = Some(PathBuf::from(root));
            }
        }
        if let Ok(flag) = std::env::var("FOLIO_REMOVE_SOURCE") {
            match parse_flag(&flag) {
                Some(remove) => config.remove_source_after_parse = remove,
                None => tracing::warn!(value = %flag, "Ignoring invalid FOLIO_REMOVE_SOURCE"),
            }
        }

        config
    }

    pub fn with_state_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_path = path.into();
        self
    }

    pub fn with_remove_source(mut self, remove: bool) -> Self {
        self.remove_source_after_parse = remove;
        self
    }

    pub fn with_unzip_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.unzip_root = Some(root.into());
        self
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
