//! Reader display and playback preferences

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// How the sentence currently narrated by a media overlay is highlighted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub enum MediaOverlayStyle {
    #[default]
    Default,
    Underline,
    TextColor,
}

impl MediaOverlayStyle {
    pub const ALL: [MediaOverlayStyle; 3] = [
        MediaOverlayStyle::Default,
        MediaOverlayStyle::Underline,
        MediaOverlayStyle::TextColor,
    ];

    /// Raw index as persisted
    pub fn index(self) -> u32 {
        match self {
            MediaOverlayStyle::Default => 0,
            MediaOverlayStyle::Underline => 1,
            MediaOverlayStyle::TextColor => 2,
        }
    }

    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// CSS class applied to the highlighted overlay element
    pub fn class_name(self) -> String {
        format!("mediaOverlayStyle{}", self.index())
    }
}

impl From<MediaOverlayStyle> for u32 {
    fn from(style: MediaOverlayStyle) -> Self {
        style.index()
    }
}

impl TryFrom<u32> for MediaOverlayStyle {
    type Error = String;

    fn try_from(index: u32) -> Result<Self, Self::Error> {
        Self::from_index(index).ok_or_else(|| format!("unknown media overlay style {}", index))
    }
}

/// Persisted preference keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceKey {
    FontFamily,
    FontSize,
    AudioRate,
    HighlightStyle,
    MediaOverlayStyle,
    NightMode,
}

impl PreferenceKey {
    pub const ALL: [PreferenceKey; 6] = [
        PreferenceKey::FontFamily,
        PreferenceKey::FontSize,
        PreferenceKey::AudioRate,
        PreferenceKey::HighlightStyle,
        PreferenceKey::MediaOverlayStyle,
        PreferenceKey::NightMode,
    ];

    /// Storage key
    pub fn as_str(self) -> &'static str {
        match self {
            PreferenceKey::FontFamily => "font_family",
            PreferenceKey::FontSize => "font_size",
            PreferenceKey::AudioRate => "audio_rate",
            PreferenceKey::HighlightStyle => "highlight_style",
            PreferenceKey::MediaOverlayStyle => "media_overlay_style",
            PreferenceKey::NightMode => "night_mode",
        }
    }
}

impl fmt::Display for PreferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single preference value tagged with its key
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Preference {
    FontFamily(u32),
    FontSize(u32),
    AudioRate(u32),
    HighlightStyle(u32),
    MediaOverlayStyle(MediaOverlayStyle),
    NightMode(bool),
}

impl Preference {
    pub fn key(&self) -> PreferenceKey {
        match self {
            Preference::FontFamily(_) => PreferenceKey::FontFamily,
            Preference::FontSize(_) => PreferenceKey::FontSize,
            Preference::AudioRate(_) => PreferenceKey::AudioRate,
            Preference::HighlightStyle(_) => PreferenceKey::HighlightStyle,
            Preference::MediaOverlayStyle(_) => PreferenceKey::MediaOverlayStyle,
            Preference::NightMode(_) => PreferenceKey::NightMode,
        }
    }

    pub(crate) fn to_value(self) -> Value {
        match self {
            Preference::FontFamily(v)
            | Preference::FontSize(v)
            | Preference::AudioRate(v)
            | Preference::HighlightStyle(v) => Value::from(v),
            Preference::MediaOverlayStyle(style) => Value::from(style.index()),
            Preference::NightMode(on) => Value::Bool(on),
        }
    }

    /// Decode a stored value; `None` when it has the wrong shape for `key`
    pub(crate) fn from_value(key: PreferenceKey, value: &Value) -> Option<Self> {
        let number = || value.as_u64().and_then(|n| u32::try_from(n).ok());
        match key {
            PreferenceKey::FontFamily => number().map(Preference::FontFamily),
            PreferenceKey::FontSize => number().map(Preference::FontSize),
            PreferenceKey::AudioRate => number().map(Preference::AudioRate),
            PreferenceKey::HighlightStyle => number().map(Preference::HighlightStyle),
            PreferenceKey::MediaOverlayStyle => number()
                .and_then(MediaOverlayStyle::from_index)
                .map(Preference::MediaOverlayStyle),
            PreferenceKey::NightMode => value.as_bool().map(Preference::NightMode),
        }
    }
}

/// Snapshot of every preference
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReaderPreferences {
    pub font_family: u32,
    pub font_size: u32,
    pub audio_rate: u32,
    pub highlight_style: u32,
    pub media_overlay_style: MediaOverlayStyle,
    pub night_mode: bool,
}

impl Default for ReaderPreferences {
    fn default() -> Self {
        Self {
            font_family: 0,
            font_size: 2,
            audio_rate: 1,
            highlight_style: 0,
            media_overlay_style: MediaOverlayStyle::Default,
            night_mode: false,
        }
    }
}

impl ReaderPreferences {
    pub fn get(&self, key: PreferenceKey) -> Preference {
        match key {
            PreferenceKey::FontFamily => Preference::FontFamily(self.font_family),
            PreferenceKey::FontSize => Preference::FontSize(self.font_size),
            PreferenceKey::AudioRate => Preference::AudioRate(self.audio_rate),
            PreferenceKey::HighlightStyle => Preference::HighlightStyle(self.highlight_style),
            PreferenceKey::MediaOverlayStyle => {
                Preference::MediaOverlayStyle(self.media_overlay_style)
            }
            PreferenceKey::NightMode => Preference::NightMode(self.night_mode),
        }
    }

    pub fn apply(&mut self, preference: Preference) {
        match preference {
            Preference::FontFamily(v) => self.font_family = v,
            Preference::FontSize(v) => self.font_size = v,
            Preference::AudioRate(v) => self.audio_rate = v,
            Preference::HighlightStyle(v) => self.highlight_style = v,
            Preference::MediaOverlayStyle(style) => self.media_overlay_style = style,
            Preference::NightMode(on) => self.night_mode = on,
        }
    }
}
