//! Media-overlay clock values
//!
//! SMIL documents and package metadata express times as clock values such as
//! `0:05:01.2`, `2345ms`, `7.25h` or `13min`. This module turns them into a
//! [`Duration`] and renders durations back as the `mm:ss` string shown by the
//! audio player.
//!
//! Parsing never fails: text that matches none of the known forms becomes a zero
//! duration. Callers that need to tell "unparsable" apart from "zero" use
//! [`try_parse`].

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// A non-negative number of seconds
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Duration(f64);

impl Duration {
    pub const ZERO: Duration = Duration(0.0);

    /// Create a duration, clamping negative and NaN values to zero
    pub fn from_secs_f64(seconds: f64) -> Self {
        if seconds.is_nan() || seconds < 0.0 {
            Duration::ZERO
        } else {
            Duration(seconds)
        }
    }

    pub fn as_secs_f64(self) -> f64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }
}

impl From<Duration> for f64 {
    fn from(d: Duration) -> Self {
        d.0
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format(*self))
    }
}

/// One entry of the ordered clock-format table
pub struct ClockFormat {
    /// Human-readable shape, e.g. `HH:mm:ss.SSS`
    pub name: &'static str,
    pattern: &'static str,
    decode: fn(&Captures<'_>) -> Option<f64>,
}

impl ClockFormat {
    pub fn pattern(&self) -> &'static str {
        self.pattern
    }
}

/// Formats tried in order; the first whose pattern matches decides the result.
pub static CLOCK_FORMATS: &[ClockFormat] = &[
    ClockFormat {
        name: "HH:mm:ss.SSS",
        pattern: r"^(?P<h>\d{1,2}):(?P<m>\d{2}):(?P<s>\d{2}\.\d{1,3})$",
        decode: decode_clock,
    },
    ClockFormat {
        name: "HH:mm:ss",
        pattern: r"^(?P<h>\d{1,2}):(?P<m>\d{2}):(?P<s>\d{2})$",
        decode: decode_clock,
    },
    ClockFormat {
        name: "mm:ss.SSS",
        pattern: r"^(?P<m>\d{1,2}):(?P<s>\d{2}\.\d{1,3})$",
        decode: decode_clock,
    },
    ClockFormat {
        name: "mm:ss",
        pattern: r"^(?P<m>\d{1,2}):(?P<s>\d{2})$",
        decode: decode_clock,
    },
    ClockFormat {
        name: "ss.SSS",
        pattern: r"^(?P<s>\d{1,2}\.\d{1,3})$",
        decode: decode_clock,
    },
    ClockFormat {
        name: "ms",
        pattern: r"^(?P<n>\d+(?:\.\d+)?)ms$",
        decode: decode_millis,
    },
    ClockFormat {
        name: "h",
        pattern: r"^(?P<n>\d+(?:\.\d+)?)h$",
        decode: decode_hours,
    },
    ClockFormat {
        name: "min",
        pattern: r"^(?P<n>\d+(?:\.\d+)?)min$",
        decode: decode_minutes,
    },
];

static COMPILED: LazyLock<Vec<(&'static ClockFormat, Regex)>> = LazyLock::new(|| {
    CLOCK_FORMATS
        .iter()
        .map(|format| {
            let re = Regex::new(format.pattern).expect("clock format patterns are valid");
            (format, re)
        })
        .collect()
});

fn field(caps: &Captures<'_>, name: &str) -> Option<f64> {
    match caps.name(name) {
        Some(m) => m.as_str().parse().ok(),
        None => Some(0.0),
    }
}

fn number(caps: &Captures<'_>) -> Option<f64> {
    caps.name("n")?.as_str().parse().ok()
}

fn decode_millis(caps: &Captures<'_>) -> Option<f64> {
    number(caps).map(|n| n / 1000.0)
}

fn decode_hours(caps: &Captures<'_>) -> Option<f64> {
    number(caps).map(|n| n * 60.0 * 60.0)
}

fn decode_minutes(caps: &Captures<'_>) -> Option<f64> {
    number(caps).map(|n| n * 60.0)
}

/// Decode `h`/`m`/`s` groups; absent groups count as zero.
fn decode_clock(caps: &Captures<'_>) -> Option<f64> {
    let hours = field(caps, "h")?;
    let minutes = field(caps, "m")?;
    let seconds = field(caps, "s")?;

    if hours >= 24.0 || minutes >= 60.0 || seconds >= 60.0 {
        return None;
    }

    Some(seconds + minutes * 60.0 + hours * 60.0 * 60.0)
}

/// Name of the first format whose pattern matches `text`, if any
pub fn matching_format(text: &str) -> Option<&'static str> {
    let value = text.trim();
    COMPILED
        .iter()
        .find(|(_, re)| re.is_match(value))
        .map(|(format, _)| format.name)
}

/// Parse a clock value, returning `None` when the text is not a recognised clock value.
pub fn try_parse(text: &str) -> Option<Duration> {
    let value = text.trim();
    if value.is_empty() {
        return None;
    }

    let (format, caps) = COMPILED
        .iter()
        .find_map(|(format, re)| re.captures(value).map(|caps| (*format, caps)))?;

    let seconds = (format.decode)(&caps);
    if seconds.is_none() {
        tracing::debug!(value, format = format.name, "clock value out of range");
    }
    seconds.map(Duration::from_secs_f64)
}

/// Parse a clock value such as `0:05:01.2` into seconds.
///
/// Empty or unrecognised text yields [`Duration::ZERO`].
pub fn parse(text: &str) -> Duration {
    try_parse(text).unwrap_or(Duration::ZERO)
}

/// Render a duration as zero-padded `mm:ss`.
///
/// There is no hour field: minutes keep counting past 59.
pub fn format(duration: Duration) -> String {
    let value = duration.as_secs_f64();
    let minutes = (value / 60.0).floor();
    let seconds = (value % 60.0).floor();
    format!("{:02}:{:02}", minutes as u64, seconds as u64)
}

/// Parse `text` and render it as `mm:ss`
pub fn format_clock_text(text: &str) -> String {
    format(parse(text))
}
