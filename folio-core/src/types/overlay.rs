//! Media overlays: SMIL documents synchronising narration audio with text

use crate::clock::Duration;
use serde::{Deserialize, Serialize};

/// Audio clip played for one overlay fragment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SmilAudio {
    /// Audio file path relative to the container root
    pub src: String,

    pub clip_begin: Duration,

    pub clip_end: Duration,
}

impl SmilAudio {
    /// Length of the clip; zero when the end precedes the beginning
    pub fn clip_length(&self) -> Duration {
        Duration::from_secs_f64(self.clip_end.as_secs_f64() - self.clip_begin.as_secs_f64())
    }
}

/// A `<par>` element: one text fragment and the audio that reads it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SmilPar {
    pub id: Option<String>,

    /// Text target as `path#fragment`, path relative to the container root
    pub text_src: String,

    pub audio: Option<SmilAudio>,
}

impl SmilPar {
    /// Fragment identifier of the text target
    pub fn text_fragment(&self) -> Option<&str> {
        self.text_src.split_once('#').map(|(_, fragment)| fragment)
    }
}

/// A parsed SMIL document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaOverlay {
    /// Manifest id of the SMIL document
    pub resource_id: String,

    /// Container-relative path of the SMIL document
    pub full_path: String,

    /// Fragments in document order, nested `<seq>` elements flattened
    pub pars: Vec<SmilPar>,
}

impl MediaOverlay {
    /// The fragment whose text target carries `fragment_id`
    pub fn par_for_fragment(&self, fragment_id: &str) -> Option<&SmilPar> {
        self.pars
            .iter()
            .find(|par| par.text_fragment() == Some(fragment_id))
    }

    /// The fragment that follows the one targeting `fragment_id`
    pub fn next_par(&self, fragment_id: &str) -> Option<&SmilPar> {
        let index = self
            .pars
            .iter()
            .position(|par| par.text_fragment() == Some(fragment_id))?;
        self.pars.get(index + 1)
    }

    /// Sum of all clip lengths
    pub fn total_duration(&self) -> Duration {
        let seconds = self
            .pars
            .iter()
            .filter_map(|par| par.audio.as_ref())
            .map(|audio| audio.clip_length().as_secs_f64())
            .sum();
        Duration::from_secs_f64(seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn par(fragment: &str, begin: f64, end: f64) -> SmilPar {
        SmilPar {
            id: None,
            text_src: format!("OEBPS/ch1.xhtml#{}", fragment),
            audio: Some(SmilAudio {
                src: "OEBPS/audio/ch1.mp3".into(),
                clip_begin: Duration::from_secs_f64(begin),
                clip_end: Duration::from_secs_f64(end),
            }),
        }
    }

    #[test]
    fn test_fragment_navigation() {
        let overlay = MediaOverlay {
            resource_id: "ch1_overlay".into(),
            full_path: "OEBPS/ch1.smil".into(),
            pars: vec![par("p1", 0.0, 2.5), par("p2", 2.5, 6.0), par("p3", 6.0, 7.0)],
        };

        assert_eq!(overlay.par_for_fragment("p2").unwrap().text_fragment(), Some("p2"));
        assert_eq!(overlay.next_par("p2").unwrap().text_fragment(), Some("p3"));
        assert!(overlay.next_par("p3").is_none());
        assert_eq!(overlay.total_duration().as_secs_f64(), 7.0);
    }

    #[test]
    fn test_inverted_clip_is_zero() {
        let audio = SmilAudio {
            src: "a.mp3".into(),
            clip_begin: Duration::from_secs_f64(5.0),
            clip_end: Duration::from_secs_f64(1.0),
        };
        assert!(audio.clip_length().is_zero());
    }
}
