//! SMIL media-overlay documents

use super::paths;
use super::xml::attribute;
use crate::clock;
use crate::error::ParseError;
use crate::types::{MediaOverlay, SmilAudio, SmilPar};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Parse a SMIL document located at `full_path`.
pub(crate) fn parse_smil(
    content: &str,
    resource_id: &str,
    full_path: &str,
) -> Result<MediaOverlay, ParseError> {
    let base_dir = paths::parent_dir(full_path);
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut pars = Vec::new();
    let mut current: Option<SmilPar> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ParseError::malformed(full_path, e))?;

        match event {
            Event::Start(e) => {
                if e.local_name().as_ref() == b"par" {
                    current = Some(SmilPar {
                        id: attribute(&e, b"id"),
                        text_src: String::new(),
                        audio: None,
                    });
                } else {
                    fill_par(&e, base_dir, current.as_mut());
                }
            }
            Event::Empty(e) => fill_par(&e, base_dir, current.as_mut()),
            Event::End(e) => {
                if e.local_name().as_ref() == b"par" {
                    if let Some(par) = current.take() {
                        if par.text_src.is_empty() {
                            tracing::debug!(full_path, "skipping <par> without a text target");
                        } else {
                            pars.push(par);
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(MediaOverlay {
        resource_id: resource_id.to_string(),
        full_path: full_path.to_string(),
        pars,
    })
}

fn fill_par(e: &BytesStart<'_>, base_dir: &str, par: Option<&mut SmilPar>) {
    let Some(par) = par else {
        return;
    };

    match e.local_name().as_ref() {
        b"text" => {
            if let Some(src) = attribute(e, b"src") {
                let (path, fragment) = paths::split_fragment(&src);
                let resolved = paths::resolve(base_dir, path);
                par.text_src = match fragment {
                    Some(fragment) => format!("{}#{}", resolved, fragment),
                    None => resolved,
                };
            }
        }
        b"audio" => {
            if let Some(src) = attribute(e, b"src") {
                let clip_begin = attribute(e, b"clipBegin").unwrap_or_default();
                let clip_end = attribute(e, b"clipEnd").unwrap_or_default();
                par.audio = Some(SmilAudio {
                    src: paths::resolve(base_dir, &src),
                    clip_begin: clock::parse(&clip_begin),
                    clip_end: clock::parse(&clip_end),
                });
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMIL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<smil xmlns="http://www.w3.org/ns/SMIL" xmlns:epub="http://www.idpf.org/2007/ops" version="3.0">
  <body>
    <seq id="seq1" epub:textref="../text/ch1.xhtml" epub:type="chapter">
      <par id="par1">
        <text src="../text/ch1.xhtml#p1"/>
        <audio src="../audio/ch1.mp3" clipBegin="0:00:00.000" clipEnd="0:00:05.250"/>
      </par>
      <seq id="seq2">
        <par id="par2">
          <text src="../text/ch1.xhtml#p2"/>
          <audio src="../audio/ch1.mp3" clipBegin="5250ms" clipEnd="12.5"/>
        </par>
      </seq>
      <par id="par3">
        <audio src="../audio/ch1.mp3" clipBegin="13" clipEnd="14"/>
      </par>
    </seq>
  </body>
</smil>"#;

    #[test]
    fn test_parse_smil() {
        let overlay = parse_smil(SMIL, "ch1_overlay", "OEBPS/smil/ch1.smil").unwrap();

        assert_eq!(overlay.resource_id, "ch1_overlay");
        assert_eq!(overlay.pars.len(), 2);

        let first = &overlay.pars[0];
        assert_eq!(first.id.as_deref(), Some("par1"));
        assert_eq!(first.text_src, "OEBPS/text/ch1.xhtml#p1");
        let audio = first.audio.as_ref().unwrap();
        assert_eq!(audio.src, "OEBPS/audio/ch1.mp3");
        assert_eq!(audio.clip_end.as_secs_f64(), 5.25);

        let second = overlay.par_for_fragment("p2").unwrap();
        let audio = second.audio.as_ref().unwrap();
        assert_eq!(audio.clip_begin.as_secs_f64(), 5.25);
        assert_eq!(audio.clip_end.as_secs_f64(), 12.5);
    }

    #[test]
    fn test_malformed_smil() {
        let result = parse_smil("<smil><body><par></body></smil>", "x", "x.smil");
        assert!(matches!(result, Err(ParseError::MalformedContainer(_))));
    }
}
