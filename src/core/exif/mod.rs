//! # EXIF Module
//!
//! Picks the EXIF fields the gallery consumes out of image files.
//!
//! ## Picked Fields
//! - `XPKeywords` - semicolon-delimited tags
//! - `DateTimeOriginal` / `CreateDate` - capture time candidates
//! - `XPTitle` / `XPSubject` / `XPComment` / `ImageDescription` -
//!   description candidates
//!
//! The `XP*` tags are Windows Explorer extensions stored in IFD0 as
//! UTF-16LE byte arrays; the standard tags are ASCII. Values are kept as
//! raw strings - interpreting them (date parsing, keyword splitting) is
//! the extractor's job.

use exif::{Context, In, Reader, Tag, Value};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

// Windows Explorer tags, absent from the kamadak-exif tag table.
const TAG_XP_TITLE: Tag = Tag(Context::Tiff, 0x9c9b);
const TAG_XP_COMMENT: Tag = Tag(Context::Tiff, 0x9c9c);
const TAG_XP_KEYWORDS: Tag = Tag(Context::Tiff, 0x9c9e);
const TAG_XP_SUBJECT: Tag = Tag(Context::Tiff, 0x9c9f);

/// The EXIF fields consumed by metadata extraction.
///
/// Every field is independently optional; an all-`None` record and a
/// missing record mean the same thing to the extractor. Serde names match
/// the EXIF field names so exiftool-style JSON sidecars deserialize
/// directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickedExif {
    /// Semicolon-delimited keyword list
    #[serde(rename = "XPKeywords", skip_serializing_if = "Option::is_none")]
    pub xp_keywords: Option<String>,

    /// Capture time as written by the camera, e.g. `"2024:01:15 18:21:09"`
    #[serde(rename = "DateTimeOriginal", skip_serializing_if = "Option::is_none")]
    pub date_time_original: Option<String>,

    /// Digitization time (`DateTimeDigitized` in TIFF terms)
    #[serde(rename = "CreateDate", skip_serializing_if = "Option::is_none")]
    pub create_date: Option<String>,

    /// Title text
    #[serde(rename = "XPTitle", skip_serializing_if = "Option::is_none")]
    pub xp_title: Option<String>,

    /// Subject text
    #[serde(rename = "XPSubject", skip_serializing_if = "Option::is_none")]
    pub xp_subject: Option<String>,

    /// Comment text
    #[serde(rename = "XPComment", skip_serializing_if = "Option::is_none")]
    pub xp_comment: Option<String>,

    /// Plain ASCII image description
    #[serde(rename = "ImageDescription", skip_serializing_if = "Option::is_none")]
    pub image_description: Option<String>,
}

impl PickedExif {
    /// Check whether any field was picked
    pub fn is_empty(&self) -> bool {
        self.xp_keywords.is_none()
            && self.date_time_original.is_none()
            && self.create_date.is_none()
            && self.xp_title.is_none()
            && self.xp_subject.is_none()
            && self.xp_comment.is_none()
            && self.image_description.is_none()
    }
}

/// Pick the consumed EXIF fields from an image file.
///
/// Returns `None` when the file can't be opened, carries no EXIF
/// container, or none of the picked fields is present. All of those are
/// normal conditions, not errors.
pub fn read_picked_exif(path: &Path) -> Option<PickedExif> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "could not open file for EXIF");
            return None;
        }
    };

    let mut reader = BufReader::new(&file);
    let exif = Reader::new().read_from_container(&mut reader).ok()?;

    let picked = PickedExif {
        xp_keywords: xp_text(&exif, TAG_XP_KEYWORDS),
        date_time_original: ascii_text(&exif, Tag::DateTimeOriginal),
        create_date: ascii_text(&exif, Tag::DateTimeDigitized),
        xp_title: xp_text(&exif, TAG_XP_TITLE),
        xp_subject: xp_text(&exif, TAG_XP_SUBJECT),
        xp_comment: xp_text(&exif, TAG_XP_COMMENT),
        image_description: ascii_text(&exif, Tag::ImageDescription),
    };

    if picked.is_empty() {
        None
    } else {
        Some(picked)
    }
}

/// Read an ASCII tag as a raw string.
fn ascii_text(exif: &exif::Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match field.value {
        Value::Ascii(ref vec) => {
            let bytes = vec.first()?;
            let text = String::from_utf8_lossy(bytes).trim().to_string();
            if text.is_empty() {
                None
            } else {
                Some(text)
            }
        }
        _ => None,
    }
}

/// Read an `XP*` tag, decoding its UTF-16LE payload.
fn xp_text(exif: &exif::Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match field.value {
        Value::Byte(ref bytes) => decode_xp_text(bytes),
        // Some writers store XP tags as undefined data instead of bytes
        Value::Undefined(ref bytes, _) => decode_xp_text(bytes),
        Value::Ascii(ref vec) => {
            let bytes = vec.first()?;
            let text = String::from_utf8_lossy(bytes).trim().to_string();
            if text.is_empty() {
                None
            } else {
                Some(text)
            }
        }
        _ => None,
    }
}

/// Decode a UTF-16LE byte payload, dropping the NUL terminator.
fn decode_xp_text(bytes: &[u8]) -> Option<String> {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .take_while(|&unit| unit != 0)
        .collect();

    let text = String::from_utf16_lossy(&units).trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16le(s: &str) -> Vec<u8> {
        s.encode_utf16()
            .chain(std::iter::once(0))
            .flat_map(|unit| unit.to_le_bytes())
            .collect()
    }

    #[test]
    fn decode_xp_text_drops_nul_terminator() {
        let bytes = utf16le("sunset; beach");
        assert_eq!(decode_xp_text(&bytes), Some("sunset; beach".to_string()));
    }

    #[test]
    fn decode_xp_text_handles_non_ascii() {
        let bytes = utf16le("城市夜景");
        assert_eq!(decode_xp_text(&bytes), Some("城市夜景".to_string()));
    }

    #[test]
    fn decode_xp_text_empty_payload_is_none() {
        assert_eq!(decode_xp_text(&[]), None);
        assert_eq!(decode_xp_text(&[0, 0]), None);
    }

    #[test]
    fn decode_xp_text_whitespace_only_is_none() {
        let bytes = utf16le("   ");
        assert_eq!(decode_xp_text(&bytes), None);
    }

    #[test]
    fn picked_exif_default_is_empty() {
        assert!(PickedExif::default().is_empty());
        let with_title = PickedExif {
            xp_title: Some("t".into()),
            ..Default::default()
        };
        assert!(!with_title.is_empty());
    }

    #[test]
    fn picked_exif_deserializes_exif_field_names() {
        let json = r#"{"XPKeywords":"a;b","DateTimeOriginal":"2024:01:15 10:00:00"}"#;
        let picked: PickedExif = serde_json::from_str(json).unwrap();
        assert_eq!(picked.xp_keywords.as_deref(), Some("a;b"));
        assert_eq!(
            picked.date_time_original.as_deref(),
            Some("2024:01:15 10:00:00")
        );
        assert!(picked.create_date.is_none());
    }

    #[test]
    fn read_picked_exif_missing_file_is_none() {
        assert!(read_picked_exif(Path::new("/nonexistent/photo.jpg")).is_none());
    }

    #[test]
    fn read_picked_exif_non_image_is_none() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"not an image").unwrap();
        assert!(read_picked_exif(file.path()).is_none());
    }
}
