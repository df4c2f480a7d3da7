//! # Extractor Module
//!
//! Derives display metadata for a photo from its storage key and picked
//! EXIF record.
//!
//! ## Fallback Chains
//! Three independent, ordered chains; the first source that yields a
//! usable value wins:
//! - **Tags**: `XPKeywords` (split on `;`) → directory segments of the
//!   key, relative to the storage prefix → empty
//! - **Capture time**: `DateTimeOriginal` → `CreateDate` → a
//!   `YYYY-MM-DD` substring of the title → the clock at resolution time
//! - **Description**: `XPTitle` → `XPSubject` → `XPComment` →
//!   `ImageDescription` → empty (never the title)
//!
//! Extraction is total: any input pair resolves to a complete
//! [`PhotoInfo`]. Unparseable date values are logged and skipped, never
//! raised.

use crate::config::StorageConfig;
use crate::core::exif::PickedExif;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::{info, warn};

static FILENAME_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").unwrap());

/// Display metadata for one photo.
///
/// Always fully populated; `date_taken` being a typed timestamp makes
/// "valid ISO-8601" a property of the type rather than a runtime check
/// (it serializes as RFC 3339).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoInfo {
    /// Base name of the key without its extension
    pub title: String,
    /// Best-available capture time
    #[serde(rename = "dateTaken")]
    pub date_taken: DateTime<Utc>,
    /// Ordered display tags (may be empty)
    pub tags: Vec<String>,
    /// Best-available human text (may be empty)
    pub description: String,
}

/// Resolves photo metadata against a fixed storage prefix.
///
/// Stateless apart from the prefix captured at construction; invocations
/// are independent and safe to run in parallel.
pub struct PhotoInfoExtractor {
    prefix: String,
}

impl PhotoInfoExtractor {
    /// Create an extractor for the given storage settings.
    pub fn new(storage: &StorageConfig) -> Self {
        Self {
            prefix: storage.prefix.clone(),
        }
    }

    /// Extract metadata for a storage key, using the wall clock for the
    /// last-resort capture time.
    pub fn extract(&self, key: &str, exif: Option<&PickedExif>) -> PhotoInfo {
        self.extract_at(key, exif, Utc::now())
    }

    /// Extract metadata with an explicit clock.
    ///
    /// `now` is only consulted when every other capture-time source
    /// fails, which keeps extraction deterministic under test.
    pub fn extract_at(
        &self,
        key: &str,
        exif: Option<&PickedExif>,
        now: DateTime<Utc>,
    ) -> PhotoInfo {
        info!(key, "extracting photo info");

        let title = title_from_key(key);
        let tags = self.resolve_tags(key, exif);
        let date_taken = resolve_date_taken(key, &title, exif, now);
        let description = resolve_description(exif);

        PhotoInfo {
            title,
            date_taken,
            tags,
            description,
        }
    }

    /// Tag chain: EXIF keywords first, storage path second.
    fn resolve_tags(&self, key: &str, exif: Option<&PickedExif>) -> Vec<String> {
        if let Some(keywords) = exif.and_then(|e| e.xp_keywords.as_deref()) {
            // A present keyword field claims the chain even when it
            // splits to nothing, matching the gallery's contract.
            if !keywords.is_empty() {
                let tags = split_segments(keywords, ';');
                info!(key, ?tags, "tags from EXIF XPKeywords");
                return tags;
            }
        }

        let Some(dir) = key_dirname(key) else {
            return Vec::new();
        };

        let prefix = self.prefix.strip_suffix('/').unwrap_or(&self.prefix);
        let relative = if !prefix.is_empty() && dir.starts_with(prefix) {
            &dir[prefix.len()..]
        } else {
            dir
        };

        let tags = split_segments(relative, '/');
        if !tags.is_empty() {
            info!(key, ?tags, "tags from storage path");
        }
        tags
    }
}

/// Capture-time chain. A present-but-unparseable EXIF value logs a
/// warning and advances to the next source.
fn resolve_date_taken(
    key: &str,
    title: &str,
    exif: Option<&PickedExif>,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    if let Some(raw) = exif.and_then(|e| e.date_time_original.as_deref()) {
        match parse_datetime(raw) {
            Some(date) => {
                info!(key, "using EXIF DateTimeOriginal as capture time");
                return date;
            }
            None => warn!(key, value = raw, "unparseable EXIF DateTimeOriginal"),
        }
    }

    if let Some(raw) = exif.and_then(|e| e.create_date.as_deref()) {
        match parse_datetime(raw) {
            Some(date) => {
                info!(key, value = raw, "using EXIF CreateDate as capture time");
                return date;
            }
            None => warn!(key, value = raw, "unparseable EXIF CreateDate"),
        }
    }

    if let Some(date) = date_from_title(title) {
        info!(key, "capture time taken from file name");
        return date;
    }

    now
}

/// Description chain: first candidate that is non-empty after trimming.
fn resolve_description(exif: Option<&PickedExif>) -> String {
    let Some(exif) = exif else {
        return String::new();
    };

    [
        exif.xp_title.as_deref(),
        exif.xp_subject.as_deref(),
        exif.xp_comment.as_deref(),
        exif.image_description.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .find(|text| !text.is_empty())
    .map(str::to_string)
    .unwrap_or_default()
}

/// Base name of a key without its final extension.
///
/// A leading dot is part of the name, not an extension separator:
/// `".hidden"` stays `".hidden"`.
fn title_from_key(key: &str) -> String {
    let name = key.rsplit('/').next().unwrap_or(key);
    match name.rfind('.') {
        Some(idx) if idx > 0 => name[..idx].to_string(),
        _ => name.to_string(),
    }
}

/// Directory portion of a storage key, or `None` when there is no
/// meaningful directory (bare file name, or only a leading slash).
fn key_dirname(key: &str) -> Option<&str> {
    match key.rfind('/') {
        None | Some(0) => None,
        Some(idx) => Some(&key[..idx]),
    }
}

/// Split on a separator, trim each segment, drop empties.
fn split_segments(raw: &str, separator: char) -> Vec<String> {
    raw.split(separator)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a raw EXIF date-like string.
///
/// Accepts RFC 3339 (with or without offset), camera formats like
/// `"2024:01:15 18:21:09"` with `-`/`/` separator variants and optional
/// fractional seconds, and bare dates (resolved to midnight). Values
/// without an offset are taken as UTC so build output is independent of
/// the build machine's timezone.
fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim().trim_matches('"');
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }

    let normalized = trimmed.replace(['-', '/'], ":");
    for format in ["%Y:%m:%d %H:%M:%S", "%Y:%m:%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&normalized, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    let date_part = normalized.split_whitespace().next()?;
    let date = NaiveDate::parse_from_str(date_part, "%Y:%m:%d").ok()?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

/// First `YYYY-MM-DD` substring of the title that is a real calendar
/// date, at UTC midnight. The pattern matches anywhere in the title;
/// digit runs that aren't valid dates (month 13 and the like) are
/// skipped.
fn date_from_title(title: &str) -> Option<DateTime<Utc>> {
    for candidate in FILENAME_DATE.find_iter(title) {
        if let Ok(date) = NaiveDate::parse_from_str(candidate.as_str(), "%Y-%m-%d") {
            return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
        }
    }
    None
}
