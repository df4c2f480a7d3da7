//! # Scanner Module
//!
//! Discovers photo files under a local directory and assigns each one
//! its storage key.
//!
//! The gallery addresses photos by key, not by file system path: a file
//! at `<root>/2024-trip/japan/photo.jpg` with storage prefix `"albums/"`
//! gets the key `"albums/2024-trip/japan/photo.jpg"`. Keys always use
//! `/` separators regardless of platform.
//!
//! ## Supported Formats
//! jpg/jpeg, png, webp, heic/heif, gif, bmp, tiff/tif - overridable via
//! [`ScanConfig::extensions`].

use crate::config::StorageConfig;
use crate::error::ScanError;
use crate::events::{Event, EventSender, ScanEvent};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;
use walkdir::WalkDir;

/// A discovered photo file
#[derive(Debug, Clone)]
pub struct PhotoFile {
    /// Path on the local file system
    pub path: PathBuf,
    /// Storage key the gallery will use for this photo
    pub key: String,
    /// File size in bytes
    pub size: u64,
    /// Last modified time
    pub modified: SystemTime,
}

/// Configuration for the directory scanner
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
    /// Whether to include hidden files and directories
    pub include_hidden: bool,
    /// Maximum directory depth (None = unlimited)
    pub max_depth: Option<usize>,
    /// Custom extensions to include (None = use defaults)
    pub extensions: Option<Vec<String>>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            include_hidden: false,
            max_depth: None,
            extensions: None,
        }
    }
}

/// Result of a scan
#[derive(Debug)]
pub struct ScanResult {
    /// Discovered photos, ordered by key
    pub photos: Vec<PhotoFile>,
    /// Non-fatal errors encountered along the way
    pub errors: Vec<ScanError>,
}

/// Extension-based image filter
struct ImageFilter {
    extensions: HashSet<String>,
}

impl ImageFilter {
    fn new(custom: Option<&[String]>) -> Self {
        let defaults = [
            "jpg", "jpeg", "png", "webp", "heic", "heif", "gif", "bmp", "tiff", "tif",
        ];
        let extensions = match custom {
            Some(list) => list.iter().map(|e| e.to_lowercase()).collect(),
            None => defaults.iter().map(|e| e.to_string()).collect(),
        };
        Self { extensions }
    }

    fn is_image(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.contains(&e.to_lowercase()))
            .unwrap_or(false)
    }
}

/// Walks a photo directory and derives storage keys
pub struct PhotoWalker {
    config: ScanConfig,
    filter: ImageFilter,
    prefix: String,
}

impl PhotoWalker {
    /// Create a walker for the given scan and storage settings.
    pub fn new(config: ScanConfig, storage: &StorageConfig) -> Self {
        let filter = ImageFilter::new(config.extensions.as_deref());
        Self {
            config,
            filter,
            prefix: storage.prefix.clone(),
        }
    }

    /// Scan a root directory without progress reporting.
    pub fn scan(&self, root: &Path) -> Result<ScanResult, ScanError> {
        self.scan_with_events(root, &crate::events::null_sender())
    }

    /// Scan a root directory, emitting scan events as photos are found.
    ///
    /// Per-entry failures are collected in the result; only a missing
    /// root aborts the scan.
    pub fn scan_with_events(
        &self,
        root: &Path,
        events: &EventSender,
    ) -> Result<ScanResult, ScanError> {
        if !root.is_dir() {
            return Err(ScanError::RootNotFound {
                path: root.to_path_buf(),
            });
        }

        events.send(Event::Scan(ScanEvent::Started {
            root: root.to_path_buf(),
        }));

        let mut photos = Vec::new();
        let mut errors = Vec::new();

        let mut walker = WalkDir::new(root).follow_links(self.config.follow_symlinks);
        if let Some(depth) = self.config.max_depth {
            walker = walker.max_depth(depth);
        }

        let include_hidden = self.config.include_hidden;
        let entries = walker
            .into_iter()
            .filter_entry(move |entry| include_hidden || entry.depth() == 0 || !is_hidden(entry.path()));

        for entry_result in entries {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(|p| p.to_path_buf()).unwrap_or_default();
                    let error = match e.io_error().map(|io| io.kind()) {
                        Some(std::io::ErrorKind::PermissionDenied) => {
                            ScanError::PermissionDenied { path: path.clone() }
                        }
                        _ => ScanError::Read {
                            path: path.clone(),
                            source: std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
                        },
                    };
                    events.send(Event::Scan(ScanEvent::Error {
                        path,
                        message: error.to_string(),
                    }));
                    errors.push(error);
                    continue;
                }
            };

            let path = entry.path();
            if path.is_dir() || !self.filter.is_image(path) {
                continue;
            }

            let Some(key) = self.storage_key(root, path) else {
                debug!(path = %path.display(), "skipping file with non-unicode path");
                continue;
            };

            match fs::metadata(path) {
                Ok(metadata) => {
                    events.send(Event::Scan(ScanEvent::PhotoFound { key: key.clone() }));
                    photos.push(PhotoFile {
                        path: path.to_path_buf(),
                        key,
                        size: metadata.len(),
                        modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
                    });
                }
                Err(source) => {
                    let error = ScanError::Read {
                        path: path.to_path_buf(),
                        source,
                    };
                    events.send(Event::Scan(ScanEvent::Error {
                        path: path.to_path_buf(),
                        message: error.to_string(),
                    }));
                    errors.push(error);
                }
            }
        }

        // Key order keeps manifests stable across platforms
        photos.sort_by(|a, b| a.key.cmp(&b.key));

        events.send(Event::Scan(ScanEvent::Completed {
            total_photos: photos.len(),
        }));

        Ok(ScanResult { photos, errors })
    }

    /// Storage key for a file: prefix + `/`-joined path relative to root.
    fn storage_key(&self, root: &Path, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(root).ok()?;
        let segments: Option<Vec<&str>> = relative
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect();
        let relative = segments?.join("/");

        let prefix = self.prefix.trim_end_matches('/');
        if prefix.is_empty() {
            Some(relative)
        } else {
            Some(format!("{prefix}/{relative}"))
        }
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn walker(prefix: &str) -> PhotoWalker {
        PhotoWalker::new(
            ScanConfig::default(),
            &StorageConfig {
                prefix: prefix.to_string(),
            },
        )
    }

    fn create_photo(dir: &Path, name: &str) {
        let path = dir.join(name);
        let mut file = File::create(path).unwrap();
        // Minimal JPEG header is enough for the extension filter
        file.write_all(&[0xFF, 0xD8, 0xFF, 0xE0]).unwrap();
    }

    #[test]
    fn scan_empty_directory_finds_nothing() {
        let temp = TempDir::new().unwrap();
        let result = walker("albums/").scan(temp.path()).unwrap();
        assert!(result.photos.is_empty());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn scan_missing_root_is_an_error() {
        let err = walker("").scan(Path::new("/nonexistent/photos")).unwrap_err();
        assert!(matches!(err, ScanError::RootNotFound { .. }));
    }

    #[test]
    fn keys_carry_prefix_and_slash_separators() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("2024-trip").join("japan");
        fs::create_dir_all(&nested).unwrap();
        create_photo(&nested, "photo.jpg");

        let result = walker("albums/").scan(temp.path()).unwrap();
        assert_eq!(result.photos.len(), 1);
        assert_eq!(result.photos[0].key, "albums/2024-trip/japan/photo.jpg");
    }

    #[test]
    fn empty_prefix_yields_bare_relative_keys() {
        let temp = TempDir::new().unwrap();
        create_photo(temp.path(), "photo.png");

        let result = walker("").scan(temp.path()).unwrap();
        assert_eq!(result.photos[0].key, "photo.png");
    }

    #[test]
    fn non_images_are_filtered_out() {
        let temp = TempDir::new().unwrap();
        create_photo(temp.path(), "photo.jpg");
        File::create(temp.path().join("notes.txt")).unwrap();
        File::create(temp.path().join("movie.mp4")).unwrap();

        let result = walker("").scan(temp.path()).unwrap();
        assert_eq!(result.photos.len(), 1);
    }

    #[test]
    fn hidden_entries_are_skipped_by_default() {
        let temp = TempDir::new().unwrap();
        create_photo(temp.path(), "visible.jpg");
        create_photo(temp.path(), ".hidden.jpg");
        let hidden_dir = temp.path().join(".thumbnails");
        fs::create_dir(&hidden_dir).unwrap();
        create_photo(&hidden_dir, "thumb.jpg");

        let result = walker("").scan(temp.path()).unwrap();
        assert_eq!(result.photos.len(), 1);
        assert_eq!(result.photos[0].key, "visible.jpg");
    }

    #[test]
    fn hidden_entries_can_be_included() {
        let temp = TempDir::new().unwrap();
        create_photo(temp.path(), "visible.jpg");
        create_photo(temp.path(), ".hidden.jpg");

        let config = ScanConfig {
            include_hidden: true,
            ..Default::default()
        };
        let walker = PhotoWalker::new(config, &StorageConfig::default());
        let result = walker.scan(temp.path()).unwrap();
        assert_eq!(result.photos.len(), 2);
    }

    #[test]
    fn photos_come_back_in_key_order() {
        let temp = TempDir::new().unwrap();
        create_photo(temp.path(), "b.jpg");
        create_photo(temp.path(), "a.jpg");
        create_photo(temp.path(), "c.jpg");

        let result = walker("").scan(temp.path()).unwrap();
        let keys: Vec<_> = result.photos.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["a.jpg", "b.jpg", "c.jpg"]);
    }

    #[test]
    fn custom_extensions_override_defaults() {
        let temp = TempDir::new().unwrap();
        create_photo(temp.path(), "photo.jpg");
        create_photo(temp.path(), "raw.cr2");

        let config = ScanConfig {
            extensions: Some(vec!["cr2".to_string()]),
            ..Default::default()
        };
        let walker = PhotoWalker::new(config, &StorageConfig::default());
        let result = walker.scan(temp.path()).unwrap();
        assert_eq!(result.photos.len(), 1);
        assert_eq!(result.photos[0].key, "raw.cr2");
    }
}
