//! # Manifest Module
//!
//! Assembles the gallery manifest: the single JSON artifact the front
//! end loads to render the gallery.
//!
//! ## Build Stages
//! 1. **Scan** - discover photos under the root and derive storage keys
//! 2. **Extract** - pick EXIF and resolve display metadata per photo
//! 3. **Write** - sort newest-first and emit pretty JSON
//!
//! ## Parallelism
//! Extraction is stateless per photo, so stage 2 fans out with rayon.

use crate::config::UserConfig;
use crate::core::exif::{read_picked_exif, PickedExif};
use crate::core::extractor::{PhotoInfo, PhotoInfoExtractor};
use crate::core::scanner::{PhotoWalker, ScanConfig};
use crate::error::{ManifestError, Result};
use crate::events::{
    null_sender, BuildEvent, Event, EventSender, ExtractEvent, ExtractProgress,
};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::info;

/// Manifest schema version, bumped on breaking shape changes
pub const MANIFEST_VERSION: &str = "v1";

/// The gallery manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Schema version
    pub version: String,
    /// Gallery display name from user configuration
    pub name: String,
    /// Build timestamp
    #[serde(rename = "generatedAt")]
    pub generated_at: DateTime<Utc>,
    /// Photo entries, newest capture first
    pub photos: Vec<ManifestPhoto>,
}

/// One photo entry in the manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestPhoto {
    /// Storage key
    pub key: String,
    /// Resolved display metadata
    #[serde(flatten)]
    pub info: PhotoInfo,
    /// File size in bytes
    pub size: u64,
    /// File modification time, the front end's fallback ordering hint
    #[serde(rename = "lastModified")]
    pub last_modified: DateTime<Utc>,
    /// The picked EXIF record, kept for front-end reinterpretation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exif: Option<PickedExif>,
}

/// Result of a manifest build
#[derive(Debug)]
pub struct BuildResult {
    /// The assembled manifest
    pub manifest: Manifest,
    /// Non-fatal errors encountered (unreadable files, scan failures)
    pub errors: Vec<String>,
    /// Wall-clock build duration
    pub duration_ms: u64,
}

/// Configures and runs a gallery build
pub struct ManifestBuilder {
    root: PathBuf,
    config: UserConfig,
    scan_config: ScanConfig,
    manifest_path: Option<PathBuf>,
}

impl ManifestBuilder {
    /// Create a builder for the given photo directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config: UserConfig::default(),
            scan_config: ScanConfig::default(),
            manifest_path: None,
        }
    }

    /// Use the given user configuration (gallery name, storage prefix).
    pub fn config(mut self, config: UserConfig) -> Self {
        self.config = config;
        self
    }

    /// Override scanner settings.
    pub fn scan_config(mut self, scan_config: ScanConfig) -> Self {
        self.scan_config = scan_config;
        self
    }

    /// Write the manifest to this path after assembly.
    ///
    /// Without it the manifest is only returned in the [`BuildResult`].
    pub fn manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = Some(path.into());
        self
    }

    /// Run the build without progress reporting.
    pub fn run(&self) -> Result<BuildResult> {
        self.run_with_events(&null_sender())
    }

    /// Run the build, emitting progress events.
    pub fn run_with_events(&self, events: &EventSender) -> Result<BuildResult> {
        let started = Instant::now();
        events.send(Event::Build(BuildEvent::Started));

        let walker = PhotoWalker::new(self.scan_config.clone(), &self.config.storage);
        let scan = walker.scan_with_events(&self.root, events)?;
        let errors: Vec<String> = scan.errors.iter().map(ToString::to_string).collect();

        let extractor = PhotoInfoExtractor::new(&self.config.storage);
        let total = scan.photos.len();
        events.send(Event::Extract(ExtractEvent::Started { total }));

        let counter = AtomicUsize::new(0);
        let mut photos: Vec<ManifestPhoto> = scan
            .photos
            .par_iter()
            .map(|photo| {
                let exif = read_picked_exif(&photo.path);
                if exif.is_none() {
                    events.send(Event::Extract(ExtractEvent::ExifUnavailable {
                        key: photo.key.clone(),
                    }));
                }

                let info = extractor.extract(&photo.key, exif.as_ref());

                let completed = counter.fetch_add(1, Ordering::Relaxed) + 1;
                events.send(Event::Extract(ExtractEvent::Progress(ExtractProgress {
                    completed,
                    total,
                    current_key: photo.key.clone(),
                })));

                ManifestPhoto {
                    key: photo.key.clone(),
                    info,
                    size: photo.size,
                    last_modified: DateTime::<Utc>::from(photo.modified),
                    exif,
                }
            })
            .collect();

        events.send(Event::Extract(ExtractEvent::Completed { total }));

        // Newest capture first, key as tiebreak so output is stable
        photos.sort_by(|a, b| {
            b.info
                .date_taken
                .cmp(&a.info.date_taken)
                .then_with(|| a.key.cmp(&b.key))
        });

        let manifest = Manifest {
            version: MANIFEST_VERSION.to_string(),
            name: self.config.name.clone(),
            generated_at: Utc::now(),
            photos,
        };

        if let Some(path) = &self.manifest_path {
            write_manifest(&manifest, path)?;
            events.send(Event::Build(BuildEvent::ManifestWritten {
                path: path.clone(),
                photo_count: manifest.photos.len(),
            }));
        }

        let duration_ms = started.elapsed().as_millis() as u64;
        events.send(Event::Build(BuildEvent::Completed { duration_ms }));
        info!(
            photos = manifest.photos.len(),
            duration_ms, "gallery build finished"
        );

        Ok(BuildResult {
            manifest,
            errors,
            duration_ms,
        })
    }
}

/// Serialize a manifest as pretty JSON and write it to disk.
pub fn write_manifest(manifest: &Manifest, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(manifest).map_err(ManifestError::Serialize)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| ManifestError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }

    fs::write(path, json).map_err(|source| ManifestError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(())
}
