//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the gallery build
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Photo discovery events
    Scan(ScanEvent),
    /// Metadata extraction events
    Extract(ExtractEvent),
    /// Build-level events
    Build(BuildEvent),
}

/// Events during photo discovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Scanning has started under the given root
    Started { root: PathBuf },
    /// A photo was found and assigned a storage key
    PhotoFound { key: String },
    /// An error occurred but scanning continues
    Error { path: PathBuf, message: String },
    /// Scanning completed
    Completed { total_photos: usize },
}

/// Events during metadata extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ExtractEvent {
    /// Extraction has started
    Started { total: usize },
    /// Progress update
    Progress(ExtractProgress),
    /// EXIF could not be read for a photo; extraction fell back to the key
    ExifUnavailable { key: String },
    /// Extraction completed
    Completed { total: usize },
}

/// Progress information during extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractProgress {
    /// Number of photos processed so far
    pub completed: usize,
    /// Total number of photos
    pub total: usize,
    /// Storage key currently being processed
    pub current_key: String,
}

/// Build-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BuildEvent {
    /// The build has started
    Started,
    /// The manifest was written to disk
    ManifestWritten { path: PathBuf, photo_count: usize },
    /// The build finished
    Completed { duration_ms: u64 },
}
