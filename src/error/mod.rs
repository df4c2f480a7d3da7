//! # Error Module
//!
//! Error types for the fallible edges of the builder.
//!
//! ## Design Principles
//! - **Extraction never fails** - metadata extraction is total; only
//!   configuration loading, scanning, and manifest output can error
//! - **Include context** - paths, file names, what went wrong
//! - **Never panic** on user data - return errors instead

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),
}

/// Errors that occur while loading user configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Failed to read configuration {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors that occur while scanning the photo directory
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Photo directory not found: {path}")]
    RootNotFound { path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },
}

/// Errors that occur while writing the gallery manifest
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write manifest {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience result type used throughout the crate
pub type Result<T> = std::result::Result<T, GalleryError>;
