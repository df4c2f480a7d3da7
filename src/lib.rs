//! # Gallery Builder
//!
//! The build-side engine of a static photo gallery: turns storage keys and
//! picked EXIF metadata into the display metadata the gallery front end
//! consumes, and packages the results into a manifest.
//!
//! ## Core Philosophy
//! - **Total extraction** - a storage key always yields complete metadata;
//!   missing or broken EXIF is a fallback, never a failure
//! - **Explicit inputs** - the storage prefix is passed in, not read from
//!   ambient state, so extraction stays a pure function of its arguments
//! - **Observable decisions** - every fallback branch taken is logged
//!
//! ## Architecture
//! The library is split into a build engine (UI-agnostic) and a thin CLI:
//! - `core` - extraction, EXIF picking, scanning, manifest assembly
//! - `config` - user configuration (site name, storage prefix)
//! - `events` - event-driven progress reporting (GUI-ready)
//! - `error` - error types for the fallible edges (config, scan, manifest)

pub mod config;
pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use crate::config::{StorageConfig, UserConfig};
pub use crate::core::exif::PickedExif;
pub use crate::core::extractor::{PhotoInfo, PhotoInfoExtractor};
pub use crate::core::manifest::{BuildResult, Manifest, ManifestBuilder};
pub use crate::error::{GalleryError, Result};

/// Initialize tracing for the library
///
/// This should be called by the application entry point (CLI or GUI).
/// Logs go to stderr so they never interleave with manifest output.
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
