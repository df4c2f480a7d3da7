//! # Config Module
//!
//! User configuration for the gallery build.
//!
//! The builder reads a single `config.json` at startup. Only the fields
//! the build engine needs are modeled here; unknown fields are ignored so
//! the same file can carry front-end settings (theme, social links, ...).

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Storage settings shared by every photo in the deployment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Common path prefix under which all photos live (e.g. `"albums/"`).
    /// May be empty when photos sit at the bucket root.
    #[serde(default)]
    pub prefix: String,
}

/// Top-level user configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserConfig {
    /// Gallery display name, embedded in the manifest
    #[serde(default)]
    pub name: String,

    /// Storage settings
    #[serde(default)]
    pub storage: StorageConfig,
}

impl UserConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn load_reads_name_and_prefix() {
        let file = write_config(r#"{"name":"My Gallery","storage":{"prefix":"albums/"}}"#);
        let config = UserConfig::load(file.path()).unwrap();
        assert_eq!(config.name, "My Gallery");
        assert_eq!(config.storage.prefix, "albums/");
    }

    #[test]
    fn load_ignores_unknown_fields() {
        let file = write_config(
            r#"{"name":"g","storage":{"prefix":"p/","bucket":"b"},"social":{"github":"x"}}"#,
        );
        let config = UserConfig::load(file.path()).unwrap();
        assert_eq!(config.storage.prefix, "p/");
    }

    #[test]
    fn load_defaults_missing_fields() {
        let file = write_config("{}");
        let config = UserConfig::load(file.path()).unwrap();
        assert_eq!(config.name, "");
        assert_eq!(config.storage.prefix, "");
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let err = UserConfig::load(Path::new("/nonexistent/config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn load_invalid_json_is_parse_error() {
        let file = write_config("{not json");
        let err = UserConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
