//! Configuration file handling.
//!
//! # Configuration Format
//!
//! ```toml
//! [store]
//! url = "redis://localhost:6379"  # use a Redis server instead of memory
//! snapshot_path = "stacks.json"  # loaded at startup, saved on exit
//! initial_capacity = 1024        # keys preallocated in the in-memory store
//!
//! [logging]
//! level = "warn"                 # overridden by RUST_LOG
//!
//! [shell]
//! prompt = "stacks> "
//! history_file = ".stacks_history"
//! ```
//!
//! Every section and key is optional; a missing file means all defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "stacks.toml";

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Offending file
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The file is not valid configuration TOML.
    #[error("invalid configuration in {path}: {source}")]
    Parse {
        /// Offending file
        path: PathBuf,
        /// Underlying error
        source: toml::de::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StacksConfig {
    /// Store settings
    pub store: StoreConfig,
    /// Logging settings
    pub logging: LoggingConfig,
    /// Interactive shell settings
    pub shell: ShellConfig,
}

/// `[store]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Redis server to use; none runs on the in-memory store
    pub url: Option<String>,
    /// Snapshot file of the in-memory store, ignored with `url` restored at startup and written on exit
    pub snapshot_path: Option<PathBuf>,
    /// Keys preallocated in the in-memory store
    pub initial_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            snapshot_path: None,
            initial_capacity: 1024,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// `[shell]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShellConfig {
    /// Prompt shown before each line
    pub prompt: String,
    /// Persistent line history; none keeps history in memory only
    pub history_file: Option<PathBuf>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            history_file: None,
        }
    }
}

impl StacksConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Load configuration from `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text, path)
    }

    /// Load `path` if it exists, otherwise return the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = StacksConfig::default();
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.store.initial_capacity, 1024);
        assert!(config.store.snapshot_path.is_none());
        assert!(config.store.url.is_none());
        assert_eq!(config.shell.prompt, "> ");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = StacksConfig::from_toml(
            "[store]\nsnapshot_path = \"library.json\"\n",
            Path::new("stacks.toml"),
        )
        .unwrap();
        assert_eq!(
            config.store.snapshot_path,
            Some(PathBuf::from("library.json"))
        );
        assert_eq!(config.store.initial_capacity, 1024);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_redis_url() {
        let config = StacksConfig::from_toml(
            "[store]\nurl = \"redis://127.0.0.1:6379/2\"\n",
            Path::new("stacks.toml"),
        )
        .unwrap();
        assert_eq!(config.store.url.as_deref(), Some("redis://127.0.0.1:6379/2"));
        assert!(config.store.snapshot_path.is_none());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = StacksConfig::from_toml("[store]\nsnapshot = 1\n", Path::new("stacks.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("stacks.toml"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stacks.toml");
        fs::write(
            &path,
            "[logging]\nlevel = \"debug\"\n\n[shell]\nprompt = \"stacks> \"\n",
        )
        .unwrap();

        let config = StacksConfig::load(&path).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.shell.prompt, "stacks> ");
    }

    #[test]
    fn test_missing_file_means_defaults() {
        let dir = TempDir::new().unwrap();
        let config = StacksConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, StacksConfig::default());
        assert!(StacksConfig::load(&dir.path().join("absent.toml")).is_err());
    }
}
