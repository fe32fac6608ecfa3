use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Administrator credential override.
///
/// When unset, the built-in administrator identity is used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminOverride {
    /// Login email for the administrator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// argon2id PHC string replacing the built-in secret.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
}

/// Desk configuration: where data lives and who the administrator is.
///
/// Loaded from `~/.brokerdesk/config.toml` by the CLI; `--data-dir` on the
/// command line replaces `data_dir`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeskConfig {
    /// Directory holding the database file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Path to the redb database file.
    /// Defaults to `{data_dir}/desk.redb` if not specified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,

    #[serde(default)]
    pub admin: AdminOverride,
}

impl DeskConfig {
    /// Default config file path: ~/.brokerdesk/config.toml.
    pub fn default_path() -> PathBuf {
        home_dir().join(".brokerdesk").join("config.toml")
    }

    /// Load config from disk, or return the default if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve the data directory, falling back to `~/.brokerdesk/data`.
    pub fn resolve_data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| home_dir().join(".brokerdesk").join("data"))
    }

    /// Resolve the redb database path, falling back to `{data_dir}/desk.redb`.
    pub fn resolve_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| self.resolve_data_dir().join("desk.redb"))
    }
}

fn home_dir() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home)
}
