//! Configuration for a todo list manager session.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::remote::DEFAULT_REMOTE_URL;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Invalid configuration values.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set to something that does not parse.
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Variable name
        key: &'static str,
        /// Offending value
        value: String,
    },
}

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Directory of the file-backed key-value store
    pub data_dir: PathBuf,
    /// Page size of the paginated view (at least 1)
    pub items_per_page: usize,
    /// Remote source settings
    pub remote: RemoteConfig,
}

/// Remote source settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// `false` selects the local-only manager
    pub enabled: bool,
    /// Collection URL for hydration and mirroring
    pub url: String,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".todolist"),
            items_per_page: 10,
            remote: RemoteConfig {
                enabled: true,
                url: DEFAULT_REMOTE_URL.to_string(),
            },
        }
    }
}

impl ManagerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `TODOLIST_DATA_DIR` | `.todolist` |
    /// | `TODOLIST_ITEMS_PER_PAGE` | `10` |
    /// | `TODOLIST_REMOTE_ENABLED` | `true` |
    /// | `TODOLIST_REMOTE_URL` | the public demo API |
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a variable is set but
    /// unparsable, or when the page size is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`from_env`](Self::from_env).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let data_dir = lookup("TODOLIST_DATA_DIR").map_or(defaults.data_dir, PathBuf::from);

        let items_per_page = match lookup("TODOLIST_ITEMS_PER_PAGE") {
            Some(value) => match value.trim().parse::<usize>() {
                Ok(n) if n >= 1 => n,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "TODOLIST_ITEMS_PER_PAGE",
                        value,
                    });
                },
            },
            None => defaults.items_per_page,
        };

        let enabled = match lookup("TODOLIST_REMOTE_ENABLED") {
            Some(value) => parse_flag(&value).ok_or(ConfigError::InvalidValue {
                key: "TODOLIST_REMOTE_ENABLED",
                value,
            })?,
            None => defaults.remote.enabled,
        };

        let url = lookup("TODOLIST_REMOTE_URL").unwrap_or(defaults.remote.url);

        Ok(Self {
            data_dir,
            items_per_page,
            remote: RemoteConfig { enabled, url },
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
