//! `bitcalc.toml` loading.

use bitcalc::{HistoryConfig, Mode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// Failed to read file
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Failed to parse TOML
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// CLI settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    /// Mode used when `--mode` is not given
    pub(crate) mode: Mode,
    /// Maximum history entries kept, 0 for unbounded
    pub(crate) history_limit: usize,
    /// JSON file history is loaded from and saved to
    pub(crate) history_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::Word,
            history_limit: HistoryConfig::default().max_entries,
            history_file: None,
        }
    }
}

impl Config {
    /// Default config file name.
    pub(crate) const CONFIG_FILE: &'static str = "bitcalc.toml";

    /// Parse settings from a TOML string.
    pub(crate) fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load settings from a file.
    pub(crate) fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    /// Load `path`, or [`CONFIG_FILE`](Self::CONFIG_FILE) in the current
    /// directory when no path is given.
    ///
    /// A missing default file yields the defaults; a missing explicit file
    /// is an error.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => {
                let path = Path::new(Self::CONFIG_FILE);
                if path.exists() {
                    Self::load_from_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub(crate) const fn history_config(&self) -> HistoryConfig {
        HistoryConfig {
            max_entries: self.history_limit,
        }
    }
}
