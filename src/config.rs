//! Configuration
//!
//! Settings come from three layers, lowest precedence first: built-in
//! defaults, an optional JSON file, and command-line overrides. The default
//! file lives in the system's standard configuration directory.

use crate::catalog_source::PodcastApi;
use crate::query::DEFAULT_PAGE_SIZE;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const CONFIG_FILE_NAME: &str = "config.json";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to determine the configuration directory location
    #[error("Failed to determine configuration directory location")]
    ConfigDirectoryNotFound,

    /// Failed to read the configuration file
    #[error("Failed to read config file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON or has unexpected fields
    #[error("Failed to parse config file {path}: {source}")]
    ParseFailed {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A setting has an unusable value
    #[error("Invalid configuration: {0}")]
    InvalidValue(String),
}

/// One layer of settings; unset fields leave lower layers in effect
///
/// This is both the shape of the JSON file and of command-line overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigLayer {
    pub api_base_url: Option<String>,
    pub page_size: Option<usize>,
    pub request_timeout_secs: Option<u64>,
    pub verbose: Option<bool>,
}

/// Effective settings for a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root of the podcast API
    pub api_base_url: String,
    /// Shows per page, fixed for the session
    pub page_size: usize,
    /// Timeout applied to every HTTP request
    pub request_timeout: Duration,
    /// Enables diagnostic logging
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: PodcastApi::DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            verbose: false,
        }
    }
}

impl Config {
    /// Location of the default configuration file
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let proj_dirs = directories::ProjectDirs::from("app", "podcast-directory", "podcast-directory")
            .ok_or(ConfigError::ConfigDirectoryNotFound)?;
        Ok(proj_dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Loads the effective configuration
    ///
    /// With an explicit `path` the file must exist. Without one, the default
    /// file is used if present; a missing default file (or configuration
    /// directory) is not an error.
    ///
    /// # Arguments
    ///
    /// * `path` - Explicit configuration file, e.g. from `--config`
    /// * `overrides` - Command-line settings, applied last
    pub fn load(path: Option<&Path>, overrides: &ConfigLayer) -> Result<Self, ConfigError> {
        let file_layer = match path {
            Some(path) => Some(read_layer(path)?),
            None => match Self::default_path() {
                Ok(path) if path.is_file() => Some(read_layer(&path)?),
                _ => None,
            },
        };

        let mut config = Self::default();
        if let Some(layer) = &file_layer {
            config.apply(layer);
        }
        config.apply(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Overwrites every setting the layer defines
    pub fn apply(&mut self, layer: &ConfigLayer) {
        if let Some(url) = &layer.api_base_url {
            self.api_base_url = url.clone();
        }
        if let Some(page_size) = layer.page_size {
            self.page_size = page_size;
        }
        if let Some(secs) = layer.request_timeout_secs {
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(verbose) = layer.verbose {
            self.verbose = verbose;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::InvalidValue(
                "page_size must be at least 1".to_string(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://"))
        {
            return Err(ConfigError::InvalidValue(format!(
                "api_base_url must be an http(s) URL, got '{}'",
                self.api_base_url
            )));
        }
        Ok(())
    }
}

/// Reads one configuration layer from a JSON file
fn read_layer(path: &Path) -> Result<ConfigLayer, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    serde_json::from_str(&content).map_err(|e| ConfigError::ParseFailed {
        path: path.to_path_buf(),
        source: e,
    })
}
