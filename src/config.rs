//! Command-line configuration parsing.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::kv::{DEFAULT_KEYSPACE, FlushPolicy, StoreOptions};

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "typed-kv.toml";

/// Default store directory.
pub const DEFAULT_STORE_PATH: &str = ".typed-kv";

/// Configuration loaded from a TOML file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Store settings.
    pub store: StoreConfig,
    /// Log subscriber settings.
    pub logging: LoggingConfig,
}

/// Where the store lives and how it flushes.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path to the store directory.
    pub path: PathBuf,
    pub flush_policy: FlushPolicy,
    pub keyspace: String,
    pub create_if_missing: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_STORE_PATH),
            flush_policy: FlushPolicy::default(),
            keyspace: DEFAULT_KEYSPACE.to_string(),
            create_if_missing: true,
        }
    }
}

impl StoreConfig {
    /// Options to open the store with.
    pub fn options(&self) -> StoreOptions {
        StoreOptions::default()
            .flush_policy(self.flush_policy)
            .keyspace(self.keyspace.clone())
            .create_if_missing(self.create_if_missing)
    }
}

/// Output format for log events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Log subscriber settings. `RUST_LOG`, when set, overrides `level`.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `"warn"` or `"typed_kv=debug"`.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e))?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Parse)
    }

    /// Load `path` if given, else [`DEFAULT_CONFIG_FILE`] if it exists,
    /// else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(DEFAULT_CONFIG_FILE)
            }
            None => Ok(Self::default()),
        }
    }
}

/// Configuration error.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{0}': {1}")]
    Io(String, #[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}
