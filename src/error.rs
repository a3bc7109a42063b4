//! Unified error type for the typed-kv crate.
//!
//! Library calls return [`KvError`] directly. Applications that also load
//! configuration or set up logging can use [`Error`] throughout.

use thiserror::Error;

#[cfg(feature = "cli")]
use crate::config::ConfigError;
use crate::kv::KvError;
#[cfg(feature = "cli")]
use crate::subscriber::LoggingError;

/// Unified error type for all typed-kv operations.
///
/// # Example
///
/// ```ignore
/// use typed_kv::{KvStore, Result};
///
/// fn record_visit(path: &str) -> Result<()> {
///     let store = KvStore::open(path)?;
///     let visits: u64 = store.get("visits").unwrap_or(0);
///     store.put("visits", &(visits + 1))?;
///     store.close()?;
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// Error from key-value store operations.
    #[error(transparent)]
    Kv(#[from] KvError),

    /// Error loading configuration.
    #[cfg(feature = "cli")]
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Error installing the log subscriber.
    #[cfg(feature = "cli")]
    #[error(transparent)]
    Logging(#[from] LoggingError),

    /// Value given on the command line is not valid JSON.
    #[cfg(feature = "cli")]
    #[error("Invalid JSON value: {0}")]
    Json(#[from] serde_json::Error),
}

/// A [`Result`] type alias using the unified [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns `true` if this is a KV store error.
    pub fn is_kv(&self) -> bool {
        matches!(self, Self::Kv(_))
    }

    /// Returns `true` if this wraps [`KvError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Kv(e) if e.is_not_found())
    }
}
