//! Error types for the KV store module.

use thiserror::Error;

use super::codec::CodecError;

/// Boxed engine error, kept intact as the `source` of the facade error.
pub type EngineFailure = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur during KV store operations.
///
/// The set is closed and does not depend on which [`Engine`](super::Engine)
/// backs the store. Engine failures are wrapped, never retried or swallowed.
#[derive(Error, Debug)]
pub enum KvError {
    /// An absent value (`None`, `()`) was passed to `put`.
    #[error("Bad value: absent values cannot be stored")]
    BadValue,

    /// The key is empty or longer than [`MAX_KEY_LEN`](super::MAX_KEY_LEN).
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Key not found: {0}")]
    NotFound(String),

    #[error("Failed to encode value: {0}")]
    Encode(#[source] CodecError),

    /// The key exists but its payload cannot be materialized as the
    /// requested type.
    #[error("Failed to decode value for key '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: CodecError,
    },

    #[error("Failed to open store at {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: EngineFailure,
    },

    #[error("Read failed: {0}")]
    Read(#[source] EngineFailure),

    #[error("Write failed: {0}")]
    Write(#[source] EngineFailure),

    /// The durability flush failed. When this follows a successful write
    /// the write is visible to readers but not confirmed durable.
    #[error("Sync failed, write outcome unknown: {0}")]
    Sync(#[source] EngineFailure),

    #[error("Close failed: {0}")]
    Close(#[source] EngineFailure),
}

impl KvError {
    pub(crate) fn not_found(key: &[u8]) -> Self {
        Self::NotFound(display_key(key))
    }

    /// Returns `true` if the key was absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns `true` if the stored payload could not be decoded.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// Returns `true` if the mutation may or may not have become durable.
    ///
    /// Callers must treat this as "write outcome unknown", not as
    /// "write failed".
    pub fn is_outcome_unknown(&self) -> bool {
        matches!(self, Self::Sync(_))
    }
}

/// Render a key for messages and log fields.
pub(crate) fn display_key(key: &[u8]) -> String {
    String::from_utf8_lossy(key).into_owned()
}
