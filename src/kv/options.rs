//! Store configuration.

use serde::{Deserialize, Serialize};

/// Default name of the keyspace holding values.
pub const DEFAULT_KEYSPACE: &str = "data";

/// When mutations become durable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum FlushPolicy {
    /// `put` and `delete` flush before returning success.
    #[default]
    Immediate,
    /// Mutations are visible at once but durable only after
    /// [`KvStore::sync`](super::KvStore::sync) or
    /// [`KvStore::close`](super::KvStore::close).
    Deferred,
}

impl FlushPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Immediate => "immediate",
            Self::Deferred => "deferred",
        }
    }
}

impl std::fmt::Display for FlushPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for opening a fjall-backed store.
///
/// # Example
///
/// ```ignore
/// use typed_kv::{FlushPolicy, KvStore, StoreOptions};
///
/// let options = StoreOptions::default()
///     .flush_policy(FlushPolicy::Deferred)
///     .create_if_missing(false);
/// let store = KvStore::open_with("./data", &options)?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    pub flush_policy: FlushPolicy,
    /// Name of the fjall keyspace holding values.
    pub keyspace: String,
    /// Create the store directory if it does not exist.
    pub create_if_missing: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            flush_policy: FlushPolicy::default(),
            keyspace: DEFAULT_KEYSPACE.to_string(),
            create_if_missing: true,
        }
    }
}

impl StoreOptions {
    pub fn flush_policy(mut self, policy: FlushPolicy) -> Self {
        self.flush_policy = policy;
        self
    }

    pub fn keyspace(mut self, name: impl Into<String>) -> Self {
        self.keyspace = name.into();
        self
    }

    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }
}
