//! The byte-level storage engine behind [`KvStore`](super::KvStore).

/// A lazy sequence of keys produced by an engine.
pub type KeyIter<'a, E> = Box<dyn Iterator<Item = Result<Vec<u8>, E>> + 'a>;

/// An embedded, byte-oriented key-value engine.
///
/// The store relies on implementations for all concurrency control and
/// crash consistency:
///
/// - single-key `get`/`put`/`delete` are linearizable, so a successful
///   `put` is visible to any later `get` from any thread;
/// - concurrent writers to one key never leave a torn value behind;
/// - `keys` and `prefix` reflect a consistent view no older than the call.
///
/// Ordering of keys is engine-defined.
pub trait Engine: Send + Sync {
    /// Engine-specific error, surfaced as the source of a
    /// [`KvError`](super::KvError).
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch the value stored under `key`, if any.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Store `value` under `key`, replacing any existing value.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), Self::Error>;

    /// Remove `key`. Removing an absent key is not an error at this level.
    fn delete(&self, key: &[u8]) -> Result<(), Self::Error>;

    /// Durability barrier: every prior mutation survives a crash once
    /// this returns `Ok`.
    fn flush(&self) -> Result<(), Self::Error>;

    /// All keys currently stored.
    fn keys(&self) -> KeyIter<'_, Self::Error>;

    /// All keys starting with `prefix`.
    fn prefix(&self, prefix: &[u8]) -> KeyIter<'_, Self::Error>;

    /// Release the engine.
    fn close(self) -> Result<(), Self::Error>
    where
        Self: Sized;
}
