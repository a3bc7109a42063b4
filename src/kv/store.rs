//! Typed KV store facade.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::logging::{debug, error, info, trace, warn};

use super::codec::{self, CodecError};
use super::engine::Engine;
use super::error::{KvError, display_key};
use super::fjall_engine::FjallEngine;
use super::options::{FlushPolicy, StoreOptions};

/// Longest key accepted by `put`, in bytes.
pub const MAX_KEY_LEN: usize = u16::MAX as usize;

/// A typed key-value store over an embedded engine.
///
/// `KvStore` serializes values of any `serde` type into self-describing
/// payloads, maps engine failures onto [`KvError`], and applies a
/// [`FlushPolicy`] fixed at open time.
///
/// # Example
///
/// ```ignore
/// use typed_kv::KvStore;
///
/// let store = KvStore::open(".typed-kv")?;
///
/// store.put("key", "value")?;
/// let value: String = store.get("key")?;
/// assert_eq!(value, "value");
///
/// store.delete("key")?;
/// assert!(store.delete("key").unwrap_err().is_not_found());
///
/// store.close()?;
/// ```
///
/// # Concurrency
///
/// The store holds no locks of its own; it is `Send + Sync` whenever the
/// engine is, and can be shared between threads behind an `Arc`. Ordering
/// of concurrent operations on one key is decided by the engine.
///
/// # Durability
///
/// With [`FlushPolicy::Immediate`], `put` and `delete` flush the engine
/// before returning. If that flush fails they return [`KvError::Sync`]:
/// the mutation is already visible to readers but may not survive a
/// crash. It is not rolled back. With [`FlushPolicy::Deferred`],
/// durability is reached only through [`sync`](Self::sync) or
/// [`close`](Self::close).
pub struct KvStore<E: Engine = FjallEngine> {
    engine: E,
    flush_policy: FlushPolicy,
}

impl KvStore<FjallEngine> {
    /// Open a fjall-backed store at `path` with default options,
    /// creating it if needed.
    ///
    /// The store owns the directory until it is closed or dropped.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, KvError> {
        Self::open_with(path, &StoreOptions::default())
    }

    /// Open a fjall-backed store at `path` with explicit options.
    pub fn open_with(path: impl AsRef<Path>, options: &StoreOptions) -> Result<Self, KvError> {
        let engine = FjallEngine::open(path, options)?;
        Ok(Self::with_engine(engine, options.flush_policy))
    }
}

impl<E: Engine> KvStore<E> {
    /// Wrap an already open engine.
    pub fn with_engine(engine: E, flush_policy: FlushPolicy) -> Self {
        info!(policy = %flush_policy, "KV store ready");
        Self {
            engine,
            flush_policy,
        }
    }

    pub fn flush_policy(&self) -> FlushPolicy {
        self.flush_policy
    }

    /// Borrow the underlying engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// Fails with [`KvError::InvalidKey`] for an empty or over-long key and
    /// with [`KvError::BadValue`] for an absent value, in both cases without
    /// touching storage.
    pub fn put<K, T>(&self, key: K, value: &T) -> Result<(), KvError>
    where
        K: AsRef<[u8]>,
        T: Serialize + ?Sized,
    {
        let key = key.as_ref();
        validate_key(key)?;

        let payload = codec::encode(value).map_err(|e| match e {
            CodecError::AbsentValue => {
                warn!(key = %display_key(key), "rejected absent value");
                KvError::BadValue
            }
            other => KvError::Encode(other),
        })?;
        debug!(key = %display_key(key), payload_len = payload.len(), "putting value");

        self.engine.put(key, &payload).map_err(|e| {
            error!(key = %display_key(key), error = %e, "write failed");
            KvError::Write(Box::new(e))
        })?;

        self.flush_after_write(key)
    }

    /// Fetch and decode the value stored under `key`.
    ///
    /// An absent key is [`KvError::NotFound`]; a payload that cannot be
    /// decoded as `T` is [`KvError::Decode`].
    pub fn get<K, T>(&self, key: K) -> Result<T, KvError>
    where
        K: AsRef<[u8]>,
        T: DeserializeOwned,
    {
        let key = key.as_ref();
        let payload = self.load(key)?;

        codec::decode(&payload).map_err(|e| {
            warn!(key = %display_key(key), error = %e, "stored payload did not decode");
            KvError::Decode {
                key: display_key(key),
                source: e,
            }
        })
    }

    /// Fetch `key` into an optional out-parameter.
    ///
    /// With `None` this only checks that the key exists; nothing is
    /// decoded. With `Some(out)`, `out` is overwritten only on success.
    pub fn get_into<K, T>(&self, key: K, out: Option<&mut T>) -> Result<(), KvError>
    where
        K: AsRef<[u8]>,
        T: DeserializeOwned,
    {
        match out {
            None => self.load(key.as_ref()).map(|_| ()),
            Some(out) => {
                *out = self.get(key)?;
                Ok(())
            }
        }
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: impl AsRef<[u8]>) -> Result<bool, KvError> {
        match self.load(key.as_ref()) {
            Ok(_) => Ok(true),
            Err(KvError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Remove `key`.
    ///
    /// Deleting an absent key is [`KvError::NotFound`], not a no-op.
    pub fn delete(&self, key: impl AsRef<[u8]>) -> Result<(), KvError> {
        let key = key.as_ref();
        debug!(key = %display_key(key), "deleting value");

        self.load(key)?;
        self.engine.delete(key).map_err(|e| {
            error!(key = %display_key(key), error = %e, "delete failed");
            KvError::Write(Box::new(e))
        })?;

        self.flush_after_write(key)
    }

    /// Iterate over every key in the store, in engine order.
    ///
    /// The sequence is lazy and finite. Calling `keys` again starts a
    /// fresh pass over the store as it is then.
    pub fn keys(&self) -> impl Iterator<Item = Result<Vec<u8>, KvError>> + '_ {
        trace!("iterating keys");
        self.engine
            .keys()
            .map(|k| k.map_err(|e| KvError::Read(Box::new(e))))
    }

    /// Iterate over the keys starting with `prefix`.
    pub fn scan_keys(
        &self,
        prefix: impl AsRef<[u8]>,
    ) -> impl Iterator<Item = Result<Vec<u8>, KvError>> + '_ {
        let prefix = prefix.as_ref();
        trace!(prefix = %display_key(prefix), "scanning prefix");
        self.engine
            .prefix(prefix)
            .map(|k| k.map_err(|e| KvError::Read(Box::new(e))))
    }

    /// Call `visitor` for every key starting with `prefix`.
    ///
    /// Stops at the first error from `visitor` and returns it unchanged.
    /// Matching no keys is success.
    ///
    /// ```ignore
    /// let mut users = Vec::new();
    /// store.scan("user/", |key| {
    ///     users.push(key.to_vec());
    ///     Ok::<_, KvError>(())
    /// })?;
    /// ```
    pub fn scan<P, F, VErr>(&self, prefix: P, mut visitor: F) -> Result<(), VErr>
    where
        P: AsRef<[u8]>,
        F: FnMut(&[u8]) -> Result<(), VErr>,
        VErr: From<KvError>,
    {
        for key in self.scan_keys(prefix) {
            let key = key?;
            visitor(&key)?;
        }
        Ok(())
    }

    /// Make every prior mutation durable.
    pub fn sync(&self) -> Result<(), KvError> {
        debug!("syncing store");
        self.engine.flush().map_err(|e| {
            error!(error = %e, "sync failed");
            KvError::Sync(Box::new(e))
        })
    }

    /// Flush and release the engine.
    ///
    /// Consumes the store, so nothing can use it afterwards. A store shared
    /// through an `Arc` must be unwrapped first, which also guarantees no
    /// other operation is in flight.
    pub fn close(self) -> Result<(), KvError> {
        debug!(policy = %self.flush_policy, "closing KV store");
        self.engine.close().map_err(|e| {
            error!(error = %e, "close failed");
            KvError::Close(Box::new(e))
        })?;
        info!("KV store closed");
        Ok(())
    }

    // Helper methods

    fn load(&self, key: &[u8]) -> Result<Vec<u8>, KvError> {
        // Keys `put` would reject can never be present.
        if validate_key(key).is_err() {
            return Err(KvError::not_found(key));
        }

        match self.engine.get(key) {
            Ok(Some(payload)) => Ok(payload),
            Ok(None) => {
                trace!(key = %display_key(key), "key not found");
                Err(KvError::not_found(key))
            }
            Err(e) => {
                error!(key = %display_key(key), error = %e, "read failed");
                Err(KvError::Read(Box::new(e)))
            }
        }
    }

    #[cfg_attr(not(feature = "logging"), allow(unused_variables))]
    fn flush_after_write(&self, key: &[u8]) -> Result<(), KvError> {
        if self.flush_policy == FlushPolicy::Deferred {
            return Ok(());
        }

        self.engine.flush().map_err(|e| {
            error!(
                key = %display_key(key),
                error = %e,
                "flush after write failed, outcome unknown"
            );
            KvError::Sync(Box::new(e))
        })
    }
}

fn validate_key(key: &[u8]) -> Result<(), KvError> {
    if key.is_empty() {
        return Err(KvError::InvalidKey("key must not be empty".to_string()));
    }
    if key.len() > MAX_KEY_LEN {
        return Err(KvError::InvalidKey(format!(
            "key is {} bytes, limit is {}",
            key.len(),
            MAX_KEY_LEN
        )));
    }
    Ok(())
}
