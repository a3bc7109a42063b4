//! In-memory engine for tests and throwaway stores.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;

use super::engine::{Engine, KeyIter};

/// Errors from [`MemoryEngine`].
#[derive(Error, Debug)]
pub enum MemoryEngineError {
    /// A thread panicked while holding the map lock.
    #[error("memory engine lock poisoned")]
    Poisoned,
}

/// A non-durable [`Engine`] holding everything in a `BTreeMap`.
///
/// `flush` is a no-op; nothing survives the process. Key iteration takes
/// a snapshot of the matching keys at call time.
#[derive(Debug, Default)]
pub struct MemoryEngine {
    entries: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> Result<usize, MemoryEngineError> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, MemoryEngineError> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<Vec<u8>, Vec<u8>>>, MemoryEngineError> {
        self.entries.read().map_err(|_| MemoryEngineError::Poisoned)
    }

    fn write(
        &self,
    ) -> Result<RwLockWriteGuard<'_, BTreeMap<Vec<u8>, Vec<u8>>>, MemoryEngineError> {
        self.entries.write().map_err(|_| MemoryEngineError::Poisoned)
    }

    fn snapshot<F>(&self, keep: F) -> KeyIter<'_, MemoryEngineError>
    where
        F: Fn(&[u8]) -> bool,
    {
        match self.read() {
            Ok(entries) => {
                let keys: Vec<Vec<u8>> = entries
                    .keys()
                    .filter(|k| keep(k.as_slice()))
                    .cloned()
                    .collect();
                Box::new(keys.into_iter().map(Ok))
            }
            Err(e) => Box::new(std::iter::once(Err(e))),
        }
    }
}

impl Engine for MemoryEngine {
    type Error = MemoryEngineError;

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, MemoryEngineError> {
        Ok(self.read()?.get(key).cloned())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), MemoryEngineError> {
        self.write()?.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<(), MemoryEngineError> {
        self.write()?.remove(key);
        Ok(())
    }

    fn flush(&self) -> Result<(), MemoryEngineError> {
        Ok(())
    }

    fn keys(&self) -> KeyIter<'_, MemoryEngineError> {
        self.snapshot(|_| true)
    }

    fn prefix(&self, prefix: &[u8]) -> KeyIter<'_, MemoryEngineError> {
        self.snapshot(|k| k.starts_with(prefix))
    }

    fn close(self) -> Result<(), MemoryEngineError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn put_get_delete() {
        let engine = MemoryEngine::new();
        assert!(engine.is_empty().unwrap());

        engine.put(b"a", b"1").unwrap();
        engine.put(b"a", b"2").unwrap();
        assert_eq!(engine.get(b"a").unwrap(), Some(b"2".to_vec()));
        assert_eq!(engine.len().unwrap(), 1);

        engine.delete(b"a").unwrap();
        engine.delete(b"a").unwrap();
        assert_eq!(engine.get(b"a").unwrap(), None);
    }

    #[test]
    fn prefix_is_a_snapshot() {
        let engine = MemoryEngine::new();
        for key in ["user/1", "user/2", "group/1"] {
            engine.put(key.as_bytes(), b"x").unwrap();
        }

        let iter = engine.prefix(b"user/");
        engine.put(b"user/3", b"x").unwrap();

        let keys: Vec<Vec<u8>> = iter.collect::<Result<_, _>>().unwrap();
        assert_eq!(keys, vec![b"user/1".to_vec(), b"user/2".to_vec()]);
        assert_eq!(engine.keys().count(), 4);
    }
}
