//! Common test utilities and fixtures.
//!
//! Shared value types, store constructors, and an engine that fails on
//! demand for exercising error paths.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};
use tempfile::TempDir;
use thiserror::Error;
use typed_kv::kv::{Engine, KeyIter, MemoryEngine, MemoryEngineError};
use typed_kv::{FjallEngine, FlushPolicy, KvStore, StoreOptions};

// =============================================================================
// Value Types
// =============================================================================

/// A structure holding a reference to a sequence of numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Numbers {
    pub numbers: Option<Box<Vec<i64>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Athlete {
    pub name: String,
    pub country: String,
    pub records: Vec<Record>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub event: String,
    pub seconds: f64,
    pub year: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f64 },
    Rect(u32, u32),
    Empty,
}

/// World records keyed by event.
pub fn world_records() -> HashMap<String, String> {
    [
        ("100 meters", "Florence GRIFFITH-JOYNER"),
        ("200 meters", "Florence GRIFFITH-JOYNER"),
        ("400 meters", "Marie-José PÉREC"),
        ("800 meters", "Nadezhda OLIZARENKO"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

pub fn sample_athlete() -> Athlete {
    Athlete {
        name: "Marie-José Pérec".to_string(),
        country: "FRA".to_string(),
        records: vec![
            Record {
                event: "200m".to_string(),
                seconds: 21.99,
                year: 1993,
            },
            Record {
                event: "400m".to_string(),
                seconds: 48.25,
                year: 1996,
            },
        ],
    }
}

// =============================================================================
// Store Fixtures
// =============================================================================

/// A fjall-backed store in a temporary directory.
///
/// The directory is removed when the fixture is dropped.
pub struct TestStore {
    pub store: KvStore<FjallEngine>,
    pub dir: TempDir,
}

impl TestStore {
    pub fn new() -> anyhow::Result<Self> {
        Self::with_policy(FlushPolicy::Immediate)
    }

    pub fn with_policy(policy: FlushPolicy) -> anyhow::Result<Self> {
        let dir = TempDir::new()?;
        let options = StoreOptions::default().flush_policy(policy);
        let store = KvStore::open_with(dir.path().join("store"), &options)?;
        Ok(Self { store, dir })
    }
}

pub fn memory_store(policy: FlushPolicy) -> KvStore<MemoryEngine> {
    KvStore::with_engine(MemoryEngine::new(), policy)
}

/// Collect every key of a store as UTF-8 strings, sorted.
pub fn sorted_keys<E: Engine>(store: &KvStore<E>) -> anyhow::Result<Vec<String>> {
    let mut keys = store
        .keys()
        .map(|k| -> anyhow::Result<String> { Ok(String::from_utf8(k?)?) })
        .collect::<anyhow::Result<Vec<_>>>()?;
    keys.sort();
    Ok(keys)
}

// =============================================================================
// Fault Injection
// =============================================================================

#[derive(Error, Debug)]
pub enum FlakyError {
    #[error("injected write failure")]
    Write,
    #[error("injected flush failure")]
    Flush,
    #[error("injected read failure")]
    Read,
    #[error(transparent)]
    Memory(#[from] MemoryEngineError),
}

/// A [`MemoryEngine`] whose operations can be made to fail.
#[derive(Default)]
pub struct FlakyEngine {
    inner: MemoryEngine,
    pub fail_writes: AtomicBool,
    pub fail_flushes: AtomicBool,
    pub fail_reads: AtomicBool,
    pub flushes: AtomicUsize,
}

impl FlakyEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(flag: &AtomicBool, on: bool) {
        flag.store(on, Ordering::SeqCst);
    }

    pub fn flush_count(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }

    pub fn raw_get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.inner.get(key).ok().flatten()
    }

    pub fn raw_put(&self, key: &[u8], value: &[u8]) -> Result<(), FlakyError> {
        Ok(self.inner.put(key, value)?)
    }
}

impl Engine for FlakyEngine {
    type Error = FlakyError;

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, FlakyError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(FlakyError::Read);
        }
        Ok(self.inner.get(key)?)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), FlakyError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(FlakyError::Write);
        }
        Ok(self.inner.put(key, value)?)
    }

    fn delete(&self, key: &[u8]) -> Result<(), FlakyError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(FlakyError::Write);
        }
        Ok(self.inner.delete(key)?)
    }

    fn flush(&self) -> Result<(), FlakyError> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        if self.fail_flushes.load(Ordering::SeqCst) {
            return Err(FlakyError::Flush);
        }
        Ok(self.inner.flush()?)
    }

    fn keys(&self) -> KeyIter<'_, FlakyError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Box::new(std::iter::once(Err(FlakyError::Read)));
        }
        Box::new(self.inner.keys().map(|k| k.map_err(FlakyError::from)))
    }

    fn prefix(&self, prefix: &[u8]) -> KeyIter<'_, FlakyError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Box::new(std::iter::once(Err(FlakyError::Read)));
        }
        Box::new(self.inner.prefix(prefix).map(|k| k.map_err(FlakyError::from)))
    }

    fn close(self) -> Result<(), FlakyError> {
        if self.fail_flushes.load(Ordering::SeqCst) {
            return Err(FlakyError::Flush);
        }
        Ok(self.inner.close()?)
    }
}
