//! Convenient re-exports for common usage patterns.
//!
//! ```ignore
//! use typed_kv::prelude::*;
//!
//! let store = KvStore::open_with(".typed-kv", &StoreOptions::default())?;
//! store.put("p1", &(10, 20))?;
//! ```

// Unified error handling
pub use crate::error::{Error, Result};

// Store and engines
pub use crate::kv::{
    Engine, FjallEngine, FlushPolicy, KvError, KvStore, MemoryEngine, StoreOptions,
};

// Derives for stored value types
pub use serde::{Deserialize, Serialize};
