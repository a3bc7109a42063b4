//! Typed key-value store module.
//!
//! [`KvStore`] is the facade callers use. It talks to storage through the
//! [`Engine`] trait; [`FjallEngine`] is the persistent implementation and
//! [`MemoryEngine`] a non-durable one for tests.

pub mod codec;
mod engine;
mod error;
mod fjall_engine;
mod memory;
mod options;
mod store;

pub use codec::{CodecError, PAYLOAD_VERSION};
pub use engine::{Engine, KeyIter};
pub use error::{EngineFailure, KvError};
pub use fjall_engine::FjallEngine;
pub use memory::{MemoryEngine, MemoryEngineError};
pub use options::{DEFAULT_KEYSPACE, FlushPolicy, StoreOptions};
pub use store::{KvStore, MAX_KEY_LEN};
