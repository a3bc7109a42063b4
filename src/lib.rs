//! A typed facade over an embedded log-structured key-value store.
//!
//! typed-kv stores any `serde` value under a string or byte key. Values are
//! written as self-describing MessagePack payloads to a fjall database, and
//! every failure is reported through one closed error enum, [`KvError`].
//!
//! # Quick Start
//!
//! ```ignore
//! use typed_kv::prelude::*;
//!
//! #[derive(Serialize, Deserialize)]
//! struct Session {
//!     user: String,
//!     scopes: Vec<String>,
//! }
//!
//! let store = KvStore::open(".typed-kv")?;
//! store.put("session/42", &Session { user: "ada".into(), scopes: vec![] })?;
//!
//! let session: Session = store.get("session/42")?;
//! store.scan("session/", |key| {
//!     println!("{}", String::from_utf8_lossy(key));
//!     Ok::<_, KvError>(())
//! })?;
//! store.close()?;
//! ```
//!
//! # Modules
//!
//! - [`kv`] - The store facade, engines and payload codec
//! - [`config`] - TOML configuration for the binary (requires `cli` feature)
//! - [`subscriber`] - Log subscriber setup (requires `cli` feature)
//!
//! # Feature Flags
//!
//! - `logging` - Enable library-level tracing (consumers provide their own subscriber)
//! - `cli` - Enable the command-line binary
//! - `full` - Enable all features

mod logging;

#[cfg(feature = "cli")]
pub mod config;
pub mod kv;
pub mod prelude;
#[cfg(feature = "cli")]
pub mod subscriber;

mod error;

// Re-export the unified error type
pub use error::{Error, Result};

// Re-export KV types at crate root for convenience
pub use kv::{
    Engine, FjallEngine, FlushPolicy, KvError, KvStore, MAX_KEY_LEN, MemoryEngine, StoreOptions,
};
