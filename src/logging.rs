//! Conditional logging macros for library-level tracing.
//!
//! With the `logging` feature the macros forward to `tracing`, so events
//! carry structured fields (`key`, `path`, `policy`, ...). Without it they
//! expand to nothing and their arguments are never evaluated.
//!
//! ```rust,ignore
//! use crate::logging::{debug, error};
//!
//! debug!(key = %display_key(key), payload_len = payload.len(), "putting value");
//! ```

#[cfg(feature = "logging")]
macro_rules! kv_trace {
    ($($arg:tt)*) => { tracing::trace!($($arg)*) }
}

#[cfg(not(feature = "logging"))]
macro_rules! kv_trace {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "logging")]
macro_rules! kv_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) }
}

#[cfg(not(feature = "logging"))]
macro_rules! kv_debug {
    ($($arg:tt)*) => {};
}

/// Store lifecycle: open, ready, closed.
#[cfg(feature = "logging")]
macro_rules! kv_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) }
}

#[cfg(not(feature = "logging"))]
macro_rules! kv_info {
    ($($arg:tt)*) => {};
}

/// Caller mistakes and undecodable payloads.
#[cfg(feature = "logging")]
macro_rules! kv_warn {
    ($($arg:tt)*) => { tracing::warn!($($arg)*) }
}

#[cfg(not(feature = "logging"))]
macro_rules! kv_warn {
    ($($arg:tt)*) => {};
}

/// Engine failures about to be returned.
#[cfg(feature = "logging")]
macro_rules! kv_error {
    ($($arg:tt)*) => { tracing::error!($($arg)*) }
}

#[cfg(not(feature = "logging"))]
macro_rules! kv_error {
    ($($arg:tt)*) => {};
}

pub(crate) use kv_debug as debug;
pub(crate) use kv_error as error;
pub(crate) use kv_info as info;
pub(crate) use kv_trace as trace;
pub(crate) use kv_warn as warn;
