//! Read-through cache over a shared TTL store
//!
//! This crate memoizes origin results behind a content-derived key. Redis is the
//! production store; an in-memory store is provided for development and tests.

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod descriptor;
pub mod errors;
pub mod fingerprint;
pub mod memory;
pub mod origin;
pub mod params;
pub mod prelude;
pub mod read_through;
pub mod redis_store;
pub mod store;

// Re-export centralized config
pub use config::CacheConfig;

pub use descriptor::RequestDescriptor;
pub use errors::{ConfigurationError, MalformedEntry, StoreError};
pub use fingerprint::{CacheKey, fingerprint};
pub use memory::MemoryStore;
pub use origin::Origin;
pub use params::{CacheParams, WriteMode};
pub use read_through::{ReadThroughCache, ReadThroughCacheBuilder};
pub use redis_store::RedisStore;
pub use store::Store;
