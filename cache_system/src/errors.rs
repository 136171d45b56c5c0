//! Error types for cache operations
//!
//! Only configuration errors ever reach a caller of the cache. Store and
//! payload errors are absorbed by the read-through path and logged.

use thiserror::Error;

/// Invalid or missing construction argument. Raised synchronously by the builder.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("a backing store is required")]
    MissingStore,

    #[error("an origin fetcher is required")]
    MissingOrigin,

    #[error("Invalid TTL value: {0}")]
    InvalidTtl(u64),

    #[error("key prefix cannot be empty")]
    EmptyPrefix,
}

/// Failure of a backing store read or write
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Redis connection error: {0}")]
    ConnectionError(#[from] redis::RedisError),

    #[error("Connection pool error: {0}")]
    Connection(String),

    #[error("Store operation timeout: {0}")]
    Timeout(&'static str),

    #[error("Invalid TTL value: {0}")]
    InvalidTtl(u64),
}

/// A stored payload that could not be decoded into the origin's output type
#[derive(Error, Debug)]
#[error("malformed cache entry under {key}: {reason}")]
pub struct MalformedEntry {
    pub key: String,
    pub reason: String,
}

impl MalformedEntry {
    pub fn new(key: &str, reason: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl StoreError {
    /// Whether the store could not be reached at all (as opposed to rejecting a command)
    pub fn is_unavailable(&self) -> bool {
        match self {
            StoreError::ConnectionError(e) => {
                e.is_io_error() || e.is_connection_dropped() || e.is_connection_refusal()
            }
            StoreError::Connection(_) | StoreError::Timeout(_) => true,
            StoreError::InvalidTtl(_) => false,
        }
    }
}
