//! Cache parameter configuration
//!
//! This module defines the immutable configuration a read-through cache is
//! built with: the store handle, the default TTL and the key prefix.

use crate::errors::ConfigurationError;
use crate::store::Store;
use std::sync::Arc;

pub use config::{DEFAULT_KEY_PREFIX, DEFAULT_TTL_SECONDS};

/// How the store write after an origin fetch is carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Spawn the write on the runtime and return without waiting for it
    #[default]
    Background,
    /// Await the write before returning. Its outcome is still ignored.
    Inline,
}

/// Store handle, default TTL and key prefix, fixed at construction
#[derive(Clone)]
pub struct CacheParams {
    /// The backing store
    pub store: Arc<dyn Store>,
    /// TTL in seconds for entries whose request carries no override
    pub ttl: u64,
    /// Prefix for cache keys
    pub prefix: String,
}

impl std::fmt::Debug for CacheParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheParams")
            .field("ttl", &self.ttl)
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl CacheParams {
    pub fn new(store: Arc<dyn Store>, ttl: u64, prefix: &str) -> Result<Self, ConfigurationError> {
        if ttl == 0 {
            return Err(ConfigurationError::InvalidTtl(ttl));
        }
        if prefix.is_empty() {
            return Err(ConfigurationError::EmptyPrefix);
        }

        Ok(Self {
            store,
            ttl,
            prefix: prefix.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    #[test]
    fn test_valid_params() {
        let params = CacheParams::new(Arc::new(MemoryStore::new()), 123, "request:").unwrap();
        assert_eq!(params.ttl, 123);
        assert_eq!(params.prefix, "request:");
    }

    #[test]
    fn test_invalid_params() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());

        assert_eq!(
            CacheParams::new(store.clone(), 0, "cache:").unwrap_err(),
            ConfigurationError::InvalidTtl(0)
        );
        assert_eq!(
            CacheParams::new(store, 300, "").unwrap_err(),
            ConfigurationError::EmptyPrefix
        );
    }
}
