//! Convenience re-exports for common cache-system usage

// Core cache system components
pub use crate::descriptor::RequestDescriptor;
pub use crate::errors::{ConfigurationError, MalformedEntry, StoreError};
pub use crate::fingerprint::{CacheKey, fingerprint};
pub use crate::memory::MemoryStore;
pub use crate::origin::Origin;
pub use crate::params::{CacheParams, WriteMode};
pub use crate::read_through::{ReadThroughCache, ReadThroughCacheBuilder};
pub use crate::redis_store::RedisStore;
pub use crate::store::Store;

// Re-export centralized config
pub use config::CacheConfig;

// Common external dependencies
pub use async_trait::async_trait;
pub use redis;
pub use serde::{Deserialize, Serialize};
pub use serde_json;
pub use tokio;
