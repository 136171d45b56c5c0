//! Core fetch-cache functionality
//!
//! `ResponseCache` wires configuration, the Redis store and the HTTP origin into
//! a single read-through cache for outbound requests.

use cache_system::{
    CacheKey, ReadThroughCache, RedisStore, RequestDescriptor, Store, StoreError,
};
use config::{AppConfig, CacheConfig, OriginConfig};
use std::sync::Arc;

use crate::errors::FetchCacheError;
use crate::http::{HttpOrigin, HttpOriginError};

/// Read-through cache for HTTP responses
#[derive(Debug)]
pub struct ResponseCache {
    inner: ReadThroughCache<HttpOrigin>,
    redis: Option<RedisStore>,
}

impl ResponseCache {
    /// Build against Redis using a validated configuration
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchCacheError> {
        config.validate()?;

        let redis = RedisStore::new(config.cache.clone())?;
        let origin = HttpOrigin::new(&config.origin)?;
        let inner = ReadThroughCache::from_config(Arc::new(redis.clone()), origin, &config.cache)?;

        Ok(Self {
            inner,
            redis: Some(redis),
        })
    }

    /// Build against Redis at `redis_url` with default TTL, prefix and timeouts
    pub fn connect(redis_url: &str) -> Result<Self, FetchCacheError> {
        Self::from_config(&AppConfig {
            cache: CacheConfig::new(redis_url.to_string()),
            origin: OriginConfig::default(),
        })
    }

    /// Build against any store, taking TTL, prefix and origin settings from `config`
    pub fn with_store(store: Arc<dyn Store>, config: &AppConfig) -> Result<Self, FetchCacheError> {
        let origin = HttpOrigin::new(&config.origin)?;
        let inner = ReadThroughCache::from_config(store, origin, &config.cache)?;

        Ok(Self { inner, redis: None })
    }

    /// Wrap a cache assembled by hand
    pub fn from_parts(inner: ReadThroughCache<HttpOrigin>) -> Self {
        Self { inner, redis: None }
    }

    /// Response body for `descriptor`, from the store when possible
    pub async fn get(&self, descriptor: &RequestDescriptor) -> Result<String, HttpOriginError> {
        self.inner.get(descriptor).await
    }

    pub fn fingerprint(&self, descriptor: &RequestDescriptor) -> CacheKey {
        self.inner.fingerprint(descriptor)
    }

    pub fn inner(&self) -> &ReadThroughCache<HttpOrigin> {
        &self.inner
    }

    /// Check Redis connectivity. Caches built on other stores report `Ok("PONG")`.
    pub async fn ping(&self) -> Result<String, StoreError> {
        match &self.redis {
            Some(redis) => redis.ping().await,
            None => Ok("PONG".to_string()),
        }
    }
}
