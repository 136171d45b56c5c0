//! Read-through cache
//!
//! `ReadThroughCache::get` fingerprints the request, asks the store, and on a
//! miss calls the origin and writes the result back with a TTL. The store is
//! best-effort: read failures and undecodable entries are treated as misses,
//! write failures are only logged. The caller sees exactly what the origin
//! would have returned.
//!
//! Concurrent lookups for the same key are not coalesced. Each miss calls the
//! origin on its own, and the later write simply overwrites the earlier one.

use crate::descriptor::RequestDescriptor;
use crate::errors::{ConfigurationError, MalformedEntry};
use crate::fingerprint::{CacheKey, fingerprint};
use crate::origin::Origin;
use crate::params::{CacheParams, DEFAULT_KEY_PREFIX, DEFAULT_TTL_SECONDS, WriteMode};
use crate::store::Store;
use config::CacheConfig;
use serde::de::DeserializeOwned;
use std::sync::Arc;


/// Memoizes origin results in a shared TTL store
pub struct ReadThroughCache<O: Origin> {
    params: CacheParams,
    origin: O,
    write_mode: WriteMode,
}

impl<O: Origin> std::fmt::Debug for ReadThroughCache<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadThroughCache")
            .field("params", &self.params)
            .field("write_mode", &self.write_mode)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ReadThroughCache`]; `store` and `origin` are required
pub struct ReadThroughCacheBuilder<O: Origin> {
    store: Option<Arc<dyn Store>>,
    origin: Option<O>,
    default_ttl: u64,
    key_prefix: String,
    write_mode: WriteMode,
}

impl<O: Origin> Default for ReadThroughCacheBuilder<O> {
    fn default() -> Self {
        Self {
            store: None,
            origin: None,
            default_ttl: DEFAULT_TTL_SECONDS,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            write_mode: WriteMode::default(),
        }
    }
}

impl<O: Origin> ReadThroughCacheBuilder<O> {
    pub fn store(mut self, store: Arc<dyn Store>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn origin(mut self, origin: O) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn default_ttl(mut self, seconds: u64) -> Self {
        self.default_ttl = seconds;
        self
    }

    pub fn key_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    pub fn write_mode(mut self, write_mode: WriteMode) -> Self {
        self.write_mode = write_mode;
        self
    }

    /// Validate the configuration and build the cache
    pub fn build(self) -> Result<ReadThroughCache<O>, ConfigurationError> {
        let store = self.store.ok_or(ConfigurationError::MissingStore)?;
        let origin = self.origin.ok_or(ConfigurationError::MissingOrigin)?;
        let params = CacheParams::new(store, self.default_ttl, &self.key_prefix)?;

        Ok(ReadThroughCache {
            params,
            origin,
            write_mode: self.write_mode,
        })
    }
}

impl<O: Origin> ReadThroughCache<O> {
    pub fn builder() -> ReadThroughCacheBuilder<O> {
        ReadThroughCacheBuilder::default()
    }

    /// Build from the TTL and prefix in `config`
    pub fn from_config(
        store: Arc<dyn Store>,
        origin: O,
        config: &CacheConfig,
    ) -> Result<Self, ConfigurationError> {
        Self::builder()
            .store(store)
            .origin(origin)
            .default_ttl(config.default_ttl)
            .key_prefix(&config.key_prefix)
            .build()
    }

    pub fn params(&self) -> &CacheParams {
        &self.params
    }

    pub fn origin(&self) -> &O {
        &self.origin
    }

    pub fn default_ttl(&self) -> u64 {
        self.params.ttl
    }

    pub fn key_prefix(&self) -> &str {
        &self.params.prefix
    }

    pub fn write_mode(&self) -> WriteMode {
        self.write_mode
    }

    /// Store key this cache uses for `descriptor`
    pub fn fingerprint(&self, descriptor: &RequestDescriptor) -> CacheKey {
        fingerprint(descriptor, &self.params.prefix)
    }

    /// Return the cached result for `descriptor`, or fetch it from the origin and
    /// cache it. Only origin errors are returned.
    pub async fn get(&self, descriptor: &RequestDescriptor) -> Result<O::Output, O::Error> {
        let key = self.fingerprint(descriptor);

        if let Some(value) = self.lookup(&key).await {
            crate::debug_log!(key = %key, "cache hit");
            return Ok(value);
        }

        crate::debug_log!(key = %key, "cache miss, calling origin");
        let value = self.origin.fetch(descriptor).await?;

        let ttl = descriptor.ttl_override().unwrap_or(self.params.ttl);
        self.populate(key, &value, ttl).await;

        Ok(value)
    }

    /// Read and decode the entry under `key`. Every failure is a miss.
    async fn lookup(&self, key: &CacheKey) -> Option<O::Output> {
        match self.params.store.get(key.as_str()).await {
            Ok(Some(raw)) => match decode_entry(key, &raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "discarding malformed cache entry");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::error!(
                    key = %key,
                    unavailable = e.is_unavailable(),
                    error = %e,
                    "problem getting cache entry from store"
                );
                None
            }
        }
    }

    /// Write the origin result back to the store according to the write mode
    async fn populate(&self, key: CacheKey, value: &O::Output, ttl: u64) {
        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(key = %key, error = %e, "unable to serialize origin result");
                return;
            }
        };

        let write = write_entry(Arc::clone(&self.params.store), key, payload, ttl);
        match self.write_mode {
            WriteMode::Background => {
                tokio::spawn(write);
            }
            WriteMode::Inline => write.await,
        }
    }
}

fn decode_entry<T: DeserializeOwned>(key: &CacheKey, raw: &str) -> Result<T, MalformedEntry> {
    match serde_json::from_str::<Option<T>>(raw) {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Err(MalformedEntry::new(key.as_str(), "null payload")),
        Err(e) => Err(MalformedEntry::new(key.as_str(), e.to_string())),
    }
}

async fn write_entry(store: Arc<dyn Store>, key: CacheKey, payload: String, ttl: u64) {
    match store.set_with_expiry(key.as_str(), &payload, ttl).await {
        Ok(()) => tracing::info!(key = %key, ttl, "cached"),
        Err(e) => tracing::error!(
            key = %key,
            unavailable = e.is_unavailable(),
            error = %e,
            "unable to cache entry in store"
        ),
    }
}
