//! Backing store contract
//!
//! The cache only needs plain get and set-with-expiry. Entries expire inside the
//! store; nothing here tracks age or deletes keys.

use crate::errors::StoreError;
use async_trait::async_trait;
use std::sync::Arc;

/// Shared key-value store with expiring entries
#[async_trait]
pub trait Store: Send + Sync {
    /// Fetch the raw payload stored under `key`, if any
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, expiring after `ttl_seconds`
    async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: u64,
    ) -> Result<(), StoreError>;
}

#[async_trait]
impl<S: Store + ?Sized> Store for Arc<S> {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key).await
    }

    async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: u64,
    ) -> Result<(), StoreError> {
        (**self).set_with_expiry(key, value, ttl_seconds).await
    }
}
