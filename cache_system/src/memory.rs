//! In-process store
//!
//! Useful for local development and tests. Expired entries are dropped lazily
//! when read.

use crate::errors::StoreError;
use crate::store::Store;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

struct MemoryEntry {
    value: String,
    expires_at: Instant,
}

/// Thread-safe store with per-entry TTL expiration
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, MemoryEntry>>,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entry_count = self
            .entries
            .try_read()
            .map(|entries| entries.len())
            .ok();

        f.debug_struct("MemoryStore")
            .field("entries", &entry_count)
            .finish()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) entries
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|entry| entry.expires_at > now)
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Remaining lifetime of a live entry
    pub async fn ttl_of(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .get(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.expires_at - now)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.expires_at > Instant::now() => {
                    return Ok(Some(entry.value.clone()));
                }
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // Entry expired, remove it unless a writer refreshed it meanwhile
        let mut entries = self.entries.write().await;
        if entries
            .get(key)
            .is_some_and(|entry| entry.expires_at <= Instant::now())
        {
            crate::trace_log!(key, "dropping expired entry");
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: u64,
    ) -> Result<(), StoreError> {
        if ttl_seconds == 0 {
            return Err(StoreError::InvalidTtl(ttl_seconds));
        }

        let expires_at = Instant::now()
            .checked_add(Duration::from_secs(ttl_seconds))
            .ok_or(StoreError::InvalidTtl(ttl_seconds))?;

        let entry = MemoryEntry {
            value: value.to_string(),
            expires_at,
        };
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_then_get() {
        let store = MemoryStore::new();
        store.set_with_expiry("cache:abc", "\"hello\"", 300).await.unwrap();

        assert_eq!(
            store.get("cache:abc").await.unwrap().as_deref(),
            Some("\"hello\"")
        );
        assert_eq!(store.len().await, 1);
        assert!(store.get("cache:missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ttl_is_recorded() {
        let store = MemoryStore::new();
        store.set_with_expiry("cache:abc", "1", 60).await.unwrap();

        let remaining = store.ttl_of("cache:abc").await.unwrap();
        assert!(remaining <= Duration::from_secs(60));
        assert!(remaining > Duration::from_secs(55));
    }

    #[tokio::test]
    async fn test_zero_ttl_rejected() {
        let store = MemoryStore::new();
        let result = store.set_with_expiry("cache:abc", "1", 0).await;

        assert!(matches!(result, Err(StoreError::InvalidTtl(0))));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_unrepresentable_ttl_rejected() {
        let store = MemoryStore::new();
        let result = store.set_with_expiry("cache:abc", "1", u64::MAX).await;

        assert!(matches!(result, Err(StoreError::InvalidTtl(u64::MAX))));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_entries_expire() {
        let store = MemoryStore::new();
        store.set_with_expiry("cache:abc", "1", 1).await.unwrap();

        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert!(store.get("cache:abc").await.unwrap().is_none());
        assert!(store.is_empty().await);
    }
}
