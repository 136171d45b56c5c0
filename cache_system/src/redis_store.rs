//! Redis-backed store
//!
//! This module provides the `RedisStore` used in production: one lazily opened
//! multiplexed connection shared by every clone, `GET` for lookups and `SETEX`
//! for writes.

use crate::errors::StoreError;
use crate::store::Store;
use async_trait::async_trait;
use config::CacheConfig;
use redis::{AsyncCommands, Client};
use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Redis store with a shared connection
#[derive(Clone)]
pub struct RedisStore {
    client: Arc<Client>,
    config: Arc<CacheConfig>,
    connection_pool: Arc<RwLock<Option<redis::aio::MultiplexedConnection>>>,
}

impl Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let connection_status = {
            match self.connection_pool.try_read() {
                Ok(pool) => {
                    if pool.is_some() {
                        "connected"
                    } else {
                        "no_connection"
                    }
                }
                Err(_) => "lock_error",
            }
        };

        f.debug_struct("RedisStore")
            .field("redis_url", &self.config.redis_url)
            .field("connected", &connection_status)
            .finish()
    }
}

impl RedisStore {
    /// Create a new store. No connection is opened until the first command.
    pub fn new(config: CacheConfig) -> Result<Self, StoreError> {
        let client = Client::open(config.redis_url.as_str())?;

        Ok(Self {
            client: Arc::new(client),
            config: Arc::new(config),
            connection_pool: Arc::new(RwLock::new(None)),
        })
    }

    fn connection_timeout(&self) -> Duration {
        Duration::from_millis(self.config.connection_timeout_ms)
    }

    fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.config.response_timeout_ms)
    }

    /// Get or create Redis connection.
    ///
    /// The pool lock is never held while connecting, so a hanging server costs each
    /// caller one connection timeout rather than queueing them behind each other.
    async fn get_connection(&self) -> Result<redis::aio::MultiplexedConnection, StoreError> {
        if let Some(connection) = self.connection_pool.read().await.as_ref() {
            return Ok(connection.clone());
        }

        let connection = tokio::time::timeout(
            self.connection_timeout(),
            self.client.get_multiplexed_async_connection(),
        )
        .await
        .map_err(|_| StoreError::Timeout("connect"))??;

        let mut pool = self.connection_pool.write().await;

        // Another caller may have connected meanwhile; keep the installed one
        let shared = pool.get_or_insert(connection);
        Ok(shared.clone())
    }

    /// Forget the shared connection so the next command reconnects
    async fn reset_connection(&self) {
        crate::trace_log!(redis_url = %self.config.redis_url, "dropping shared redis connection");
        *self.connection_pool.write().await = None;
    }

    /// Run one command under the response timeout
    async fn bounded<T, F>(&self, operation: &'static str, command: F) -> Result<T, StoreError>
    where
        F: Future<Output = redis::RedisResult<T>>,
    {
        match tokio::time::timeout(self.response_timeout(), command).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                if e.is_io_error() || e.is_connection_dropped() {
                    self.reset_connection().await;
                }
                Err(e.into())
            }
            Err(_) => {
                self.reset_connection().await;
                Err(StoreError::Timeout(operation))
            }
        }
    }

    /// Ping Redis to check connectivity
    pub async fn ping(&self) -> Result<String, StoreError> {
        let mut conn = self.get_connection().await?;

        self.bounded("PING", async {
            redis::cmd("PING").query_async(&mut conn).await
        })
        .await
    }

    /// Remaining TTL of a key in seconds, as reported by Redis (-2 missing, -1 no expiry)
    pub async fn ttl(&self, key: &str) -> Result<i64, StoreError> {
        let mut conn = self.get_connection().await?;

        self.bounded("TTL", async { conn.ttl(key).await }).await
    }

    /// Get current configuration
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }
}

#[async_trait]
impl Store for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.get_connection().await?;

        self.bounded("GET", async { conn.get(key).await }).await
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

        let mut conn = self.get_connection().await?;

        self.bounded("SETEX", async { conn.set_ex(key, value, ttl_seconds).await })
            .await
    }
}
