//! Error types for the fetch-cache crate
//!
//! These are construction-time errors. Once a `ResponseCache` exists, the only
//! errors `get` returns are the origin's.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchCacheError {
    #[error("Configuration file error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Cache configuration error: {0}")]
    Configuration(#[from] cache_system::ConfigurationError),

    #[error("Store setup error: {0}")]
    Store(#[from] cache_system::StoreError),

    #[error("Origin setup error: {0}")]
    Origin(#[from] crate::http::HttpOriginError),
}
