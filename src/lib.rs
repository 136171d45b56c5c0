//! # fetch-cache
//!
//! A read-through cache for outbound HTTP requests. Responses are memoized in
//! Redis under a key derived from the request, expire by TTL, and the cache
//! degrades to calling the origin directly whenever Redis is slow, down, or
//! holds garbage.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fetch_cache::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cache = ResponseCache::connect("redis://localhost:6379")?;
//!
//!     let request = RequestDescriptor::get("https://registry.npmjs.org/lodash")
//!         .with_header("accept", "application/json")
//!         .with_ttl(60);
//!
//!     let body = cache.get(&request).await?;
//!     println!("{} bytes", body.len());
//!
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod errors;
pub mod http;
pub mod prelude;

// Re-export the main public types for convenience
pub use crate::core::ResponseCache;
pub use errors::FetchCacheError;
pub use http::{HttpOrigin, HttpOriginError};

// Re-export centralized config
pub use config::{AppConfig, CacheConfig, OriginConfig};

// Re-export internal crates used in the public API
pub use cache_system;

// Re-export external dependencies used in public API
pub use async_trait;
pub use reqwest;
