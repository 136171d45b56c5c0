//! Convenience re-exports for common fetch-cache usage
//!
//! # Example
//!
//! ```rust
//! use fetch_cache::prelude::*;
//!
//! let request = RequestDescriptor::get("https://x.example/y");
//! assert_eq!(
//!     fingerprint(&request, "cache:").as_str(),
//!     "cache:af0bbbbfe4e5c84dc31ecb2f0044317e"
//! );
//! ```

// Core fetch-cache components
pub use crate::core::ResponseCache;
pub use crate::errors::FetchCacheError;
pub use crate::http::{HttpOrigin, HttpOriginError};

// Re-export centralized config
pub use config::{AppConfig, CacheConfig, OriginConfig};

// Re-export cache system
pub use cache_system::prelude::*;

// Common external dependencies
pub use async_trait;
pub use tokio;
