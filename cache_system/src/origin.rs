//! Origin fetcher contract
//!
//! The origin is whatever performs the real call on a cache miss. Its errors are
//! failures of the requested operation and are returned to the caller as-is.

use crate::descriptor::RequestDescriptor;
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

#[async_trait]
pub trait Origin: Send + Sync {
    /// Result of a fetch. Round-trips through JSON to live in the store.
    type Output: Serialize + DeserializeOwned + Send + Sync + 'static;

    type Error: std::error::Error + Send + Sync + 'static;

    async fn fetch(&self, descriptor: &RequestDescriptor) -> Result<Self::Output, Self::Error>;
}

#[async_trait]
impl<O: Origin + ?Sized> Origin for Arc<O> {
    type Output = O::Output;
    type Error = O::Error;

    async fn fetch(&self, descriptor: &RequestDescriptor) -> Result<Self::Output, Self::Error> {
        (**self).fetch(descriptor).await
    }
}
