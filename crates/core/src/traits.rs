//! ObjectStore trait definition
//!
//! These traits define the capability the fetcher needs from a storage
//! backend. They decouple the core from any specific S3 SDK so an
//! in-memory or mocked store can stand in for tests.

use std::pin::Pin;

use async_trait::async_trait;
use tokio::io::AsyncRead;

use crate::config::ClientConfig;
use crate::error::{Result, StoreError};

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Content of a fetched object
///
/// Ownership passes to the caller, who must read it to completion or drop
/// it to release the underlying connection.
pub type ByteStream = Pin<Box<dyn AsyncRead + Send>>;

/// Read access to objects in storage
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch an object's content as a stream
    async fn fetch(&self, bucket: &str, key: &str) -> StoreResult<ByteStream>;
}

/// Builds an [`ObjectStore`] client for a given configuration
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreConnector: Send + Sync {
    /// Construct a fresh client; called once per fetch
    async fn connect(&self, config: &ClientConfig) -> StoreResult<Box<dyn ObjectStore>>;
}

/// Host-facing extension point: turn a configuration path into bytes
#[async_trait]
pub trait ConfigProvider: Send + Sync {
    /// Open the configuration found at `path`
    async fn open(&self, path: &str) -> Result<ByteStream>;
}
