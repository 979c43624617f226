//! Resolve-and-fetch of configuration locations
//!
//! [`ConfigFetcher`] turns a location string into the byte stream of the
//! object it names. Each call re-reads its configuration source and connects
//! a fresh client; nothing is cached between calls.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{ClientConfig, ConfigSource, EnvSource};
use crate::error::{Error, Result};
use crate::location::{SchemePolicy, StorageLocation, resolve_location};
use crate::traits::{ByteStream, ConfigProvider, StoreConnector};

/// Fetches configuration objects from storage
#[derive(Clone)]
pub struct ConfigFetcher {
    connector: Arc<dyn StoreConnector>,
    source: Arc<dyn ConfigSource>,
    scheme_policy: SchemePolicy,
    region_override: bool,
}

impl ConfigFetcher {
    /// Create a fetcher reading overrides from the process environment
    pub fn new(connector: impl StoreConnector + 'static) -> Self {
        Self {
            connector: Arc::new(connector),
            source: Arc::new(EnvSource),
            scheme_policy: SchemePolicy::default(),
            region_override: true,
        }
    }

    /// Read overrides from `source` instead of the process environment
    pub fn with_source(mut self, source: impl ConfigSource + 'static) -> Self {
        self.source = Arc::new(source);
        self
    }

    /// Set how a non-storage scheme is reported
    pub fn scheme_policy(mut self, policy: SchemePolicy) -> Self {
        self.scheme_policy = policy;
        self
    }

    /// Enable or disable the region override (enabled by default)
    pub fn region_override(mut self, enabled: bool) -> Self {
        self.region_override = enabled;
        self
    }

    /// Parse `path` and derive the client configuration without fetching
    pub fn resolve(&self, path: Option<&str>) -> Result<(StorageLocation, ClientConfig)> {
        let location = resolve_location(path, self.scheme_policy)?;
        let config = ClientConfig::from_source(self.source.as_ref(), self.region_override)?;

        tracing::debug!(
            bucket = %location.bucket,
            key = %location.key,
            ?config,
            "Resolved configuration location"
        );

        Ok((location, config))
    }

    /// Resolve `path` and fetch the object it names
    ///
    /// Location and region errors are returned before any client is
    /// connected. Every store failure, including failure to connect, is
    /// wrapped in [`Error::FetchFailed`]. The stream is returned as the
    /// store produced it.
    pub async fn resolve_and_fetch(&self, path: Option<&str>) -> Result<ByteStream> {
        let (location, config) = self.resolve(path)?;

        let result = match self.connector.connect(&config).await {
            Ok(store) => store.fetch(&location.bucket, &location.key).await,
            Err(e) => Err(e),
        };

        result.map_err(|e| {
            tracing::warn!(location = %location, error = %e, "Failed to fetch configuration");
            Error::FetchFailed(e)
        })
    }
}

#[async_trait]
impl ConfigProvider for ConfigFetcher {
    async fn open(&self, path: &str) -> Result<ByteStream> {
        self.resolve_and_fetch(Some(path)).await
    }
}

impl std::fmt::Debug for ConfigFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigFetcher")
            .field("scheme_policy", &self.scheme_policy)
            .field("region_override", &self.region_override)
            .finish_non_exhaustive()
    }
}
