//! In-memory object store
//!
//! Serves objects from a map instead of the network. Meant for tests: every
//! connection is recorded until drained with
//! [`MemoryStore::take_connections`].

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use crate::config::ClientConfig;
use crate::error::StoreError;
use crate::traits::{ByteStream, ObjectStore, StoreConnector, StoreResult};

#[derive(Debug, Default)]
struct Inner {
    buckets: HashMap<String, HashMap<String, Vec<u8>>>,
    connections: Vec<ClientConfig>,
}

/// Object store backed by a shared in-memory map
///
/// Clones share the same contents. Acting as a [`StoreConnector`], it hands
/// out clones of itself and records every configuration it was given.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object, replacing any previous content
    pub fn insert(&self, bucket: impl Into<String>, key: impl Into<String>, data: impl Into<Vec<u8>>) {
        let mut inner = self.lock();
        inner
            .buckets
            .entry(bucket.into())
            .or_default()
            .insert(key.into(), data.into());
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with_object(
        self,
        bucket: impl Into<String>,
        key: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        self.insert(bucket, key, data);
        self
    }

    /// Configurations passed to [`StoreConnector::connect`], oldest first
    pub fn connections(&self) -> Vec<ClientConfig> {
        self.lock().connections.clone()
    }

    /// Drain the recorded configurations, oldest first
    pub fn take_connections(&self) -> Vec<ClientConfig> {
        std::mem::take(&mut self.lock().connections)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn fetch(&self, bucket: &str, key: &str) -> StoreResult<ByteStream> {
        let inner = self.lock();
        let objects = inner
            .buckets
            .get(bucket)
            .ok_or_else(|| StoreError::NotFound(format!("bucket '{bucket}'")))?;
        let data = objects
            .get(key)
            .ok_or_else(|| StoreError::NotFound(format!("{bucket}/{key}")))?;

        Ok(Box::pin(Cursor::new(data.clone())))
    }
}

#[async_trait]
impl StoreConnector for MemoryStore {
    async fn connect(&self, config: &ClientConfig) -> StoreResult<Box<dyn ObjectStore>> {
        self.lock().connections.push(config.clone());
        Ok(Box::new(self.clone()))
    }
}
