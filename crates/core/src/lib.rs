//! s3config-core: Core library for loading configuration from object storage
//!
//! This crate provides:
//! - Location parsing (`s3://bucket/key`) and validation
//! - Client configuration derived from environment overrides
//! - The ObjectStore capability and an in-memory implementation
//! - [`ConfigFetcher`], which ties these together into a single call
//!
//! This crate is independent of any specific S3 SDK; see `s3config-s3`
//! for the AWS-backed store.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod location;
pub mod memory;
pub mod region;
pub mod traits;

pub use config::{ClientConfig, ConfigSource, EnvSource, Layered};
pub use error::{Error, ErrorKind, Result, StoreError};
pub use fetcher::ConfigFetcher;
pub use location::{SchemePolicy, StorageLocation, resolve_location};
pub use memory::MemoryStore;
pub use region::Region;
pub use traits::{ByteStream, ConfigProvider, ObjectStore, StoreConnector, StoreResult};
