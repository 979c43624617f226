//! s3config-s3: S3 SDK adapter for s3config
//!
//! This crate provides the implementation of the ObjectStore and
//! StoreConnector traits using the aws-sdk-s3 crate. It is the only crate
//! that directly depends on the AWS SDK.

pub mod client;

pub use client::{S3Connector, S3Store};
