//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore and StoreConnector
//! traits from s3config-core.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::get_object::GetObjectError;

use s3config_core::{ByteStream, ClientConfig, ObjectStore, StoreConnector, StoreError, StoreResult};

/// Region used with an endpoint override when nothing else supplies one
///
/// Local emulators accept any region but request signing needs one.
pub const FALLBACK_REGION: &str = "us-east-1";

/// S3 client wrapper
pub struct S3Store {
    inner: aws_sdk_s3::Client,
}

impl S3Store {
    /// Create a new S3 client from a per-call configuration
    ///
    /// Credentials and, absent an override, the region come from the
    /// SDK's default provider chains.
    pub async fn new(config: &ClientConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = config.region_override {
            loader = loader.region(Region::new(region.name()));
        }
        let sdk_config = loader.load().await;

        let client = aws_sdk_s3::Client::from_conf(build_s3_config(&sdk_config, config));
        tracing::debug!(
            endpoint = ?config.endpoint_override,
            region = ?client.config().region(),
            path_style = config.path_style_access,
            "Created S3 client"
        );

        Self { inner: client }
    }

    /// Get the underlying aws-sdk-s3 client
    pub fn inner(&self) -> &aws_sdk_s3::Client {
        &self.inner
    }
}

/// Apply a [`ClientConfig`] on top of the loaded SDK configuration
pub fn build_s3_config(sdk_config: &SdkConfig, config: &ClientConfig) -> aws_sdk_s3::Config {
    let mut builder = aws_sdk_s3::config::Builder::from(sdk_config)
        .force_path_style(config.path_style_access);

    if let Some(endpoint) = &config.endpoint_override {
        builder = builder.endpoint_url(endpoint);
        if sdk_config.region().is_none() {
            builder = builder.region(Region::new(FALLBACK_REGION));
        }
    }

    builder.build()
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn fetch(&self, bucket: &str, key: &str) -> StoreResult<ByteStream> {
        let response = self
            .inner
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| map_get_object_error(e, bucket, key))?;

        Ok(Box::pin(response.body.into_async_read()))
    }
}

/// Connects a fresh [`S3Store`] for every call
#[derive(Debug, Clone, Copy, Default)]
pub struct S3Connector;

#[async_trait]
impl StoreConnector for S3Connector {
    async fn connect(&self, config: &ClientConfig) -> StoreResult<Box<dyn ObjectStore>> {
        Ok(Box::new(S3Store::new(config).await))
    }
}

/// Classify a GetObject failure, keeping the SDK error when nothing fits
fn map_get_object_error(err: SdkError<GetObjectError>, bucket: &str, key: &str) -> StoreError {
    match &err {
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) => {
            StoreError::Network(DisplayErrorContext(&err).to_string())
        }
        SdkError::ConstructionFailure(_) => {
            StoreError::InvalidRequest(DisplayErrorContext(&err).to_string())
        }
        SdkError::ServiceError(service) => {
            let status = service.raw().status().as_u16();
            let code = service.err().code().unwrap_or_default();
            if service.err().is_no_such_key() || code == "NoSuchBucket" || status == 404 {
                StoreError::NotFound(format!("{bucket}/{key}"))
            } else if code == "AccessDenied" || status == 403 {
                StoreError::AccessDenied(format!("{bucket}/{key}"))
            } else {
                StoreError::Other(Box::new(err))
            }
        }
        _ => StoreError::Other(Box::new(err)),
    }
}
