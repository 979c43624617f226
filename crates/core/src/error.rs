//! Error types for s3config-core
//!
//! Every failure of a resolve-and-fetch call surfaces as a single [`Error`]
//! value. Store-level failures are carried as [`StoreError`] in the source
//! chain so callers can still inspect the original cause.

use thiserror::Error;

/// Result type alias for s3config-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Message attached to every wrapped store failure
pub const FETCH_FAILED_MESSAGE: &str = "Error retrieving configuration from storage";

/// Error types for resolve-and-fetch operations
#[derive(Error, Debug)]
pub enum Error {
    /// Location missing, empty, or not a valid location identifier
    #[error("Invalid location: {reason}")]
    InvalidLocation {
        reason: String,
        #[source]
        source: Option<url::ParseError>,
    },

    /// Location scheme is not the storage scheme
    #[error("Configuration location uses unsupported scheme: {0}")]
    UnsupportedScheme(String),

    /// Generic I/O-kind failure
    #[error("I/O error: {0}")]
    Io(String),

    /// The storage service could not deliver the object
    #[error("{}", FETCH_FAILED_MESSAGE)]
    FetchFailed(#[source] StoreError),

    /// Region override names a region outside the known set
    #[error("Unknown region: {0}")]
    UnknownRegion(String),
}

/// Broad classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller misconfiguration; never retryable
    Usage,
    /// Failure while talking to storage
    Io,
    /// Deployment misconfiguration; startup must abort
    Fatal,
}

impl Error {
    /// Build an [`Error::InvalidLocation`] with no underlying parse error
    pub fn invalid_location(reason: impl Into<String>) -> Self {
        Error::InvalidLocation {
            reason: reason.into(),
            source: None,
        }
    }

    /// Classify this error
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidLocation { .. } | Error::UnsupportedScheme(_) => ErrorKind::Usage,
            Error::Io(_) | Error::FetchFailed(_) => ErrorKind::Io,
            Error::UnknownRegion(_) => ErrorKind::Fatal,
        }
    }

    /// Whether retrying the same call could plausibly succeed
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Error::FetchFailed(StoreError::Network(_)))
    }

    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidLocation { .. } | Error::UnsupportedScheme(_) => 2, // UsageError
            Error::FetchFailed(StoreError::Network(_)) => 3,                 // NetworkError
            Error::FetchFailed(StoreError::AccessDenied(_)) => 4,            // AuthError
            Error::FetchFailed(StoreError::NotFound(_)) => 5,                // NotFound
            Error::UnknownRegion(_) => 6,                                    // ConfigError
            _ => 1,                                                          // GeneralError
        }
    }
}

/// Errors reported by an [`ObjectStore`](crate::ObjectStore) implementation
#[derive(Error, Debug)]
pub enum StoreError {
    /// Bucket or key does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Credentials rejected or missing permissions
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Transport failure (retryable)
    #[error("Network error: {0}")]
    Network(String),

    /// Request could not be built or was rejected as malformed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Any other failure raised by the client
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}
