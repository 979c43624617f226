//! Client configuration
//!
//! A [`ClientConfig`] is derived from a [`ConfigSource`] on every call and
//! describes how the storage client should be built: default discovery,
//! an explicit region, or an alternate endpoint with path-style addressing.

use std::collections::HashMap;
use std::ffi::OsString;

use serde::Serialize;

use crate::error::Result;
use crate::region::Region;

/// Environment variable naming an alternate storage endpoint
pub const ENDPOINT_ENV_VAR: &str = "AWS_S3_ENDPOINT";

/// Environment variable naming a region override
pub const REGION_ENV_VAR: &str = "AWS_REGION";

/// A source of configuration values keyed by variable name
pub trait ConfigSource: Send + Sync {
    /// Look up a value; `None` when the variable is not set
    fn get(&self, name: &str) -> Option<String>;
}

/// Reads the process environment at lookup time
///
/// A value that is not valid UTF-8 still counts as set; it is converted
/// lossily so that it fails later instead of being skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSource;

impl ConfigSource for EnvSource {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var_os(name).map(|value| env_value(name, value))
    }
}

fn env_value(name: &str, value: OsString) -> String {
    value.into_string().unwrap_or_else(|raw| {
        tracing::warn!(variable = name, "Environment value is not valid UTF-8");
        raw.to_string_lossy().into_owned()
    })
}

impl ConfigSource for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }
}

/// Consults `first`, falling back to `second` for unset variables
#[derive(Debug, Clone, Default)]
pub struct Layered<A, B> {
    pub first: A,
    pub second: B,
}

impl<A, B> Layered<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: ConfigSource, B: ConfigSource> ConfigSource for Layered<A, B> {
    fn get(&self, name: &str) -> Option<String> {
        self.first.get(name).or_else(|| self.second.get(name))
    }
}

/// Settings used to construct a storage client for a single call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClientConfig {
    /// Alternate service endpoint, e.g. a local emulator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_override: Option<String>,

    /// Explicit region, bypassing ambient discovery
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_override: Option<Region>,

    /// Put the bucket in the URL path instead of the host name
    pub path_style_access: bool,
}

impl ClientConfig {
    /// Derive the configuration from `source`
    ///
    /// An endpoint override wins over a region override and forces
    /// path-style access. The region variable is only consulted when
    /// `allow_region_override` is set; an unknown region name fails with
    /// [`Error::UnknownRegion`](crate::Error::UnknownRegion).
    pub fn from_source(source: &dyn ConfigSource, allow_region_override: bool) -> Result<Self> {
        if let Some(endpoint) = source.get(ENDPOINT_ENV_VAR) {
            return Ok(Self::with_endpoint(endpoint));
        }

        if allow_region_override {
            if let Some(name) = source.get(REGION_ENV_VAR) {
                return Ok(Self::with_region(name.parse()?));
            }
        }

        Ok(Self::default())
    }

    /// Configuration targeting an alternate endpoint
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint_override: Some(endpoint.into()),
            region_override: None,
            path_style_access: true,
        }
    }

    /// Configuration pinned to a region
    pub fn with_region(region: Region) -> Self {
        Self {
            endpoint_override: None,
            region_override: Some(region),
            path_style_access: false,
        }
    }

    /// Whether the client falls back entirely to ambient discovery
    pub fn is_default(&self) -> bool {
        self.endpoint_override.is_none() && self.region_override.is_none()
    }
}
