//! resolve command - Show how a location resolves
//!
//! Parses the location and derives the client configuration exactly as a
//! fetch would, then stops before contacting storage.

use clap::Args;
use s3config_core::{ClientConfig, ConfigFetcher, StorageLocation};
use serde::Serialize;

use super::describe_error;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Show how a location would be resolved
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Location of the configuration (s3://bucket/key)
    pub location: String,
}

#[derive(Debug, Serialize)]
struct ResolveOutput {
    location: StorageLocation,
    client: ClientConfig,
}

impl std::fmt::Display for ResolveOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Location: {}", self.location)?;
        writeln!(f, "Bucket:   {}", self.location.bucket)?;
        writeln!(f, "Key:      {:?}", self.location.key)?;
        match &self.client.endpoint_override {
            Some(endpoint) => writeln!(f, "Endpoint: {endpoint} (path-style)")?,
            None => writeln!(f, "Endpoint: default")?,
        }
        match self.client.region_override {
            Some(region) => write!(f, "Region:   {region}"),
            None => write!(f, "Region:   ambient"),
        }
    }
}

/// Execute the resolve command
pub fn execute(args: ResolveArgs, fetcher: &ConfigFetcher, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    match fetcher.resolve(Some(args.location.as_str())) {
        Ok((location, client)) => {
            formatter.output(&ResolveOutput { location, client });
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&describe_error(&e));
            ExitCode::from_error(&e)
        }
    }
}
