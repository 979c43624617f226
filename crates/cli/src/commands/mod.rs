//! CLI command definitions and execution
//!
//! Commands share a [`ConfigFetcher`] built from the global flags layered
//! over the process environment.

use std::collections::HashMap;

use clap::{Parser, Subcommand, ValueEnum};
use s3config_core::config::{ENDPOINT_ENV_VAR, REGION_ENV_VAR};
use s3config_core::{ConfigFetcher, EnvSource, Layered, SchemePolicy, StoreConnector};
use s3config_s3::S3Connector;

use crate::exit_code::ExitCode;
use crate::output::OutputConfig;

mod completions;
pub mod fetch;
pub mod resolve;

/// s3config - Load application configuration from object storage
///
/// Resolves s3://bucket/key locations and fetches the object they name,
/// the same way an application does at startup.
#[derive(Parser, Debug)]
#[command(name = "s3config")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    #[command(flatten)]
    pub client: ClientArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags controlling how locations are resolved and clients are built
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ClientArgs {
    /// Alternate storage endpoint (takes precedence over AWS_S3_ENDPOINT)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Region override (takes precedence over AWS_REGION)
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// How to report a location whose scheme is not s3
    #[arg(
        long,
        global = true,
        value_enum,
        env = "S3CONFIG_SCHEME_POLICY",
        default_value = "reject"
    )]
    pub scheme_policy: SchemePolicyArg,

    /// Ignore region overrides and rely on ambient region discovery
    #[arg(long, global = true, default_value = "false")]
    pub no_region_override: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchemePolicyArg {
    /// Report a distinct unsupported-scheme error
    #[default]
    Reject,
    /// Report a generic I/O error
    Io,
}

impl From<SchemePolicyArg> for SchemePolicy {
    fn from(arg: SchemePolicyArg) -> Self {
        match arg {
            SchemePolicyArg::Reject => SchemePolicy::Reject,
            SchemePolicyArg::Io => SchemePolicy::Io,
        }
    }
}

impl ClientArgs {
    /// Flags given on the command line, keyed like their environment variables
    pub fn overrides(&self) -> HashMap<String, String> {
        let mut vars = HashMap::new();
        if let Some(endpoint) = &self.endpoint {
            vars.insert(ENDPOINT_ENV_VAR.to_string(), endpoint.clone());
        }
        if let Some(region) = &self.region {
            vars.insert(REGION_ENV_VAR.to_string(), region.clone());
        }
        vars
    }

    /// Build a fetcher over `connector`, with flags layered over the environment
    pub fn fetcher(&self, connector: impl StoreConnector + 'static) -> ConfigFetcher {
        ConfigFetcher::new(connector)
            .with_source(Layered::new(self.overrides(), EnvSource))
            .scheme_policy(self.scheme_policy.into())
            .region_override(!self.no_region_override)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the configuration object at a location
    Fetch(fetch::FetchArgs),

    /// Show how a location would be resolved, without fetching
    Resolve(resolve::ResolveArgs),

    /// Generate shell completion scripts
    Completions(completions::CompletionsArgs),
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let output_config = OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        quiet: cli.quiet,
    };
    let fetcher = cli.client.fetcher(S3Connector);

    match cli.command {
        Commands::Fetch(args) => fetch::execute(args, &fetcher, output_config).await,
        Commands::Resolve(args) => resolve::execute(args, &fetcher, output_config),
        Commands::Completions(args) => completions::execute(args),
    }
}

/// Render an error followed by its chain of causes
pub fn describe_error(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
