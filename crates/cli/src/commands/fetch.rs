//! fetch command - Retrieve a configuration object
//!
//! Streams the object to stdout, or to a file with --output.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use s3config_core::{ByteStream, ConfigFetcher};
use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::describe_error;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Fetch the configuration object at a location
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Location of the configuration (s3://bucket/key)
    pub location: String,

    /// Write the content to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct FetchOutput {
    location: String,
    output: String,
    size_bytes: u64,
    size_human: String,
}

impl std::fmt::Display for FetchOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Fetched {} ({}) to {}",
            self.location, self.size_human, self.output
        )
    }
}

/// Execute the fetch command
pub async fn execute(args: FetchArgs, fetcher: &ConfigFetcher, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let stream = match fetcher.resolve_and_fetch(Some(args.location.as_str())).await {
        Ok(stream) => stream,
        Err(e) => {
            formatter.error(&describe_error(&e));
            return ExitCode::from_error(&e);
        }
    };

    let written = match &args.output {
        Some(path) => write_to_file(stream, path).await,
        None => copy_stream(stream, &mut tokio::io::stdout())
            .await
            .context("Failed to write to stdout"),
    };

    match written {
        Ok(size) => {
            // A summary on stdout would corrupt the content written there
            if let Some(path) = &args.output {
                formatter.output(&FetchOutput {
                    location: args.location,
                    output: path.display().to_string(),
                    size_bytes: size,
                    size_human: humansize::format_size(size, humansize::BINARY),
                });
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&format!("{e:#}"));
            ExitCode::GeneralError
        }
    }
}

async fn write_to_file(stream: ByteStream, path: &Path) -> anyhow::Result<u64> {
    let mut file = tokio::fs::File::create(path)
        .await
        .with_context(|| format!("Failed to create {}", path.display()))?;
    copy_stream(stream, &mut file)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Copy the whole stream into `writer` and flush it
async fn copy_stream<W>(mut stream: ByteStream, writer: &mut W) -> std::io::Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let size = tokio::io::copy(&mut stream, writer).await?;
    writer.flush().await?;
    Ok(size)
}
