//! Relay CLI
//!
//! Command-line interface for triggering Azure DevOps builds and releases and
//! waiting for them to finish. Exits non-zero when the job fails, times out
//! or is interrupted.

mod commands;
mod config;
mod types;

use clap::Parser;
use colored::*;
use commands::{Commands, handle_command};
use config::Config;
use relay_client::{DEFAULT_BASE_URL, DEFAULT_RELEASE_BASE_URL};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Log filter used when `RUST_LOG` is not set
const DEFAULT_LOG_FILTER: &str = "relay=info,relay_poller=info,relay_client=info";

#[derive(Parser)]
#[command(name = "relay")]
#[command(about = "Trigger Azure DevOps builds and releases and wait for them", long_about = None)]
struct Cli {
    /// Azure DevOps organization
    #[arg(long, env = "ADO_ORGANIZATION")]
    organization: String,

    /// Azure DevOps project name or ID
    #[arg(long, env = "ADO_PROJECT")]
    project: String,

    /// Personal access token with Build/Release scope
    #[arg(long, env = "AZURE_DEVOPS_PAT", hide_env_values = true)]
    token: String,

    /// Send the token as a bearer token instead of a PAT
    #[arg(long)]
    bearer: bool,

    /// Host for build APIs and web links
    #[arg(long, env = "ADO_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Host for release APIs
    #[arg(long, env = "ADO_RELEASE_BASE_URL", default_value = DEFAULT_RELEASE_BASE_URL)]
    release_base_url: String,

    /// Seconds between status queries
    #[arg(long, env = "RELAY_POLL_INTERVAL", default_value_t = 30)]
    poll_interval: u64,

    /// Consecutive failed status queries tolerated before giving up
    #[arg(long, env = "RELAY_MAX_STATUS_FAILURES", default_value_t = 5)]
    max_status_failures: u32,

    /// Give up waiting after this many seconds (0 waits indefinitely)
    #[arg(long, env = "RELAY_MAX_WAIT")]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::new(
        cli.organization,
        cli.project,
        cli.token,
        cli.bearer,
        cli.base_url,
        cli.release_base_url,
        cli.poll_interval,
        cli.max_status_failures,
        cli.timeout,
    );

    match handle_command(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "✗".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
