//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod artifact;
mod build;
mod display;
mod release;
mod status;

pub use build::BuildArgs;
pub use release::ReleaseArgs;

use anyhow::Result;
use clap::Subcommand;
use relay_poller::CancellationToken;
use std::path::PathBuf;
use tracing::warn;

use crate::config::Config;
use crate::types::KindArg;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Queue a build and wait for it to finish
    Build(BuildArgs),
    /// Create a release and wait for every environment to finish
    Release(ReleaseArgs),
    /// Show the current status of a build or release
    Status {
        /// Kind of job
        #[arg(value_enum)]
        kind: KindArg,

        /// Build or release ID
        id: u64,
    },
    /// Download and unpack a build artifact
    Artifact {
        /// Build that published the artifact
        #[arg(long)]
        build_id: u64,

        /// Artifact name
        #[arg(long)]
        name: String,

        /// Directory to unpack into
        #[arg(long, default_value = ".")]
        dest: PathBuf,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Build(args) => build::handle_build_command(args, config).await,
        Commands::Release(args) => release::handle_release_command(args, config).await,
        Commands::Status { kind, id } => status::handle_status_command(kind, id, config).await,
        Commands::Artifact {
            build_id,
            name,
            dest,
        } => artifact::handle_artifact_command(build_id, &name, &dest, config).await,
    }
}

/// Token that is cancelled on the first Ctrl-C
///
/// The remote job keeps running; only the local wait stops.
fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let token = cancel.clone();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, no longer waiting for the remote job");
            token.cancel();
        }
    });

    cancel
}
