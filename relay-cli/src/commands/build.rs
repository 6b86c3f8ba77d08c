//! Build command handler
//!
//! Queues a build, waits for it and optionally downloads one of its
//! artifacts once it succeeded.

use anyhow::Result;
use clap::Args;
use colored::*;
use relay_core::domain::definition::DefinitionSelector;
use relay_core::domain::job::Parameters;
use relay_poller::{BuildJobs, JobKind, RemoteJobPoller};
use std::path::PathBuf;

use super::{cancel_on_ctrl_c, display};
use crate::config::Config;
use crate::types::parse_param;

#[derive(Args)]
pub struct BuildArgs {
    /// Build definition ID or exact name
    #[arg(long, env = "ADO_PIPELINE_ID")]
    pub definition: String,

    /// Template parameter as key=value (repeatable)
    #[arg(long = "param", value_parser = parse_param)]
    pub params: Vec<(String, String)>,

    /// Branch to build instead of the definition's default
    #[arg(long)]
    pub branch: Option<String>,

    /// Commit to build
    #[arg(long)]
    pub commit: Option<String>,

    /// Artifact to download once the build succeeded
    #[arg(long)]
    pub artifact: Option<String>,

    /// Directory to unpack the artifact into
    #[arg(long, default_value = ".")]
    pub dest: PathBuf,
}

/// Handle the build command
pub async fn handle_build_command(args: BuildArgs, config: &Config) -> Result<()> {
    let kind = BuildJobs::new(config.client()?)
        .with_source_branch(args.branch)
        .with_source_version(args.commit);
    let poller = RemoteJobPoller::new(kind, config.poller(None)?);

    let selector = DefinitionSelector::parse(&args.definition);
    let parameters: Parameters = args.params.into_iter().collect();

    let handle = poller.trigger(&selector, &parameters).await?;
    println!("{} Queued build {}", "✓".green(), handle.to_string().cyan());
    display::print_link(&poller.kind().detail_url(&handle));

    let cancel = cancel_on_ctrl_c();
    let status = poller.await_completion(&handle, &cancel).await?;

    let completion = match poller.conclude(handle, status) {
        Ok(completion) => completion,
        Err(e) => {
            display::print_failure(poller.kind().label(), &e);
            return Err(e.into());
        }
    };

    display::print_status(
        poller.kind().label(),
        &completion.handle,
        &completion.status,
        completion.status.overall_result(poller.kind().vocabulary()),
    );

    if let Some(name) = args.artifact {
        let files = poller
            .fetch_artifact(&completion.handle, &name, &args.dest)
            .await?;
        display::print_extracted(&name, &args.dest, &files);
    }

    Ok(())
}
