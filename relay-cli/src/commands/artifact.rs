//! Artifact command handler

use anyhow::Result;
use relay_core::domain::job::JobHandle;
use relay_poller::{BuildJobs, RemoteJobPoller};
use std::path::Path;

use super::display;
use crate::config::Config;

/// Handle the artifact command
pub async fn handle_artifact_command(
    build_id: u64,
    name: &str,
    dest: &Path,
    config: &Config,
) -> Result<()> {
    let poller = RemoteJobPoller::new(BuildJobs::new(config.client()?), config.poller(None)?);
    let handle = JobHandle::new(build_id, 0);

    let files = poller.fetch_artifact(&handle, name, dest).await?;

    display::print_extracted(name, dest, &files);

    Ok(())
}
