//! Status command handler
//!
//! Queries a build or release once and prints its stages without waiting.

use anyhow::Result;
use relay_core::domain::job::JobHandle;
use relay_poller::{BuildJobs, JobKind, ReleaseJobs, RemoteJobPoller};

use super::display;
use crate::config::Config;
use crate::types::KindArg;

/// Handle the status command
pub async fn handle_status_command(kind: KindArg, id: u64, config: &Config) -> Result<()> {
    let client = config.client()?;
    let poller_config = config.poller(None)?;

    match kind {
        KindArg::Build => {
            let poller = RemoteJobPoller::new(BuildJobs::new(client), poller_config);
            show(&poller, id).await
        }
        KindArg::Release => {
            let poller = RemoteJobPoller::new(ReleaseJobs::new(client), poller_config);
            show(&poller, id).await
        }
    }
}

async fn show<K: JobKind>(poller: &RemoteJobPoller<K>, id: u64) -> Result<()> {
    // The definition is not needed to look a job up by ID
    let handle = JobHandle::new(id, 0);
    let status = poller.current_status(&handle).await?;

    display::print_status(
        poller.kind().label(),
        &handle,
        &status,
        status.overall_result(poller.kind().vocabulary()),
    );
    display::print_link(&poller.kind().detail_url(&handle));

    Ok(())
}
