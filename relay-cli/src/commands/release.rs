//! Release command handler

use anyhow::Result;
use clap::Args;
use colored::*;
use relay_core::domain::definition::DefinitionSelector;
use relay_core::domain::job::Parameters;
use relay_poller::{JobKind, ReleaseJobs, RemoteJobPoller};

use super::{cancel_on_ctrl_c, display};
use crate::config::Config;
use crate::types::parse_param;

/// Releases give up after an hour unless `--timeout` says otherwise
const DEFAULT_RELEASE_TIMEOUT_SECS: u64 = 3600;

#[derive(Args)]
pub struct ReleaseArgs {
    /// Release definition ID or exact name
    #[arg(long, env = "ADO_RELEASE_DEFINITION")]
    pub definition: String,

    /// Description shown on the release
    #[arg(long)]
    pub description: Option<String>,

    /// Release variable as key=value (repeatable)
    #[arg(long = "param", value_parser = parse_param)]
    pub params: Vec<(String, String)>,
}

/// Handle the release command
pub async fn handle_release_command(args: ReleaseArgs, config: &Config) -> Result<()> {
    let kind = ReleaseJobs::new(config.client()?).with_description(args.description);
    let poller_config = config.poller(Some(DEFAULT_RELEASE_TIMEOUT_SECS))?;
    let poller = RemoteJobPoller::new(kind, poller_config);

    let selector = DefinitionSelector::parse(&args.definition);
    let parameters: Parameters = args.params.into_iter().collect();

    let handle = poller.trigger(&selector, &parameters).await?;
    println!(
        "{} Created release {}",
        "✓".green(),
        handle.to_string().cyan()
    );
    display::print_link(&poller.kind().detail_url(&handle));

    let cancel = cancel_on_ctrl_c();
    let status = poller.await_completion(&handle, &cancel).await?;

    match poller.conclude(handle, status) {
        Ok(completion) => {
            display::print_status(
                poller.kind().label(),
                &completion.handle,
                &completion.status,
                completion.status.overall_result(poller.kind().vocabulary()),
            );
            Ok(())
        }
        Err(e) => {
            display::print_failure(poller.kind().label(), &e);
            Err(e.into())
        }
    }
}
