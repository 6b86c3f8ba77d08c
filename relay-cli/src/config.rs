//! Configuration module
//!
//! Turns command-line settings into the explicit connection and poller
//! configuration the library crates take.

use anyhow::{Context, Result};
use relay_client::{Connection, Credential, DevOpsClient};
use relay_poller::PollerConfig;
use std::sync::Arc;
use std::time::Duration;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub connection: Connection,
    pub poll_interval: Duration,
    pub max_status_failures: u32,
    /// Overall deadline in seconds from the command line, 0 meaning none
    pub timeout_secs: Option<u64>,
}

impl Config {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        organization: String,
        project: String,
        token: String,
        bearer: bool,
        base_url: String,
        release_base_url: String,
        poll_interval_secs: u64,
        max_status_failures: u32,
        timeout_secs: Option<u64>,
    ) -> Self {
        let credential = if bearer {
            Credential::Bearer(token)
        } else {
            Credential::Pat(token)
        };

        Self {
            connection: Connection::new(organization, project, credential)
                .with_base_urls(base_url, release_base_url),
            poll_interval: Duration::from_secs(poll_interval_secs),
            max_status_failures,
            timeout_secs,
        }
    }

    /// Client shared by the job kinds of one command
    pub fn client(&self) -> Result<Arc<DevOpsClient>> {
        let client = DevOpsClient::new(self.connection.clone())
            .context("Invalid Azure DevOps connection settings")?;
        Ok(Arc::new(client))
    }

    /// Poller settings
    ///
    /// An explicit `--timeout` wins over the command's default; either being
    /// 0 means no deadline.
    pub fn poller(&self, default_timeout_secs: Option<u64>) -> Result<PollerConfig> {
        let timeout_secs = self.timeout_secs.or(default_timeout_secs);

        let config = PollerConfig::new()
            .with_poll_interval(self.poll_interval)
            .with_max_status_failures(self.max_status_failures)
            .with_max_wait(
                timeout_secs
                    .filter(|secs| *secs > 0)
                    .map(Duration::from_secs),
            );

        config.validate()?;
        Ok(config)
    }
}
