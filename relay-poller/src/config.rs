//! Poller configuration
//!
//! Defines the polling interval, the optional overall deadline and how many
//! consecutive status-query failures are tolerated. Values are always passed
//! in explicitly; the CLI maps its flags and `RELAY_*` variables onto them.

use std::time::Duration;

use crate::error::ConfigurationError;

/// Default interval between status queries, chosen to stay within the
/// Azure DevOps rate limits
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Default number of consecutive failed status queries before giving up
pub const DEFAULT_MAX_STATUS_FAILURES: u32 = 5;

/// Poller configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerConfig {
    /// Fixed wait between status queries
    pub poll_interval: Duration,

    /// Maximum time to wait for the job; `None` waits indefinitely
    pub max_wait: Option<Duration>,

    /// Consecutive status-query failures tolerated before surfacing the error
    pub max_status_failures: u32,
}

impl PollerConfig {
    /// Creates a new configuration with defaults
    pub fn new() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_wait: None,
            max_status_failures: DEFAULT_MAX_STATUS_FAILURES,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_max_wait(mut self, max_wait: Option<Duration>) -> Self {
        self.max_wait = max_wait;
        self
    }

    pub fn with_max_status_failures(mut self, max_status_failures: u32) -> Self {
        self.max_status_failures = max_status_failures;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.poll_interval.is_zero() {
            return Err(ConfigurationError::InvalidSetting(
                "poll_interval must be greater than 0".to_string(),
            ));
        }

        if self.max_wait.is_some_and(|max_wait| max_wait.is_zero()) {
            return Err(ConfigurationError::InvalidSetting(
                "max_wait must be greater than 0 when set".to_string(),
            ));
        }

        if self.max_status_failures == 0 {
            return Err(ConfigurationError::InvalidSetting(
                "max_status_failures must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self::new()
    }
}
