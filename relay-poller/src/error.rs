//! Error types for triggering and awaiting remote jobs

use relay_client::ClientError;
use relay_core::domain::status::{JobStatus, OverallResult};
use std::time::Duration;
use thiserror::Error;

/// The requested job cannot be started as configured
///
/// Never retried: the caller has to fix its input.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("No {kind} definition matches {selector}")]
    DefinitionNotFound { kind: String, selector: String },

    #[error("{kind} definition selector {selector} is ambiguous, it matches definitions {ids:?}")]
    AmbiguousDefinition {
        kind: String,
        selector: String,
        ids: Vec<u64>,
    },

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),
}

/// Errors surfaced by the poller
#[derive(Debug, Error)]
pub enum PollError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Creating the job, listing definitions or querying status failed
    #[error("Remote call failed: {0}")]
    RemoteCall(#[from] ClientError),

    /// The job finished and every stage reported a failure status
    #[error("The {kind} {id} finished as {result}. More details: {url}")]
    JobFailed {
        kind: String,
        id: u64,
        result: OverallResult,
        status: JobStatus,
        url: String,
    },

    #[error("The {kind} {id} did not finish within {}s. More details: {url}", .waited.as_secs())]
    Timeout {
        kind: String,
        id: u64,
        waited: Duration,
        url: String,
    },

    #[error("Stopped waiting for the {kind} {id}. More details: {url}")]
    Cancelled { kind: String, id: u64, url: String },

    #[error("Failed to extract artifact: {0}")]
    Artifact(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PollError {
    /// Link to the remote job's detail page, when a job was started
    pub fn detail_url(&self) -> Option<&str> {
        match self {
            PollError::JobFailed { url, .. }
            | PollError::Timeout { url, .. }
            | PollError::Cancelled { url, .. } => Some(url),
            _ => None,
        }
    }

    pub fn is_configuration_error(&self) -> bool {
        matches!(self, PollError::Configuration(_))
    }
}
