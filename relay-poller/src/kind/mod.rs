//! Job kinds
//!
//! A job kind bundles everything that differs between builds and releases:
//! the status vocabulary, and how definitions are listed, jobs created and
//! status fetched. The poller is written once against this trait.

mod build;
mod release;

pub use build::BuildJobs;
pub use release::ReleaseJobs;

use async_trait::async_trait;
use relay_client::{ClientError, Result};
use relay_core::domain::definition::{DefinitionRef, DefinitionSelector};
use relay_core::domain::job::{JobHandle, Parameters};
use relay_core::domain::status::{JobStatus, StatusVocabulary};

/// Descriptor of one kind of remote job
#[async_trait]
pub trait JobKind: Send + Sync {
    /// Human readable name ("build", "release")
    fn label(&self) -> &'static str;

    /// Terminal and failure status sets for this kind
    fn vocabulary(&self) -> &StatusVocabulary;

    /// Lists definitions the remote system considers a match for the selector
    ///
    /// The result may contain near matches; the poller filters for exact ones.
    async fn find_definitions(&self, selector: &DefinitionSelector) -> Result<Vec<DefinitionRef>>;

    /// Starts one job from a definition
    async fn create(&self, definition: &DefinitionRef, parameters: &Parameters)
    -> Result<JobHandle>;

    /// Fetches the current status of a job
    async fn fetch_status(&self, handle: &JobHandle) -> Result<JobStatus>;

    /// Web page where a human can inspect the job
    fn detail_url(&self, handle: &JobHandle) -> String;

    /// Downloads a named artifact produced by the job as a zip archive
    async fn download_artifact(&self, _handle: &JobHandle, name: &str) -> Result<Vec<u8>> {
        Err(ClientError::InvalidRequest(format!(
            "{} jobs do not publish artifacts (requested '{}')",
            self.label(),
            name
        )))
    }
}
