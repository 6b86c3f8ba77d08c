//! Build jobs

use async_trait::async_trait;
use relay_client::{DevOpsClient, Result};
use relay_core::domain::definition::{DefinitionRef, DefinitionSelector};
use relay_core::domain::job::{JobHandle, Parameters};
use relay_core::domain::status::{JobStatus, StatusVocabulary};
use relay_core::dto::build::QueueBuild;
use std::sync::Arc;
use tracing::debug;

use super::JobKind;

/// Pipelines queued through the build API
///
/// A build reports a single stage: its result once finished, its lifecycle
/// status until then.
#[derive(Debug, Clone)]
pub struct BuildJobs {
    client: Arc<DevOpsClient>,
    source_branch: Option<String>,
    source_version: Option<String>,
}

impl BuildJobs {
    pub fn new(client: Arc<DevOpsClient>) -> Self {
        Self {
            client,
            source_branch: None,
            source_version: None,
        }
    }

    /// Build a specific branch instead of the definition's default
    pub fn with_source_branch(mut self, branch: Option<String>) -> Self {
        self.source_branch = branch;
        self
    }

    /// Build a specific commit
    pub fn with_source_version(mut self, commit: Option<String>) -> Self {
        self.source_version = commit;
        self
    }
}

#[async_trait]
impl JobKind for BuildJobs {
    fn label(&self) -> &'static str {
        "build"
    }

    fn vocabulary(&self) -> &StatusVocabulary {
        &StatusVocabulary::BUILD
    }

    async fn find_definitions(&self, selector: &DefinitionSelector) -> Result<Vec<DefinitionRef>> {
        let definitions = self.client.list_build_definitions(selector).await?;
        Ok(definitions.into_iter().map(DefinitionRef::from).collect())
    }

    async fn create(
        &self,
        definition: &DefinitionRef,
        parameters: &Parameters,
    ) -> Result<JobHandle> {
        let mut request = QueueBuild::new(definition.id, parameters);
        request.source_branch = self.source_branch.clone();
        request.source_version = self.source_version.clone();

        let build = self.client.queue_build(&request).await?;
        debug!("Queued build {} of definition {}", build.id, definition.id);

        let handle = JobHandle::new(build.id, definition.id);
        Ok(match build.build_number {
            Some(number) => handle.with_name(number),
            None => handle,
        })
    }

    async fn fetch_status(&self, handle: &JobHandle) -> Result<JobStatus> {
        let build = self.client.get_build(handle.id).await?;
        Ok(build.job_status())
    }

    fn detail_url(&self, handle: &JobHandle) -> String {
        self.client.build_results_url(handle.id)
    }

    async fn download_artifact(&self, handle: &JobHandle, name: &str) -> Result<Vec<u8>> {
        self.client.download_build_artifact(handle.id, name).await
    }
}
