//! Release jobs

use async_trait::async_trait;
use relay_client::{DevOpsClient, Result};
use relay_core::domain::definition::{DefinitionRef, DefinitionSelector};
use relay_core::domain::job::{JobHandle, Parameters};
use relay_core::domain::status::{JobStatus, StatusVocabulary};
use relay_core::dto::release::CreateRelease;
use std::sync::Arc;
use tracing::debug;

use super::JobKind;

/// Classic release pipelines; every environment is a stage
#[derive(Debug, Clone)]
pub struct ReleaseJobs {
    client: Arc<DevOpsClient>,
    description: Option<String>,
}

impl ReleaseJobs {
    pub fn new(client: Arc<DevOpsClient>) -> Self {
        Self {
            client,
            description: None,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
}

#[async_trait]
impl JobKind for ReleaseJobs {
    fn label(&self) -> &'static str {
        "release"
    }

    fn vocabulary(&self) -> &StatusVocabulary {
        &StatusVocabulary::RELEASE
    }

    async fn find_definitions(&self, selector: &DefinitionSelector) -> Result<Vec<DefinitionRef>> {
        let definitions = self.client.list_release_definitions(selector).await?;
        Ok(definitions.into_iter().map(DefinitionRef::from).collect())
    }

    async fn create(
        &self,
        definition: &DefinitionRef,
        parameters: &Parameters,
    ) -> Result<JobHandle> {
        let mut request = CreateRelease::new(definition.id, parameters);
        request.description = self.description.clone();

        let release = self.client.create_release(&request).await?;
        debug!(
            "Created release {} with {} environment(s)",
            release.id,
            release.environments.len()
        );

        let handle = JobHandle::new(release.id, definition.id);
        Ok(match release.name {
            Some(name) => handle.with_name(name),
            None => handle,
        })
    }

    async fn fetch_status(&self, handle: &JobHandle) -> Result<JobStatus> {
        let release = self.client.get_release(handle.id).await?;
        Ok(release.job_status())
    }

    fn detail_url(&self, handle: &JobHandle) -> String {
        self.client.release_progress_url(handle.id)
    }
}
