//! Release API endpoints

use crate::DevOpsClient;
use crate::error::Result;
use relay_core::domain::definition::DefinitionSelector;
use relay_core::dto::release::{CreateRelease, Release};
use relay_core::dto::{DefinitionReference, ListResponse};
use reqwest::Method;

impl DevOpsClient {
    // =============================================================================
    // Release Definitions
    // =============================================================================

    /// List release definitions matching a selector
    pub async fn list_release_definitions(
        &self,
        selector: &DefinitionSelector,
    ) -> Result<Vec<DefinitionReference>> {
        let url = self.release_api_url(&["release", "definitions"]);
        let request = match selector {
            DefinitionSelector::Id(id) => self
                .request(Method::GET, url)
                .query(&[("definitionIdFilter", id.to_string())]),
            DefinitionSelector::Name(name) => self.request(Method::GET, url).query(&[
                ("searchText", name.as_str()),
                ("isExactNameMatch", "true"),
            ]),
        };
        let response = request.send().await?;

        let definitions: ListResponse<DefinitionReference> =
            self.handle_response(response).await?;
        Ok(definitions.value)
    }

    // =============================================================================
    // Release Lifecycle
    // =============================================================================

    /// Create a release, which starts deployment of its automated environments
    pub async fn create_release(&self, req: &CreateRelease) -> Result<Release> {
        let url = self.release_api_url(&["release", "releases"]);
        let response = self.request(Method::POST, url).json(req).send().await?;

        self.handle_response(response).await
    }

    /// Get a release and the status of each of its environments
    pub async fn get_release(&self, release_id: u64) -> Result<Release> {
        let id = release_id.to_string();
        let url = self.release_api_url(&["release", "releases", &id]);
        let response = self.request(Method::GET, url).send().await?;

        self.handle_response(response).await
    }
}
