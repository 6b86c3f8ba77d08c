//! Build API endpoints

use crate::DevOpsClient;
use crate::error::Result;
use relay_core::domain::definition::DefinitionSelector;
use relay_core::dto::build::{Build, QueueBuild};
use relay_core::dto::{DefinitionReference, ListResponse};
use reqwest::Method;

impl DevOpsClient {
    // =============================================================================
    // Build Definitions
    // =============================================================================

    /// List build definitions matching a selector
    ///
    /// The service filters by ID or name; callers still need to check the
    /// result for an exact, unique match.
    pub async fn list_build_definitions(
        &self,
        selector: &DefinitionSelector,
    ) -> Result<Vec<DefinitionReference>> {
        let url = self.api_url(&["build", "definitions"]);
        let request = match selector {
            DefinitionSelector::Id(id) => self
                .request(Method::GET, url)
                .query(&[("definitionIds", id.to_string())]),
            DefinitionSelector::Name(name) => self
                .request(Method::GET, url)
                .query(&[("name", name.as_str())]),
        };
        let response = request.send().await?;

        let definitions: ListResponse<DefinitionReference> =
            self.handle_response(response).await?;
        Ok(definitions.value)
    }

    // =============================================================================
    // Build Lifecycle
    // =============================================================================

    /// Queue a new build
    ///
    /// Every call starts a new build.
    ///
    /// # Example
    /// ```no_run
    /// # use relay_client::{Connection, Credential, DevOpsClient};
    /// # use relay_core::dto::build::QueueBuild;
    /// # async fn example() -> relay_client::Result<()> {
    /// let client = DevOpsClient::new(Connection::new("office", "OE", Credential::Pat("token".into())))?;
    /// let build = client.queue_build(&QueueBuild::new(42, &Default::default())).await?;
    /// println!("{}", client.build_results_url(build.id));
    /// # Ok(())
    /// # }
    /// ```
    pub async fn queue_build(&self, req: &QueueBuild) -> Result<Build> {
        let url = self.api_url(&["build", "builds"]);
        let response = self.request(Method::POST, url).json(req).send().await?;

        self.handle_response(response).await
    }

    /// Get a build by ID
    pub async fn get_build(&self, build_id: u64) -> Result<Build> {
        let id = build_id.to_string();
        let url = self.api_url(&["build", "builds", &id]);
        let response = self.request(Method::GET, url).send().await?;

        self.handle_response(response).await
    }
}
