//! Artifact endpoints

use crate::DevOpsClient;
use crate::error::{ClientError, Result};
use relay_core::dto::build::BuildArtifact;
use reqwest::{Method, Url};
use tracing::info;

impl DevOpsClient {
    /// Look up a named artifact published by a build
    pub async fn get_build_artifact(&self, build_id: u64, name: &str) -> Result<BuildArtifact> {
        let id = build_id.to_string();
        let url = self.api_url(&["build", "builds", &id, "artifacts"]);
        let response = self
            .request(Method::GET, url)
            .query(&[("artifactName", name)])
            .send()
            .await?;

        self.handle_response(response)
            .await
            .map_err(|e| match e {
                e if e.is_not_found() => ClientError::NotFound(format!(
                    "artifact '{}' of build {}",
                    name, build_id
                )),
                e => e,
            })
    }

    /// Download a build artifact as a zip archive
    pub async fn download_build_artifact(&self, build_id: u64, name: &str) -> Result<Vec<u8>> {
        let artifact = self.get_build_artifact(build_id, name).await?;
        let download_url = artifact.resource.download_url.ok_or_else(|| {
            ClientError::NotFound(format!(
                "download URL for artifact '{}' of build {}",
                name, build_id
            ))
        })?;

        let url = Url::parse(&download_url).map_err(|e| {
            ClientError::ParseError(format!("Invalid download URL '{}': {}", download_url, e))
        })?;

        info!("Downloading artifact '{}' of build {}", name, build_id);
        let response = self.request(Method::GET, url).send().await?;
        let bytes = self.handle_bytes(response).await?;
        info!("Downloaded {} bytes", bytes.len());

        Ok(bytes)
    }
}
