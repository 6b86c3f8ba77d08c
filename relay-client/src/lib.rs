//! Relay HTTP Client
//!
//! A small, typed HTTP client for the parts of the Azure DevOps REST API that
//! relay needs: listing definitions, queueing builds, creating releases,
//! reading their status and downloading build artifacts.
//!
//! # Example
//!
//! ```no_run
//! use relay_client::{Connection, Credential, DevOpsClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let connection = Connection::new("office", "OE", Credential::Pat("token".into()));
//!     let client = DevOpsClient::new(connection)?;
//!
//!     let build = client.get_build(777).await?;
//!     println!("Build {} is {}", build.id, build.stage_status());
//!     Ok(())
//! }
//! ```

mod artifacts;
mod builds;
pub mod error;
mod releases;

// Re-export commonly used types
pub use error::{ClientError, Result};

use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// REST API version sent with every request
pub const API_VERSION: &str = "7.1";

/// Organisation-level API host
pub const DEFAULT_BASE_URL: &str = "https://dev.azure.com";

/// Release management API host
pub const DEFAULT_RELEASE_BASE_URL: &str = "https://vsrm.dev.azure.com";

/// Upper bound for a single request, including reading the body
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Secret used to authenticate against Azure DevOps
#[derive(Clone)]
pub enum Credential {
    /// Personal access token, sent as basic auth with an empty user name
    Pat(String),
    /// OAuth / Entra ID access token, sent as a bearer token
    Bearer(String),
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Pat(_) => f.write_str("Pat(<redacted>)"),
            Credential::Bearer(_) => f.write_str("Bearer(<redacted>)"),
        }
    }
}

/// Where and as whom to connect
#[derive(Debug, Clone)]
pub struct Connection {
    /// Azure DevOps organisation name
    pub organization: String,
    /// Project name or ID within the organisation
    pub project: String,
    pub credential: Credential,
    /// Host for build APIs and web links (default: https://dev.azure.com)
    pub base_url: String,
    /// Host for release APIs (default: https://vsrm.dev.azure.com)
    pub release_base_url: String,
}

impl Connection {
    /// Create a connection against the public Azure DevOps hosts
    pub fn new(
        organization: impl Into<String>,
        project: impl Into<String>,
        credential: Credential,
    ) -> Self {
        Self {
            organization: organization.into(),
            project: project.into(),
            credential,
            base_url: DEFAULT_BASE_URL.to_string(),
            release_base_url: DEFAULT_RELEASE_BASE_URL.to_string(),
        }
    }

    /// Point the client at different hosts (on-premises server, test server)
    pub fn with_base_urls(
        mut self,
        base_url: impl Into<String>,
        release_base_url: impl Into<String>,
    ) -> Self {
        self.base_url = base_url.into();
        self.release_base_url = release_base_url.into();
        self
    }
}

/// HTTP client for the Azure DevOps API
///
/// Methods are organized by area:
/// - Builds: definitions, queueing, status
/// - Releases: definitions, creation, status
/// - Artifacts: lookup and download
#[derive(Debug, Clone)]
pub struct DevOpsClient {
    organization: String,
    project: String,
    credential: Credential,
    base_url: Url,
    release_base_url: Url,
    /// HTTP client instance
    client: Client,
}

impl DevOpsClient {
    /// Create a new client for a connection
    ///
    /// Every request gives up after `DEFAULT_REQUEST_TIMEOUT`. Fails if
    /// either base URL is not an absolute http(s) URL.
    pub fn new(connection: Connection) -> Result<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .build()?;
        Self::with_client(connection, client)
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(connection: Connection, client: Client) -> Result<Self> {
        if connection.organization.trim().is_empty() {
            return Err(ClientError::InvalidRequest(
                "organization cannot be empty".to_string(),
            ));
        }
        if connection.project.trim().is_empty() {
            return Err(ClientError::InvalidRequest(
                "project cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            base_url: parse_base_url(&connection.base_url)?,
            release_base_url: parse_base_url(&connection.release_base_url)?,
            organization: connection.organization,
            project: connection.project,
            credential: connection.credential,
            client,
        })
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    /// Web page showing the results of a build
    pub fn build_results_url(&self, build_id: u64) -> String {
        let mut url = self.project_url(&self.base_url, &["_build", "results"]);
        url.query_pairs_mut()
            .append_pair("buildId", &build_id.to_string())
            .append_pair("view", "results");
        url.to_string()
    }

    /// Web page showing the progress of a release
    pub fn release_progress_url(&self, release_id: u64) -> String {
        let mut url = self.project_url(&self.base_url, &["_releaseProgress"]);
        url.query_pairs_mut()
            .append_pair("_a", "release-pipeline-progress")
            .append_pair("releaseId", &release_id.to_string());
        url.to_string()
    }

    // =============================================================================
    // Request Builders
    // =============================================================================

    /// `{base}/{organization}/{project}/{segments...}`
    fn project_url(&self, base: &Url, segments: &[&str]) -> Url {
        let mut url = base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty()
                .push(&self.organization)
                .push(&self.project)
                .extend(segments);
        }
        url
    }

    /// Build API endpoint with the api-version pinned
    fn api_url(&self, segments: &[&str]) -> Url {
        self.versioned(self.project_url(&self.base_url, &prefixed(segments)))
    }

    /// Release management API endpoint with the api-version pinned
    fn release_api_url(&self, segments: &[&str]) -> Url {
        self.versioned(self.project_url(&self.release_base_url, &prefixed(segments)))
    }

    fn versioned(&self, mut url: Url) -> Url {
        url.query_pairs_mut().append_pair("api-version", API_VERSION);
        url
    }

    /// Start an authenticated request
    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!("{} {}", method, url);
        let builder = self.client.request(method, url);
        match &self.credential {
            Credential::Pat(token) => builder.basic_auth("", Some(token)),
            Credential::Bearer(token) => builder.bearer_auth(token),
        }
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let response = self.check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response whose body is raw bytes
    async fn handle_bytes(&self, response: reqwest::Response) -> Result<Vec<u8>> {
        let response = self.check_status(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn check_status(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(response)
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw)
        .map_err(|e| ClientError::InvalidRequest(format!("Invalid base URL '{}': {}", raw, e)))?;

    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::InvalidRequest(format!(
            "Base URL '{}' must be an http:// or https:// URL",
            raw
        )));
    }

    Ok(url)
}

fn prefixed<'a>(segments: &[&'a str]) -> Vec<&'a str> {
    std::iter::once("_apis")
        .chain(segments.iter().copied())
        .collect()
}
