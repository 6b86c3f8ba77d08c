//! Build API DTOs

use serde::{Deserialize, Serialize};

use super::DefinitionReference;
use crate::domain::job::Parameters;
use crate::domain::status::{JobStatus, Stage, StageStatus};

/// `{ "id": .. }` reference used when queueing a build
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefinitionId {
    pub id: u64,
}

/// Request body for queueing a build
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueBuild {
    pub definition: DefinitionId,
    /// JSON-encoded map of pipeline variables
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_version: Option<String>,
}

impl QueueBuild {
    pub fn new(definition_id: u64, parameters: &Parameters) -> Self {
        let parameters = if parameters.is_empty() {
            None
        } else {
            serde_json::to_string(parameters).ok()
        };

        Self {
            definition: DefinitionId { id: definition_id },
            parameters,
            source_branch: None,
            source_version: None,
        }
    }
}

/// A queued or running build
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Build {
    pub id: u64,
    #[serde(default)]
    pub build_number: Option<String>,
    /// Lifecycle status (`notStarted`, `inProgress`, `completed`, ...)
    #[serde(default)]
    pub status: Option<StageStatus>,
    /// Result, `none` until the build finishes
    #[serde(default)]
    pub result: Option<StageStatus>,
    #[serde(default)]
    pub definition: Option<DefinitionReference>,
}

impl Build {
    /// The status a build reports as its single stage
    ///
    /// The result wins once it is set; until then the lifecycle status is used.
    pub fn stage_status(&self) -> StageStatus {
        match self.result {
            Some(result) if result != StageStatus::None => result,
            _ => self.status.unwrap_or(StageStatus::Unknown),
        }
    }

    pub fn job_status(&self) -> JobStatus {
        JobStatus::new(vec![Stage::new(self.stage_status())])
    }
}

/// Artifact published by a build
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildArtifact {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    pub resource: ArtifactResource,
}

/// Where an artifact lives and how to fetch it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactResource {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_build_uses_lifecycle_status() {
        let build: Build = serde_json::from_str(
            r#"{"id": 777, "buildNumber": "20240101.1", "status": "inProgress", "result": "none"}"#,
        )
        .unwrap();
        assert_eq!(build.stage_status(), StageStatus::InProgress);
        assert_eq!(build.build_number.as_deref(), Some("20240101.1"));
    }

    #[test]
    fn test_finished_build_uses_result() {
        let build: Build =
            serde_json::from_str(r#"{"id": 777, "status": "completed", "result": "failed"}"#)
                .unwrap();
        assert_eq!(build.stage_status(), StageStatus::Failed);
        assert_eq!(build.job_status().environments.len(), 1);
    }

    #[test]
    fn test_queue_build_encodes_parameters_as_string() {
        let mut parameters = Parameters::new();
        parameters.insert("version".to_string(), "1.2.3".to_string());

        let body = serde_json::to_value(QueueBuild::new(42, &parameters)).unwrap();
        assert_eq!(body["definition"]["id"], 42);
        assert_eq!(body["parameters"], r#"{"version":"1.2.3"}"#);
        assert!(body.get("sourceBranch").is_none());
    }

    #[test]
    fn test_queue_build_omits_empty_parameters() {
        let body = serde_json::to_value(QueueBuild::new(42, &Parameters::new())).unwrap();
        assert!(body.get("parameters").is_none());
    }
}
