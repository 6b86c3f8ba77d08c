//! Release API DTOs

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::DefinitionReference;
use crate::domain::job::Parameters;
use crate::domain::status::{JobStatus, Stage, StageStatus};

/// Value of a release variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationVariable {
    pub value: String,
}

/// Request body for creating a release
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRelease {
    pub definition_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty", default)]
    pub variables: HashMap<String, ConfigurationVariable>,
}

impl CreateRelease {
    pub fn new(definition_id: u64, parameters: &Parameters) -> Self {
        let variables = parameters
            .iter()
            .map(|(name, value)| {
                (
                    name.clone(),
                    ConfigurationVariable {
                        value: value.clone(),
                    },
                )
            })
            .collect();

        Self {
            definition_id,
            description: None,
            variables,
        }
    }
}

/// One deployment environment of a release
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseEnvironment {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    pub status: StageStatus,
}

/// A created release and its environments
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub environments: Vec<ReleaseEnvironment>,
    #[serde(default)]
    pub release_definition: Option<DefinitionReference>,
}

impl Release {
    pub fn job_status(&self) -> JobStatus {
        JobStatus::new(
            self.environments
                .iter()
                .map(|env| Stage {
                    name: env.name.clone(),
                    status: env.status,
                })
                .collect(),
        )
    }
}
