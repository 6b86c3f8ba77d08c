//! Data Transfer Objects for the Azure DevOps REST API
//!
//! These mirror the JSON bodies exchanged with the build and release
//! endpoints. Only the fields relay reads or writes are modelled; everything
//! else in a response is ignored.

pub mod build;
pub mod release;

use serde::{Deserialize, Serialize};

/// Envelope used by every Azure DevOps list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default)]
    pub count: usize,
    pub value: Vec<T>,
}

/// `{ "id": .., "name": .. }` reference to a build or release definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionReference {
    pub id: u64,
    #[serde(default)]
    pub name: String,
}
