//! Job domain types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Template parameters passed verbatim to the remote definition
pub type Parameters = HashMap<String, String>;

/// Identifier of one triggered build or release
///
/// Issued by the create call and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHandle {
    pub id: u64,
    pub definition_id: u64,
    /// Build number or release name, when the service reported one
    pub name: Option<String>,
}

impl JobHandle {
    pub fn new(id: u64, definition_id: u64) -> Self {
        Self {
            id,
            definition_id,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} ({})", self.id, name),
            None => write!(f, "{}", self.id),
        }
    }
}
