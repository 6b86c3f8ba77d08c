//! Job definition selection

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dto::DefinitionReference;

/// A definition as listed by the remote system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionRef {
    pub id: u64,
    pub name: String,
}

impl From<DefinitionReference> for DefinitionRef {
    fn from(reference: DefinitionReference) -> Self {
        Self {
            id: reference.id,
            name: reference.name,
        }
    }
}

/// Selects a definition either by numeric ID or by exact name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionSelector {
    /// Numeric definition ID
    Id(u64),
    /// Definition name, matched case-sensitively
    Name(String),
}

impl DefinitionSelector {
    /// Parse user input into a selector
    ///
    /// Input made only of digits is an ID, anything else is a name.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed.parse::<u64>() {
            Ok(id) => DefinitionSelector::Id(id),
            Err(_) => DefinitionSelector::Name(trimmed.to_string()),
        }
    }

    /// Whether a listed definition is an exact match for this selector
    pub fn matches(&self, definition: &DefinitionRef) -> bool {
        match self {
            DefinitionSelector::Id(id) => definition.id == *id,
            DefinitionSelector::Name(name) => definition.name == *name,
        }
    }
}

impl fmt::Display for DefinitionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefinitionSelector::Id(id) => write!(f, "#{}", id),
            DefinitionSelector::Name(name) => write!(f, "'{}'", name),
        }
    }
}

impl From<u64> for DefinitionSelector {
    fn from(id: u64) -> Self {
        DefinitionSelector::Id(id)
    }
}

impl From<&str> for DefinitionSelector {
    fn from(s: &str) -> Self {
        DefinitionSelector::parse(s)
    }
}
