//! Hand-coded exception tables
//!
//! A small number of documented fields are known to behave differently on
//! real servers than their documentation claims. These exceptions are kept
//! as explicit, externally loadable data so parity audits against the
//! source documentation stay tractable. They are looked up, never inferred.

use crate::{GeneratorError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A reference to one attribute of one entity
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FieldRef {
    pub entity: String,
    pub attribute: String,
}

/// Exception tables applied by the semantic model builder
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OverrideTables {
    /// Attributes forced nullable because observed server behavior
    /// contradicts the documented type
    pub nullable_fields: Vec<FieldRef>,
    /// Entities on which a field superseded via a "deprecated, use X
    /// instead" history entry is dropped entirely, to avoid emitting two
    /// competing enum fields for the same concept
    pub superseded_exclusions: Vec<String>,
}

impl Default for OverrideTables {
    fn default() -> Self {
        Self {
            nullable_fields: vec![
                FieldRef {
                    entity: "Account".to_string(),
                    attribute: "discoverable".to_string(),
                },
                FieldRef {
                    entity: "Status".to_string(),
                    attribute: "language".to_string(),
                },
            ],
            superseded_exclusions: vec!["Notification".to_string()],
        }
    }
}

impl OverrideTables {
    /// Load override tables from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GeneratorError::Parse(format!("Failed to read override file {:?}: {}", path, e))
        })?;

        serde_yaml::from_str(&content).map_err(|e| {
            GeneratorError::Parse(format!(
                "Failed to parse override YAML from {:?}: {}",
                path, e
            ))
        })
    }

    /// Load override tables, falling back to the built-in defaults when
    /// the file is missing
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) if p.exists() => Self::load(p),
            _ => Ok(Self::default()),
        }
    }

    pub fn is_forced_nullable(&self, entity: &str, attribute: &str) -> bool {
        self.nullable_fields
            .iter()
            .any(|f| f.entity == entity && f.attribute == attribute)
    }

    pub fn drops_superseded_fields(&self, entity: &str) -> bool {
        self.superseded_exclusions.iter().any(|e| e == entity)
    }
}
