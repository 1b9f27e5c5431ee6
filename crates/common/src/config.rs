//! Generator configuration loading from YAML files
//!
//! Everything that varies between documentation sets lives here rather than
//! in code: the supported baseline version, the info/servers blocks of the
//! output document, and the locations of collaborator files (override
//! tables, rate-limit headers, license file, OAuth scope catalog). A
//! missing config file degrades to built-in defaults.

use crate::{GeneratorError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration for one generation run
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Product version the generated schema targets; drives the
    /// nullability and unreleased-badge rules
    pub baseline_version: String,
    /// Info block of the output document
    pub info: ApiInfo,
    /// Server template of the output document
    pub server: ServerConfig,
    /// Optional path to the override tables file
    pub overrides_file: Option<PathBuf>,
    /// Optional path to the rate-limit header table
    pub rate_limit_file: Option<PathBuf>,
    /// Optional path to the license file classified for the info block
    pub license_file: Option<PathBuf>,
    /// Optional path to the OAuth scope catalog
    pub scope_catalog_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiInfo {
    pub title: String,
    pub description: String,
    pub contact_name: String,
    pub contact_url: String,
    pub license_name: String,
    pub license_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// URL template, e.g. "https://{instance}"
    pub url: String,
    /// Name of the template variable
    pub variable: String,
    /// Default value for the template variable
    pub default_host: String,
    pub description: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            baseline_version: "4.3.0".to_string(),
            info: ApiInfo::default(),
            server: ServerConfig::default(),
            overrides_file: None,
            rate_limit_file: None,
            license_file: None,
            scope_catalog_file: None,
        }
    }
}

impl Default for ApiInfo {
    fn default() -> Self {
        Self {
            title: "Mastodon API".to_string(),
            description:
                "The Mastodon REST API. Please see https://docs.joinmastodon.org/api/ for more details."
                    .to_string(),
            contact_name: "Mastodon Project".to_string(),
            contact_url: "https://joinmastodon.org".to_string(),
            license_name: "AGPL-3.0".to_string(),
            license_url: "https://github.com/mastodon/mastodon/blob/main/LICENSE".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: "https://{instance}".to_string(),
            variable: "instance".to_string(),
            default_host: "mastodon.social".to_string(),
            description: "The domain of your instance".to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GeneratorError::Parse(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        serde_yaml::from_str(&content).map_err(|e| {
            GeneratorError::Parse(format!("Failed to parse config YAML from {:?}: {}", path, e))
        })
    }

    /// Load configuration, falling back to defaults when the file is
    /// missing. A present-but-malformed file is still an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) if p.exists() => Self::load(p),
            _ => Ok(Self::default()),
        }
    }
}
