//! OAuth scope extraction and security scheme assembly
//!
//! Scopes are recovered from the documented "OAuth:" prose: backticked,
//! colon-namespaced tokens plus the four bare top-level scopes. "Public"
//! methods carry no security requirement; optional-auth wording ("Public,
//! or user token + `read:statuses`") still yields a single non-empty
//! requirement.

use crate::document::{OAuthFlow, OAuthFlows, SecurityRequirement, SecurityScheme};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static BACKTICK_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`\s]+)`").unwrap());

/// Scopes valid without a colon namespace
const TOP_LEVEL_SCOPES: &[&str] = &["read", "write", "follow", "push"];

/// Extract the scope list from OAuth prose. Backticked tokens that are
/// neither colon-namespaced nor a known top-level scope (for example a
/// literal `true`) are excluded.
pub fn parse_scopes(oauth: &str) -> Vec<String> {
    let mut scopes: Vec<String> = Vec::new();
    for cap in BACKTICK_TOKEN_RE.captures_iter(oauth) {
        let token = cap.get(1).unwrap().as_str();
        let valid = token.contains(':') || TOP_LEVEL_SCOPES.contains(&token);
        if valid && !scopes.iter().any(|s| s == token) {
            scopes.push(token.to_string());
        }
    }
    scopes
}

/// Whether the documented OAuth text declares the method public
pub fn is_public(oauth: &str) -> bool {
    oauth.trim().starts_with("Public")
}

/// Build the security requirement for one operation, if any
pub fn security_requirement(oauth: &str) -> Option<Vec<SecurityRequirement>> {
    let scopes = parse_scopes(oauth);
    if scopes.is_empty() {
        if is_public(oauth) || oauth.trim().is_empty() {
            return None;
        }
        // A token is required but no named scope is documented.
        return Some(vec![BTreeMap::from([("OAuth2".to_string(), Vec::new())])]);
    }
    Some(vec![BTreeMap::from([("OAuth2".to_string(), scopes)])])
}

/// Catalog of the scopes advertised by the security scheme flows
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScopeCatalog {
    pub scopes: Vec<String>,
}

impl Default for ScopeCatalog {
    fn default() -> Self {
        Self {
            scopes: TOP_LEVEL_SCOPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ScopeCatalog {
    /// Load the catalog, degrading to the built-in top-level scopes with
    /// a warning when the file is missing or unreadable
    pub fn load_or_default(path: Option<&Path>, warnings: &mut Vec<String>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(catalog) => catalog,
                Err(e) => {
                    warnings.push(format!(
                        "Scope catalog {:?} is malformed ({}), using built-in scopes",
                        path, e
                    ));
                    Self::default()
                }
            },
            Err(_) => {
                warnings.push(format!(
                    "Scope catalog {:?} not found, using built-in scopes",
                    path
                ));
                Self::default()
            }
        }
    }

    /// Scopes for the OAuth2 flows: the catalog plus every scope used by
    /// an operation, each with a description generated by prefix
    pub fn flow_scopes(&self, used: &[String]) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        for scope in self.scopes.iter().chain(used.iter()) {
            out.entry(scope.clone())
                .or_insert_with(|| describe_scope(scope));
        }
        out
    }
}

/// Generate a scope description from its namespace prefix
pub fn describe_scope(scope: &str) -> String {
    if let Some(rest) = scope.strip_prefix("admin:read:") {
        return format!("Read access to {} on the admin API", humanize(rest));
    }
    if let Some(rest) = scope.strip_prefix("admin:write:") {
        return format!("Write access to {} on the admin API", humanize(rest));
    }
    if let Some(rest) = scope.strip_prefix("read:") {
        return format!("Read access to {}", humanize(rest));
    }
    if let Some(rest) = scope.strip_prefix("write:") {
        return format!("Write access to {}", humanize(rest));
    }
    match scope {
        "read" => "Grants read access to all your data".to_string(),
        "write" => "Grants write access to all your data".to_string(),
        "follow" => "Grants access to manage relationships".to_string(),
        "push" => "Grants access to Web Push API subscriptions".to_string(),
        "admin:read" => "Read access to the admin API".to_string(),
        "admin:write" => "Write access to the admin API".to_string(),
        other => format!("Grants access to {}", humanize(other)),
    }
}

fn humanize(token: &str) -> String {
    token.replace(['_', ':'], " ")
}

/// The document-level security schemes: an OAuth2 scheme with the
/// authorization-code and client-credentials flows, plus plain bearer auth
pub fn security_schemes(
    catalog: &ScopeCatalog,
    used_scopes: &[String],
) -> BTreeMap<String, SecurityScheme> {
    let scopes = catalog.flow_scopes(used_scopes);

    let mut schemes = BTreeMap::new();
    schemes.insert(
        "OAuth2".to_string(),
        SecurityScheme::OAuth2 {
            flows: OAuthFlows {
                authorization_code: Some(OAuthFlow {
                    authorization_url: Some("/oauth/authorize".to_string()),
                    token_url: Some("/oauth/token".to_string()),
                    scopes: scopes.clone(),
                }),
                client_credentials: Some(OAuthFlow {
                    authorization_url: None,
                    token_url: Some("/oauth/token".to_string()),
                    scopes,
                }),
            },
        },
    );
    schemes.insert(
        "BearerAuth".to_string(),
        SecurityScheme::Http {
            scheme: "bearer".to_string(),
        },
    );
    schemes
}
