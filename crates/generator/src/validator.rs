//! Structural validation of the synthesized document
//!
//! Validation failure is the only hard process failure in the pipeline:
//! it means the synthesis engine produced an invalid document, which is a
//! correctness bug here rather than an input-data problem.

use doc2openapi_common::{GeneratorError, Result};
use serde_json::Value;

/// One validation finding: document path plus message
pub type ValidationError = (String, String);

/// Summary counts reported after a successful validation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentStats {
    pub paths: usize,
    pub operations: usize,
    pub schemas: usize,
    pub tags: usize,
}

/// Check required structure of an OpenAPI document. Returns every finding
/// rather than stopping at the first.
pub fn validate(document: &Value) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let Some(root) = document.as_object() else {
        errors.push(("$".to_string(), "document is not an object".to_string()));
        return errors;
    };

    for field in ["openapi", "info", "paths"] {
        if !root.contains_key(field) {
            errors.push(("$".to_string(), format!("missing required field '{}'", field)));
        }
    }

    match root.get("openapi").and_then(Value::as_str) {
        Some(version) if version.starts_with("3.") => {}
        Some(version) => errors.push((
            "$.openapi".to_string(),
            format!("unsupported version '{}', expected 3.x", version),
        )),
        None => {}
    }

    if let Some(info) = root.get("info") {
        match info.as_object() {
            Some(info) => {
                for field in ["title", "version"] {
                    let present = info
                        .get(field)
                        .and_then(Value::as_str)
                        .is_some_and(|s| !s.is_empty());
                    if !present {
                        errors.push((
                            format!("$.info.{}", field),
                            format!("missing or empty '{}'", field),
                        ));
                    }
                }
            }
            None => errors.push(("$.info".to_string(), "info is not an object".to_string())),
        }
    }

    if let Some(paths) = root.get("paths") {
        if !paths.is_object() {
            errors.push(("$.paths".to_string(), "paths is not an object".to_string()));
        }
    }

    if let Some(schemas) = root
        .get("components")
        .and_then(|c| c.get("schemas"))
    {
        if !schemas.is_object() {
            errors.push((
                "$.components.schemas".to_string(),
                "schemas is not an object".to_string(),
            ));
        }
    }

    errors
}

/// Validate and convert findings into the pipeline's hard failure
pub fn validate_document(document: &Value) -> Result<()> {
    let errors = validate(document);
    if errors.is_empty() {
        return Ok(());
    }
    let summary = errors
        .iter()
        .map(|(path, message)| format!("{}: {}", path, message))
        .collect::<Vec<_>>()
        .join("; ");
    Err(GeneratorError::Validation(summary))
}

/// Count paths, operations, schemas, and tags for reporting
pub fn stats(document: &Value) -> DocumentStats {
    const VERBS: [&str; 5] = ["get", "post", "put", "patch", "delete"];

    let paths = document
        .get("paths")
        .and_then(Value::as_object)
        .map(|p| p.len())
        .unwrap_or(0);
    let operations = document
        .get("paths")
        .and_then(Value::as_object)
        .map(|p| {
            p.values()
                .filter_map(Value::as_object)
                .map(|item| VERBS.iter().filter(|v| item.contains_key(**v)).count())
                .sum()
        })
        .unwrap_or(0);
    let schemas = document
        .get("components")
        .and_then(|c| c.get("schemas"))
        .and_then(Value::as_object)
        .map(|s| s.len())
        .unwrap_or(0);
    let tags = document
        .get("tags")
        .and_then(Value::as_array)
        .map(|t| t.len())
        .unwrap_or(0);

    DocumentStats {
        paths,
        operations,
        schemas,
        tags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_document() -> Value {
        json!({
            "openapi": "3.0.3",
            "info": {"title": "Mastodon API", "version": "4.3.0"},
            "paths": {
                "/api/v1/statuses": {"post": {}},
                "/api/v1/timelines/home": {"get": {}, "post": {}}
            },
            "components": {"schemas": {"Status": {}, "Error": {}}},
            "tags": [{"name": "statuses"}]
        })
    }

    #[test]
    fn test_valid_document_passes() {
        assert!(validate(&minimal_document()).is_empty());
        assert!(validate_document(&minimal_document()).is_ok());
    }

    #[test]
    fn test_missing_required_fields() {
        let errors = validate(&json!({"info": {"title": "x", "version": "1"}}));
        let paths: Vec<&str> = errors.iter().map(|(p, _)| p.as_str()).collect();
        assert!(paths.contains(&"$"));
        assert_eq!(errors.len(), 2); // missing openapi, missing paths
    }

    #[test]
    fn test_wrong_version_prefix() {
        let mut document = minimal_document();
        document["openapi"] = json!("2.0");
        let errors = validate(&document);
        assert!(errors.iter().any(|(p, _)| p == "$.openapi"));
        assert!(validate_document(&document).is_err());
    }

    #[test]
    fn test_empty_info_title() {
        let mut document = minimal_document();
        document["info"]["title"] = json!("");
        let errors = validate(&document);
        assert!(errors.iter().any(|(p, _)| p == "$.info.title"));
    }

    #[test]
    fn test_stats_counts() {
        let counted = stats(&minimal_document());
        assert_eq!(
            counted,
            DocumentStats {
                paths: 2,
                operations: 3,
                schemas: 2,
                tags: 1
            }
        );
    }
}
