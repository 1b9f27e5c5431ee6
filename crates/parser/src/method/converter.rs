//! Builds typed `Parameter` records and inline response entities

use crate::extract::{parse_parameter_sections, RawParameter};
use crate::nested::{merge_into_schema, parse_bracket_path, PathEntry};
use crate::type_inference::{extract_default, extract_enum_values, TypeInference};
use doc2openapi_common::{
    Attribute, Entity, Method, Parameter, ParameterLocation, PrimitiveKind, TypeDescriptor,
};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static LINK_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([A-Za-z0-9 _\-]+)\]").unwrap());

static FILE_WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bfile\b").unwrap());

/// Parameter sections recognized in a method body, with their locations
const SECTIONS: &[(&str, ParameterLocation)] = &[
    ("Headers", ParameterLocation::Header),
    ("Query parameters", ParameterLocation::Query),
    ("Form data parameters", ParameterLocation::FormData),
];

/// Extract and type every parameter documented in a method section.
///
/// Raw entries sharing a bracket root collapse into one parameter with a
/// composite property tree.
pub fn build_parameters(section: &str, known_entities: &HashSet<String>) -> Vec<Parameter> {
    let inference = TypeInference::new(known_entities);
    let mut out = Vec::new();

    for &(label, location) in SECTIONS {
        let raws = parse_parameter_sections(section, label);

        // Group by bracket root, preserving first-seen order.
        let mut roots: Vec<String> = Vec::new();
        let mut grouped: Vec<Vec<&RawParameter>> = Vec::new();
        for raw in &raws {
            // The Authorization header is represented as a security
            // requirement, not a parameter.
            if location == ParameterLocation::Header && raw.name.eq_ignore_ascii_case("authorization")
            {
                continue;
            }
            let root = parse_bracket_path(&raw.name)
                .first()
                .map(|s| s.name.clone())
                .unwrap_or_else(|| raw.name.clone());
            match roots.iter().position(|r| *r == root) {
                Some(i) => grouped[i].push(raw),
                None => {
                    roots.push(root);
                    grouped.push(vec![raw]);
                }
            }
        }

        for (root, group) in roots.into_iter().zip(grouped) {
            out.push(build_parameter(&root, &group, location, &inference));
        }
    }

    out
}

fn build_parameter(
    root: &str,
    group: &[&RawParameter],
    location: ParameterLocation,
    inference: &TypeInference,
) -> Parameter {
    let entries: Vec<PathEntry> = group
        .iter()
        .map(|raw| PathEntry {
            segments: parse_bracket_path(&raw.name),
            schema: inference.infer_from_description(&raw.description),
            description: Some(strip_type_sentence(&raw.description)),
        })
        .collect();

    let schema = merge_into_schema(&entries);

    // Enum and default extraction only make sense for simple parameters;
    // a merged object root has no single describing sentence.
    let simple = group.len() == 1 && group[0].name == root;
    let (description, enum_values, default_value) = if simple {
        let description = strip_type_sentence(&group[0].description);
        (
            description.clone(),
            extract_enum_values(&group[0].description),
            extract_default(&group[0].description),
        )
    } else if group.len() == 1 {
        (strip_type_sentence(&group[0].description), Vec::new(), None)
    } else {
        (String::new(), Vec::new(), None)
    };

    Parameter {
        name: root.to_string(),
        description,
        required: group.iter().any(|raw| raw.required),
        location,
        enum_values,
        default_value,
        schema,
    }
}

/// Drop the leading type sentence ("String. ..." / "Array of String. ...")
/// from a parameter description, keeping the prose
fn strip_type_sentence(description: &str) -> String {
    let Some((first, rest)) = description.split_once(". ") else {
        return description.trim().to_string();
    };
    let lower = first.to_lowercase();
    let type_words = ["string", "integer", "boolean", "number", "float", "hash", "array"];
    if type_words.iter().any(|w| lower.contains(w)) && first.len() < 40 {
        rest.trim().to_string()
    } else {
        description.trim().to_string()
    }
}

/// Synthesize an inline response-shape entity when the method's return
/// type names no known entity but a 2xx example block exists.
pub fn synthesize_response_entity(
    method: &Method,
    known_entities: &HashSet<String>,
) -> Option<Entity> {
    let resolvable = LINK_TOKEN_RE
        .captures_iter(&method.returns)
        .any(|c| known_entities.contains(c.get(1).unwrap().as_str().trim()));
    if resolvable {
        return None;
    }

    let (_, example) = method
        .response_examples
        .iter()
        .find(|(status, _)| status.starts_with('2'))?;
    let object = example.as_object()?;
    if object.is_empty() {
        return None;
    }

    let name = format!("{}Response", pascal_case(&method.name));
    let mut entity = Entity::new(&name, &method.description);
    for (key, value) in object {
        entity
            .attributes
            .push(Attribute::new(key, json_type_name(value), ""));
    }
    entity.example = Some(example.clone());
    Some(entity)
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Bool(_) => "Boolean",
        serde_json::Value::Number(n) if n.is_i64() || n.is_u64() => "Integer",
        serde_json::Value::Number(_) => "Number",
        serde_json::Value::Array(_) => "Array of String",
        serde_json::Value::Object(_) => "Hash",
        _ => "String",
    }
}

fn pascal_case(s: &str) -> String {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|p| !p.is_empty())
        .map(|p| {
            let mut chars = p.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Whether any parameter carries file content, which forces a multipart
/// request body. "file" must stand alone as a word so prose like
/// "profile" does not match.
pub fn has_file_parameter(parameters: &[Parameter]) -> bool {
    parameters.iter().any(|p| {
        let lower = format!("{} {}", p.name, p.description).to_lowercase();
        FILE_WORD_RE.is_match(&lower)
            || lower.contains("multipart")
            || lower.contains("image encoded")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc2openapi_common::HttpMethod;

    #[test]
    fn test_strip_type_sentence() {
        assert_eq!(
            strip_type_sentence("String. The text content of the status."),
            "The text content of the status."
        );
        assert_eq!(
            strip_type_sentence("Whether the status is sensitive."),
            "Whether the status is sensitive."
        );
    }

    #[test]
    fn test_query_parameter_typing() {
        let section = "##### Query parameters\n\nlimit\n: Integer. Maximum number of results to return. Defaults to 20.\n\nexclude_types[]\n: Array of String. Types to exclude.\n";
        let params = build_parameters(section, &HashSet::new());
        assert_eq!(params.len(), 2);
        assert_eq!(
            params[0].schema,
            TypeDescriptor::primitive(PrimitiveKind::Integer)
        );
        assert_eq!(params[0].default_value, Some(20.into()));
        assert!(matches!(params[1].schema, TypeDescriptor::Array(_)));
    }

    #[test]
    fn test_profile_prose_does_not_force_multipart() {
        let section = "##### Form data parameters\n\ndisplay_name\n: String. The display name shown on the profile.\n";
        let params = build_parameters(section, &HashSet::new());
        assert!(!has_file_parameter(&params));

        let section = "##### Form data parameters\n\navatar\n: Avatar image encoded using `multipart/form-data`.\n\nthumbnail\n: The file to be attached.\n";
        let params = build_parameters(section, &HashSet::new());
        assert!(has_file_parameter(&params));
    }

    #[test]
    fn test_authorization_header_excluded() {
        let section =
            "##### Headers\n\nAuthorization\n: {{<required>}} Provide this header.\n\nIdempotency-Key\n: String. Unique request key.\n";
        let params = build_parameters(section, &HashSet::new());
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name, "Idempotency-Key");
        assert_eq!(params[0].location, ParameterLocation::Header);
    }

    #[test]
    fn test_enum_threshold_in_parameters() {
        let section = "##### Query parameters\n\nvisibility\n: String. One of `public`, `unlisted`, or `private`.\n\nsensitive\n: Boolean. Set to `true` to mark media as sensitive.\n";
        let params = build_parameters(section, &HashSet::new());
        assert_eq!(params[0].enum_values, vec!["public", "unlisted", "private"]);
        assert!(params[1].enum_values.is_empty());
    }

    fn sample_method(returns: &str, examples: Vec<(String, serde_json::Value)>) -> Method {
        Method {
            name: "View weekly activity".to_string(),
            http_method: HttpMethod::Get,
            endpoint: "/api/v1/instance/activity".to_string(),
            description: "Instance activity over the last 3 months.".to_string(),
            parameters: Vec::new(),
            returns: returns.to_string(),
            oauth: "Public".to_string(),
            versions: Vec::new(),
            deprecated: false,
            response_examples: examples,
            response_codes: Vec::new(),
            tag: "instance".to_string(),
        }
    }

    #[test]
    fn test_inline_entity_from_example() {
        let example = serde_json::json!({"week": "1574640000", "statuses": 37125, "logins": 14239});
        let method = sample_method("Array of Hash", vec![("200".to_string(), example)]);
        let entity = synthesize_response_entity(&method, &HashSet::new()).unwrap();
        assert_eq!(entity.name, "ViewWeeklyActivityResponse");
        assert_eq!(entity.attributes.len(), 3);
    }

    #[test]
    fn test_no_inline_entity_for_known_return() {
        let method = sample_method(
            "[Status]({{< relref \"entities/Status\" >}})",
            vec![("200".to_string(), serde_json::json!({"id": "1"}))],
        );
        let known = HashSet::from(["Status".to_string()]);
        assert!(synthesize_response_entity(&method, &known).is_none());
    }
}
