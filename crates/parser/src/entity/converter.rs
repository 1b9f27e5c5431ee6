//! Builds `Entity` records from raw attribute sections

use crate::extract::{parse_attribute_sections, RawAttribute};
use crate::nested::parse_bracket_path;
use doc2openapi_common::{
    version::is_newer_than, Attribute, Entity, OverrideTables, VersionChange,
};
use regex::Regex;
use std::sync::LazyLock;

static BACKTICK_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());

/// Build one entity from a markdown block, appending any nested entities
/// synthesized from hash-typed attributes to `nested_out`.
pub fn build_entity(
    name: &str,
    description: &str,
    block: &str,
    baseline_version: &str,
    overrides: &OverrideTables,
    nested_out: &mut Vec<Entity>,
) -> Entity {
    let raw_attributes = parse_attribute_sections(block);
    let mut entity = Entity::new(name, description);

    for raw in &raw_attributes {
        // Removed attributes are never materialized.
        if raw.removed {
            continue;
        }
        if overrides.drops_superseded_fields(name) && is_superseded(raw) {
            continue;
        }
        // Bracket-named attributes belong to a nested entity, handled below.
        if raw.name.contains('[') {
            continue;
        }
        entity.attributes.push(build_attribute(raw, name, overrides));
    }

    apply_version_nullability(&mut entity, baseline_version);
    synthesize_nested_entities(&mut entity, &raw_attributes, nested_out);

    entity
}

fn build_attribute(raw: &RawAttribute, entity_name: &str, overrides: &OverrideTables) -> Attribute {
    let mut attr = Attribute::new(&raw.name, &raw.raw_type, &raw.description);
    attr.optional = raw.optional;
    attr.deprecated =
        raw.deprecated || raw.versions.iter().any(|v| v.change == VersionChange::Deprecated);

    // Enum members come from `value` = meaning lines plus any members a
    // later version introduced. History entries shaped like "`x` added"
    // also describe new sub-fields, so they only extend attributes that
    // are already enumerable.
    attr.enum_values = raw.enum_lines.iter().map(|(v, _)| v.clone()).collect();
    if !attr.enum_values.is_empty() || is_enumerable(&raw.raw_type) {
        for entry in &raw.versions {
            if entry.change == VersionChange::EnumValueAdded {
                for cap in BACKTICK_TOKEN_RE.captures_iter(&entry.text) {
                    let token = cap.get(1).unwrap().as_str().to_string();
                    if !attr.enum_values.contains(&token) {
                        attr.enum_values.push(token);
                    }
                }
            }
        }
    }

    attr.versions = raw.versions.iter().map(|v| v.version.clone()).collect();

    // Optional implies nullable; nullable does not imply optional.
    let doc_nullable = raw.raw_type.to_lowercase().contains("nullable");
    attr.nullable =
        doc_nullable || raw.optional || overrides.is_forced_nullable(entity_name, &raw.name);

    attr
}

/// Version-derived nullability: an attribute becomes nullable when some
/// version in its history is newer than the baseline AND its earliest
/// version differs from a sibling's. When every sibling shares one
/// earliest version the entity itself is new, so no historical client
/// could have expected the field's absence, and the flag stays clear.
fn apply_version_nullability(entity: &mut Entity, baseline: &str) {
    let earliest: Vec<Option<String>> = entity
        .attributes
        .iter()
        .map(|a| a.earliest_version().map(str::to_string))
        .collect();

    let distinct: Vec<&String> = {
        let mut seen: Vec<&String> = Vec::new();
        for e in earliest.iter().flatten() {
            if !seen.contains(&e) {
                seen.push(e);
            }
        }
        seen
    };
    let shared_origin = distinct.len() <= 1;

    for (attr, first) in entity.attributes.iter_mut().zip(&earliest) {
        if shared_origin || first.is_none() {
            continue;
        }
        let has_newer = attr.versions.iter().any(|v| is_newer_than(v, baseline));
        if has_newer {
            attr.nullable = true;
        }
    }
}

fn is_enumerable(raw_type: &str) -> bool {
    let lower = raw_type.to_lowercase();
    lower.contains("enumerable") || lower.contains("one of")
}

/// A "deprecated, use X instead" history entry supersedes this field
fn is_superseded(raw: &RawAttribute) -> bool {
    raw.versions
        .iter()
        .any(|v| v.change == VersionChange::Deprecated && v.text.to_lowercase().contains("use "))
}

/// Hash-typed attributes with bracket-named sub-fields become their own
/// entity; the parent attribute is rewritten to reference it.
fn synthesize_nested_entities(
    entity: &mut Entity,
    raw_attributes: &[RawAttribute],
    nested_out: &mut Vec<Entity>,
) {
    for parent in entity.attributes.iter_mut() {
        let lower = parent.raw_type.to_lowercase();
        if !lower.contains("hash") {
            continue;
        }

        let sub_attrs: Vec<&RawAttribute> = raw_attributes
            .iter()
            .filter(|r| {
                !r.removed
                    && r.name.contains('[')
                    && parse_bracket_path(&r.name)
                        .first()
                        .is_some_and(|s| s.name == parent.name)
            })
            .collect();
        if sub_attrs.is_empty() {
            continue;
        }

        let nested_name = format!("{}{}", entity.name, pascal_case(&parent.name));
        let mut nested = Entity::new(&nested_name, &parent.description);
        for raw in sub_attrs {
            let segments = parse_bracket_path(&raw.name);
            let leaf = segments.last().map(|s| s.name.clone()).unwrap_or_default();
            let mut attr = Attribute::new(&leaf, &raw.raw_type, &raw.description);
            attr.optional = raw.optional;
            attr.nullable = raw.raw_type.to_lowercase().contains("nullable") || raw.optional;
            attr.versions = raw.versions.iter().map(|v| v.version.clone()).collect();
            nested.attributes.push(attr);
        }

        parent.raw_type = if lower.contains("array") {
            format!("Array of [{}]", nested_name)
        } else {
            format!("[{}]", nested_name)
        };
        nested_out.push(nested);
    }
}

fn pascal_case(s: &str) -> String {
    s.split(['_', '-'])
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

#[cfg(test)]
mod tests {
    use super::*;

    fn build(block: &str, baseline: &str) -> (Entity, Vec<Entity>) {
        let mut nested = Vec::new();
        let entity = build_entity(
            "Account",
            "A user account.",
            block,
            baseline,
            &OverrideTables::default(),
            &mut nested,
        );
        (entity, nested)
    }

    #[test]
    fn test_removed_attribute_not_materialized() {
        let block = "### `username`\n\n**Description:** The username.\\\n**Type:** String\n\n### `old` {{%removed%}}\n\n**Description:** Gone.\\\n**Type:** String\n";
        let (entity, _) = build(block, "4.3.0");
        let names: Vec<&str> = entity.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["username"]);
    }

    #[test]
    fn test_version_nullability_field_added_later() {
        let block = "### `username`\n\n**Description:** The username.\\\n**Type:** String\\\n**Version history:**\\\n0.1.0 - added\n\n### `noindex`\n\n**Description:** Opted out of indexing.\\\n**Type:** Boolean\\\n**Version history:**\\\n4.4.0 - added\n";
        let (entity, _) = build(block, "4.3.0");
        assert!(!entity.attributes[0].nullable);
        assert!(entity.attributes[1].nullable);
    }

    #[test]
    fn test_shared_origin_not_nullable() {
        // The whole entity is newer than the baseline, so no field is
        // nullable purely on version grounds.
        let block = "### `a`\n\n**Description:** A.\\\n**Type:** String\\\n**Version history:**\\\n4.5.0 - added\n\n### `b`\n\n**Description:** B.\\\n**Type:** String\\\n**Version history:**\\\n4.5.0 - added\n";
        let (entity, _) = build(block, "4.3.0");
        assert!(entity.attributes.iter().all(|a| !a.nullable));
    }

    #[test]
    fn test_enum_value_added_by_version_entry() {
        let block = "### `visibility`\n\n**Description:** Visibility.\\\n**Type:** String (Enumerable oneOf)\\\n`public` = Everyone.\\\n`private` = Followers.\\\n**Version history:**\\\n0.0.0 - added\\\n4.4.0 - added `limited` value\n";
        let (entity, _) = build(block, "4.3.0");
        assert_eq!(
            entity.attributes[0].enum_values,
            vec!["public", "private", "limited"]
        );
        // Property existed since 0.0.0 with a shared origin, so the 4.4.0
        // enum addition does not make it nullable.
        assert!(!entity.attributes[0].nullable);
    }

    #[test]
    fn test_superseded_field_dropped_on_listed_entity() {
        // `category` carries a "deprecated, use X instead" history entry.
        // Entities on the superseded-exclusion list drop it; others keep
        // it as a deprecated attribute.
        let block = "### `category`\n\n**Description:** The old category.\\\n**Type:** String\\\n**Version history:**\\\n1.0.0 - added\\\n4.0.0 - deprecated, use `types` instead\n\n### `types`\n\n**Description:** The replacement.\\\n**Type:** Array of String\\\n**Version history:**\\\n4.0.0 - added\n";
        let mut nested = Vec::new();

        let notification = build_entity(
            "Notification",
            "A notification.",
            block,
            "4.3.0",
            &OverrideTables::default(),
            &mut nested,
        );
        let names: Vec<&str> =
            notification.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["types"]);

        let (other, _) = build(block, "4.3.0");
        let names: Vec<&str> = other.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["category", "types"]);
        assert!(other.attributes[0].deprecated);
    }

    #[test]
    fn test_history_subfield_note_not_an_enum() {
        // "`x` added" on a non-enumerable attribute describes a sub-field,
        // not an enum member.
        let block = "### `details`\n\n**Description:** Extra details.\\\n**Type:** Hash\\\n**Version history:**\\\n1.0.0 - added\\\n4.1.0 - added `verified_at` field\n";
        let (entity, _) = build(block, "4.3.0");
        assert!(entity.attributes[0].enum_values.is_empty());
    }

    #[test]
    fn test_optional_implies_nullable() {
        let block = "### `silenced` (optional)\n\n**Description:** Whether silenced.\\\n**Type:** Boolean\n";
        let (entity, _) = build(block, "4.3.0");
        assert!(entity.attributes[0].optional);
        assert!(entity.attributes[0].nullable);
    }

    #[test]
    fn test_forced_nullable_override() {
        let block = "### `discoverable`\n\n**Description:** Discovery opt-in.\\\n**Type:** Boolean\n";
        let (entity, _) = build(block, "4.3.0");
        assert!(entity.attributes[0].nullable);
        assert!(!entity.attributes[0].optional);
    }

    #[test]
    fn test_nested_hash_entity_synthesis() {
        let block = "### `fields`\n\n**Description:** Profile metadata.\\\n**Type:** Array of Hash\\\n\n#### `fields[name]`\n\n**Description:** The key.\\\n**Type:** String\n\n#### `fields[value]`\n\n**Description:** The value.\\\n**Type:** String\n";
        let (entity, nested) = build(block, "4.3.0");
        assert_eq!(nested.len(), 1);
        assert_eq!(nested[0].name, "AccountFields");
        let names: Vec<&str> = nested[0].attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["name", "value"]);
        assert_eq!(entity.attributes[0].raw_type, "Array of [AccountFields]");
    }
}
