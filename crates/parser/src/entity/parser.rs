//! Entity file parser

use super::converter;
use crate::extract::parse_example_block;
use crate::frontmatter::parse_front_matter;
use doc2openapi_common::{Entity, OverrideTables, Result};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static ADDITIONAL_ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^##\s+([A-Za-z0-9]+)\s+entity(?:\s+attributes)?\b.*$").unwrap());

static EXAMPLE_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^##+\s+Examples?\s*.*$").unwrap());

/// Parses one entity documentation file into `Entity` records
pub struct EntityParser {
    baseline_version: String,
    overrides: OverrideTables,
}

impl EntityParser {
    pub fn new(baseline_version: &str, overrides: OverrideTables) -> Self {
        Self {
            baseline_version: baseline_version.to_string(),
            overrides,
        }
    }

    /// Load and parse an entity file. Draft files yield an empty list.
    pub fn parse_file(&self, path: &Path) -> Result<Vec<Entity>> {
        let content = fs::read_to_string(path)?;
        let source = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string);
        Ok(self.parse_markdown(&content, source.as_deref()))
    }

    /// Parse entity markdown. Never fails: malformed sections are skipped.
    pub fn parse_markdown(&self, content: &str, source_file: Option<&str>) -> Vec<Entity> {
        let (front, body) = parse_front_matter(content);
        if front.draft {
            return Vec::new();
        }

        let primary_name = if front.title.is_empty() {
            source_file
                .map(|f| f.trim_end_matches(".md").to_string())
                .unwrap_or_default()
        } else {
            front.title.clone()
        };
        if primary_name.is_empty() {
            return Vec::new();
        }

        // The primary block runs to the first additional-entity heading.
        let additional: Vec<(usize, String)> = ADDITIONAL_ENTITY_RE
            .captures_iter(body)
            .map(|c| {
                (
                    c.get(0).unwrap().start(),
                    c.get(1).unwrap().as_str().to_string(),
                )
            })
            .collect();
        let primary_end = additional.first().map(|(p, _)| *p).unwrap_or(body.len());

        let mut entities = Vec::new();
        let mut primary = converter::build_entity(
            &primary_name,
            &front.description,
            &body[..primary_end],
            &self.baseline_version,
            &self.overrides,
            &mut entities,
        );
        primary.example = example_for_block(&body[..primary_end]);
        primary.source_file = source_file.map(str::to_string);
        entities.insert(0, primary);

        for (i, (start, name)) in additional.iter().enumerate() {
            let end = additional
                .get(i + 1)
                .map(|(p, _)| *p)
                .unwrap_or(body.len());
            let block = &body[*start..end];
            let mut nested = Vec::new();
            let mut entity = converter::build_entity(
                name,
                "",
                block,
                &self.baseline_version,
                &self.overrides,
                &mut nested,
            );
            if entity.attributes.is_empty() {
                continue;
            }
            entity.source_file = source_file.map(str::to_string);
            entities.push(entity);
            entities.append(&mut nested);
        }

        entities
    }
}

/// Example JSON from the block's "Example" section, if present and parseable
fn example_for_block(block: &str) -> Option<serde_json::Value> {
    let heading = EXAMPLE_HEADING_RE.find(block)?;
    parse_example_block(&block[heading.end()..])
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS_DOC: &str = r#"---
title: Status
description: Represents a status posted by an account.
---

## Example

```json
{
  "id": "103270115826048975",
  "visibility": "public"
}
```

## Attributes

### `id` {#id}

**Description:** ID of the status in the database.\
**Type:** String (cast from an integer but not guaranteed to be a number)\
**Version history:**\
0.1.0 - added

### `visibility` {#visibility}

**Description:** Visibility of this status.\
**Type:** String (Enumerable oneOf)\
`public` = Visible to everyone.\
`unlisted` = Visible to public, but not in timelines.\
`private` = Followers only.\
`direct` = Mentioned users only.\
**Version history:**\
0.9.9 - added

## StatusMention entity attributes {#Mention}

### `id` {#mention-id}

**Description:** The account ID of the mentioned user.\
**Type:** String (cast from an integer, but not guaranteed to be a number)\
**Version history:**\
0.6.0 - added

### `username` {#mention-username}

**Description:** The username of the mentioned user.\
**Type:** String\
**Version history:**\
0.6.0 - added
"#;

    #[test]
    fn test_primary_and_additional_entities() {
        let parser = EntityParser::new("4.3.0", OverrideTables::default());
        let entities = parser.parse_markdown(STATUS_DOC, Some("Status.md"));
        let names: Vec<&str> = entities.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Status", "StatusMention"]);
    }

    #[test]
    fn test_primary_example_parsed() {
        let parser = EntityParser::new("4.3.0", OverrideTables::default());
        let entities = parser.parse_markdown(STATUS_DOC, Some("Status.md"));
        let example = entities[0].example.as_ref().unwrap();
        assert_eq!(example["visibility"], "public");
    }

    #[test]
    fn test_enum_values_from_value_lines() {
        let parser = EntityParser::new("4.3.0", OverrideTables::default());
        let entities = parser.parse_markdown(STATUS_DOC, Some("Status.md"));
        let visibility = entities[0]
            .attributes
            .iter()
            .find(|a| a.name == "visibility")
            .unwrap();
        assert_eq!(
            visibility.enum_values,
            vec!["public", "unlisted", "private", "direct"]
        );
    }

    #[test]
    fn test_draft_file_skipped() {
        let doc = "---\ntitle: Draft\ndraft: true\n---\n### `x`\n\n**Description:** X.\\\n**Type:** String\n";
        let parser = EntityParser::new("4.3.0", OverrideTables::default());
        assert!(parser.parse_markdown(doc, None).is_empty());
    }
}
