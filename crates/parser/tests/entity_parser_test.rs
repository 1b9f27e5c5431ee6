//! Integration test for the entity parser

use doc2openapi_common::OverrideTables;
use doc2openapi_parser::EntityParser;

const POLL_DOC: &str = r#"---
title: Poll
description: Represents a poll attached to a status.
---

## Example

```json
{
  "id": "34830",
  "expires_at": "2019-12-05T04:05:08.302Z",
  "expired": true,
  "multiple": false,
  "votes_count": 10,
  "options": [
    {
      "title": "accept",
      "votes_count": 6
    },
    {
      "title": "deny",
      "votes_count": 4
    }
  ]
}
```

## Attributes

### `id` {#id}

**Description:** The ID of the poll in the database.\
**Type:** String (cast from an integer, but not guaranteed to be a number)\
**Version history:**\
2.8.0 - added

### `expires_at` {#expires_at}

**Description:** When the poll ends.\
**Type:** {{<nullable>}} String (ISO 8601 Datetime), or null if the poll does not end\
**Version history:**\
2.8.0 - added

### `expired` {#expired}

**Description:** Is the poll currently expired?\
**Type:** Boolean\
**Version history:**\
2.8.0 - added

### `multiple` {#multiple}

**Description:** Does the poll allow multiple-choice answers?\
**Type:** Boolean\
**Version history:**\
2.8.0 - added

### `votes_count` {#votes_count}

**Description:** How many votes have been received.\
**Type:** Integer\
**Version history:**\
2.8.0 - added

### `options` {#options}

**Description:** Possible answers for the poll.\
**Type:** Array of [Poll::Option]({{< relref "entities/Poll#Option" >}})\
**Version history:**\
2.8.0 - added

## Option entity attributes

### `title` {#option-title}

**Description:** The text value of the poll option.\
**Type:** String\
**Version history:**\
2.8.0 - added

### `votes_count` {#option-votes_count}

**Description:** The total number of received votes for this option.\
**Type:** {{<nullable>}} Integer, or null if results are not published yet\
**Version history:**\
2.8.0 - added
"#;

#[test]
fn test_parse_poll_entity_file() {
    let parser = EntityParser::new("4.3.0", OverrideTables::default());
    let entities = parser.parse_markdown(POLL_DOC, Some("Poll.md"));

    assert_eq!(entities.len(), 2);

    let poll = &entities[0];
    assert_eq!(poll.name, "Poll");
    assert_eq!(poll.description, "Represents a poll attached to a status.");
    assert_eq!(poll.attributes.len(), 6);
    assert!(poll.example.is_some());
    assert_eq!(poll.source_file.as_deref(), Some("Poll.md"));

    let option = &entities[1];
    assert_eq!(option.name, "Option");
    assert_eq!(option.attributes.len(), 2);
}

#[test]
fn test_doc_marked_nullable_survives() {
    let parser = EntityParser::new("4.3.0", OverrideTables::default());
    let entities = parser.parse_markdown(POLL_DOC, None);

    let poll = &entities[0];
    let expires_at = poll
        .attributes
        .iter()
        .find(|a| a.name == "expires_at")
        .unwrap();
    assert!(expires_at.nullable);
    assert!(!expires_at.optional);

    let id = poll.attributes.iter().find(|a| a.name == "id").unwrap();
    assert!(!id.nullable);
}

#[test]
fn test_shared_origin_suppresses_version_nullability() {
    // Every attribute appeared in 2.8.0 together, so recency alone does
    // not mark anything nullable even with a later baseline.
    let parser = EntityParser::new("2.0.0", OverrideTables::default());
    let entities = parser.parse_markdown(POLL_DOC, None);
    let poll = &entities[0];
    let expired = poll.attributes.iter().find(|a| a.name == "expired").unwrap();
    assert!(!expired.nullable);
}

#[test]
fn test_post_baseline_attribute_becomes_nullable() {
    let doc = r#"---
title: Report
description: Reports filed against users and/or statuses.
---

## Attributes

### `id` {#id}

**Description:** The ID of the report in the database.\
**Type:** String (cast from an integer)\
**Version history:**\
1.1.0 - added

### `action_taken` {#action_taken}

**Description:** Whether an action was taken yet.\
**Type:** Boolean\
**Version history:**\
1.1.0 - added

### `category` {#category}

**Description:** The generic reason for the report.\
**Type:** String (Enumerable oneOf)\
**Version history:**\
4.4.0 - added
"#;

    let parser = EntityParser::new("4.3.0", OverrideTables::default());
    let entities = parser.parse_markdown(doc, None);
    let report = &entities[0];

    let category = report
        .attributes
        .iter()
        .find(|a| a.name == "category")
        .unwrap();
    assert!(category.nullable, "introduced after the baseline release");

    let id = report.attributes.iter().find(|a| a.name == "id").unwrap();
    assert!(!id.nullable);
}

#[test]
fn test_removed_attribute_is_dropped() {
    let doc = r#"---
title: Filter
description: Represents a user-defined filter.
---

## Attributes

### `id` {#id}

**Description:** The ID of the filter in the database.\
**Type:** String (cast from an integer)\
**Version history:**\
2.4.3 - added

### `irreversible` {{%removed%}} {#irreversible}

**Description:** Should matching entities be dropped by the server?\
**Type:** Boolean\
**Version history:**\
2.4.3 - added\
4.0.0 - removed
"#;

    let parser = EntityParser::new("4.3.0", OverrideTables::default());
    let entities = parser.parse_markdown(doc, None);
    assert_eq!(entities[0].attributes.len(), 1);
    assert_eq!(entities[0].attributes[0].name, "id");
}

#[test]
fn test_nested_hash_attribute_synthesizes_entity() {
    let doc = r#"---
title: Instance
description: Represents the software instance of Mastodon running on this domain.
---

## Attributes

### `domain` {#domain}

**Description:** The WebFinger domain name of the instance.\
**Type:** String\
**Version history:**\
4.0.0 - added

### `usage` {#usage}

**Description:** Usage data for this instance.\
**Type:** Hash\
**Version history:**\
4.0.0 - added

### `usage[users]` {#usage-users}

**Description:** Usage data related to users on this instance.\
**Type:** Hash\
**Version history:**\
4.0.0 - added

### `usage[users][active_month]` {#usage-users-active_month}

**Description:** The number of active users in the past 4 weeks.\
**Type:** Integer\
**Version history:**\
4.0.0 - added
"#;

    let parser = EntityParser::new("4.3.0", OverrideTables::default());
    let entities = parser.parse_markdown(doc, None);

    let instance = &entities[0];
    let usage = instance
        .attributes
        .iter()
        .find(|a| a.name == "usage")
        .unwrap();
    assert_eq!(usage.raw_type, "[InstanceUsage]");

    let synthesized = entities.iter().find(|e| e.name == "InstanceUsage").unwrap();
    assert!(synthesized.attributes.iter().any(|a| a.name == "users"));
}

#[test]
fn test_draft_file_yields_nothing() {
    let doc = "---\ntitle: Future\ndraft: true\n---\n\n## Attributes\n";
    let parser = EntityParser::new("4.3.0", OverrideTables::default());
    assert!(parser.parse_markdown(doc, None).is_empty());
}

#[test]
fn test_enum_lines_collected() {
    let doc = r#"---
title: PreviewCard
description: Represents a rich preview card.
---

## Attributes

### `type` {#type}

**Description:** The type of the preview card.\
**Type:** String (Enumerable, oneOf)\
`link` = Link OEmbed\
`photo` = Photo OEmbed\
`video` = Video OEmbed\
`rich` = iframe OEmbed. Not currently accepted, so won't show up in practice.\
**Version history:**\
1.0.0 - added
"#;

    let parser = EntityParser::new("4.3.0", OverrideTables::default());
    let entities = parser.parse_markdown(doc, None);
    let card_type = &entities[0].attributes[0];
    assert_eq!(card_type.enum_values, vec!["link", "photo", "video", "rich"]);
}

#[test]
fn test_linked_reference_type_retained_raw() {
    let parser = EntityParser::new("4.3.0", OverrideTables::default());
    let entities = parser.parse_markdown(POLL_DOC, None);
    let options = entities[0]
        .attributes
        .iter()
        .find(|a| a.name == "options")
        .unwrap();
    // Raw link text survives for the generator's type resolution pass.
    assert!(options.raw_type.starts_with("Array of [Poll::Option]"));
}
