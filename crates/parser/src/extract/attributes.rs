//! Attribute section extraction
//!
//! Locates attribute headings (levels 3-5) and, for each, scans only the
//! slice of text up to the next heading for the fixed `**Description:**` /
//! `**Type:**` label pair. A heading with no such pair is silently skipped.

use super::versions::parse_version_history;
use doc2openapi_common::VersionEntry;
use regex::Regex;
use std::sync::LazyLock;

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(#{3,5})\s+`([^`]+)`\s*(.*)$").unwrap());

static DESCRIPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*Description:\*\*\s*([^\n]*)").unwrap());

static TYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*Type:\*\*\s*([^\n]*)").unwrap());

static ENUM_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^`([^`\n]+)`\s*=\s*([^\n]*)$").unwrap());

/// One attribute heading with its raw extracted fields
#[derive(Debug, Clone, PartialEq)]
pub struct RawAttribute {
    pub name: String,
    /// Heading level (3-5); deeper levels indicate nested attributes
    pub level: usize,
    pub optional: bool,
    pub deprecated: bool,
    pub removed: bool,
    pub description: String,
    pub raw_type: String,
    /// `` `value` = meaning `` lines found in the section, document order
    pub enum_lines: Vec<(String, String)>,
    pub versions: Vec<VersionEntry>,
}

/// Extract every attribute section from a markdown body.
///
/// The name is the backticked heading text; modifier shortcodes
/// (`{{%optional%}}`, `{{%deprecated%}}`, `{{%removed%}}`) and prose
/// `(optional)` markers on the heading line set the corresponding flags.
pub fn parse_attribute_sections(text: &str) -> Vec<RawAttribute> {
    let mut out = Vec::new();

    let headings: Vec<(usize, usize, &str, &str, &str)> = HEADING_RE
        .captures_iter(text)
        .map(|c| {
            let m = c.get(0).unwrap();
            (
                m.start(),
                m.end(),
                c.get(1).unwrap().as_str(),
                c.get(2).unwrap().as_str(),
                c.get(3).unwrap().as_str(),
            )
        })
        .collect();

    for (i, &(_, end, hashes, name, trailer)) in headings.iter().enumerate() {
        // Slice up to the next heading of any level, not just the next
        // attribute heading, so a following "## Examples" ends the section.
        let slice_end = text[end..]
            .find("\n#")
            .map(|p| end + p)
            .unwrap_or(text.len());
        // A nested attribute heading inside this slice still starts a new
        // section; cut at the next extracted heading when it comes first.
        let slice_end = headings
            .get(i + 1)
            .map(|h| h.0.min(slice_end))
            .unwrap_or(slice_end);
        let section = &text[end..slice_end];

        let Some(description) = DESCRIPTION_RE.captures(section) else {
            continue;
        };
        let Some(raw_type) = TYPE_RE.captures(section) else {
            continue;
        };

        let enum_lines = ENUM_LINE_RE
            .captures_iter(section)
            .map(|c| {
                (
                    c.get(1).unwrap().as_str().to_string(),
                    c.get(2).unwrap().as_str().trim_end_matches('\\').trim().to_string(),
                )
            })
            .collect();

        out.push(RawAttribute {
            name: name.trim().to_string(),
            level: hashes.len(),
            optional: trailer.contains("{{%optional%}}") || trailer.contains("(optional)"),
            deprecated: trailer.contains("{{%deprecated%}}"),
            removed: trailer.contains("{{%removed%}}"),
            description: clean_label_text(description.get(1).unwrap().as_str()),
            raw_type: clean_label_text(raw_type.get(1).unwrap().as_str()),
            enum_lines,
            versions: parse_version_history(section),
        });
    }

    out
}

/// Strip the trailing hard-break backslash and surrounding whitespace from
/// a bold-label value line
fn clean_label_text(s: &str) -> String {
    s.trim().trim_end_matches('\\').trim().to_string()
}
