//! Version history extraction
//!
//! A "Version history:" block lists ordered `version - change` lines:
//!
//! ```text
//! **Version history:**\
//! 0.0.0 - added\
//! 2.7.0 - `scheduled_at` added\
//! 4.0.0 - added `admin.sign_up` type
//! ```

use doc2openapi_common::{VersionChange, VersionEntry};
use regex::Regex;
use std::sync::LazyLock;

static HISTORY_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*Version history:\*\*").unwrap());

static ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*(\d[\w.\-]*)\s*-{1,2}\s*([^\n]+?)\\?\s*$").unwrap());

/// Extract the ordered `(version, change)` pairs following a
/// "Version history:" label. Without the label, returns empty.
pub fn parse_version_history(text: &str) -> Vec<VersionEntry> {
    let Some(label) = HISTORY_LABEL_RE.find(text) else {
        return Vec::new();
    };

    // The block ends at the next bold label, heading, or fenced code block.
    let rest = &text[label.end()..];
    let end = ["\n**", "\n#", "\n```"]
        .iter()
        .filter_map(|d| rest.find(d))
        .min()
        .unwrap_or(rest.len());

    ENTRY_RE
        .captures_iter(&rest[..end])
        .map(|cap| {
            let text = cap.get(2).unwrap().as_str().trim().to_string();
            VersionEntry {
                version: cap.get(1).unwrap().as_str().to_string(),
                change: classify_change(&text),
                text,
            }
        })
        .collect()
}

/// Classify one change text by prefix match.
///
/// "added" alone marks the field itself; "added" naming a backticked token
/// marks an enum value (or sub-field) introduced later. A backticked token
/// followed by "added" ("`scheduled_at` added") reads the same way.
pub fn classify_change(text: &str) -> VersionChange {
    let lower = text.trim().to_lowercase();
    if lower.starts_with("added") {
        if lower.contains('`') {
            VersionChange::EnumValueAdded
        } else {
            VersionChange::Added
        }
    } else if lower.starts_with('`') && lower.contains("added") {
        VersionChange::EnumValueAdded
    } else if lower.starts_with("moved") {
        VersionChange::Moved
    } else if lower.starts_with("deprecated") || lower.contains("use ") && lower.starts_with('`') {
        VersionChange::Deprecated
    } else if lower.starts_with("removed") {
        VersionChange::Removed
    } else {
        VersionChange::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordered_entries() {
        let text = "**Version history:**\\\n0.0.0 - added\\\n2.7.0 - `scheduled_at` added\\\n4.0.0 - added `admin.sign_up` type\n";
        let entries = parse_version_history(text);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].version, "0.0.0");
        assert_eq!(entries[0].change, VersionChange::Added);
        assert_eq!(entries[1].change, VersionChange::EnumValueAdded);
        assert_eq!(entries[2].change, VersionChange::EnumValueAdded);
    }

    #[test]
    fn test_classification_prefixes() {
        assert_eq!(classify_change("added"), VersionChange::Added);
        assert_eq!(classify_change("moved to CredentialAccount"), VersionChange::Moved);
        assert_eq!(
            classify_change("deprecated, use `filtered` instead"),
            VersionChange::Deprecated
        );
        assert_eq!(classify_change("removed"), VersionChange::Removed);
        assert_eq!(classify_change("now returns HTML"), VersionChange::Other);
    }

    #[test]
    fn test_block_ends_at_next_label() {
        let text = "**Version history:**\\\n1.0.0 - added\n\n**Returns:** something\n2.0.0 - not part of the history\n";
        let entries = parse_version_history(text);
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_no_label() {
        assert!(parse_version_history("3.0.0 - added").is_empty());
    }
}
