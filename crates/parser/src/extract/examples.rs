//! Example block extraction with lenient JSON repair
//!
//! Documentation examples are fenced code blocks that mostly, but not
//! always, contain valid JSON. A strict parse is attempted first; on
//! failure two repairs are tried (stripping line comments, then wrapping a
//! bare key-value fragment in braces) before the example is given up on.
//! This function never fails the caller: a malformed example degrades to
//! "no example".

use regex::Regex;
use std::sync::LazyLock;

static FENCED_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json)?\n(.*?)```").unwrap());

/// Extract and parse the first fenced code block in the given text slice.
pub fn parse_example_block(text: &str) -> Option<serde_json::Value> {
    let block = FENCED_BLOCK_RE.captures(text)?;
    let raw = block.get(1).unwrap().as_str().trim();
    if raw.is_empty() {
        return None;
    }

    // Strict parse first.
    if let Ok(value) = serde_json::from_str(raw) {
        return Some(value);
    }

    // Repair 1: strip // line comments (outside string literals).
    let stripped = strip_line_comments(raw);
    if let Ok(value) = serde_json::from_str(stripped.trim()) {
        return Some(value);
    }

    // Repair 2: wrap a bare `"key": value` fragment in braces.
    let trimmed = stripped.trim().trim_end_matches(',');
    if trimmed.starts_with('"') && !trimmed.starts_with("\"{") {
        let wrapped = format!("{{{}}}", trimmed);
        if let Ok(value) = serde_json::from_str(&wrapped) {
            return Some(value);
        }
    }

    None
}

/// Remove `//` comments to end of line, honoring string literals
fn strip_line_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for line in input.lines() {
        let mut in_string = false;
        let mut escaped = false;
        let mut cut = line.len();
        let bytes = line.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            let c = bytes[i];
            if escaped {
                escaped = false;
            } else if c == b'\\' && in_string {
                escaped = true;
            } else if c == b'"' {
                in_string = !in_string;
            } else if !in_string && c == b'/' && i + 1 < bytes.len() && bytes[i + 1] == b'/' {
                cut = i;
                break;
            }
            i += 1;
        }
        out.push_str(line[..cut].trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_parse() {
        let text = "##### 200: OK\n\n```json\n{\"id\": \"1\", \"visibility\": \"public\"}\n```\n";
        let value = parse_example_block(text).unwrap();
        assert_eq!(value["visibility"], "public");
    }

    #[test]
    fn test_comment_repair() {
        let text = "```json\n{\n  \"id\": \"1\", // database id\n  \"count\": 3\n}\n```";
        let value = parse_example_block(text).unwrap();
        assert_eq!(value["count"], 3);
    }

    #[test]
    fn test_comment_inside_string_preserved() {
        let text = "```json\n{\"url\": \"https://example.org/path\"}\n```";
        let value = parse_example_block(text).unwrap();
        assert_eq!(value["url"], "https://example.org/path");
    }

    #[test]
    fn test_fragment_wrap_repair() {
        let text = "```json\n\"error\": \"Record not found\"\n```";
        let value = parse_example_block(text).unwrap();
        assert_eq!(value["error"], "Record not found");
    }

    #[test]
    fn test_unrepairable_returns_none() {
        // Trailing comment plus a missing closing quote: both repairs fail.
        let text = "```json\n{\"id\": \"1, // truncated\n```";
        assert!(parse_example_block(text).is_none());
    }

    #[test]
    fn test_no_fenced_block() {
        assert!(parse_example_block("no code here").is_none());
    }
}
