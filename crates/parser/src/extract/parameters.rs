//! Parameter section extraction
//!
//! Parameters are documented as definition lists under a fixed section
//! label (e.g. "Query parameters", "Form data parameters", "Headers"):
//!
//! ```text
//! ##### Form data parameters
//!
//! status
//! : String. The text content of the status.
//! ```

use regex::Regex;
use std::sync::LazyLock;

static SECTION_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(#{2,6})\s+(.+?)\s*$").unwrap());

static NAME_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_:\[\]\-]*$").unwrap());

/// One raw `name : description` pair from a parameter definition list
#[derive(Debug, Clone, PartialEq)]
pub struct RawParameter {
    pub name: String,
    pub description: String,
    pub required: bool,
}

/// Extract the definition-list pairs under the section with the given
/// label. Returns an empty list when the section is absent or empty.
pub fn parse_parameter_sections(text: &str, section_label: &str) -> Vec<RawParameter> {
    let Some(section) = section_slice(text, section_label) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let mut lines = section.lines().peekable();

    while let Some(line) = lines.next() {
        let name = line.trim();
        if name.is_empty() || !NAME_LINE_RE.is_match(name) {
            continue;
        }

        // A parameter name is followed by one `: description` line plus
        // indented continuation lines, terminated by a blank line or the
        // next parameter name.
        let Some(first) = lines.peek().map(|l| l.trim_start()) else {
            break;
        };
        if !first.starts_with(':') {
            continue;
        }

        let mut description = lines
            .next()
            .map(|l| l.trim_start().trim_start_matches(':').trim().to_string())
            .unwrap_or_default();

        while let Some(next) = lines.peek() {
            let trimmed = next.trim();
            if trimmed.is_empty() || NAME_LINE_RE.is_match(trimmed) && !trimmed.starts_with(':') {
                break;
            }
            description.push(' ');
            description.push_str(trimmed.trim_start_matches(':').trim());
            lines.next();
        }

        let required = description.contains("{{<required>}}")
            || description.to_lowercase().starts_with("required");
        let description = description
            .replace("{{<required>}}", "")
            .trim()
            .to_string();

        out.push(RawParameter {
            name: name.to_string(),
            description,
            required,
        });
    }

    out
}

/// Slice from the labeled heading to the next heading of any level
fn section_slice<'a>(text: &'a str, label: &str) -> Option<&'a str> {
    for cap in SECTION_HEADING_RE.captures_iter(text) {
        let heading_text = cap.get(2).unwrap().as_str();
        if heading_text.eq_ignore_ascii_case(label) {
            let start = cap.get(0).unwrap().end();
            let end = text[start..]
                .find("\n#")
                .map(|p| start + p)
                .unwrap_or(text.len());
            return Some(&text[start..end]);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const METHOD_SECTION: &str = r#"#### Request

##### Headers

Authorization
: {{<required>}} Provide this header with `Bearer <user token>` to gain authorized access.

##### Form data parameters

status
: String. The text content of the status. If `media_ids` is provided, this becomes optional.

media_ids[]
: Array of String. Include Attachment IDs to be attached as media.

poll[options][]
: Array of String. Possible answers to the poll. If provided, `media_ids` cannot be used.

poll[expires_in]
: Integer. Duration that the poll should be open, in seconds.

#### Response
"#;

    #[test]
    fn test_section_label_scoping() {
        let params = parse_parameter_sections(METHOD_SECTION, "Form data parameters");
        let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["status", "media_ids[]", "poll[options][]", "poll[expires_in]"]
        );
    }

    #[test]
    fn test_required_shortcode() {
        let headers = parse_parameter_sections(METHOD_SECTION, "Headers");
        assert_eq!(headers.len(), 1);
        assert_eq!(headers[0].name, "Authorization");
        assert!(headers[0].required);
        assert!(!headers[0].description.contains("{{<required>}}"));
    }

    #[test]
    fn test_missing_section_is_empty() {
        assert!(parse_parameter_sections(METHOD_SECTION, "Query parameters").is_empty());
        assert!(parse_parameter_sections("", "Headers").is_empty());
    }

    #[test]
    fn test_description_not_required_by_default() {
        let params = parse_parameter_sections(METHOD_SECTION, "Form data parameters");
        assert!(!params[0].required);
    }
}
