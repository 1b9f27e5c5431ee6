//! YAML front matter handling
//!
//! Documentation files open with a `---` fenced YAML block carrying the
//! title, description, and an optional draft flag. Draft files are skipped
//! entirely by the callers.

use serde::Deserialize;

/// Metadata from the YAML front matter of a documentation file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: String,
    pub description: String,
    pub draft: bool,
}

/// Split a documentation file into front matter and body.
///
/// Files without a front matter fence, or with unparseable YAML, yield a
/// default `FrontMatter` and the full text as body.
pub fn parse_front_matter(content: &str) -> (FrontMatter, &str) {
    let Some(rest) = content.strip_prefix("---") else {
        return (FrontMatter::default(), content);
    };

    let Some(end) = rest.find("\n---") else {
        return (FrontMatter::default(), content);
    };

    let yaml = &rest[..end];
    let body = rest[end + 4..].trim_start_matches('\n');

    match serde_yaml::from_str::<FrontMatter>(yaml) {
        Ok(fm) => (fm, body),
        Err(_) => (FrontMatter::default(), content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_front_matter() {
        let doc = "---\ntitle: Status\ndescription: Represents a status.\n---\n\n## Attributes\n";
        let (fm, body) = parse_front_matter(doc);
        assert_eq!(fm.title, "Status");
        assert_eq!(fm.description, "Represents a status.");
        assert!(!fm.draft);
        assert!(body.starts_with("## Attributes"));
    }

    #[test]
    fn test_draft_flag() {
        let doc = "---\ntitle: WIP\ndraft: true\n---\nbody";
        let (fm, _) = parse_front_matter(doc);
        assert!(fm.draft);
    }

    #[test]
    fn test_missing_front_matter() {
        let doc = "## Attributes\n";
        let (fm, body) = parse_front_matter(doc);
        assert_eq!(fm.title, "");
        assert_eq!(body, doc);
    }

    #[test]
    fn test_malformed_yaml_degrades() {
        let doc = "---\ntitle: [unclosed\n---\nbody";
        let (fm, body) = parse_front_matter(doc);
        assert_eq!(fm.title, "");
        assert_eq!(body, doc);
    }
}
