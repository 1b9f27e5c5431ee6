//! Type inference over raw documentation type strings
//!
//! Maps prose type descriptions ("Array of String", "String (ISO 8601
//! Datetime)", "[Account]({{< relref ... >}})") onto normalized type
//! descriptors, and extracts enum value sets and default values from free
//! prose. Classification is an ordered list of (predicate, extractor)
//! rules evaluated first-match-wins; the order is load-bearing and must
//! not be changed casually.

use doc2openapi_common::{PrimitiveKind, TypeDescriptor};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static LINK_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([A-Za-z0-9 ::_\-]+)\]").unwrap());

static BACKTICK_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`\s][^`]*)`").unwrap());

static DEFAULT_RE: LazyLock<Regex> = LazyLock::new(|| {
    // The match must terminate at a period or end of string, rejecting
    // longer descriptive continuations ("defaults to the user's locale").
    Regex::new(r"[Dd]efaults? to (?:`([^`]+)`|(-?\d+)|([A-Za-z0-9_\-]+))(?:\.|$)").unwrap()
});

static ENUM_PHRASE_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"\bto ((?:`[^`]+`(?:,\s*(?:or\s+)?|\s+or\s+)?)+)").unwrap(),
        Regex::new(r"\bcan be ((?:`[^`]+`(?:,\s*(?:or\s+)?|\s+or\s+)?)+)").unwrap(),
        Regex::new(r"\b[Oo]ne of:?\s+([^.\n]+)").unwrap(),
        Regex::new(r"\bdue to ((?:`[^`]+`(?:,\s*(?:or\s+)?|\s+or\s+)?)+)").unwrap(),
    ]
});

/// Documentation link tokens that are format hints, not entity names
const FORMAT_LINK_HINTS: &[(&str, Option<&str>)] = &[
    ("Date", Some("date")),
    ("Datetime", Some("date-time")),
    ("DateTime", Some("date-time")),
    ("ISO8601", Some("date-time")),
    ("ISO 8601 Datetime", Some("date-time")),
    ("ISO 639", None),
    ("ISO 639-1", None),
];

/// Type inference engine, parameterized by the set of known entity names.
///
/// References are only emitted for entities that exist in the already
/// built component set; anything else degrades to a conservative string
/// or object shape.
pub struct TypeInference<'a> {
    known_entities: &'a HashSet<String>,
}

impl<'a> TypeInference<'a> {
    pub fn new(known_entities: &'a HashSet<String>) -> Self {
        Self { known_entities }
    }

    /// Infer a descriptor from a raw type string.
    pub fn infer(&self, raw: &str) -> TypeDescriptor {
        let rules: &[fn(&Self, &str) -> Option<TypeDescriptor>] = &[
            Self::string_or_array_of_strings,
            Self::array_of,
            Self::linked_reference,
            Self::primitive,
        ];

        for rule in rules {
            if let Some(descriptor) = rule(self, raw) {
                return descriptor;
            }
        }
        TypeDescriptor::string()
    }

    /// Infer a parameter schema from its description prose, which leads
    /// with a type sentence ("String. The text content of the status.").
    pub fn infer_from_description(&self, description: &str) -> TypeDescriptor {
        let leading = description.split('.').next().unwrap_or(description);
        self.infer(leading)
    }

    /// Composite production: "String or Array of Strings" yields a union
    /// of both arms; a URI hint in the text applies to both.
    fn string_or_array_of_strings(&self, raw: &str) -> Option<TypeDescriptor> {
        let lower = raw.to_lowercase();
        if !(lower.contains("string or array of string")) {
            return None;
        }
        let format = if lower.contains("url") || lower.contains("uri") {
            Some("uri")
        } else {
            None
        };
        let arm = match format {
            Some(f) => TypeDescriptor::string_with_format(f),
            None => TypeDescriptor::string(),
        };
        Some(TypeDescriptor::OneOf(vec![
            arm.clone(),
            TypeDescriptor::array_of(arm),
        ]))
    }

    fn array_of(&self, raw: &str) -> Option<TypeDescriptor> {
        let trimmed = raw.trim();
        let rest = trimmed
            .strip_prefix("Array of ")
            .or_else(|| trimmed.strip_prefix("array of "))?;
        Some(TypeDescriptor::array_of(self.infer(rest)))
    }

    /// Bracketed documentation links: either entity references, a union
    /// of references ("[A] or [B]"), or a known format-hint token.
    fn linked_reference(&self, raw: &str) -> Option<TypeDescriptor> {
        let tokens: Vec<&str> = LINK_TOKEN_RE
            .captures_iter(raw)
            .map(|c| c.get(1).unwrap().as_str().trim())
            .collect();
        if tokens.is_empty() {
            return None;
        }

        // Format hints are documentation links too; they never name
        // entities.
        if let Some((_, format)) = FORMAT_LINK_HINTS
            .iter()
            .find(|(hint, _)| tokens.iter().any(|t| t.eq_ignore_ascii_case(hint)))
        {
            return Some(match format {
                Some(f) => TypeDescriptor::string_with_format(f),
                None => TypeDescriptor::string(),
            });
        }

        let refs: Vec<String> = tokens
            .iter()
            .map(|t| normalize_entity_name(t))
            .filter(|t| self.known_entities.contains(t))
            .collect();

        match refs.len() {
            0 => None,
            1 => Some(TypeDescriptor::Reference(refs.into_iter().next().unwrap())),
            _ => Some(TypeDescriptor::OneOf(
                refs.into_iter().map(TypeDescriptor::Reference).collect(),
            )),
        }
    }

    fn primitive(&self, raw: &str) -> Option<TypeDescriptor> {
        let lower = raw.to_lowercase();

        if lower.contains("string")
            || lower.contains("datetime")
            || lower.contains("date")
            || lower.contains("url")
            || lower.contains("email")
        {
            return Some(TypeDescriptor::Primitive {
                kind: PrimitiveKind::String,
                format: detect_string_format(&lower),
            });
        }
        if lower.contains("integer") {
            return Some(TypeDescriptor::primitive(PrimitiveKind::Integer));
        }
        if lower.contains("number") || lower.contains("float") {
            return Some(TypeDescriptor::primitive(PrimitiveKind::Number));
        }
        if lower.contains("boolean") {
            return Some(TypeDescriptor::primitive(PrimitiveKind::Boolean));
        }
        if lower.contains("hash") || lower.contains("object") {
            return Some(TypeDescriptor::empty_object());
        }
        None
    }
}

/// Format hints in a string type, in fixed priority order: datetime-like
/// tokens win over the bare "date", which wins over URL and email hints.
fn detect_string_format(lower: &str) -> Option<String> {
    if lower.contains("datetime") || lower.contains("date-time") || lower.contains("iso 8601") {
        Some("date-time".to_string())
    } else if lower.contains("date") {
        Some("date".to_string())
    } else if lower.contains("url") || lower.contains("uri") {
        Some("uri".to_string())
    } else if lower.contains("email") {
        Some("email".to_string())
    } else {
        None
    }
}

/// Strip a "entities/" path prefix or surrounding whitespace from a link
/// token so it matches a component name
fn normalize_entity_name(token: &str) -> String {
    token
        .rsplit("::")
        .next()
        .unwrap_or(token)
        .trim()
        .replace(' ', "")
}

/// True when the raw type string carries the enumerable marker
pub fn is_enumerable(raw_type: &str) -> bool {
    raw_type.to_lowercase().contains("enumerable")
}

/// Extract an enumeration from free prose.
///
/// Ordered textual patterns are tried first; the first pattern yielding
/// MORE THAN ONE token wins. A single token is an example value, not an
/// enumeration, and is discarded. Tokens are kept in document order,
/// deduplicated.
pub fn extract_enum_values(text: &str) -> Vec<String> {
    for re in ENUM_PHRASE_RES.iter() {
        if let Some(cap) = re.captures(text) {
            let list = cap.get(1).unwrap().as_str();
            let tokens = tokenize_value_list(list);
            if tokens.len() > 1 {
                return dedup_preserving_order(tokens);
            }
        }
    }

    // Fallback: every backticked token in the text, same threshold.
    let tokens: Vec<String> = BACKTICK_TOKEN_RE
        .captures_iter(text)
        .map(|c| c.get(1).unwrap().as_str().to_string())
        .filter(|t| is_plausible_enum_token(t))
        .collect();
    if tokens.len() > 1 {
        dedup_preserving_order(tokens)
    } else {
        Vec::new()
    }
}

/// Extract a default value from "default(s) to X" prose.
pub fn extract_default(text: &str) -> Option<serde_json::Value> {
    let cap = DEFAULT_RE.captures(text)?;

    if let Some(literal) = cap.get(1) {
        return Some(literal_to_value(literal.as_str()));
    }
    if let Some(integer) = cap.get(2) {
        return integer.as_str().parse::<i64>().ok().map(Into::into);
    }
    cap.get(3).map(|word| literal_to_value(word.as_str()))
}

fn literal_to_value(s: &str) -> serde_json::Value {
    if let Ok(i) = s.parse::<i64>() {
        return i.into();
    }
    match s {
        "true" => true.into(),
        "false" => false.into(),
        _ => s.into(),
    }
}

fn tokenize_value_list(list: &str) -> Vec<String> {
    if list.contains('`') {
        BACKTICK_TOKEN_RE
            .captures_iter(list)
            .map(|c| c.get(1).unwrap().as_str().to_string())
            .collect()
    } else {
        list.split([','])
            .flat_map(|part| part.split(" or "))
            .map(|t| t.trim().trim_start_matches("or ").trim().to_string())
            .filter(|t| !t.is_empty() && !t.contains(' '))
            .collect()
    }
}

fn dedup_preserving_order(tokens: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    tokens
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Multi-word backticked spans are code samples, not enum members
fn is_plausible_enum_token(token: &str) -> bool {
    !token.contains(' ') && !token.contains('<')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entities(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_primitive_classification() {
        let known = entities(&[]);
        let ti = TypeInference::new(&known);
        assert_eq!(
            ti.infer("String (cast from an integer but not guaranteed to be a number)"),
            TypeDescriptor::string()
        );
        assert_eq!(
            ti.infer("Integer"),
            TypeDescriptor::primitive(PrimitiveKind::Integer)
        );
        assert_eq!(
            ti.infer("Boolean"),
            TypeDescriptor::primitive(PrimitiveKind::Boolean)
        );
        assert_eq!(ti.infer("Hash"), TypeDescriptor::empty_object());
    }

    #[test]
    fn test_string_format_priority() {
        let known = entities(&[]);
        let ti = TypeInference::new(&known);
        assert_eq!(
            ti.infer("String (ISO 8601 Datetime)"),
            TypeDescriptor::string_with_format("date-time")
        );
        assert_eq!(
            ti.infer("String (URL)"),
            TypeDescriptor::string_with_format("uri")
        );
        assert_eq!(
            ti.infer("String (Email)"),
            TypeDescriptor::string_with_format("email")
        );
    }

    #[test]
    fn test_date_link_is_format_hint_not_reference() {
        let known = entities(&["Date"]);
        let ti = TypeInference::new(&known);
        assert_eq!(
            ti.infer("String ([Date](https://example.org/iso-date))"),
            TypeDescriptor::string_with_format("date")
        );
    }

    #[test]
    fn test_array_recursion() {
        let known = entities(&["Account"]);
        let ti = TypeInference::new(&known);
        assert_eq!(
            ti.infer("Array of String"),
            TypeDescriptor::array_of(TypeDescriptor::string())
        );
        assert_eq!(
            ti.infer("Array of [Account]({{< relref \"entities/Account\" >}})"),
            TypeDescriptor::array_of(TypeDescriptor::Reference("Account".to_string()))
        );
    }

    #[test]
    fn test_reference_requires_known_entity() {
        let known = entities(&["Status"]);
        let ti = TypeInference::new(&known);
        assert_eq!(
            ti.infer("[Status]({{< relref \"entities/Status\" >}})"),
            TypeDescriptor::Reference("Status".to_string())
        );
        // Unknown entity degrades to string.
        assert_eq!(
            ti.infer("[Relationship]({{< relref \"entities/Relationship\" >}})"),
            TypeDescriptor::string()
        );
    }

    #[test]
    fn test_union_of_references() {
        let known = entities(&["Status", "ScheduledStatus"]);
        let ti = TypeInference::new(&known);
        assert_eq!(
            ti.infer("[Status] or [ScheduledStatus]"),
            TypeDescriptor::OneOf(vec![
                TypeDescriptor::Reference("Status".to_string()),
                TypeDescriptor::Reference("ScheduledStatus".to_string()),
            ])
        );
    }

    #[test]
    fn test_string_or_array_of_strings() {
        let known = entities(&[]);
        let ti = TypeInference::new(&known);
        let descriptor = ti.infer("String or Array of Strings (URLs)");
        let TypeDescriptor::OneOf(arms) = descriptor else {
            panic!("expected union");
        };
        assert_eq!(arms[0], TypeDescriptor::string_with_format("uri"));
        assert_eq!(
            arms[1],
            TypeDescriptor::array_of(TypeDescriptor::string_with_format("uri"))
        );
    }

    #[test]
    fn test_enum_threshold_single_token_discarded() {
        assert!(extract_enum_values("If `true`, the poll allows multiple answers.").is_empty());
    }

    #[test]
    fn test_enum_extraction_patterns() {
        assert_eq!(
            extract_enum_values("Set to `public`, `unlisted`, or `private`."),
            vec!["public", "unlisted", "private"]
        );
        assert_eq!(
            extract_enum_values("This can be `on` or `off`."),
            vec!["on", "off"]
        );
        assert_eq!(
            extract_enum_values("One of day, month, or year."),
            vec!["day", "month", "year"]
        );
    }

    #[test]
    fn test_enum_dedup_document_order() {
        assert_eq!(
            extract_enum_values("Either `audio`, `image`, `video`, or `image` again."),
            vec!["audio", "image", "video"]
        );
    }

    #[test]
    fn test_default_extraction() {
        assert_eq!(
            extract_default("Maximum number of results to return. Defaults to 20."),
            Some(20.into())
        );
        assert_eq!(
            extract_default("Defaults to `public`."),
            Some("public".into())
        );
        assert_eq!(
            extract_default("Defaults to false."),
            Some(false.into())
        );
        // Descriptive continuations are rejected.
        assert_eq!(
            extract_default("Defaults to the user's current locale and cannot be changed."),
            None
        );
    }
}
