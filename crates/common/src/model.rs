//! Intermediate representation of parsed API documentation
//!
//! The parser crate produces these records from markdown source files; the
//! generator crate consumes them read-only when synthesizing the OpenAPI
//! document.

use serde::{Deserialize, Serialize};

/// One field on an entity, recovered from an attribute heading and its
/// `**Description:**` / `**Type:**` label pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Field name; may still contain `[]` / `[key]` path segments
    pub name: String,
    /// Raw type string exactly as documented (e.g. "String (ISO 8601 Datetime)")
    pub raw_type: String,
    /// Prose description
    pub description: String,
    /// Marked optional in the documentation
    pub optional: bool,
    /// May be null on some server versions
    pub nullable: bool,
    /// Marked deprecated in the documentation
    pub deprecated: bool,
    /// Enumerated values in document order, deduplicated
    pub enum_values: Vec<String>,
    /// Versions at which the field or its enum members were introduced
    pub versions: Vec<String>,
}

impl Attribute {
    pub fn new(name: &str, raw_type: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            raw_type: raw_type.to_string(),
            description: description.to_string(),
            optional: false,
            nullable: false,
            deprecated: false,
            enum_values: Vec::new(),
            versions: Vec::new(),
        }
    }

    /// Earliest version in this attribute's history, if any
    pub fn earliest_version(&self) -> Option<&str> {
        self.versions
            .iter()
            .min_by(|a, b| crate::version::compare_versions(a, b))
            .map(String::as_str)
    }
}

/// A named structured object type in the source API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub description: String,
    /// Attributes in document order
    pub attributes: Vec<Attribute>,
    /// Parsed JSON example, when the documentation carried one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,
    /// Relative path of the source markdown file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
}

impl Entity {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            attributes: Vec::new(),
            example: None,
            source_file: None,
        }
    }
}

/// Where a method parameter is carried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterLocation {
    Query,
    FormData,
    Header,
    Path,
}

/// One property inside an object-typed parameter schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectProperty {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub schema: TypeDescriptor,
}

/// One method input, after bracket-path resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Root name after resolving nested bracket paths
    pub name: String,
    pub description: String,
    pub required: bool,
    pub location: ParameterLocation,
    /// Enumerated values extracted from the description
    pub enum_values: Vec<String>,
    /// Default value extracted from "defaults to ..." prose
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
    pub schema: TypeDescriptor,
}

/// HTTP verb of a documented method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "PATCH" => Some(Self::Patch),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Patch => "patch",
            Self::Delete => "delete",
        }
    }
}

/// A response status code documented for a method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseCode {
    pub status: String,
    pub description: String,
    /// Raw return-type string specific to this status code, when documented
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
}

/// One documented API operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    pub http_method: HttpMethod,
    /// Path template, possibly with `:param` placeholders
    pub endpoint: String,
    pub description: String,
    pub parameters: Vec<Parameter>,
    /// Raw return-type string (e.g. "[Status]({{< relref ... >}})")
    pub returns: String,
    /// Raw OAuth scope prose (e.g. "User token + `write:statuses`")
    pub oauth: String,
    /// Versions from the method's version history
    pub versions: Vec<String>,
    pub deprecated: bool,
    /// Status code → example JSON literal
    pub response_examples: Vec<(String, serde_json::Value)>,
    pub response_codes: Vec<ResponseCode>,
    /// Operation tag derived from the source directory (e.g. "statuses")
    pub tag: String,
}

/// Normalized output of the type inference engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeDescriptor {
    Primitive {
        kind: PrimitiveKind,
        format: Option<String>,
    },
    Array(Box<TypeDescriptor>),
    Object {
        properties: Vec<ObjectProperty>,
    },
    /// Reference to a named entity component
    Reference(String),
    /// Union of alternative shapes
    OneOf(Vec<TypeDescriptor>),
}

impl TypeDescriptor {
    pub fn string() -> Self {
        Self::Primitive {
            kind: PrimitiveKind::String,
            format: None,
        }
    }

    pub fn string_with_format(format: &str) -> Self {
        Self::Primitive {
            kind: PrimitiveKind::String,
            format: Some(format.to_string()),
        }
    }

    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self::Primitive { kind, format: None }
    }

    pub fn array_of(item: TypeDescriptor) -> Self {
        Self::Array(Box::new(item))
    }

    pub fn empty_object() -> Self {
        Self::Object {
            properties: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    String,
    Integer,
    Number,
    Boolean,
}

impl PrimitiveKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

/// Classification of one version-history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionChange {
    Added,
    EnumValueAdded,
    Moved,
    Deprecated,
    Removed,
    Other,
}

/// One `(version, change)` pair from a "Version history:" block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionEntry {
    pub version: String,
    pub change: VersionChange,
    /// Raw change text after the version marker
    pub text: String,
}
