//! Bracketed nested-name resolution
//!
//! Parameter and attribute names use bracket notation for nesting:
//! `poll[options][]`, `subscription[keys][auth]`, `media_ids[]`. A name is
//! decomposed into segments, each optionally array-marked; `[]` marks the
//! immediately enclosing segment as array-typed, not the root. Raw entries
//! sharing a root are merged into a single record whose schema carries a
//! composite property tree.

use doc2openapi_common::{ObjectProperty, TypeDescriptor};

/// One resolved path segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub name: String,
    /// The segment was immediately followed by `[]`
    pub is_array: bool,
}

/// Decompose a bracketed name into its path segments.
///
/// `poll[options][]` → `[poll, options*]`; `media_ids[]` → `[media_ids*]`;
/// `status` → `[status]` (asterisk marking array segments).
pub fn parse_bracket_path(name: &str) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();
    let mut current = String::new();
    let mut in_bracket = false;

    for ch in name.chars() {
        match ch {
            '[' => {
                if !current.is_empty() {
                    segments.push(Segment {
                        name: std::mem::take(&mut current),
                        is_array: false,
                    });
                }
                in_bracket = true;
            }
            ']' => {
                if in_bracket {
                    if current.is_empty() {
                        // `[]` marks the previous segment as array-typed
                        if let Some(last) = segments.last_mut() {
                            last.is_array = true;
                        }
                    } else {
                        segments.push(Segment {
                            name: std::mem::take(&mut current),
                            is_array: false,
                        });
                    }
                }
                in_bracket = false;
            }
            _ => current.push(ch),
        }
    }
    if !current.is_empty() {
        segments.push(Segment {
            name: current,
            is_array: false,
        });
    }

    segments
}

/// A raw entry to merge: resolved path plus the leaf schema and its
/// description.
#[derive(Debug, Clone)]
pub struct PathEntry {
    pub segments: Vec<Segment>,
    pub schema: TypeDescriptor,
    pub description: Option<String>,
}

/// Merge entries sharing one root into a single schema descriptor.
///
/// The first segment of every entry must carry the same name (the root);
/// intermediate object nodes are created on demand while walking each
/// path. Returns the composite schema for the root.
pub fn merge_into_schema(entries: &[PathEntry]) -> TypeDescriptor {
    if entries.is_empty() {
        return TypeDescriptor::string();
    }

    // A lone bracket-free entry keeps its own schema.
    if entries.len() == 1 && entries[0].segments.len() == 1 {
        let seg = &entries[0].segments[0];
        let leaf = entries[0].schema.clone();
        return if seg.is_array {
            wrap_array_once(leaf)
        } else {
            leaf
        };
    }

    let root_is_array = entries[0].segments[0].is_array;
    let mut properties: Vec<ObjectProperty> = Vec::new();
    for entry in entries {
        insert_path(
            &mut properties,
            &entry.segments[1..],
            &entry.schema,
            entry.description.as_deref(),
        );
    }

    let object = TypeDescriptor::Object { properties };
    if root_is_array {
        TypeDescriptor::array_of(object)
    } else {
        object
    }
}

fn insert_path(
    properties: &mut Vec<ObjectProperty>,
    segments: &[Segment],
    leaf: &TypeDescriptor,
    description: Option<&str>,
) {
    let Some((segment, rest)) = segments.split_first() else {
        return;
    };

    if rest.is_empty() {
        let schema = if segment.is_array {
            wrap_array_once(leaf.clone())
        } else {
            leaf.clone()
        };
        // A later duplicate leaf does not overwrite an earlier one.
        if properties.iter().all(|p| p.name != segment.name) {
            properties.push(ObjectProperty {
                name: segment.name.clone(),
                description: description.map(str::to_string),
                schema,
            });
        }
        return;
    }

    // Find or create the intermediate object node.
    let position = properties.iter().position(|p| p.name == segment.name);
    let index = match position {
        Some(i) => i,
        None => {
            let node = if segment.is_array {
                TypeDescriptor::array_of(TypeDescriptor::empty_object())
            } else {
                TypeDescriptor::empty_object()
            };
            properties.push(ObjectProperty {
                name: segment.name.clone(),
                description: None,
                schema: node,
            });
            properties.len() - 1
        }
    };

    match &mut properties[index].schema {
        TypeDescriptor::Object { properties: inner } => {
            insert_path(inner, rest, leaf, description);
        }
        TypeDescriptor::Array(item) => {
            if let TypeDescriptor::Object { properties: inner } = item.as_mut() {
                insert_path(inner, rest, leaf, description);
            }
        }
        // An earlier leaf at this position wins; the conflicting deeper
        // path is dropped.
        _ => {}
    }
}

/// Avoid double-wrapping when the leaf schema is already an array of the
/// same item (a name like `media_ids[]` described as "Array of String").
fn wrap_array_once(leaf: TypeDescriptor) -> TypeDescriptor {
    match leaf {
        TypeDescriptor::Array(_) => leaf,
        other => TypeDescriptor::array_of(other),
    }
}
