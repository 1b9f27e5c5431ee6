//! Shared enum component registry
//!
//! The synthesis pass owns exactly one registry. Before a new enum
//! component is created, the value set is canonicalized (sorted,
//! deduplicated) and checked against every component created so far; an
//! exact match is reused, and a subset of an entity-tied enum reuses that
//! enum's reference. Component names are derived from domain vocabulary
//! (entity + field), never from the HTTP method or path of the call site
//! that happened to trigger creation.

use crate::document::Schema;
use std::collections::BTreeMap;

/// One already-created enum component
#[derive(Debug, Clone)]
struct RegisteredEnum {
    name: String,
    /// Canonical (sorted, deduplicated) value set
    key: Vec<String>,
    /// Created from an entity attribute rather than a method parameter
    entity_tied: bool,
}

#[derive(Debug, Default)]
pub struct EnumRegistry {
    entries: Vec<RegisteredEnum>,
}

impl EnumRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a value set to an enum component name, creating the
    /// component in `schemas` when no existing one matches.
    ///
    /// `vocabulary` and `field` name the domain context (entity name or
    /// resource tag, plus the attribute/parameter name) used for a newly
    /// created component.
    pub fn resolve(
        &mut self,
        vocabulary: &str,
        field: &str,
        values: &[String],
        entity_tied: bool,
        schemas: &mut BTreeMap<String, Schema>,
    ) -> String {
        let key = canonical_key(values);

        if let Some(existing) = self.entries.iter().find(|e| e.key == key) {
            return existing.name.clone();
        }

        // A subset of a known entity-tied enum reuses that enum rather
        // than synthesizing a competing component.
        if let Some(existing) = self
            .entries
            .iter()
            .find(|e| e.entity_tied && is_subset(&key, &e.key))
        {
            return existing.name.clone();
        }

        let name = self.unique_name(vocabulary, field, schemas);
        let mut schema = Schema::string();
        // Document order is preserved in the component; only the lookup
        // key is sorted.
        schema.enum_values = dedup_preserving_order(values);
        schemas.insert(name.clone(), schema);

        self.entries.push(RegisteredEnum {
            name: name.clone(),
            key,
            entity_tied,
        });
        name
    }

    fn unique_name(
        &self,
        vocabulary: &str,
        field: &str,
        schemas: &BTreeMap<String, Schema>,
    ) -> String {
        let base = format!("{}{}Enum", pascal_case(vocabulary), pascal_case(field));
        if !schemas.contains_key(&base) {
            return base;
        }
        let mut counter = 2;
        loop {
            let candidate = format!("{}{}", base, counter);
            if !schemas.contains_key(&candidate) {
                return candidate;
            }
            counter += 1;
        }
    }
}

fn canonical_key(values: &[String]) -> Vec<String> {
    let mut key = dedup_preserving_order(values);
    key.sort();
    key
}

fn dedup_preserving_order(values: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for v in values {
        if !out.contains(v) {
            out.push(v.clone());
        }
    }
    out
}

/// Both slices must be sorted
fn is_subset(smaller: &[String], larger: &[String]) -> bool {
    smaller.len() < larger.len() && smaller.iter().all(|v| larger.binary_search(v).is_ok())
}

pub(crate) fn pascal_case(s: &str) -> String {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|p| !p.is_empty())
        .map(|p| {
            let mut chars = p.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}
