//! Component schema synthesis
//!
//! Each entity becomes one object component; attributes become properties
//! with nullability encoded as a two-member `type` union and enum-bearing
//! attributes rewritten to reference a shared enum component.

use crate::document::Schema;
use crate::registry::EnumRegistry;
use doc2openapi_common::{Attribute, Entity, ObjectProperty, TypeDescriptor};
use doc2openapi_parser::type_inference::TypeInference;
use std::collections::{BTreeMap, HashSet};

/// Build object components for every entity, in the order given.
///
/// The caller fixes the visitation order (lexicographic by name) so the
/// enum registry produces stable component names across runs.
pub fn build_entity_schemas(
    entities: &[Entity],
    known_entities: &HashSet<String>,
    registry: &mut EnumRegistry,
    schemas: &mut BTreeMap<String, Schema>,
) {
    for entity in entities {
        let schema = entity_schema(entity, known_entities, registry, schemas);
        schemas.insert(entity.name.clone(), schema);
    }
}

fn entity_schema(
    entity: &Entity,
    known_entities: &HashSet<String>,
    registry: &mut EnumRegistry,
    schemas: &mut BTreeMap<String, Schema>,
) -> Schema {
    let inference = TypeInference::new(known_entities);

    let mut properties = BTreeMap::new();
    let mut required = Vec::new();
    for attr in &entity.attributes {
        properties.insert(
            attr.name.clone(),
            attribute_schema(attr, &entity.name, &inference, registry, schemas),
        );
        if !attr.optional {
            required.push(attr.name.clone());
        }
    }

    let mut schema = Schema::object(properties);
    schema.required = required;
    if !entity.description.is_empty() {
        schema.description = Some(entity.description.clone());
    }
    schema.example = entity.example.clone();
    schema
}

fn attribute_schema(
    attr: &Attribute,
    entity_name: &str,
    inference: &TypeInference,
    registry: &mut EnumRegistry,
    schemas: &mut BTreeMap<String, Schema>,
) -> Schema {
    let descriptor = inference.infer(&attr.raw_type);

    let mut schema = if attr.enum_values.is_empty() {
        schema_from_descriptor(&descriptor)
    } else {
        // Enum attributes reference a shared component, never an inline
        // enum array.
        let component = registry.resolve(entity_name, &attr.name, &attr.enum_values, true, schemas);
        match descriptor {
            TypeDescriptor::Array(_) => Schema::array_of(Schema::reference(&component)),
            _ => Schema::reference(&component),
        }
    };

    // A bare $ref cannot carry sibling keywords in this dialect.
    if schema.reference.is_none() {
        if !attr.description.is_empty() {
            schema.description = Some(attr.description.clone());
        }
        if attr.nullable {
            schema = schema.into_nullable();
        }
        schema.deprecated = attr.deprecated;
    }

    schema
}

/// Render a normalized type descriptor as a schema object
pub fn schema_from_descriptor(descriptor: &TypeDescriptor) -> Schema {
    match descriptor {
        TypeDescriptor::Primitive { kind, format } => {
            let mut schema = Schema::typed(kind.as_str());
            schema.format = format.clone();
            schema
        }
        TypeDescriptor::Array(item) => Schema::array_of(schema_from_descriptor(item)),
        TypeDescriptor::Object { properties } => {
            Schema::object(object_properties(properties))
        }
        TypeDescriptor::Reference(name) => Schema::reference(name),
        TypeDescriptor::OneOf(arms) => Schema {
            one_of: arms.iter().map(schema_from_descriptor).collect(),
            ..Schema::default()
        },
    }
}

fn object_properties(properties: &[ObjectProperty]) -> BTreeMap<String, Schema> {
    properties
        .iter()
        .map(|p| {
            let mut schema = schema_from_descriptor(&p.schema);
            if schema.reference.is_none() {
                schema.description = p.description.clone();
            }
            (p.name.clone(), schema)
        })
        .collect()
}

/// The standard error shape returned by 4xx responses
pub fn error_schema() -> Schema {
    let mut properties = BTreeMap::new();
    let mut error = Schema::string();
    error.description = Some("The error message.".to_string());
    properties.insert("error".to_string(), error);
    let mut detail = Schema::string();
    detail.description = Some("A longer description of the error.".to_string());
    properties.insert("error_description".to_string(), detail);

    let mut schema = Schema::object(properties);
    schema.description = Some("Represents an error message.".to_string());
    schema.required = vec!["error".to_string()];
    schema
}
