//! OpenAPI schema synthesis for doc2openapi
//!
//! Consumes the entity and method records produced by the parser crate
//! and renders one OpenAPI 3.0 document: component schemas, path items,
//! security schemes, and shared building blocks. The enum dedup registry
//! is owned exclusively by the single synthesis pass, and visitation
//! order is fixed (lexicographic) so output is byte-stable across runs.

pub mod document;
pub mod registry;
pub mod validator;

mod components;
mod headers;
mod operations;
mod scopes;

pub use operations::normalize_path;
pub use scopes::{parse_scopes, ScopeCatalog};

use document::{Contact, Info, License, OpenApiDocument, Server, ServerVariable, Tag};
use doc2openapi_common::{Entity, GeneratorConfig, Method, Result};
use operations::OperationBuilder;
use registry::EnumRegistry;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::path::Path;

/// OpenAPI document generator
///
/// One instance drives one synthesis pass. Warnings about degraded
/// collaborator inputs (missing rate-limit table, license file, scope
/// catalog) accumulate here for the caller to report.
pub struct OpenApiGenerator {
    config: GeneratorConfig,
    warnings: Vec<String>,
}

impl OpenApiGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            warnings: Vec::new(),
        }
    }

    /// Warnings accumulated during generation
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Synthesize the full document from the semantic model.
    ///
    /// Entities and methods are re-sorted lexicographically before the
    /// pass so shared-component names do not depend on input order. The
    /// returned document has already passed structural validation; a
    /// validation failure is the pipeline's only hard failure.
    pub fn generate(
        &mut self,
        entities: &[Entity],
        methods: &[Method],
    ) -> Result<OpenApiDocument> {
        let mut entities: Vec<Entity> = entities.to_vec();
        entities.sort_by(|a, b| a.name.cmp(&b.name));
        let mut methods: Vec<Method> = methods.to_vec();
        methods.sort_by(|a, b| {
            (&a.tag, &a.endpoint, a.http_method.as_str())
                .cmp(&(&b.tag, &b.endpoint, b.http_method.as_str()))
        });

        let known_entities: HashSet<String> =
            entities.iter().map(|e| e.name.clone()).collect();

        let mut schemas = BTreeMap::new();
        schemas.insert("Error".to_string(), components::error_schema());

        let mut registry = EnumRegistry::new();
        components::build_entity_schemas(&entities, &known_entities, &mut registry, &mut schemas);

        let rate_limits = headers::load_rate_limit_headers(
            self.config.rate_limit_file.as_deref(),
            &mut self.warnings,
        );

        let mut paths = BTreeMap::new();
        let mut builder = OperationBuilder::new(
            &self.config.baseline_version,
            &known_entities,
            &rate_limits,
        );
        for method in &methods {
            builder.add_method(method, &mut paths, &mut registry, &mut schemas);
        }

        let catalog = ScopeCatalog::load_or_default(
            self.config.scope_catalog_file.as_deref(),
            &mut self.warnings,
        );
        let security_schemes = scopes::security_schemes(&catalog, builder.used_scopes());

        let license_name = headers::classify_license(
            self.config.license_file.as_deref(),
            &self.config.info.license_name,
            &mut self.warnings,
        );
        let license_url = (license_name == self.config.info.license_name)
            .then(|| self.config.info.license_url.clone());

        let tags: Vec<Tag> = methods
            .iter()
            .map(|m| m.tag.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(|name| Tag {
                name,
                description: None,
            })
            .collect();

        let document = OpenApiDocument {
            openapi: "3.0.3".to_string(),
            info: Info {
                title: self.config.info.title.clone(),
                version: self.config.baseline_version.clone(),
                description: Some(self.config.info.description.clone()),
                contact: Some(Contact {
                    name: self.config.info.contact_name.clone(),
                    url: self.config.info.contact_url.clone(),
                }),
                license: Some(License {
                    name: license_name,
                    url: license_url,
                }),
            },
            servers: vec![Server {
                url: self.config.server.url.clone(),
                variables: BTreeMap::from([(
                    self.config.server.variable.clone(),
                    ServerVariable {
                        default: self.config.server.default_host.clone(),
                        description: Some(self.config.server.description.clone()),
                    },
                )]),
            }],
            tags,
            paths,
            components: document::Components {
                schemas,
                security_schemes,
            },
        };

        validator::validate_document(&serde_json::to_value(&document)?)?;
        Ok(document)
    }
}

/// Serialize the document to a YAML file
pub fn write_yaml(document: &OpenApiDocument, path: &Path) -> Result<()> {
    fs::write(path, serde_yaml::to_string(document)?)?;
    Ok(())
}

/// Serialize the document to a pretty-printed JSON file
pub fn write_json(document: &OpenApiDocument, path: &Path) -> Result<()> {
    let mut rendered = serde_json::to_string_pretty(document)?;
    rendered.push('\n');
    fs::write(path, rendered)?;
    Ok(())
}
