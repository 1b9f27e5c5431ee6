//! Common types and utilities for doc2openapi
//!
//! This crate contains the shared intermediate representation, error types,
//! configuration, and override tables used across the parser, generator,
//! and CLI components.

use thiserror::Error;

pub mod config;
pub mod model;
pub mod overrides;
pub mod version;

pub use config::GeneratorConfig;
pub use model::{
    Attribute, Entity, HttpMethod, Method, ObjectProperty, Parameter, ParameterLocation,
    PrimitiveKind, ResponseCode, TypeDescriptor, VersionChange, VersionEntry,
};
pub use overrides::OverrideTables;
pub use version::compare_versions;

/// Errors that can occur during documentation compilation
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GeneratorError>;
