//! Documentation parsing for doc2openapi
//!
//! This crate recovers a structured intermediate representation
//! (`Entity` / `Method` records) from heading-delimited markdown API
//! documentation.
//!
//! ## Parsing Strategy
//!
//! Parsing is split into three layers, data flowing strictly forward:
//! - `extract::*`: stateless, total functions that pull raw field tuples
//!   out of one markdown section using structural delimiters (headings,
//!   fixed bold labels, fenced code blocks). No semantic interpretation of
//!   type strings happens here; malformed sections yield empty results,
//!   never errors.
//! - `entity` / `method`: per-source-unit builders that assemble the raw
//!   tuples into IR records: bracket paths resolved, removed fields
//!   dropped, version histories folded, nullability derived.
//! - `type_inference`: maps raw type strings and parameter prose to
//!   normalized type descriptors, enum value sets, and default values.

pub mod extract;
pub mod frontmatter;
pub mod nested;
pub mod type_inference;

mod entity;
mod method;

pub use entity::EntityParser;
pub use frontmatter::FrontMatter;
pub use method::{has_file_parameter, MethodParser, ParsedMethods};
