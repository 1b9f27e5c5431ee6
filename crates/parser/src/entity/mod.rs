//! Entity documentation parsing
//!
//! One entity file yields its primary entity (front matter title + first
//! attribute section), any "additional entity" blocks declared in the same
//! file, and nested entities synthesized from hash-typed attributes with
//! inline sub-fields.

mod converter;
mod parser;

pub use parser::EntityParser;
