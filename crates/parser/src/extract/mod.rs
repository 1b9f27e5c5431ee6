//! Extraction layer
//!
//! Total, stateless functions that recover raw field tuples from markdown
//! text using structural delimiters only. Every function here returns an
//! empty or `None` result on malformed input; a single bad section must
//! never abort processing of the remaining sections.

mod attributes;
mod examples;
mod parameters;
mod versions;

pub use attributes::{parse_attribute_sections, RawAttribute};
pub use examples::parse_example_block;
pub use parameters::{parse_parameter_sections, RawParameter};
pub use versions::{classify_change, parse_version_history};
