//! Method documentation parsing
//!
//! One method file documents a family of operations ("## Post a new
//! status" sections) sharing a tag. Each section carries an HTTP fence
//! with the verb and path template, bold Returns/OAuth/Version history
//! labels, parameter definition lists, and per-status response blocks.

mod converter;
mod parser;

pub use converter::has_file_parameter;
pub use parser::{MethodParser, ParsedMethods};
