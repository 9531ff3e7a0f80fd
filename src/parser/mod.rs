//! Parser for sassy theme sources.
//!
//! A source file is one YAML (or JSON) document. Nested groups under
//! `colors`, `variables`, and `palette` are flattened to dot-joined keys.
//!
//! # Usage
//!
//! ```ignore
//! use sassy::parser::parse_document;
//!
//! let source = std::fs::read_to_string("themes/dark.sassy.yml")?;
//! let doc = parse_document(&source, "themes/dark.sassy.yml")?;
//! println!("imports: {:?}", doc.imports);
//! ```

mod document;
mod flatten;

pub use document::{parse_document, parse_value};
pub use flatten::{flatten, Flattened};
