//! sassy - Theme compiler for structured editor themes
//!
//! Compiles theme sources written with variables, palettes, colour
//! functions, and imports into the flat JSON theme format editors load.
//!
//! The pipeline is: parse each document, merge the import chain, resolve
//! every colour expression, then lint and emit.

pub mod cli;
pub mod compile;
pub mod discovery;
pub mod emit;
pub mod error;
pub mod lint;
pub mod merge;
pub mod output;
pub mod parser;
pub mod resolve;
pub mod types;

pub use compile::{compile, compile_effective, compile_file, compile_with, CompileOptions, Compiled};
pub use discovery::{discover, discover_paths, load_chain, DiscoveryResult, FsLoader, ImportLoader, Manifest};
pub use emit::{emit, ThemeArtifact};
pub use error::{Result, SassyError};
pub use lint::{lint, lint_resolved, Finding, LintReport, Severity};
pub use merge::merge_chain;
pub use parser::parse_document;
pub use resolve::{resolve_document, resolve_trace, ResolvedDocument, TraceStep};
pub use types::{
    Colour, ColourFn, EffectiveDocument, Expr, Origin, SemanticSelector, ThemeDocument, ThemeKind,
};
