//! Core domain types for sassy.
//!
//! This module contains the fundamental types used throughout the pipeline:
//! - `Colour` - canonical RGBA colour values
//! - `Expr` - colour expressions (references, literals, function calls)
//! - `ThemeDocument` - one parsed theme source
//! - `SemanticSelector` - parsed semantic token selectors

mod colour;
mod document;
mod expr;
pub mod functions;
mod named;
mod selector;
mod source;

pub use colour::{Colour, HexError};
pub use document::{
    ColourSlot, EffectiveDocument, FontStyle, Metadata, SemanticValue, ThemeDocument, ThemeKind,
    TokenColorRule, TokenSettings,
};
pub(crate) use document::describe_rule;
pub(crate) use expr::is_name;
pub use expr::{Expr, ExprError};
pub use functions::ColourFn;
pub use named::named_colour;
pub use selector::{SelectorError, SemanticSelector};
pub use source::{Origin, Sourced};
