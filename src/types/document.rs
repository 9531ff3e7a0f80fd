//! Theme source model.
//!
//! A [`ThemeDocument`] is one parsed source file. Merging a chain of them
//! produces an [`EffectiveDocument`] of the same shape.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use super::expr::Expr;
use super::source::{Origin, Sourced};

/// Base type of a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKind {
    Dark,
    Light,
}

impl FromStr for ThemeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "dark" => Ok(ThemeKind::Dark),
            "light" => Ok(ThemeKind::Light),
            other => Err(format!("unknown theme type `{}`", other)),
        }
    }
}

impl fmt::Display for ThemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeKind::Dark => f.write_str("dark"),
            ThemeKind::Light => f.write_str("light"),
        }
    }
}

/// Scalar document metadata. `None` means "not set in this document".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub name: Option<String>,
    pub kind: Option<ThemeKind>,
    pub semantic_highlighting: Option<bool>,
}

/// A validated `fontStyle` value.
///
/// The empty string is kept: it explicitly clears any inherited style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FontStyle(String);

impl FontStyle {
    pub const KEYWORDS: [&'static str; 4] = ["italic", "bold", "underline", "strikethrough"];

    pub fn parse(s: &str) -> Result<Self, String> {
        let mut seen = Vec::new();
        for word in s.split_whitespace() {
            if !Self::KEYWORDS.contains(&word) {
                return Err(format!("unknown font style `{}`", word));
            }
            if !seen.contains(&word) {
                seen.push(word);
            }
        }
        Ok(Self(seen.join(" ")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A value in the `colors` layer.
#[derive(Debug, Clone, PartialEq)]
pub enum ColourSlot {
    Value(Expr),
    /// Declared as `null`: omitted from the output.
    Unset,
}

/// Foreground and font style, as used by token rules and semantic records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenSettings {
    pub foreground: Option<Expr>,
    pub font_style: Option<FontStyle>,
}

impl TokenSettings {
    /// Field-wise merge: fields set in `later` win, others are kept.
    pub fn merged_with(&self, later: &TokenSettings) -> TokenSettings {
        TokenSettings {
            foreground: later.foreground.clone().or_else(|| self.foreground.clone()),
            font_style: later.font_style.clone().or_else(|| self.font_style.clone()),
        }
    }
}

/// One entry of the ordered `tokenColors` layer.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenColorRule {
    pub name: Option<String>,
    pub scopes: Vec<String>,
    pub settings: TokenSettings,
    pub origin: Origin,
}

impl TokenColorRule {
    /// Scope selectors as a set (order and repeats ignored).
    pub fn scope_set(&self) -> BTreeSet<&str> {
        self.scopes.iter().map(String::as_str).collect()
    }

    /// Human-readable identity: `#3 "Comments"` or `#3`.
    pub fn describe(&self, index: usize) -> String {
        describe_rule(index, self.name.as_deref())
    }
}

pub(crate) fn describe_rule(index: usize, name: Option<&str>) -> String {
    match name {
        Some(name) => format!("#{} \"{}\"", index, name),
        None => format!("#{}", index),
    }
}

/// A `semanticTokenColors` value.
#[derive(Debug, Clone, PartialEq)]
pub enum SemanticValue {
    /// Foreground-only shorthand.
    Colour(Expr),
    Settings(TokenSettings),
}

impl SemanticValue {
    /// View as a settings record, promoting a bare colour to `foreground`.
    pub fn to_settings(&self) -> TokenSettings {
        match self {
            SemanticValue::Colour(expr) => TokenSettings {
                foreground: Some(expr.clone()),
                font_style: None,
            },
            SemanticValue::Settings(settings) => settings.clone(),
        }
    }
}

/// One parsed theme source document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeDocument {
    pub origin: Origin,
    pub meta: Metadata,
    pub variables: IndexMap<String, Sourced<Expr>>,
    pub palette: IndexMap<String, Sourced<Expr>>,
    /// Flat, dot-joined keys in declaration order.
    pub colors: IndexMap<String, Sourced<ColourSlot>>,
    /// Keys that were written as nested groups in `colors`.
    pub color_groups: IndexSet<String>,
    pub token_colors: Vec<TokenColorRule>,
    pub semantic_token_colors: IndexMap<String, Sourced<SemanticValue>>,
    pub imports: Vec<String>,
}

impl ThemeDocument {
    /// Create an empty document with the given origin.
    pub fn new(origin: impl Into<Origin>) -> Self {
        Self {
            origin: origin.into(),
            ..Self::default()
        }
    }
}

/// The result of merging an import chain.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveDocument {
    /// Merged contents; `imports` is always empty.
    pub document: ThemeDocument,
    /// Origins of the merged documents, in application order.
    pub sources: Vec<Origin>,
}

impl EffectiveDocument {
    /// Treat the merged result as a standalone, import-free document.
    pub fn to_document(&self) -> ThemeDocument {
        self.document.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_style_parse() {
        assert_eq!(FontStyle::parse("italic bold").unwrap().as_str(), "italic bold");
        assert_eq!(FontStyle::parse(" bold  bold ").unwrap().as_str(), "bold");
        assert_eq!(FontStyle::parse("").unwrap().as_str(), "");
        assert!(FontStyle::parse("oblique").is_err());
    }

    #[test]
    fn test_theme_kind() {
        assert_eq!("light".parse::<ThemeKind>(), Ok(ThemeKind::Light));
        assert!("hc".parse::<ThemeKind>().is_err());
    }

    #[test]
    fn test_scope_set_ignores_order() {
        let rule = |scopes: &[&str]| TokenColorRule {
            name: None,
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
            settings: TokenSettings::default(),
            origin: Origin::default(),
        };
        assert_eq!(
            rule(&["string", "comment"]).scope_set(),
            rule(&["comment", "string", "comment"]).scope_set()
        );
    }

    #[test]
    fn test_settings_merge() {
        let earlier = TokenSettings {
            foreground: Some(Expr::Hex("#aaa".into())),
            font_style: Some(FontStyle::parse("italic").unwrap()),
        };
        let later = TokenSettings {
            foreground: None,
            font_style: Some(FontStyle::parse("bold").unwrap()),
        };
        let merged = earlier.merged_with(&later);
        assert_eq!(merged.foreground, Some(Expr::Hex("#aaa".into())));
        assert_eq!(merged.font_style.unwrap().as_str(), "bold");
    }

    #[test]
    fn test_describe_rule() {
        assert_eq!(describe_rule(2, Some("Comments")), "#2 \"Comments\"");
        assert_eq!(describe_rule(0, None), "#0");
    }
}
