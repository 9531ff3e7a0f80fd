//! Serialisation of resolved themes to the editor's JSON schema.
//!
//! The artifact mirrors declaration order throughout. Unset values are
//! omitted; explicitly transparent colours are kept.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{Result, SassyError};
use crate::resolve::{ResolvedDocument, ResolvedSemantic, ResolvedSettings};
use crate::types::{Colour, FontStyle, ThemeKind};

/// The compiled theme file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeArtifact {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ThemeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic_highlighting: Option<bool>,
    pub colors: IndexMap<String, Colour>,
    pub token_colors: Vec<TokenColorEntry>,
    pub semantic_token_colors: IndexMap<String, SemanticEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenColorEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub scope: ScopeField,
    pub settings: SettingsEntry,
}

/// A single selector is written as a string, several as an array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScopeField {
    One(String),
    Many(Vec<String>),
}

impl From<&[String]> for ScopeField {
    fn from(scopes: &[String]) -> Self {
        match scopes {
            [one] => ScopeField::One(one.clone()),
            many => ScopeField::Many(many.to_vec()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreground: Option<Colour>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
}

impl From<&ResolvedSettings> for SettingsEntry {
    fn from(settings: &ResolvedSettings) -> Self {
        Self {
            foreground: settings.foreground,
            font_style: settings.font_style.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SemanticEntry {
    Colour(Colour),
    Settings(SettingsEntry),
}

impl ThemeArtifact {
    /// Pretty JSON with two-space indentation and a trailing newline.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}

/// Build the output artifact for a resolved document.
///
/// Keys are normalised to trimmed dot-joined segments; two keys that
/// normalise to the same string are a duplicate-key error.
pub fn emit(doc: &ResolvedDocument) -> Result<ThemeArtifact> {
    let mut colors = IndexMap::with_capacity(doc.colors.len());
    for (key, colour) in &doc.colors {
        let normalised = normalise_key(key);
        if colors.insert(normalised.clone(), *colour).is_some() {
            return Err(SassyError::DuplicateKey {
                document: doc.name.clone(),
                key: format!("colors.{}", normalised),
                help: Some("Two colour keys collapse to the same dotted name".to_string()),
            });
        }
    }

    let token_colors = doc
        .token_colors
        .iter()
        .map(|rule| TokenColorEntry {
            name: rule.name.clone(),
            scope: ScopeField::from(rule.scopes.as_slice()),
            settings: SettingsEntry::from(&rule.settings),
        })
        .collect();

    let semantic_token_colors = doc
        .semantic_token_colors
        .iter()
        .map(|(selector, value)| {
            let entry = match value {
                ResolvedSemantic::Colour(c) => SemanticEntry::Colour(*c),
                ResolvedSemantic::Settings(s) => SemanticEntry::Settings(SettingsEntry::from(s)),
            };
            (selector.clone(), entry)
        })
        .collect();

    Ok(ThemeArtifact {
        name: doc.name.clone(),
        kind: doc.kind,
        semantic_highlighting: doc.semantic_highlighting,
        colors,
        token_colors,
        semantic_token_colors,
    })
}

fn normalise_key(key: &str) -> String {
    key.split('.').map(str::trim).collect::<Vec<_>>().join(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::ResolvedRule;
    use pretty_assertions::assert_eq;

    fn resolved() -> ResolvedDocument {
        let mut colors = IndexMap::new();
        colors.insert("editor.background".to_string(), Colour::rgb(0x00, 0x2b, 0x36));
        colors.insert("editor.border".to_string(), Colour::TRANSPARENT);

        let mut semantic = IndexMap::new();
        semantic.insert(
            "string:escape".to_string(),
            ResolvedSemantic::Colour(Colour::rgb(0xff, 0xd9, 0x3d)),
        );
        semantic.insert(
            "variable.declaration".to_string(),
            ResolvedSemantic::Settings(ResolvedSettings {
                foreground: None,
                font_style: FontStyle::parse("bold").ok(),
            }),
        );

        ResolvedDocument {
            name: "Sassy Dark".to_string(),
            kind: ThemeKind::Dark,
            semantic_highlighting: Some(true),
            colors,
            token_colors: vec![
                ResolvedRule {
                    name: Some("Comment".to_string()),
                    scopes: vec!["comment".to_string()],
                    settings: ResolvedSettings {
                        foreground: Some(Colour::new(0x83, 0x94, 0x96, 0x80)),
                        font_style: FontStyle::parse("italic").ok(),
                    },
                },
                ResolvedRule {
                    name: None,
                    scopes: vec!["keyword".to_string(), "storage".to_string()],
                    settings: ResolvedSettings {
                        foreground: Some(Colour::rgb(0x85, 0x99, 0x00)),
                        font_style: None,
                    },
                },
            ],
            semantic_token_colors: semantic,
        }
    }

    #[test]
    fn test_emit_json_shape() {
        let json = emit(&resolved()).unwrap().to_json().unwrap();
        insta::assert_snapshot!(json, @r###"
        {
          "name": "Sassy Dark",
          "type": "dark",
          "semanticHighlighting": true,
          "colors": {
            "editor.background": "#002b36",
            "editor.border": "#00000000"
          },
          "tokenColors": [
            {
              "name": "Comment",
              "scope": "comment",
              "settings": {
                "foreground": "#83949680",
                "fontStyle": "italic"
              }
            },
            {
              "scope": [
                "keyword",
                "storage"
              ],
              "settings": {
                "foreground": "#859900"
              }
            }
          ],
          "semanticTokenColors": {
            "string:escape": "#ffd93d",
            "variable.declaration": {
              "fontStyle": "bold"
            }
          }
        }
        "###);
    }

    #[test]
    fn test_trailing_newline() {
        let json = emit(&resolved()).unwrap().to_json().unwrap();
        assert!(json.ends_with("}\n"));
    }

    #[test]
    fn test_semantic_highlighting_omitted_when_unset() {
        let mut doc = resolved();
        doc.semantic_highlighting = None;
        let value = serde_json::to_value(emit(&doc).unwrap()).unwrap();
        assert!(value.get("semanticHighlighting").is_none());
    }

    #[test]
    fn test_normalised_keys_collide() {
        let mut doc = resolved();
        doc.colors.insert("editor .background".to_string(), Colour::BLACK);
        let err = emit(&doc).unwrap_err();
        assert!(matches!(err, SassyError::DuplicateKey { ref key, .. } if key == "colors.editor.background"));
    }

    #[test]
    fn test_scope_field_forms() {
        let one = vec!["comment".to_string()];
        assert_eq!(ScopeField::from(one.as_slice()), ScopeField::One("comment".to_string()));

        let two = vec!["a".to_string(), "b".to_string()];
        assert_eq!(ScopeField::from(two.as_slice()), ScopeField::Many(two.clone()));
    }
}
