//! Theme document parsing.
//!
//! A theme source is a YAML (or JSON) mapping with metadata, `variables`,
//! `palette`, and the three output layers.

use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};

use crate::error::{Result, SassyError};
use crate::types::{
    ColourSlot, Expr, FontStyle, Origin, SemanticValue, Sourced, ThemeDocument, ThemeKind,
    TokenColorRule, TokenSettings,
};

use super::flatten::{flatten, key_string};

const ROOT_KEYS: &[&str] = &[
    "name",
    "type",
    "semanticHighlighting",
    "imports",
    "variables",
    "vars",
    "palette",
    "colors",
    "tokenColors",
    "semanticTokenColors",
];

/// Parse a theme document from YAML or JSON source text.
pub fn parse_document(source: &str, origin: impl Into<Origin>) -> Result<ThemeDocument> {
    let origin = origin.into();
    let value: Value = serde_yaml::from_str(source).map_err(|e| SassyError::Parse {
        document: origin.to_string(),
        message: format!("invalid YAML: {}", e),
        help: None,
    })?;

    parse_value(&value, origin)
}

/// Parse a theme document from an already-loaded YAML value.
pub fn parse_value(value: &Value, origin: Origin) -> Result<ThemeDocument> {
    let root = value.as_mapping().ok_or_else(|| SassyError::Parse {
        document: origin.to_string(),
        message: "theme document must be a mapping".to_string(),
        help: Some("Start the file with `name: My Theme`".to_string()),
    })?;

    let mut doc = ThemeDocument::new(origin.clone());
    let parser = SectionParser { origin: &origin };

    for (key, value) in root {
        let key = key_string(key, "document", &origin)?;
        match key.as_str() {
            "$schema" => {}
            "name" => doc.meta.name = Some(parser.string(value, "name")?),
            "type" => {
                let kind = parser.string(value, "type")?;
                doc.meta.kind = Some(
                    kind.parse::<ThemeKind>()
                        .map_err(|e| parser.error(e, Some("Use `dark` or `light`")))?,
                );
            }
            "semanticHighlighting" => {
                doc.meta.semantic_highlighting = Some(value.as_bool().ok_or_else(|| {
                    parser.error("semanticHighlighting must be a boolean", None)
                })?);
            }
            "imports" => doc.imports = parser.string_list(value, "imports")?,
            "variables" | "vars" => {
                parser.definitions(value, "variables", &mut doc.variables)?
            }
            "palette" => parser.definitions(value, "palette", &mut doc.palette)?,
            "colors" => parser.colors(value, &mut doc)?,
            "tokenColors" => doc.token_colors = parser.token_colors(value)?,
            "semanticTokenColors" => {
                doc.semantic_token_colors = parser.semantic_token_colors(value)?
            }
            other => {
                return Err(parser.error(
                    format!("unknown section `{}`", other),
                    Some(&format!("Known sections: {}", ROOT_KEYS.join(", "))),
                ))
            }
        }
    }

    if let Some(name) = doc.variables.keys().find(|n| doc.palette.contains_key(*n)) {
        return Err(SassyError::DuplicateKey {
            document: origin.to_string(),
            key: name.clone(),
            help: Some("A name may be defined in `variables` or `palette`, not both".to_string()),
        });
    }

    Ok(doc)
}

struct SectionParser<'a> {
    origin: &'a Origin,
}

impl SectionParser<'_> {
    fn error(&self, message: impl Into<String>, help: Option<&str>) -> SassyError {
        SassyError::Parse {
            document: self.origin.to_string(),
            message: message.into(),
            help: help.map(str::to_string),
        }
    }

    fn string(&self, value: &Value, site: &str) -> Result<String> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.error(format!("{} must be a string", site), None))
    }

    fn string_list(&self, value: &Value, site: &str) -> Result<Vec<String>> {
        match value {
            Value::String(s) => Ok(vec![s.clone()]),
            Value::Sequence(items) => items.iter().map(|v| self.string(v, site)).collect(),
            Value::Null => Ok(vec![]),
            _ => Err(self.error(format!("{} must be a string or a list of strings", site), None)),
        }
    }

    fn mapping<'v>(&self, value: &'v Value, site: &str) -> Result<Option<&'v Mapping>> {
        match value {
            Value::Mapping(map) => Ok(Some(map)),
            Value::Null => Ok(None),
            _ => Err(self.error(format!("{} must be a mapping", site), None)),
        }
    }

    /// Parse a colour expression written as a YAML scalar.
    fn expr(&self, value: &Value, site: &str) -> Result<Expr> {
        let text = match value {
            Value::String(s) => s.as_str(),
            _ => {
                return Err(self.error(
                    format!("{}: expected a colour expression string", site),
                    Some("Quote hex colours: \"#1e1e1e\""),
                ))
            }
        };
        Expr::parse(text).map_err(|e| SassyError::Parse {
            document: self.origin.to_string(),
            message: format!("{}: {}", site, e.message),
            help: e.help,
        })
    }

    fn definitions(
        &self,
        value: &Value,
        section: &str,
        into: &mut IndexMap<String, Sourced<Expr>>,
    ) -> Result<()> {
        let Some(map) = self.mapping(value, section)? else {
            return Ok(());
        };
        for (name, value) in flatten(map, section, self.origin)?.entries {
            let site = format!("{}.{}", section, name);
            let expr = self.expr(&value, &site)?;
            if into.insert(name.clone(), Sourced::new(expr, self.origin.clone())).is_some() {
                return Err(SassyError::DuplicateKey {
                    document: self.origin.to_string(),
                    key: site,
                    help: Some("`vars` is an alias of `variables`".to_string()),
                });
            }
        }
        Ok(())
    }

    fn colors(&self, value: &Value, doc: &mut ThemeDocument) -> Result<()> {
        let Some(map) = self.mapping(value, "colors")? else {
            return Ok(());
        };
        let flat = flatten(map, "colors", self.origin)?;
        for (key, value) in flat.entries {
            let slot = match value {
                Value::Null => ColourSlot::Unset,
                other => ColourSlot::Value(self.expr(&other, &format!("colors.{}", key))?),
            };
            doc.colors.insert(key, Sourced::new(slot, self.origin.clone()));
        }
        doc.color_groups.extend(flat.groups);
        Ok(())
    }

    fn token_colors(&self, value: &Value) -> Result<Vec<TokenColorRule>> {
        let items = match value {
            Value::Sequence(items) => items,
            Value::Null => return Ok(vec![]),
            _ => return Err(self.error("tokenColors must be a list of rules", None)),
        };

        items
            .iter()
            .enumerate()
            .map(|(index, item)| self.token_rule(item, index))
            .collect()
    }

    fn token_rule(&self, value: &Value, index: usize) -> Result<TokenColorRule> {
        let site = format!("tokenColors[{}]", index);
        let map = value
            .as_mapping()
            .ok_or_else(|| self.error(format!("{} must be a mapping", site), None))?;

        let mut name = None;
        let mut scopes = Vec::new();
        let mut settings = TokenSettings::default();

        for (key, value) in map {
            let key = key_string(key, &site, self.origin)?;
            match key.as_str() {
                "name" => name = Some(self.string(value, &format!("{}.name", site))?),
                "scope" => scopes = self.scopes(value, &site)?,
                "settings" => {
                    if let Some(map) = self.mapping(value, &format!("{}.settings", site))? {
                        settings = self.settings(map, &format!("{}.settings", site))?;
                    }
                }
                other => {
                    return Err(self.error(
                        format!("{}: unknown key `{}`", site, other),
                        Some("Rules support `name`, `scope`, and `settings`"),
                    ))
                }
            }
        }

        if scopes.is_empty() {
            return Err(self.error(
                format!("{} has no scope", site),
                Some("Add `scope: keyword` or a list of scopes"),
            ));
        }

        Ok(TokenColorRule {
            name,
            scopes,
            settings,
            origin: self.origin.clone(),
        })
    }

    /// Scopes may be one string, a comma-separated string, or a list.
    fn scopes(&self, value: &Value, site: &str) -> Result<Vec<String>> {
        let raw = self.string_list(value, &format!("{}.scope", site))?;
        Ok(raw
            .iter()
            .flat_map(|s| s.split(','))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn settings(&self, map: &Mapping, site: &str) -> Result<TokenSettings> {
        let mut settings = TokenSettings::default();
        for (key, value) in map {
            let key = key_string(key, site, self.origin)?;
            match key.as_str() {
                "foreground" => {
                    if !value.is_null() {
                        settings.foreground =
                            Some(self.expr(value, &format!("{}.foreground", site))?);
                    }
                }
                "fontStyle" => {
                    if !value.is_null() {
                        let raw = self.string(value, &format!("{}.fontStyle", site))?;
                        settings.font_style = Some(FontStyle::parse(&raw).map_err(|e| {
                            self.error(
                                format!("{}.fontStyle: {}", site, e),
                                Some("Use italic, bold, underline, strikethrough, or \"\""),
                            )
                        })?);
                    }
                }
                other => {
                    return Err(self.error(
                        format!("{}: unsupported setting `{}`", site, other),
                        Some("Only `foreground` and `fontStyle` are emitted"),
                    ))
                }
            }
        }
        Ok(settings)
    }

    fn semantic_token_colors(
        &self,
        value: &Value,
    ) -> Result<IndexMap<String, Sourced<SemanticValue>>> {
        let mut out = IndexMap::new();
        let Some(map) = self.mapping(value, "semanticTokenColors")? else {
            return Ok(out);
        };

        for (key, value) in map {
            let selector = key_string(key, "semanticTokenColors", self.origin)?;
            let site = format!("semanticTokenColors.{}", selector);
            let parsed = match value {
                Value::Mapping(map) => SemanticValue::Settings(self.settings(map, &site)?),
                other => SemanticValue::Colour(self.expr(other, &site)?),
            };
            out.insert(selector, Sourced::new(parsed, self.origin.clone()));
        }
        Ok(out)
    }
}
