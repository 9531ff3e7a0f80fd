//! Semantic token selectors: `type[.modifier]*[:language]`.

use std::fmt;

/// A parsed semantic token selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticSelector {
    /// Token type, or `*` for any type.
    pub token_type: String,
    pub modifiers: Vec<String>,
    pub language: Option<String>,
}

/// Why a selector failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorError {
    pub selector: String,
    pub reason: String,
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed selector `{}`: {}", self.selector, self.reason)
    }
}

impl std::error::Error for SelectorError {}

impl SemanticSelector {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let fail = |reason: &str| SelectorError {
            selector: input.to_string(),
            reason: reason.to_string(),
        };

        let (head, language) = match input.split_once(':') {
            Some((head, lang)) => {
                if !is_identifier(lang) {
                    return Err(fail("language must be a single identifier"));
                }
                (head, Some(lang.to_string()))
            }
            None => (input, None),
        };

        let mut parts = head.split('.');
        let token_type = parts.next().unwrap_or_default();
        if token_type != "*" && !is_identifier(token_type) {
            return Err(fail("expected a token type or `*`"));
        }

        let mut modifiers = Vec::new();
        for modifier in parts {
            if !is_identifier(modifier) {
                return Err(fail("modifiers must be non-empty identifiers"));
            }
            modifiers.push(modifier.to_string());
        }

        Ok(Self {
            token_type: token_type.to_string(),
            modifiers,
            language,
        })
    }
}

impl fmt::Display for SemanticSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token_type)?;
        for m in &self.modifiers {
            write!(f, ".{}", m)?;
        }
        if let Some(lang) = &self.language {
            write!(f, ":{}", lang)?;
        }
        Ok(())
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full() {
        let s = SemanticSelector::parse("variable.readonly.defaultLibrary:rust").unwrap();
        assert_eq!(s.token_type, "variable");
        assert_eq!(s.modifiers, vec!["readonly", "defaultLibrary"]);
        assert_eq!(s.language.as_deref(), Some("rust"));
        assert_eq!(s.to_string(), "variable.readonly.defaultLibrary:rust");
    }

    #[test]
    fn test_parse_wildcard() {
        let s = SemanticSelector::parse("*.deprecated").unwrap();
        assert_eq!(s.token_type, "*");
        assert_eq!(s.modifiers, vec!["deprecated"]);
    }

    #[test]
    fn test_malformed() {
        for bad in ["variable..readonly", "variable:", ":rust", "a:b:c", "", "string.", "1abc"] {
            assert!(SemanticSelector::parse(bad).is_err(), "{} should fail", bad);
        }
    }
}
