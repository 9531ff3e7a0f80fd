//! Dot-key flattening for nested YAML sections.
//!
//! `{editor: {background: x}}` and `{editor.background: x}` both flatten to
//! the key `editor.background`. If one document spells the same key both
//! ways, flattening fails with a duplicate key error.

use indexmap::{IndexMap, IndexSet};
use serde_yaml::{Mapping, Value};

use crate::error::{Result, SassyError};
use crate::types::Origin;

/// Flattened leaves plus the keys that appeared as nested groups.
#[derive(Debug, Default)]
pub struct Flattened {
    pub entries: IndexMap<String, Value>,
    pub groups: IndexSet<String>,
}

/// Flatten a mapping into dot-joined keys, preserving declaration order.
pub fn flatten(map: &Mapping, section: &str, origin: &Origin) -> Result<Flattened> {
    let mut out = Flattened::default();
    flatten_into(map, None, section, origin, &mut out)?;
    Ok(out)
}

fn flatten_into(
    map: &Mapping,
    prefix: Option<&str>,
    section: &str,
    origin: &Origin,
    out: &mut Flattened,
) -> Result<()> {
    for (key, value) in map {
        let key = key_string(key, section, origin)?;
        let full = match prefix {
            Some(prefix) => format!("{}.{}", prefix, key),
            None => key,
        };

        match value {
            Value::Mapping(nested) => {
                out.groups.insert(full.clone());
                flatten_into(nested, Some(&full), section, origin, out)?;
            }
            other => {
                if out.entries.contains_key(&full) {
                    return Err(SassyError::DuplicateKey {
                        document: origin.to_string(),
                        key: format!("{}.{}", section, full),
                        help: Some(
                            "The key is written both as a dotted key and inside a nested group"
                                .to_string(),
                        ),
                    });
                }
                out.entries.insert(full, other.clone());
            }
        }
    }
    Ok(())
}

/// Mapping keys must be strings; plain numbers are accepted as text.
pub(crate) fn key_string(key: &Value, section: &str, origin: &Origin) -> Result<String> {
    match key {
        Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(SassyError::parse(
            origin.to_string(),
            format!("{}: keys must be non-empty strings", section),
        )),
    }
}
