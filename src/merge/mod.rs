//! Merging an ordered chain of theme documents.
//!
//! The first document is the base; each later document is layered on top.
//! Metadata, variables, and palette entries are last-writer-wins. Each of
//! the three output layers has its own strategy:
//!
//! - `colors`: flat key overwrite, keys accumulate
//! - `tokenColors`: append, but a rule whose scope set equals a rule from an
//!   earlier document replaces that rule in place
//! - `semanticTokenColors`: a bare colour replaces, a record deep-merges

use std::collections::{BTreeSet, HashMap};

use indexmap::{IndexMap, IndexSet};

use crate::error::{Result, SassyError};
use crate::types::{
    ColourSlot, EffectiveDocument, SemanticValue, Sourced, ThemeDocument, TokenColorRule,
};

/// The three output layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Colors,
    TokenColors,
    SemanticTokenColors,
}

impl LayerKind {
    pub fn section(self) -> &'static str {
        match self {
            LayerKind::Colors => "colors",
            LayerKind::TokenColors => "tokenColors",
            LayerKind::SemanticTokenColors => "semanticTokenColors",
        }
    }
}

/// One document's contribution to one layer.
enum Layer<'a> {
    Colors {
        entries: &'a IndexMap<String, Sourced<ColourSlot>>,
        groups: &'a IndexSet<String>,
    },
    TokenColors(&'a [TokenColorRule]),
    SemanticTokenColors(&'a IndexMap<String, Sourced<SemanticValue>>),
}

impl<'a> Layer<'a> {
    fn all(doc: &'a ThemeDocument) -> [Layer<'a>; 3] {
        [
            Layer::Colors {
                entries: &doc.colors,
                groups: &doc.color_groups,
            },
            Layer::TokenColors(&doc.token_colors),
            Layer::SemanticTokenColors(&doc.semantic_token_colors),
        ]
    }

    fn kind(&self) -> LayerKind {
        match self {
            Layer::Colors { .. } => LayerKind::Colors,
            Layer::TokenColors(_) => LayerKind::TokenColors,
            Layer::SemanticTokenColors(_) => LayerKind::SemanticTokenColors,
        }
    }

    fn apply(self, acc: &mut Accumulator, doc_index: usize, source: &ThemeDocument) -> Result<()> {
        match self {
            Layer::Colors { entries, groups } => acc.merge_colors(entries, groups, source),
            Layer::TokenColors(rules) => {
                acc.merge_token_colors(rules, doc_index);
                Ok(())
            }
            Layer::SemanticTokenColors(values) => {
                acc.merge_semantic(values);
                Ok(())
            }
        }
    }
}

/// Merged state while walking the chain.
struct Accumulator {
    doc: ThemeDocument,
    /// Index of the document that contributed each token rule.
    rule_owner: Vec<usize>,
}

impl Accumulator {
    fn merge_colors(
        &mut self,
        entries: &IndexMap<String, Sourced<ColourSlot>>,
        groups: &IndexSet<String>,
        source: &ThemeDocument,
    ) -> Result<()> {
        let conflict = |key: &str, message: &str| SassyError::MergeConflict {
            document: source.origin.to_string(),
            key: format!("colors.{}", key),
            message: message.to_string(),
        };

        if let Some(key) = entries.keys().find(|k| self.doc.color_groups.contains(*k)) {
            return Err(conflict(
                key,
                "declared as a colour here but as a nested group in an earlier document",
            ));
        }
        if let Some(key) = groups.iter().find(|g| self.doc.colors.contains_key(*g)) {
            return Err(conflict(
                key,
                "declared as a nested group here but as a colour in an earlier document",
            ));
        }

        for (key, slot) in entries {
            self.doc.colors.insert(key.clone(), slot.clone());
        }
        self.doc.color_groups.extend(groups.iter().cloned());
        Ok(())
    }

    fn merge_token_colors(&mut self, rules: &[TokenColorRule], doc_index: usize) {
        // First position of each scope set contributed by earlier documents.
        let mut earlier: HashMap<BTreeSet<String>, usize> = HashMap::new();
        for (pos, rule) in self.doc.token_colors.iter().enumerate() {
            if self.rule_owner[pos] < doc_index {
                earlier.entry(owned_set(rule)).or_insert(pos);
            }
        }

        // Each earlier position is replaced at most once per document, so
        // same-set rules within this document all survive.
        for rule in rules {
            match earlier.remove(&owned_set(rule)) {
                Some(pos) => {
                    tracing::debug!(
                        position = pos,
                        scopes = ?rule.scopes,
                        "token rule replaced in place"
                    );
                    self.doc.token_colors[pos] = rule.clone();
                    self.rule_owner[pos] = doc_index;
                }
                None => {
                    self.doc.token_colors.push(rule.clone());
                    self.rule_owner.push(doc_index);
                }
            }
        }
    }

    fn merge_semantic(&mut self, values: &IndexMap<String, Sourced<SemanticValue>>) {
        for (selector, later) in values {
            let merged = match (&later.value, self.doc.semantic_token_colors.get(selector)) {
                (SemanticValue::Settings(settings), Some(earlier)) => {
                    let base = earlier.value.to_settings();
                    // The origin follows the foreground, the only resolvable field.
                    let origin = if settings.foreground.is_none() && base.foreground.is_some() {
                        earlier.origin.clone()
                    } else {
                        later.origin.clone()
                    };
                    Sourced::new(SemanticValue::Settings(base.merged_with(settings)), origin)
                }
                _ => later.clone(),
            };
            self.doc.semantic_token_colors.insert(selector.clone(), merged);
        }
    }
}

fn owned_set(rule: &TokenColorRule) -> BTreeSet<String> {
    rule.scope_set().into_iter().map(str::to_string).collect()
}

/// Merge an ordered chain of documents (base first) into one effective document.
pub fn merge_chain(chain: &[ThemeDocument]) -> Result<EffectiveDocument> {
    let (base, _) = chain.split_first().ok_or_else(|| SassyError::Parse {
        document: "<chain>".to_string(),
        message: "no documents to compile".to_string(),
        help: None,
    })?;

    let mut acc = Accumulator {
        doc: ThemeDocument::new(base.origin.clone()),
        rule_owner: Vec::new(),
    };

    for (index, doc) in chain.iter().enumerate() {
        tracing::debug!(document = %doc.origin, index, "merging document");

        let meta = &mut acc.doc.meta;
        if doc.meta.name.is_some() {
            meta.name = doc.meta.name.clone();
        }
        if doc.meta.kind.is_some() {
            meta.kind = doc.meta.kind;
        }
        if doc.meta.semantic_highlighting.is_some() {
            meta.semantic_highlighting = doc.meta.semantic_highlighting;
        }

        for (name, expr) in &doc.variables {
            acc.doc.variables.insert(name.clone(), expr.clone());
        }
        for (name, expr) in &doc.palette {
            acc.doc.palette.insert(name.clone(), expr.clone());
        }

        for layer in Layer::all(doc) {
            tracing::trace!(layer = layer.kind().section(), "applying layer");
            layer.apply(&mut acc, index, doc)?;
        }
    }

    Ok(EffectiveDocument {
        document: acc.doc,
        sources: chain.iter().map(|d| d.origin.clone()).collect(),
    })
}
