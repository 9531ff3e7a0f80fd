//! Resolution traces for a single key.
//!
//! A trace lists the requested key first, then every name it references in
//! depth-first order, each once, with its source expression and value.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::{Result, SassyError};
use crate::types::{Colour, ColourSlot, EffectiveDocument, SemanticValue};

use super::env::{Environment, ExprId, Namespace, NodeId, RootId};
use super::Resolver;

/// One step of a resolution trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceStep {
    pub name: String,
    pub expression: String,
    pub value: Colour,
}

enum Target {
    Node(NodeId),
    Root(RootId),
}

/// Trace how `key_path` resolves.
///
/// Accepted key paths: `colors.<key>`, `variables.<name>` (or
/// `vars.<name>`), `palette.<name>`, `$<name>`, `tokenColors.<index|name>`
/// and `semanticTokenColors.<selector>`.
pub fn resolve_trace(effective: &EffectiveDocument, key_path: &str) -> Result<Vec<TraceStep>> {
    let doc = &effective.document;
    let mut env = Environment::build(doc)?;
    let target = find_target(&mut env, effective, key_path)?;

    let start = match target {
        Target::Node(id) => env.node(id).root,
        Target::Root(id) => env.root(id).expr,
    };
    let resolver = Resolver::new(&env);
    resolver.resolve_reachable(start, false)?;

    let (first, root) = match target {
        Target::Node(id) => {
            let node = env.node(id);
            let step = TraceStep {
                name: key_path.to_string(),
                expression: node.source.to_string(),
                value: resolver.node_colour(id)?,
            };
            (step, node.root)
        }
        Target::Root(id) => {
            let root = env.root(id);
            let step = TraceStep {
                name: key_path.to_string(),
                expression: root.source.to_string(),
                value: resolver.root_colour(id)?,
            };
            (step, root.expr)
        }
    };

    let mut steps = vec![first];
    let mut seen = HashSet::new();
    if let Target::Node(id) = target {
        seen.insert(id);
    }

    let mut stack = pending(&env, root);
    while let Some(id) = stack.pop() {
        if !seen.insert(id) {
            continue;
        }
        let node = env.node(id);
        steps.push(TraceStep {
            name: node.display_name(),
            expression: node.source.to_string(),
            value: resolver.node_colour(id)?,
        });
        stack.extend(pending(&env, node.root));
    }

    tracing::debug!(key = key_path, steps = steps.len(), "traced key");
    Ok(steps)
}

/// References of `expr` as a stack, so popping visits them left to right.
fn pending(env: &Environment, expr: ExprId) -> Vec<NodeId> {
    let mut refs = env.references(expr);
    refs.reverse();
    refs
}

fn find_target(env: &mut Environment, effective: &EffectiveDocument, key_path: &str) -> Result<Target> {
    let doc = &effective.document;
    let not_found = |help: &str| SassyError::UnresolvedReference {
        document: doc.origin.to_string(),
        name: key_path.to_string(),
        site: "trace".to_string(),
        help: Some(help.to_string()),
    };

    if let Some(key) = key_path.strip_prefix("colors.") {
        if let Some(slot) = doc.colors.get(key) {
            if slot.value == ColourSlot::Unset {
                return Err(SassyError::parse(
                    slot.origin.as_str(),
                    format!("colors.{} is declared but not provided", key),
                ));
            }
        }
        return env
            .lookup(Namespace::Colors, key)
            .map(Target::Node)
            .ok_or_else(|| not_found("No such key in `colors`"));
    }

    let named = [
        ("variables.", Namespace::Variables),
        ("vars.", Namespace::Variables),
        ("palette.", Namespace::Palette),
    ];
    for (prefix, namespace) in named {
        if let Some(name) = key_path.strip_prefix(prefix) {
            return env
                .lookup(namespace, name)
                .map(Target::Node)
                .ok_or_else(|| not_found(&format!("No such name in `{}`", namespace)));
        }
    }

    if let Some(name) = key_path.strip_prefix('$') {
        return env
            .lookup_reference(name)
            .map(Target::Node)
            .ok_or_else(|| not_found("Searched variables, palette"));
    }

    if let Some(selector) = key_path.strip_prefix("tokenColors.") {
        let found = match selector.parse::<usize>() {
            Ok(index) => doc.token_colors.get(index).map(|rule| (index, rule)),
            Err(_) => doc
                .token_colors
                .iter()
                .enumerate()
                .find(|(_, rule)| rule.name.as_deref() == Some(selector)),
        };
        let (index, rule) = found.ok_or_else(|| not_found("Use a rule index or its `name`"))?;
        let expr = rule.settings.foreground.as_ref().ok_or_else(|| {
            SassyError::parse(
                rule.origin.as_str(),
                format!("tokenColors rule {} has no foreground", rule.describe(index)),
            )
        })?;
        let root = env.add_root(format!("tokenColors[{}].foreground", index), &rule.origin, expr)?;
        return Ok(Target::Root(root));
    }

    if let Some(selector) = key_path.strip_prefix("semanticTokenColors.") {
        let value = doc
            .semantic_token_colors
            .get(selector)
            .ok_or_else(|| not_found("No such selector in `semanticTokenColors`"))?;
        let expr = match &value.value {
            SemanticValue::Colour(expr) => Some(expr),
            SemanticValue::Settings(settings) => settings.foreground.as_ref(),
        }
        .ok_or_else(|| {
            SassyError::parse(
                value.origin.as_str(),
                format!("semanticTokenColors.{} has no foreground", selector),
            )
        })?;
        let root = env.add_root(format!("semanticTokenColors.{}", selector), &value.origin, expr)?;
        return Ok(Target::Root(root));
    }

    Err(SassyError::Parse {
        document: doc.origin.to_string(),
        message: format!("unrecognised key path `{}`", key_path),
        help: Some(
            "Use colors.<key>, variables.<name>, palette.<name>, $<name>, tokenColors.<index|name> or semanticTokenColors.<selector>"
                .to_string(),
        ),
    })
}
