//! Resolution of colour expressions.
//!
//! Turns an [`EffectiveDocument`] into a [`ResolvedDocument`] where every
//! expression has been reduced to a concrete [`Colour`].
//!
//! # Pipeline
//!
//! 1. Build the [`Environment`]: one node per named definition, expressions
//!    lowered into an arena with references bound to node ids.
//! 2. Order the reference graph into levels (iterative; reports cycles).
//! 3. Evaluate level by level, optionally in parallel. Each node has a
//!    `OnceLock` slot, so it is evaluated at most once and every use sees the
//!    same value.
//! 4. Evaluate the token rule and semantic foregrounds against the
//!    memoised nodes.

mod env;
mod graph;
mod trace;

pub use env::{Environment, ExprId, ExprNode, Namespace, Node, NodeId, Root, RootId};
pub use graph::{CycleError, DependencyGraph};
pub use trace::{resolve_trace, TraceStep};

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use indexmap::IndexMap;
use rayon::prelude::*;

use crate::error::{Result, SassyError};
use crate::types::functions::{self, ColourFn};
use crate::types::{
    named_colour, Colour, EffectiveDocument, FontStyle, SemanticValue, ThemeKind, TokenSettings,
};

/// A fully resolved theme, ready for linting and emission.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDocument {
    pub name: String,
    pub kind: ThemeKind,
    pub semantic_highlighting: Option<bool>,
    /// Provided `colors` keys in declaration order; unset keys are absent.
    pub colors: IndexMap<String, Colour>,
    pub token_colors: Vec<ResolvedRule>,
    pub semantic_token_colors: IndexMap<String, ResolvedSemantic>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedSettings {
    pub foreground: Option<Colour>,
    pub font_style: Option<FontStyle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRule {
    pub name: Option<String>,
    pub scopes: Vec<String>,
    pub settings: ResolvedSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedSemantic {
    Colour(Colour),
    Settings(ResolvedSettings),
}

/// An evaluated sub-expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Colour(Colour),
    Number(f32),
    Percent(f32),
    Word(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Colour(c) => write!(f, "colour {}", c),
            Value::Number(n) => write!(f, "number {}", n),
            Value::Percent(p) => write!(f, "percentage {}%", p),
            Value::Word(w) => write!(f, "word `{}`", w),
        }
    }
}

/// Resolve every expression of a merged document.
///
/// `name` and `type` must be present by now; a chain that never sets them
/// is a parse error against the root document.
pub fn resolve_document(effective: &EffectiveDocument, parallel: bool) -> Result<ResolvedDocument> {
    let doc = &effective.document;
    let name = doc.meta.name.clone().ok_or_else(|| SassyError::Parse {
        document: doc.origin.to_string(),
        message: "missing required field `name`".to_string(),
        help: Some("Set `name` in the theme or one of its imports".to_string()),
    })?;
    let kind = doc.meta.kind.ok_or_else(|| SassyError::Parse {
        document: doc.origin.to_string(),
        message: "missing required field `type`".to_string(),
        help: Some("Set `type: dark` or `type: light`".to_string()),
    })?;

    let mut env = Environment::build(doc)?;

    let mut rule_roots = Vec::with_capacity(doc.token_colors.len());
    for (i, rule) in doc.token_colors.iter().enumerate() {
        let root = match &rule.settings.foreground {
            Some(expr) => Some(env.add_root(
                format!("tokenColors[{}].foreground", i),
                &rule.origin,
                expr,
            )?),
            None => None,
        };
        rule_roots.push(root);
    }

    let mut semantic_roots = Vec::with_capacity(doc.semantic_token_colors.len());
    for (selector, value) in &doc.semantic_token_colors {
        let expr = match &value.value {
            SemanticValue::Colour(expr) => Some(expr),
            SemanticValue::Settings(settings) => settings.foreground.as_ref(),
        };
        let root = match expr {
            Some(expr) => Some(env.add_root(
                format!("semanticTokenColors.{}", selector),
                &value.origin,
                expr,
            )?),
            None => None,
        };
        semantic_roots.push(root);
    }

    let resolver = Resolver::new(&env);
    resolver.resolve_all(parallel)?;

    let mut colors = IndexMap::with_capacity(doc.colors.len());
    for key in doc.colors.keys() {
        if let Some(id) = env.lookup(Namespace::Colors, key) {
            colors.insert(key.clone(), resolver.node_colour(id)?);
        }
    }

    let mut token_colors = Vec::with_capacity(doc.token_colors.len());
    for (rule, root) in doc.token_colors.iter().zip(rule_roots) {
        token_colors.push(ResolvedRule {
            name: rule.name.clone(),
            scopes: rule.scopes.clone(),
            settings: resolver.settings(&rule.settings, root)?,
        });
    }

    let mut semantic_token_colors = IndexMap::with_capacity(doc.semantic_token_colors.len());
    for ((selector, value), root) in doc.semantic_token_colors.iter().zip(semantic_roots) {
        let resolved = match (&value.value, root) {
            (SemanticValue::Colour(_), Some(root)) => {
                ResolvedSemantic::Colour(resolver.root_colour(root)?)
            }
            (SemanticValue::Settings(settings), root) => {
                ResolvedSemantic::Settings(resolver.settings(settings, root)?)
            }
            (SemanticValue::Colour(_), None) => continue,
        };
        semantic_token_colors.insert(selector.clone(), resolved);
    }

    tracing::debug!(
        theme = %name,
        nodes = env.len(),
        evaluations = resolver.evaluations(),
        colors = colors.len(),
        rules = token_colors.len(),
        "resolved theme"
    );

    Ok(ResolvedDocument {
        name,
        kind,
        semantic_highlighting: doc.meta.semantic_highlighting,
        colors,
        token_colors,
        semantic_token_colors,
    })
}

/// Evaluates nodes of an [`Environment`] with at-most-once memoisation.
pub struct Resolver<'e> {
    env: &'e Environment,
    memo: Vec<OnceLock<Result<Colour>>>,
    evaluations: AtomicUsize,
}

/// Where an expression is being evaluated, for error messages.
struct Ctx<'a> {
    document: &'a str,
    site: &'a str,
}

impl Ctx<'_> {
    fn type_error(&self, context: impl Into<String>, expected: impl Into<String>, found: impl ToString) -> SassyError {
        SassyError::Type {
            document: self.document.to_string(),
            site: self.site.to_string(),
            context: context.into(),
            expected: expected.into(),
            found: found.to_string(),
        }
    }
}

impl<'e> Resolver<'e> {
    pub fn new(env: &'e Environment) -> Self {
        Self {
            env,
            memo: (0..env.len()).map(|_| OnceLock::new()).collect(),
            evaluations: AtomicUsize::new(0),
        }
    }

    /// Evaluate every named node, level by level.
    ///
    /// Cycles are reported before anything is evaluated. Within a level the
    /// first failing node in declaration order determines the error.
    pub fn resolve_all(&self, parallel: bool) -> Result<()> {
        self.evaluate(self.env.dependency_graph(), parallel)
    }

    /// Evaluate only the nodes `expr` depends on, directly or transitively.
    pub fn resolve_reachable(&self, expr: ExprId, parallel: bool) -> Result<()> {
        self.evaluate(self.env.dependency_graph_from(expr), parallel)
    }

    /// Number of node evaluations so far; each node counts at most once.
    pub fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::Relaxed)
    }

    fn evaluate(&self, graph: DependencyGraph<NodeId>, parallel: bool) -> Result<()> {
        let levels = graph.levels().map_err(|e| self.cycle_error(&e.cycle))?;

        tracing::debug!(
            nodes = graph.len(),
            levels = levels.len(),
            parallel,
            "evaluating reference graph"
        );

        for level in &levels {
            if parallel && level.len() > 1 {
                let results: Vec<Result<Colour>> =
                    level.par_iter().map(|id| self.node_colour(*id)).collect();
                for result in results {
                    result?;
                }
            } else {
                for id in level {
                    self.node_colour(*id)?;
                }
            }
        }
        Ok(())
    }

    /// Value of a named node.
    pub fn node_colour(&self, id: NodeId) -> Result<Colour> {
        self.resolve_node(id, &mut Vec::new())
    }

    /// Value of an anonymous root expression.
    pub fn root_colour(&self, id: RootId) -> Result<Colour> {
        let root = self.env.root(id);
        let ctx = Ctx {
            document: root.origin.as_str(),
            site: &root.site,
        };
        self.eval_colour(root.expr, &ctx, &mut Vec::new())
    }

    fn settings(&self, settings: &TokenSettings, root: Option<RootId>) -> Result<ResolvedSettings> {
        Ok(ResolvedSettings {
            foreground: root.map(|id| self.root_colour(id)).transpose()?,
            font_style: settings.font_style.clone(),
        })
    }

    fn resolve_node(&self, id: NodeId, chain: &mut Vec<NodeId>) -> Result<Colour> {
        if let Some(done) = self.memo[id.0].get() {
            return done.clone();
        }

        if let Some(pos) = chain.iter().position(|n| *n == id) {
            let mut cycle = chain[pos..].to_vec();
            cycle.push(id);
            return Err(self.cycle_error(&cycle));
        }

        let node = self.env.node(id);
        chain.push(id);
        let result = self.memo[id.0]
            .get_or_init(|| {
                self.evaluations.fetch_add(1, Ordering::Relaxed);
                let site = node.site();
                let ctx = Ctx {
                    document: node.origin.as_str(),
                    site: &site,
                };
                self.eval_colour(node.root, &ctx, chain)
            })
            .clone();
        chain.pop();
        result
    }

    fn cycle_error(&self, cycle: &[NodeId]) -> SassyError {
        let document = cycle
            .first()
            .map(|id| self.env.node(*id).origin.to_string())
            .unwrap_or_default();
        SassyError::CyclicReference {
            document,
            chain: cycle
                .iter()
                .map(|id| self.env.node(*id).display_name())
                .collect(),
        }
    }

    fn eval_colour(&self, expr: ExprId, ctx: &Ctx<'_>, chain: &mut Vec<NodeId>) -> Result<Colour> {
        match self.eval(expr, ctx, chain)? {
            Value::Colour(colour) => Ok(colour),
            other => Err(ctx.type_error("value", "colour", other)),
        }
    }

    fn eval(&self, expr: ExprId, ctx: &Ctx<'_>, chain: &mut Vec<NodeId>) -> Result<Value> {
        match self.env.expr(expr) {
            ExprNode::Literal(colour) => Ok(Value::Colour(*colour)),
            ExprNode::Ref(id) => self.resolve_node(*id, chain).map(Value::Colour),
            ExprNode::Word(word) => Ok(Value::Word(word.clone())),
            ExprNode::Number(n) => Ok(Value::Number(*n)),
            ExprNode::Percent(p) => Ok(Value::Percent(*p)),
            ExprNode::Call { func, args } => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.eval(*arg, ctx, chain)?);
                }
                apply(*func, &values, ctx).map(Value::Colour)
            }
        }
    }
}

/// Typed access to evaluated call arguments.
struct Args<'a> {
    func: ColourFn,
    values: &'a [Value],
    ctx: &'a Ctx<'a>,
}

impl Args<'_> {
    fn context(&self, index: usize) -> String {
        format!("{}() argument {}", self.func, index + 1)
    }

    fn colour(&self, index: usize) -> Result<Colour> {
        match &self.values[index] {
            Value::Colour(c) => Ok(*c),
            other => Err(self.ctx.type_error(self.context(index), "colour", other)),
        }
    }

    /// A factor in `[0, 1]`, written as `0.5` or `50%`.
    fn factor(&self, index: usize) -> Result<f32> {
        let factor = match &self.values[index] {
            Value::Number(n) => *n,
            Value::Percent(p) => *p / 100.0,
            other => {
                return Err(self
                    .ctx
                    .type_error(self.context(index), "factor (0.5 or 50%)", other))
            }
        };
        if !(0.0..=1.0).contains(&factor) {
            return Err(self.ctx.type_error(
                self.context(index),
                "factor in [0, 1]",
                &self.values[index],
            ));
        }
        Ok(factor)
    }

    /// A plain number, e.g. a hue in degrees.
    fn number(&self, index: usize) -> Result<f32> {
        match &self.values[index] {
            Value::Number(n) => Ok(*n),
            other => Err(self.ctx.type_error(self.context(index), "number", other)),
        }
    }

    fn named(&self, index: usize) -> Result<Colour> {
        match &self.values[index] {
            Value::Word(word) => named_colour(word).ok_or_else(|| SassyError::UnresolvedReference {
                document: self.ctx.document.to_string(),
                name: word.clone(),
                site: self.ctx.site.to_string(),
                help: Some("named() takes a CSS colour name such as `tomato`".to_string()),
            }),
            other => Err(self.ctx.type_error(self.context(index), "colour name", other)),
        }
    }
}

fn apply(func: ColourFn, values: &[Value], ctx: &Ctx<'_>) -> Result<Colour> {
    if values.len() != func.arity() {
        return Err(ctx.type_error(
            format!("{}()", func),
            format!("{} arguments, as in {}", func.arity(), func.usage()),
            format!("{} arguments", values.len()),
        ));
    }

    let args = Args { func, values, ctx };
    let colour = match func {
        ColourFn::Alpha => functions::alpha(args.colour(0)?, args.factor(1)?),
        ColourFn::Fade => functions::fade(args.colour(0)?, args.factor(1)?),
        ColourFn::Hsl => functions::hsl(args.number(0)?, args.factor(1)?, args.factor(2)?),
        ColourFn::Hsla => functions::alpha(
            functions::hsl(args.number(0)?, args.factor(1)?, args.factor(2)?),
            args.factor(3)?,
        ),
        ColourFn::Named => args.named(0)?,
        ColourFn::Darken => functions::darken(args.colour(0)?, args.factor(1)?),
        ColourFn::Lighten => functions::lighten(args.colour(0)?, args.factor(1)?),
        ColourFn::Saturate => functions::saturate(args.colour(0)?, args.factor(1)?),
        ColourFn::Desaturate => functions::desaturate(args.colour(0)?, args.factor(1)?),
        ColourFn::Mix => functions::mix(args.colour(0)?, args.colour(1)?, args.factor(2)?),
    };
    Ok(colour)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::merge_chain;
    use crate::parser::parse_document;
    use pretty_assertions::assert_eq;

    const HEADER: &str = "name: Test\ntype: dark\n";

    fn resolve(body: &str) -> Result<ResolvedDocument> {
        let doc = parse_document(&format!("{}{}", HEADER, body), "test.sassy.yml")?;
        let effective = merge_chain(&[doc])?;
        resolve_document(&effective, true)
    }

    fn colour(doc: &ResolvedDocument, key: &str) -> String {
        doc.colors[key].to_string()
    }

    #[test]
    fn test_literals_and_references() {
        let doc = resolve(
            r##"
variables:
  bg: $base03
palette:
  base03: "#002B36"
colors:
  editor.background: $bg
  editor.foreground: "#839496"
  editor.lineHighlightBorder: ~
"##,
        )
        .unwrap();

        assert_eq!(colour(&doc, "editor.background"), "#002b36");
        assert_eq!(colour(&doc, "editor.foreground"), "#839496");
        assert!(!doc.colors.contains_key("editor.lineHighlightBorder"));
    }

    #[test]
    fn test_colors_reference_colors() {
        let doc = resolve(
            r##"
colors:
  editor.background: "#101010"
  panel.background: fade($editor.background, 0.5)
"##,
        )
        .unwrap();
        assert_eq!(colour(&doc, "panel.background"), "#10101080");
    }

    #[test]
    fn test_function_composition() {
        let doc = resolve("colors:\n  x: fade(named(tomato), 0.4)\n").unwrap();
        assert_eq!(colour(&doc, "x"), "#ff634766");
    }

    #[test]
    fn test_alpha_versus_fade() {
        let doc = resolve(
            r##"
colors:
  a: alpha(#336699, 0.5)
  f: fade(#33669980, 0.5)
  p: alpha(#336699, 50%)
"##,
        )
        .unwrap();
        assert_eq!(colour(&doc, "a"), "#33669980");
        assert_eq!(colour(&doc, "f"), "#33669940");
        assert_eq!(colour(&doc, "p"), "#33669980");
    }

    #[test]
    fn test_hsl_functions() {
        let doc = resolve("colors:\n  r: hsl(0, 100%, 50%)\n  b: hsla(240, 1, 0.5, 0.5)\n").unwrap();
        assert_eq!(colour(&doc, "r"), "#ff0000");
        assert_eq!(colour(&doc, "b"), "#0000ff80");
    }

    #[test]
    fn test_explicit_transparent_is_kept() {
        let doc = resolve("colors:\n  editor.border: transparent\n").unwrap();
        assert_eq!(colour(&doc, "editor.border"), "#00000000");
    }

    #[test]
    fn test_cycle_names_chain() {
        let err = resolve("variables:\n  a: $b\n  b: $a\n").unwrap_err();
        match err {
            SassyError::CyclicReference { chain, document } => {
                assert_eq!(chain, vec!["$a", "$b", "$a"]);
                assert_eq!(document, "test.sassy.yml");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_self_reference_is_cycle() {
        let err = resolve("variables:\n  a: fade($a, 0.5)\n").unwrap_err();
        assert!(matches!(err, SassyError::CyclicReference { ref chain, .. } if chain == &["$a", "$a"]));
    }

    #[test]
    fn test_deep_cycle_without_recursion() {
        let n = 20_000;
        let mut body = String::from("variables:\n");
        for i in 0..n {
            body.push_str(&format!("  v{}: $v{}\n", i, (i + 1) % n));
        }

        let err = resolve(&body).unwrap_err();
        match err {
            SassyError::CyclicReference { chain, .. } => {
                assert_eq!(chain.len(), n + 1);
                assert_eq!(chain.first(), chain.last());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_deep_chain_resolves() {
        let n = 20_000;
        let mut body = String::from("variables:\n  v0: \"#123456\"\n");
        for i in 1..n {
            body.push_str(&format!("  v{}: $v{}\n", i, i - 1));
        }
        body.push_str(&format!("colors:\n  editor.background: $v{}\n", n - 1));

        let doc = resolve(&body).unwrap();
        assert_eq!(colour(&doc, "editor.background"), "#123456");
    }

    #[test]
    fn test_unresolved_reference_names_site() {
        let err = resolve("colors:\n  editor.background: $missing\n").unwrap_err();
        match err {
            SassyError::UnresolvedReference { name, site, .. } => {
                assert_eq!(name, "$missing");
                assert_eq!(site, "colors.editor.background");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_type_error_on_argument_shape() {
        let err = resolve("colors:\n  x: \"fade(0.5, #ffffff)\"\n").unwrap_err();
        match err {
            SassyError::Type {
                context,
                expected,
                found,
                site,
                ..
            } => {
                assert_eq!(context, "fade() argument 1");
                assert_eq!(expected, "colour");
                assert_eq!(found, "number 0.5");
                assert_eq!(site, "colors.x");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_type_error_on_arity() {
        let err = resolve("colors:\n  x: mix(#000000, 0.5)\n").unwrap_err();
        assert!(matches!(err, SassyError::Type { ref found, .. } if found == "2 arguments"));
    }

    #[test]
    fn test_factor_out_of_range() {
        let err = resolve("colors:\n  x: alpha(#000000, 150%)\n").unwrap_err();
        assert!(matches!(err, SassyError::Type { ref expected, .. } if expected == "factor in [0, 1]"));
    }

    #[test]
    fn test_bare_number_is_not_a_colour() {
        let err = resolve("colors:\n  x: \"0.5\"\n").unwrap_err();
        assert!(matches!(err, SassyError::Type { ref context, .. } if context == "value"));
    }

    #[test]
    fn test_named_rejects_unknown_word() {
        let err = resolve("colors:\n  x: named(blurple)\n").unwrap_err();
        assert!(matches!(err, SassyError::UnresolvedReference { ref name, .. } if name == "blurple"));
    }

    #[test]
    fn test_token_and_semantic_layers() {
        let doc = resolve(
            r##"
variables:
  fg: "#eeeeee"
tokenColors:
  - name: Comment
    scope: comment
    settings: { foreground: fade($fg, 0.5), fontStyle: italic }
  - scope: keyword
    settings: { fontStyle: bold }
semanticTokenColors:
  variable: $fg
  function: { fontStyle: underline }
"##,
        )
        .unwrap();

        let comment = &doc.token_colors[0];
        assert_eq!(comment.name.as_deref(), Some("Comment"));
        assert_eq!(comment.settings.foreground.unwrap().to_string(), "#eeeeee80");
        assert_eq!(doc.token_colors[1].settings.foreground, None);

        assert_eq!(
            doc.semantic_token_colors["variable"],
            ResolvedSemantic::Colour(Colour::rgb(0xee, 0xee, 0xee))
        );
        match &doc.semantic_token_colors["function"] {
            ResolvedSemantic::Settings(settings) => {
                assert_eq!(settings.foreground, None);
                assert_eq!(settings.font_style.as_ref().map(|f| f.as_str()), Some("underline"));
            }
            other => panic!("unexpected value: {other:?}"),
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let source = format!(
            "{}variables:\n  a: \"#808080\"\n  b: lighten($a, 0.2)\n  c: darken($a, 0.2)\n  d: mix($b, $c, 0.5)\ncolors:\n  x: $d\n  y: $b\n",
            HEADER
        );
        let doc = parse_document(&source, "test.sassy.yml").unwrap();
        let effective = merge_chain(&[doc]).unwrap();

        let parallel = resolve_document(&effective, true).unwrap();
        let sequential = resolve_document(&effective, false).unwrap();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_memo_shares_one_value() {
        let doc = parse_document(
            &format!("{}variables:\n  a: darken(#808080, 0.3)\n  b: $a\n  c: $a\n", HEADER),
            "test.sassy.yml",
        )
        .unwrap();
        let env = Environment::build(&doc).unwrap();
        let resolver = Resolver::new(&env);
        resolver.resolve_all(true).unwrap();

        let b = env.lookup(Namespace::Variables, "b").unwrap();
        let c = env.lookup(Namespace::Variables, "c").unwrap();
        assert_eq!(resolver.node_colour(b).unwrap(), resolver.node_colour(c).unwrap());
    }

    #[test]
    fn test_shared_node_evaluated_once_under_contention() {
        let mut source = format!("{}variables:\n  hub: darken(#808080, 0.3)\n", HEADER);
        for i in 0..64 {
            source.push_str(&format!("  v{i}: lighten($hub, 0.01)\n  w{i}: mix($v{i}, $hub, 0.5)\n"));
        }
        let doc = parse_document(&source, "test.sassy.yml").unwrap();
        let env = Environment::build(&doc).unwrap();

        // Every node requested concurrently, out of dependency order.
        let resolver = Resolver::new(&env);
        let ids: Vec<NodeId> = env.node_ids().collect();
        let values: Vec<Colour> = ids
            .par_iter()
            .rev()
            .map(|id| resolver.node_colour(*id).unwrap())
            .collect();
        assert_eq!(values.len(), env.len());
        assert_eq!(resolver.evaluations(), env.len());

        // Levelled evaluation after the fact adds nothing.
        resolver.resolve_all(true).unwrap();
        assert_eq!(resolver.evaluations(), env.len());

        let fresh = Resolver::new(&env);
        fresh.resolve_all(true).unwrap();
        assert_eq!(fresh.evaluations(), env.len());
    }

    #[test]
    fn test_reachable_resolution_skips_unrelated_nodes() {
        let doc = parse_document(
            &format!(
                "{}variables:\n  a: \"#112233\"\n  b: lighten($a, 0.1)\n  broken: fade(0.5, 0.5)\n",
                HEADER
            ),
            "test.sassy.yml",
        )
        .unwrap();
        let env = Environment::build(&doc).unwrap();
        let b = env.lookup(Namespace::Variables, "b").unwrap();

        let resolver = Resolver::new(&env);
        resolver.resolve_reachable(env.node(b).root, false).unwrap();
        assert_eq!(resolver.evaluations(), 1);
        assert!(resolver.resolve_all(false).is_err());
    }

    #[test]
    fn test_missing_name_is_parse_error() {
        let doc = parse_document("type: dark\n", "test.sassy.yml").unwrap();
        let effective = merge_chain(&[doc]).unwrap();
        let err = resolve_document(&effective, false).unwrap_err();
        assert!(matches!(err, SassyError::Parse { ref message, .. } if message.contains("name")));
    }
}
