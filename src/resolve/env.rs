//! Resolution environment: a name-keyed node table plus an expression arena.
//!
//! Every named definition (variables, palette entries, provided `colors`
//! keys) becomes a [`Node`]. Expressions are lowered into a flat arena where
//! references are already bound to node ids, so cycle detection and
//! memoisation are plain index lookups.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::error::{Result, SassyError};
use crate::types::functions::ColourFn;
use crate::types::{named_colour, Colour, ColourSlot, Expr, Origin, ThemeDocument};

use super::graph::DependencyGraph;

/// Index of a named node in the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

/// Index of a lowered expression in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExprId(usize);

/// Index of an anonymous root (a token rule or semantic foreground).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootId(usize);

/// Which table a named node was declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Colors,
    Variables,
    Palette,
}

impl Namespace {
    /// Lookup order for a `$name` reference made from this namespace.
    ///
    /// Only `colors` values see the colors layer as a local scope.
    fn search_order(scope: Option<Namespace>) -> &'static [Namespace] {
        match scope {
            Some(Namespace::Colors) => &[Namespace::Colors, Namespace::Variables, Namespace::Palette],
            _ => &[Namespace::Variables, Namespace::Palette],
        }
    }
}

/// A lowered expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprNode {
    Literal(Colour),
    Ref(NodeId),
    /// A bare word kept as-is; only meaningful as the argument of `named()`.
    Word(String),
    Number(f32),
    Percent(f32),
    Call { func: ColourFn, args: Vec<ExprId> },
}

/// A named definition.
#[derive(Debug, Clone)]
pub struct Node {
    pub namespace: Namespace,
    pub name: String,
    pub origin: Origin,
    pub source: Expr,
    pub(crate) root: ExprId,
}

impl Node {
    /// Name as used in cycle chains and trace output.
    pub fn display_name(&self) -> String {
        match self.namespace {
            Namespace::Colors => format!("colors.{}", self.name),
            Namespace::Variables | Namespace::Palette => format!("${}", self.name),
        }
    }

    /// Use site label for error messages, e.g. `variables.accent`.
    pub fn site(&self) -> String {
        let section = match self.namespace {
            Namespace::Colors => "colors",
            Namespace::Variables => "variables",
            Namespace::Palette => "palette",
        };
        format!("{}.{}", section, self.name)
    }
}

/// An expression evaluated outside the named tables.
#[derive(Debug, Clone)]
pub struct Root {
    pub site: String,
    pub origin: Origin,
    pub source: Expr,
    pub(crate) expr: ExprId,
}

/// Name-keyed node table plus expression arena.
#[derive(Debug, Default)]
pub struct Environment {
    index: HashMap<(Namespace, String), NodeId>,
    nodes: Vec<Node>,
    arena: Vec<ExprNode>,
    roots: Vec<Root>,
}

impl Environment {
    /// Build the environment for a merged document.
    ///
    /// All names are registered before any expression is lowered, so
    /// references may point forwards.
    pub fn build(doc: &ThemeDocument) -> Result<Self> {
        let mut env = Environment::default();

        // (namespace, name, origin, expression) in declaration order
        let mut pending = Vec::new();
        for (name, expr) in &doc.variables {
            pending.push((Namespace::Variables, name, &expr.origin, &expr.value));
        }
        for (name, expr) in &doc.palette {
            pending.push((Namespace::Palette, name, &expr.origin, &expr.value));
        }
        for (key, slot) in &doc.colors {
            if let ColourSlot::Value(expr) = &slot.value {
                pending.push((Namespace::Colors, key, &slot.origin, expr));
            }
        }

        for (i, (namespace, name, _, _)) in pending.iter().enumerate() {
            env.index.insert((*namespace, (*name).clone()), NodeId(i));
        }

        for (namespace, name, origin, expr) in pending {
            let site = Site {
                scope: Some(namespace),
                label: format!("{}.{}", section_of(namespace), name),
                origin,
            };
            let root = env.lower(expr, &site)?;
            env.nodes.push(Node {
                namespace,
                name: name.clone(),
                origin: origin.clone(),
                source: expr.clone(),
                root,
            });
        }

        tracing::trace!(
            nodes = env.nodes.len(),
            exprs = env.arena.len(),
            "built resolution environment"
        );
        Ok(env)
    }

    /// Lower an expression that is not itself a named definition.
    pub fn add_root(&mut self, site: impl Into<String>, origin: &Origin, expr: &Expr) -> Result<RootId> {
        let site = site.into();
        let lowered = self.lower(
            expr,
            &Site {
                scope: None,
                label: site.clone(),
                origin,
            },
        )?;
        self.roots.push(Root {
            site,
            origin: origin.clone(),
            source: expr.clone(),
            expr: lowered,
        });
        Ok(RootId(self.roots.len() - 1))
    }

    /// Look up a node by namespace and name.
    pub fn lookup(&self, namespace: Namespace, name: &str) -> Option<NodeId> {
        self.index.get(&(namespace, name.to_string())).copied()
    }

    /// Look up a `$name` reference as an outer layer would see it.
    pub fn lookup_reference(&self, name: &str) -> Option<NodeId> {
        Namespace::search_order(None)
            .iter()
            .find_map(|ns| self.lookup(*ns, name))
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn root(&self, id: RootId) -> &Root {
        &self.roots[id.0]
    }

    pub fn expr(&self, id: ExprId) -> &ExprNode {
        &self.arena[id.0]
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes referenced by an expression, in left-to-right order, each once.
    pub fn references(&self, expr: ExprId) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack = vec![expr];
        while let Some(id) = stack.pop() {
            match self.expr(id) {
                ExprNode::Ref(node) => {
                    if !found.contains(node) {
                        found.push(*node);
                    }
                }
                ExprNode::Call { args, .. } => stack.extend(args.iter().rev()),
                _ => {}
            }
        }
        found
    }

    /// Reference graph over all named nodes.
    pub fn dependency_graph(&self) -> DependencyGraph<NodeId> {
        let mut graph = DependencyGraph::new();
        for id in self.node_ids() {
            graph.register(id);
            for dep in self.references(self.node(id).root) {
                graph.add_dependency(id, dep);
            }
        }
        graph
    }

    /// Dependency graph restricted to the nodes reachable from `start`.
    pub fn dependency_graph_from(&self, start: ExprId) -> DependencyGraph<NodeId> {
        let mut graph = DependencyGraph::new();
        let mut stack = self.references(start);
        let mut visited = HashSet::new();
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            graph.register(id);
            for dep in self.references(self.node(id).root) {
                graph.add_dependency(id, dep);
                stack.push(dep);
            }
        }
        graph
    }

    fn push(&mut self, node: ExprNode) -> ExprId {
        self.arena.push(node);
        ExprId(self.arena.len() - 1)
    }

    fn lower(&mut self, expr: &Expr, site: &Site<'_>) -> Result<ExprId> {
        let node = match expr {
            Expr::Hex(hex) => {
                let colour = Colour::from_hex(hex).map_err(|e| SassyError::Parse {
                    document: site.origin.to_string(),
                    message: format!("{}: {}", site.label, e),
                    help: None,
                })?;
                ExprNode::Literal(colour)
            }
            Expr::Reference(name) => ExprNode::Ref(self.bind(name, site)?),
            Expr::Word(word) => {
                if let Some(id) = self.lookup(Namespace::Variables, word) {
                    ExprNode::Ref(id)
                } else if let Some(colour) = named_colour(word) {
                    ExprNode::Literal(colour)
                } else {
                    return Err(SassyError::UnresolvedReference {
                        document: site.origin.to_string(),
                        name: word.clone(),
                        site: site.label.clone(),
                        help: Some(
                            "A bare word must name a variable or a CSS colour; use $name for palette entries"
                                .to_string(),
                        ),
                    });
                }
            }
            Expr::Number(n) => ExprNode::Number(*n),
            Expr::Percent(p) => ExprNode::Percent(*p),
            Expr::Call { func, args } => {
                let mut lowered = Vec::with_capacity(args.len());
                for arg in args {
                    let id = match (func, arg) {
                        (ColourFn::Named, Expr::Word(word)) => self.push(ExprNode::Word(word.clone())),
                        _ => self.lower(arg, site)?,
                    };
                    lowered.push(id);
                }
                ExprNode::Call {
                    func: *func,
                    args: lowered,
                }
            }
        };
        Ok(self.push(node))
    }

    fn bind(&self, name: &str, site: &Site<'_>) -> Result<NodeId> {
        let order = Namespace::search_order(site.scope);
        order
            .iter()
            .find_map(|ns| self.lookup(*ns, name))
            .ok_or_else(|| {
                let searched: Vec<&str> = order.iter().map(|ns| section_of(*ns)).collect();
                SassyError::UnresolvedReference {
                    document: site.origin.to_string(),
                    name: format!("${}", name),
                    site: site.label.clone(),
                    help: Some(format!("Searched {}", searched.join(", "))),
                }
            })
    }
}

/// Where an expression is being lowered.
struct Site<'a> {
    scope: Option<Namespace>,
    label: String,
    origin: &'a Origin,
}

fn section_of(namespace: Namespace) -> &'static str {
    match namespace {
        Namespace::Colors => "colors",
        Namespace::Variables => "variables",
        Namespace::Palette => "palette",
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(section_of(*self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_document;

    fn env(source: &str) -> Result<Environment> {
        let doc = parse_document(source, "test.sassy.yml")?;
        Environment::build(&doc)
    }

    #[test]
    fn test_forward_references_bind() {
        let env = env(
            r##"
variables:
  fg: $base
palette:
  base: "#336699"
"##,
        )
        .unwrap();

        let fg = env.lookup(Namespace::Variables, "fg").unwrap();
        let base = env.lookup(Namespace::Palette, "base").unwrap();
        assert_eq!(env.references(env.node(fg).root), vec![base]);
    }

    #[test]
    fn test_colors_see_local_scope() {
        let env = env(
            r##"
colors:
  editor.background: "#101010"
  editor.foreground: $editor.background
"##,
        )
        .unwrap();

        let fg = env.lookup(Namespace::Colors, "editor.foreground").unwrap();
        let bg = env.lookup(Namespace::Colors, "editor.background").unwrap();
        assert_eq!(env.references(env.node(fg).root), vec![bg]);
    }

    #[test]
    fn test_variables_do_not_see_colors() {
        let err = env(
            r##"
variables:
  fg: $editor.background
colors:
  editor.background: "#101010"
"##,
        )
        .unwrap_err();

        match err {
            SassyError::UnresolvedReference { name, site, .. } => {
                assert_eq!(name, "$editor.background");
                assert_eq!(site, "variables.fg");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_bare_word_prefers_variable() {
        let env = env(
            r##"
variables:
  tomato: "#000000"
  accent: tomato
  warm: coral
"##,
        )
        .unwrap();

        let accent = env.lookup(Namespace::Variables, "accent").unwrap();
        let tomato = env.lookup(Namespace::Variables, "tomato").unwrap();
        assert_eq!(env.expr(env.node(accent).root), &ExprNode::Ref(tomato));

        let warm = env.lookup(Namespace::Variables, "warm").unwrap();
        assert_eq!(
            env.expr(env.node(warm).root),
            &ExprNode::Literal(Colour::rgb(0xff, 0x7f, 0x50))
        );
    }

    #[test]
    fn test_bare_word_skips_palette_entries() {
        let err = env("palette:\n  brand: \"#123456\"\ncolors:\n  x: brand\n").unwrap_err();
        assert!(matches!(err, SassyError::UnresolvedReference { ref name, .. } if name == "brand"));

        let env = env(
            r##"
palette:
  tomato: "#000000"
colors:
  editor.background: tomato
"##,
        )
        .unwrap();

        let bg = env.lookup(Namespace::Colors, "editor.background").unwrap();
        assert_eq!(
            env.expr(env.node(bg).root),
            &ExprNode::Literal(Colour::rgb(0xff, 0x63, 0x47))
        );
    }

    #[test]
    fn test_unknown_word_is_unresolved() {
        let err = env("variables:\n  x: notacolour\n").unwrap_err();
        assert!(matches!(err, SassyError::UnresolvedReference { ref name, .. } if name == "notacolour"));
    }

    #[test]
    fn test_named_argument_stays_a_word() {
        let env = env("variables:\n  x: named(tomato)\n").unwrap();
        let x = env.lookup(Namespace::Variables, "x").unwrap();
        match env.expr(env.node(x).root) {
            ExprNode::Call { func, args } => {
                assert_eq!(*func, ColourFn::Named);
                assert_eq!(env.expr(args[0]), &ExprNode::Word("tomato".to_string()));
            }
            other => panic!("unexpected node: {other:?}"),
        }
    }

    #[test]
    fn test_unset_colors_are_not_nodes() {
        let env = env("colors:\n  editor.border: ~\n").unwrap();
        assert!(env.is_empty());
    }

    #[test]
    fn test_dependency_graph_edges() {
        let env = env(
            r##"
variables:
  a: mix($b, $c, 0.5)
  b: $c
  c: "#ffffff"
"##,
        )
        .unwrap();

        let graph = env.dependency_graph();
        let a = env.lookup(Namespace::Variables, "a").unwrap();
        assert_eq!(graph.dependency_count(&a), 2);
        assert_eq!(graph.levels().unwrap().len(), 3);
    }

    #[test]
    fn test_roots_have_no_local_scope() {
        let mut env = env("colors:\n  editor.background: \"#101010\"\n").unwrap();
        let err = env
            .add_root(
                "tokenColors[0]",
                &Origin::new("test.sassy.yml"),
                &Expr::Reference("editor.background".to_string()),
            )
            .unwrap_err();
        assert!(matches!(err, SassyError::UnresolvedReference { .. }));
    }
}
