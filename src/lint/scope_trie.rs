//! Segment trie over TextMate scope selectors.
//!
//! A scope is split into segments at `.` and at whitespace (descendant
//! selectors). Each segment keeps its leading separator, so `source.js` and
//! `source js` are different paths. `A` is an ancestor of `B` exactly when
//! the segments of `A` are a prefix of the segments of `B`.

use std::collections::HashMap;

#[derive(Debug, Default)]
struct TrieNode {
    children: HashMap<String, usize>,
    /// First rule that inserted a scope ending here, with the scope as written.
    owner: Option<(usize, String)>,
}

/// Trie of scopes inserted by earlier rules.
#[derive(Debug)]
pub struct ScopeTrie {
    nodes: Vec<TrieNode>,
}

/// An earlier scope that is an ancestor of a queried scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ancestor<'a> {
    pub rule: usize,
    pub scope: &'a str,
}

impl Default for ScopeTrie {
    fn default() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
        }
    }
}

impl ScopeTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `scope` as selected by `rule`. An earlier owner is kept.
    pub fn insert(&mut self, scope: &str, rule: usize) {
        let mut current = 0;
        for segment in segments(scope) {
            current = match self.nodes[current].children.get(&segment) {
                Some(&next) => next,
                None => {
                    self.nodes.push(TrieNode::default());
                    let next = self.nodes.len() - 1;
                    self.nodes[current].children.insert(segment, next);
                    next
                }
            };
        }
        if current != 0 && self.nodes[current].owner.is_none() {
            self.nodes[current].owner = Some((rule, scope.trim().to_string()));
        }
    }

    /// All recorded scopes that are ancestors of (or equal to) `scope`,
    /// shortest first.
    pub fn ancestors(&self, scope: &str) -> Vec<Ancestor<'_>> {
        let mut found = Vec::new();
        let mut current = 0;
        for segment in segments(scope) {
            match self.nodes[current].children.get(&segment) {
                Some(&next) => current = next,
                None => break,
            }
            if let Some((rule, scope)) = &self.nodes[current].owner {
                found.push(Ancestor {
                    rule: *rule,
                    scope: scope.as_str(),
                });
            }
        }
        found
    }
}

/// Split a scope into separator-prefixed segments: `a.b c` → `a`, `.b`, ` c`.
fn segments(scope: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut pending_space = false;

    for c in scope.trim().chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space || c == '.' {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            if pending_space {
                current.push(' ');
                pending_space = false;
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments() {
        assert_eq!(segments("comment.line"), vec!["comment", ".line"]);
        assert_eq!(
            segments("  source.js   meta.fn "),
            vec!["source", ".js", " meta", ".fn"]
        );
        assert_eq!(segments(""), Vec::<String>::new());
    }

    #[test]
    fn test_ancestor_on_segment_boundary() {
        let mut trie = ScopeTrie::new();
        trie.insert("comment", 0);

        assert_eq!(trie.ancestors("comment.line").len(), 1);
        assert_eq!(trie.ancestors("comment").len(), 1);
        assert!(trie.ancestors("comments").is_empty());
        assert!(trie.ancestors("string.comment").is_empty());
    }

    #[test]
    fn test_descendant_selector() {
        let mut trie = ScopeTrie::new();
        trie.insert("source.js", 0);

        let found = trie.ancestors("source.js meta.function");
        assert_eq!(found, vec![Ancestor { rule: 0, scope: "source.js" }]);
        assert!(trie.ancestors("source.json").is_empty());
    }

    #[test]
    fn test_first_owner_wins_and_order_is_shortest_first() {
        let mut trie = ScopeTrie::new();
        trie.insert("keyword.control", 1);
        trie.insert("keyword", 2);
        trie.insert("keyword", 3);

        let found = trie.ancestors("keyword.control.flow");
        let rules: Vec<_> = found.iter().map(|a| a.rule).collect();
        assert_eq!(rules, vec![2, 1]);
    }
}
