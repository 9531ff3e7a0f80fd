//! Dependency graph over named colour definitions.
//!
//! Tracks which names reference which other names, enabling level-ordered
//! evaluation and cycle detection. Both walks are iterative, so arbitrarily
//! long reference chains never grow the call stack.

use std::collections::{BTreeMap, BTreeSet};

/// A dependency graph tracking references between nodes.
#[derive(Debug)]
pub struct DependencyGraph<Id: Ord + Clone> {
    /// Adjacency list: node -> nodes it depends on.
    dependencies: BTreeMap<Id, BTreeSet<Id>>,

    /// Reverse adjacency list: node -> nodes that depend on it.
    dependents: BTreeMap<Id, BTreeSet<Id>>,

    /// All known nodes (including those with no dependencies).
    nodes: BTreeSet<Id>,
}

impl<Id: Ord + Clone> Default for DependencyGraph<Id> {
    fn default() -> Self {
        Self {
            dependencies: BTreeMap::new(),
            dependents: BTreeMap::new(),
            nodes: BTreeSet::new(),
        }
    }
}

impl<Id: Ord + Clone> DependencyGraph<Id> {
    /// Create a new empty dependency graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node in the graph (even if it has no dependencies).
    pub fn register(&mut self, id: Id) {
        self.nodes.insert(id);
    }

    /// Add a dependency: `from` depends on `to`.
    ///
    /// Both nodes are automatically registered in the graph.
    pub fn add_dependency(&mut self, from: Id, to: Id) {
        self.nodes.insert(from.clone());
        self.nodes.insert(to.clone());

        self.dependencies
            .entry(from.clone())
            .or_default()
            .insert(to.clone());

        self.dependents.entry(to).or_default().insert(from);
    }

    /// Get all nodes that `id` depends on (direct dependencies).
    pub fn dependencies_of(&self, id: &Id) -> impl Iterator<Item = &Id> {
        self.dependencies.get(id).into_iter().flatten()
    }

    /// Get all nodes that depend on `id` (direct dependents).
    pub fn dependents_of(&self, id: &Id) -> impl Iterator<Item = &Id> {
        self.dependents.get(id).into_iter().flatten()
    }

    /// Get the total number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Group nodes into evaluation levels using Kahn's algorithm.
    ///
    /// Every node's dependencies live in strictly earlier levels, so the
    /// nodes of one level are independent of each other. Returns an error
    /// with the cycle path if the graph is cyclic.
    pub fn levels(&self) -> Result<Vec<Vec<Id>>, CycleError<Id>> {
        // in_degree[x] = number of unprocessed nodes that x depends on
        let mut in_degree: BTreeMap<&Id, usize> = self
            .nodes
            .iter()
            .map(|id| (id, self.dependency_count(id)))
            .collect();

        let mut current: Vec<&Id> = in_degree
            .iter()
            .filter(|(_, &count)| count == 0)
            .map(|(&id, _)| id)
            .collect();

        let mut levels = Vec::new();
        let mut processed = 0;

        while !current.is_empty() {
            let mut next = Vec::new();
            for id in &current {
                for dependent in self.dependents_of(id) {
                    if let Some(count) = in_degree.get_mut(dependent) {
                        *count = count.saturating_sub(1);
                        if *count == 0 {
                            next.push(dependent);
                        }
                    }
                }
            }
            processed += current.len();
            levels.push(current.into_iter().cloned().collect());
            current = next;
        }

        if processed != self.nodes.len() {
            return Err(CycleError {
                cycle: self.find_cycle(),
            });
        }

        Ok(levels)
    }

    /// Get the number of dependencies for a node.
    pub fn dependency_count(&self, id: &Id) -> usize {
        self.dependencies.get(id).map_or(0, |s| s.len())
    }

    /// Find a cycle in the graph (for error reporting).
    ///
    /// Iterative depth-first search; the returned path starts and ends with
    /// the same node.
    pub fn find_cycle(&self) -> Vec<Id> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            OnPath,
            Done,
        }

        let mut marks: BTreeMap<&Id, Mark> =
            self.nodes.iter().map(|id| (id, Mark::Unvisited)).collect();

        for start in &self.nodes {
            if marks[start] != Mark::Unvisited {
                continue;
            }

            // Each frame: (node, its dependencies still to visit)
            let mut stack: Vec<(&Id, Vec<&Id>)> = Vec::new();
            marks.insert(start, Mark::OnPath);
            stack.push((start, self.pending(start)));

            while let Some((node, pending)) = stack.last_mut() {
                match pending.pop() {
                    Some(dep) => match marks[dep] {
                        Mark::Unvisited => {
                            marks.insert(dep, Mark::OnPath);
                            stack.push((dep, self.pending(dep)));
                        }
                        Mark::OnPath => {
                            let from = stack.iter().position(|(n, _)| *n == dep).unwrap_or(0);
                            let mut cycle: Vec<Id> =
                                stack[from..].iter().map(|(n, _)| (*n).clone()).collect();
                            cycle.push(dep.clone());
                            return cycle;
                        }
                        Mark::Done => {}
                    },
                    None => {
                        let node: &Id = *node;
                        marks.insert(node, Mark::Done);
                        stack.pop();
                    }
                }
            }
        }

        Vec::new()
    }

    /// Dependencies of `id` as a stack, so popping visits them in order.
    fn pending(&self, id: &Id) -> Vec<&Id> {
        let mut deps: Vec<&Id> = self.dependencies_of(id).collect();
        deps.reverse();
        deps
    }
}

/// Error returned when a cycle is detected in the dependency graph.
#[derive(Debug)]
pub struct CycleError<Id> {
    /// The nodes involved in the cycle, first node repeated at the end.
    pub cycle: Vec<Id>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_graph() {
        let graph: DependencyGraph<u32> = DependencyGraph::new();
        assert!(graph.is_empty());
        assert!(graph.levels().unwrap().is_empty());
    }

    #[test]
    fn test_linear_levels() {
        let mut graph = DependencyGraph::new();
        // c -> b -> a
        graph.add_dependency("b", "a");
        graph.add_dependency("c", "b");

        let levels = graph.levels().unwrap();
        assert_eq!(levels, vec![vec!["a"], vec!["b"], vec!["c"]]);
    }

    #[test]
    fn test_diamond_levels() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency("b", "a");
        graph.add_dependency("c", "a");
        graph.add_dependency("d", "b");
        graph.add_dependency("d", "c");
        graph.register("e");

        let levels = graph.levels().unwrap();
        assert_eq!(levels[0], vec!["a", "e"]);
        assert_eq!(levels[1], vec!["b", "c"]);
        assert_eq!(levels[2], vec!["d"]);
    }

    #[test]
    fn test_cycle_detection() {
        let mut graph = DependencyGraph::new();
        // a -> b -> c -> a
        graph.add_dependency("a", "b");
        graph.add_dependency("b", "c");
        graph.add_dependency("c", "a");
        graph.add_dependency("d", "a");

        let err = graph.levels().unwrap_err();
        assert_eq!(err.cycle, vec!["a", "b", "c", "a"]);
    }

    #[test]
    fn test_self_reference_cycle() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency("x", "x");

        let err = graph.levels().unwrap_err();
        assert_eq!(err.cycle, vec!["x", "x"]);
    }

    #[test]
    fn test_deep_chain_is_iterative() {
        let mut graph = DependencyGraph::new();
        let n = 50_000u32;
        for i in 0..n {
            graph.add_dependency(i, (i + 1) % n);
        }

        let err = graph.levels().unwrap_err();
        assert_eq!(err.cycle.len(), n as usize + 1);
        assert_eq!(err.cycle.first(), err.cycle.last());
    }

    #[test]
    fn test_dependents_of() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency("dark", "base");
        graph.add_dependency("light", "base");

        let dependents: Vec<_> = graph.dependents_of(&"base").collect();
        assert_eq!(dependents, vec![&"dark", &"light"]);
        assert_eq!(graph.dependency_count(&"dark"), 1);
    }
}
