use serde::Serialize;
use std::collections::HashSet;
use std::fmt::Write as _;

use crate::graph::DependencyGraph;

/// Query trait implemented by all query types.
///
/// Given an immutable reference to a `DependencyGraph`, returns a result of type `R`.
pub trait Query<R> {
    fn run(&self, graph: &DependencyGraph) -> R;
}

/// Find a chain of dependency edges from `depender` to `dependee`.
///
/// Depth-first, following each library's dependencies in declaration order;
/// the first chain found is returned, which is not necessarily the shortest.
/// Every library is expanded at most once, so cycles terminate.
pub struct DependencyPathQuery {
    pub depender: String,
    pub dependee: String,
}

impl DependencyPathQuery {
    #[must_use]
    pub fn new(depender: &str, dependee: &str) -> Self {
        Self { depender: depender.to_string(), dependee: dependee.to_string() }
    }
}

// `deps` is called once per expanded library.
fn find_path<'g, F>(
    deps: &F,
    current: &'g str,
    target: &str,
    visited: &mut HashSet<&'g str>,
    path: &mut Vec<&'g str>,
) -> bool
where
    F: Fn(&str) -> &'g [String],
{
    if current == target {
        path.push(current);
        return true;
    }
    visited.insert(current);
    path.push(current);
    for dep in deps(current) {
        if !visited.contains(dep.as_str()) && find_path(deps, dep, target, visited, path) {
            return true;
        }
    }
    path.pop();
    false
}

// Returns the chain from depender to dependee inclusive, or None when unreachable.
impl Query<Option<Vec<String>>> for DependencyPathQuery {
    fn run(&self, graph: &DependencyGraph) -> Option<Vec<String>> {
        let mut visited = HashSet::new();
        let mut path = Vec::new();
        let deps = |name: &str| graph.dependencies_of(name);
        if find_path(&deps, &self.depender, &self.dependee, &mut visited, &mut path) {
            Some(path.into_iter().map(str::to_string).collect())
        } else {
            None
        }
    }
}

/// Join a dependency chain for display: `a.so -> b.so -> c.so`.
#[must_use]
pub fn render_path(path: &[String]) -> String {
    path.join(" -> ")
}

/// How the tree display treats a dependency that is already an ancestor on the current branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CyclePolicy {
    /// Show the node with a cycle marker, do not expand it.
    #[default]
    Mark,
    /// Leave the node out.
    Elide,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TreeNode {
    pub name: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub cycle: bool,
    pub dependencies: Vec<TreeNode>,
}

impl TreeNode {
    /// One line per node, indented two spaces per level, pre-order.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        self.write_lines(0, &mut out);
        out
    }

    fn write_lines(&self, depth: usize, out: &mut String) {
        let marker = if self.cycle { " (cycle)" } else { "" };
        let _ = writeln!(out, "{}{}{}", "  ".repeat(depth), self.name, marker);
        for child in &self.dependencies {
            child.write_lines(depth + 1, out);
        }
    }

    /// Number of nodes in the tree, root included.
    #[must_use]
    pub fn size(&self) -> usize {
        1 + self.dependencies.iter().map(TreeNode::size).sum::<usize>()
    }
}

/// Expand the full transitive dependency tree of `root`.
///
/// Shared dependencies are expanded under every parent that declares them, so
/// output on an acyclic graph lists each path. Only a dependency that already
/// appears on the branch from the root is cut, according to `cycles`.
pub struct DependencyTreeQuery {
    pub root: String,
    pub cycles: CyclePolicy,
}

impl DependencyTreeQuery {
    #[must_use]
    pub fn new(root: &str) -> Self {
        Self { root: root.to_string(), cycles: CyclePolicy::default() }
    }

    #[must_use]
    pub fn with_cycles(mut self, cycles: CyclePolicy) -> Self {
        self.cycles = cycles;
        self
    }

    fn expand<'g>(
        &self,
        graph: &'g DependencyGraph,
        name: &'g str,
        ancestors: &mut HashSet<&'g str>,
    ) -> TreeNode {
        ancestors.insert(name);
        let mut dependencies = Vec::new();
        for dep in graph.dependencies_of(name) {
            if ancestors.contains(dep.as_str()) {
                if self.cycles == CyclePolicy::Mark {
                    dependencies.push(TreeNode {
                        name: dep.clone(),
                        cycle: true,
                        dependencies: Vec::new(),
                    });
                }
                continue;
            }
            dependencies.push(self.expand(graph, dep, ancestors));
        }
        ancestors.remove(name);
        TreeNode { name: name.to_string(), cycle: false, dependencies }
    }
}

impl Query<TreeNode> for DependencyTreeQuery {
    fn run(&self, graph: &DependencyGraph) -> TreeNode {
        let mut ancestors = HashSet::new();
        self.expand(graph, &self.root, &mut ancestors)
    }
}
