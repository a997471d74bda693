//! The resolved dependency graph view.
//!
//! The walker records every resolved node and edge here as it goes. The
//! graph is a reporting surface for deployment tooling: tree rendering and
//! reverse-dependency queries. The walk's ordering guarantees come from
//! the walker itself, not from this structure.

use std::collections::{HashMap, HashSet};
use std::fmt;

use karp_model::artifact::{Artifact, ArtifactId, ArtifactKind};
use karp_model::reference::RelationKind;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

/// A node in the resolved dependency graph.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: ArtifactId,
    pub name: Option<String>,
    pub kind: ArtifactKind,
}

impl fmt::Display for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Edge label: the declared relation plus ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphEdge {
    pub relation: RelationKind,
    pub owned: bool,
}

/// A resolved dependency graph backed by petgraph.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    graph: DiGraph<GraphNode, GraphEdge>,
    index: HashMap<ArtifactId, NodeIndex>,
    roots: Vec<NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or retrieve the node for an artifact. Identity is `(url, version)`.
    pub fn add_node(&mut self, artifact: &Artifact) -> NodeIndex {
        if let Some(&idx) = self.index.get(&artifact.id) {
            return idx;
        }
        let idx = self.graph.add_node(GraphNode {
            id: artifact.id.clone(),
            name: artifact.name.clone(),
            kind: artifact.kind,
        });
        self.index.insert(artifact.id.clone(), idx);
        idx
    }

    /// Mark a node as a root of the walk.
    pub fn add_root(&mut self, idx: NodeIndex) {
        if !self.roots.contains(&idx) {
            self.roots.push(idx);
        }
    }

    /// Add a dependency edge from `from` to `to`, skipping duplicates.
    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, edge: GraphEdge) {
        if !self.graph.edges(from).any(|e| e.target() == to) {
            self.graph.add_edge(from, to, edge);
        }
    }

    pub fn find(&self, id: &ArtifactId) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    pub fn node(&self, idx: NodeIndex) -> &GraphNode {
        &self.graph[idx]
    }

    pub fn roots(&self) -> &[NodeIndex] {
        &self.roots
    }

    /// Direct dependencies of a node.
    pub fn dependencies_of(&self, idx: NodeIndex) -> Vec<(NodeIndex, &GraphEdge)> {
        self.graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| (e.target(), e.weight()))
            .collect()
    }

    /// Reverse dependencies (who depends on this node).
    pub fn dependents_of(&self, idx: NodeIndex) -> Vec<(NodeIndex, &GraphEdge)> {
        self.graph
            .edges_directed(idx, Direction::Incoming)
            .map(|e| (e.source(), e.weight()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Render the dependency tree from the roots to a string.
    ///
    /// Cyclic edges are rendered once and not re-entered.
    pub fn render_tree(&self, max_depth: Option<usize>) -> String {
        let mut output = String::new();
        for &root in &self.roots {
            output.push_str(&format!("{}\n", self.graph[root]));
            let mut visited = HashSet::new();
            visited.insert(root);
            let deps = self.dependencies_of(root);
            let count = deps.len();
            for (i, (idx, _)) in deps.iter().enumerate() {
                let is_last = i == count - 1;
                self.render_subtree(&mut output, *idx, "", is_last, 1, max_depth, &mut visited);
            }
        }
        output
    }

    #[allow(clippy::too_many_arguments)]
    fn render_subtree(
        &self,
        output: &mut String,
        idx: NodeIndex,
        prefix: &str,
        is_last: bool,
        depth: usize,
        max_depth: Option<usize>,
        visited: &mut HashSet<NodeIndex>,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        output.push_str(&format!("{prefix}{connector}{}\n", self.graph[idx]));

        if let Some(max) = max_depth {
            if depth >= max {
                return;
            }
        }

        if !visited.insert(idx) {
            return;
        }

        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        let deps = self.dependencies_of(idx);
        let count = deps.len();
        for (i, (child, _)) in deps.iter().enumerate() {
            let is_last = i == count - 1;
            self.render_subtree(
                output,
                *child,
                &child_prefix,
                is_last,
                depth + 1,
                max_depth,
                visited,
            );
        }

        visited.remove(&idx);
    }
}
