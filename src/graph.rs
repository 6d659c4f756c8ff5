// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Directed dependency graph and its in-place mutations
//!
//! The graph is an adjacency map from each node to the set of nodes it
//! depends on. An edge target does not have to be a key: such "hanging"
//! edges are kept until [`DirectedGraph::remove_hanging_edges`] or
//! [`DirectedGraph::fix_hanging_edges`] resolves them. Both levels are
//! insertion ordered, so iteration (and everything derived from it) is
//! reproducible for a given load order.

use crate::degree;
use crate::error::{GraphError, MissingContext, MissingNode, Outcome, Result};
use crate::types::{Degree, Edge, Node, Summary};
use indexmap::{IndexMap, IndexSet};
use std::collections::HashSet;
use std::ops::BitOr;
use tracing::debug;

/// Out-neighbor set of a node
pub type Neighbors = IndexSet<Node>;

/// A directed graph keyed by node identifier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectedGraph {
    adjacency: IndexMap<Node, Neighbors>,
}

impl DirectedGraph {
    /// Create a new empty graph
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from `(node, neighbors)` pairs.
    ///
    /// Repeated keys are unioned rather than rejected; use
    /// [`DirectedGraph::try_from_edges`] when duplicates must be detected.
    pub fn from_adjacency<I, K, V, T>(adjacency: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Node>,
        V: IntoIterator<Item = T>,
        T: Into<Node>,
    {
        let mut graph = Self::new();
        for (node, targets) in adjacency {
            graph
                .adjacency
                .entry(node.into())
                .or_default()
                .extend(targets.into_iter().map(Into::into));
        }
        graph
    }

    /// Build a graph edge by edge, failing on the first duplicate
    pub fn try_from_edges<I, A, B>(edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<Node>,
        B: Into<Node>,
    {
        let mut graph = Self::new();
        for (from, to) in edges {
            graph.add_edge(from, to)?;
        }
        Ok(graph)
    }

    /// Ensure `node` is a key. Returns `true` if it was newly added.
    pub fn add_node(&mut self, node: impl Into<Node>) -> bool {
        let node = node.into();
        if self.adjacency.contains_key(&node) {
            return false;
        }
        self.adjacency.insert(node, Neighbors::new());
        true
    }

    /// Record the edge `from -> to`.
    ///
    /// # Errors
    ///
    /// [`GraphError::DuplicateEdge`] if the edge is already present.
    pub fn add_edge(&mut self, from: impl Into<Node>, to: impl Into<Node>) -> Result<()> {
        let (from, to) = (from.into(), to.into());
        let targets = self.adjacency.entry(from.clone()).or_default();
        if targets.contains(&to) {
            return Err(GraphError::DuplicateEdge { from, to });
        }
        targets.insert(to);
        Ok(())
    }

    /// All keys, in insertion order
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = &Node> + '_ {
        self.adjacency.keys()
    }

    /// All edges, grouped by source node
    pub fn edges(&self) -> impl Iterator<Item = (&Node, &Node)> + '_ {
        self.adjacency
            .iter()
            .flat_map(|(from, targets)| targets.iter().map(move |to| (from, to)))
    }

    /// Owned copy of [`DirectedGraph::edges`]
    #[must_use]
    pub fn edge_list(&self) -> Vec<Edge> {
        self.edges().map(|(u, v)| (u.clone(), v.clone())).collect()
    }

    /// Iterate `(node, out-neighbors)` pairs
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&Node, &Neighbors)> + '_ {
        self.adjacency.iter()
    }

    /// Out-neighbors of `node`.
    ///
    /// # Errors
    ///
    /// [`GraphError::NodeNotFound`] if `node` is not a key.
    pub fn out_neighbors(&self, node: &str) -> Result<&Neighbors> {
        self.adjacency
            .get(node)
            .ok_or_else(|| GraphError::NodeNotFound(node.to_string()))
    }

    /// Check whether `node` is a key
    #[must_use]
    pub fn contains_node(&self, node: &str) -> bool {
        self.adjacency.contains_key(node)
    }

    /// Check whether `node` is a key or the target of any edge
    #[must_use]
    pub fn references(&self, node: &str) -> bool {
        self.contains_node(node) || self.adjacency.values().any(|targets| targets.contains(node))
    }

    /// Check whether the edge `from -> to` is recorded
    #[must_use]
    pub fn contains_edge(&self, from: &str, to: &str) -> bool {
        self.adjacency
            .get(from)
            .is_some_and(|targets| targets.contains(to))
    }

    /// Number of keys
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of recorded edges
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(IndexSet::len).sum()
    }

    /// Check if the graph has no keys
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Node and edge counts. Edge targets that are not keys are counted
    /// as nodes too.
    #[must_use]
    pub fn summary(&self) -> Summary {
        let dangling: HashSet<&Node> = self
            .adjacency
            .values()
            .flatten()
            .filter(|target| !self.adjacency.contains_key(*target))
            .collect();
        Summary {
            nodes: self.adjacency.len() + dangling.len(),
            edges: self.edge_count(),
        }
    }

    // =========================================================================
    // Merging
    // =========================================================================

    /// Union `other` into this graph. Never removes an edge.
    pub fn merge_in_place(&mut self, other: &Self) {
        for (node, targets) in &other.adjacency {
            self.adjacency
                .entry(node.clone())
                .or_default()
                .extend(targets.iter().cloned());
        }
    }

    /// Union of this graph and `other` as a new graph
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        merged.merge_in_place(other);
        merged
    }

    fn absorb(&mut self, other: Self) {
        for (node, targets) in other.adjacency {
            match self.adjacency.get_mut(&node) {
                Some(existing) => existing.extend(targets),
                None => {
                    self.adjacency.insert(node, targets);
                }
            }
        }
    }

    // =========================================================================
    // Hanging edges
    // =========================================================================

    /// Drop every edge whose target is not a key. Returns the removed edges.
    pub fn remove_hanging_edges(&mut self) -> Vec<Edge> {
        let hanging: Vec<Edge> = self
            .edges()
            .filter(|(_, to)| !self.adjacency.contains_key(*to))
            .map(|(from, to)| (from.clone(), to.clone()))
            .collect();

        for (from, to) in &hanging {
            if let Some(targets) = self.adjacency.get_mut(from) {
                targets.shift_remove(to);
            }
        }

        debug!("Removed {} hanging edges", hanging.len());
        hanging
    }

    /// Add an isolated key for every edge target that is not a key.
    /// Returns the nodes that were added.
    pub fn fix_hanging_edges(&mut self) -> Vec<Node> {
        let missing: IndexSet<Node> = self
            .adjacency
            .values()
            .flatten()
            .filter(|target| !self.adjacency.contains_key(*target))
            .cloned()
            .collect();

        for node in &missing {
            self.adjacency.insert(node.clone(), Neighbors::new());
        }

        debug!("Added {} nodes for hanging edges", missing.len());
        missing.into_iter().collect()
    }

    // =========================================================================
    // Deletion
    // =========================================================================

    /// Remove `node` together with its outgoing and incoming edges.
    ///
    /// A node the graph does not reference at all is skipped with a
    /// [`MissingNode`] warning.
    pub fn delete_node(&mut self, node: &str) -> Outcome {
        let mut found = self.adjacency.shift_remove(node).is_some();
        for targets in self.adjacency.values_mut() {
            found |= targets.shift_remove(node);
        }

        if found {
            Outcome::Applied
        } else {
            Outcome::Skipped(MissingNode::new(node, MissingContext::DeleteNode))
        }
    }

    /// Delete each distinct node of `nodes`
    pub fn delete_nodes<I, S>(&mut self, nodes: I) -> Vec<Outcome>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let unique: IndexSet<Node> = nodes
            .into_iter()
            .map(|n| n.as_ref().to_owned())
            .collect();
        unique.iter().map(|node| self.delete_node(node)).collect()
    }

    /// Remove each `(from, to)` edge.
    ///
    /// A source the graph does not reference at all is skipped with a
    /// warning. A source that is only an edge target, or a target missing
    /// from a known source, leaves nothing to remove and counts as applied.
    pub fn delete_edges<I, A, B>(&mut self, edges: I) -> Vec<Outcome>
    where
        I: IntoIterator<Item = (A, B)>,
        A: AsRef<str>,
        B: AsRef<str>,
    {
        edges
            .into_iter()
            .map(|(from, to)| {
                let from = from.as_ref();
                if let Some(targets) = self.adjacency.get_mut(from) {
                    targets.shift_remove(to.as_ref());
                    Outcome::Applied
                } else if self.references(from) {
                    Outcome::Applied
                } else {
                    Outcome::Skipped(MissingNode::new(from, MissingContext::EdgeSource))
                }
            })
            .collect()
    }

    /// Keep only the nodes accepted by `keep`, as keys and as targets.
    /// Returns every edge that was dropped, grouped by source.
    pub fn retain_nodes<F>(&mut self, keep: F) -> Vec<Edge>
    where
        F: Fn(&str) -> bool,
    {
        let mut removed = Vec::new();
        let mut retained = IndexMap::with_capacity(self.adjacency.len());

        for (node, targets) in std::mem::take(&mut self.adjacency) {
            if !keep(node.as_str()) {
                removed.extend(targets.into_iter().map(|to| (node.clone(), to)));
                continue;
            }
            let (kept, dropped): (Neighbors, Neighbors) =
                targets.into_iter().partition(|to| keep(to.as_str()));
            removed.extend(dropped.into_iter().map(|to| (node.clone(), to)));
            retained.insert(node, kept);
        }

        self.adjacency = retained;
        removed
    }

    // =========================================================================
    // Degrees
    // =========================================================================

    /// Degree of every key and every edge target
    #[must_use]
    pub fn degrees(&self) -> IndexMap<Node, Degree> {
        degree::degrees(self)
    }

    /// Delete every node whose in- and out-degree are both zero.
    /// Returns the deleted nodes.
    pub fn remove_zero_degree_nodes(&mut self) -> Vec<Node> {
        let zero = degree::zero_degree_nodes(self);
        for node in &zero {
            self.adjacency.shift_remove(node);
        }
        debug!("Removed {} zero-degree nodes", zero.len());
        zero
    }

    /// Export to DOT format
    #[must_use]
    pub fn to_dot(&self, name: &str) -> String {
        crate::dotfile::to_dot(self, name)
    }
}

impl BitOr for &DirectedGraph {
    type Output = DirectedGraph;

    fn bitor(self, rhs: Self) -> DirectedGraph {
        self.merge(rhs)
    }
}

impl FromIterator<DirectedGraph> for DirectedGraph {
    /// Merge many graphs into one
    fn from_iter<I: IntoIterator<Item = DirectedGraph>>(iter: I) -> Self {
        let mut merged = Self::new();
        for graph in iter {
            merged.absorb(graph);
        }
        merged
    }
}
