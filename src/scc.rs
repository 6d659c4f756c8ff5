// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Strongly connected components using Tarjan's algorithm
//!
//! The search is iterative: an explicit frame stack of
//! `(node, next neighbor position)` replaces recursion, so long dependency
//! chains cannot exhaust the call stack.
//!
//! Only keys are used as roots and only edges between keys are followed.
//! A node that appears solely as an edge target is not part of any
//! component; call [`DirectedGraph::fix_hanging_edges`] first to have such
//! nodes reported as singletons.
//!
//! When a neighbor is already on the stack, the current node's low-link is
//! lowered to the neighbor's *low-link* (not its discovery index). Both
//! rules yield the same partition.

use crate::graph::DirectedGraph;
use crate::types::Node;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::HashMap;
use tracing::debug;

/// A strongly connected component
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Scc {
    nodes: Vec<Node>,
}

impl Scc {
    /// Create a component from its member nodes
    #[must_use]
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Member nodes
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Consume the component, returning its members
    #[must_use]
    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }

    /// Number of members
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false for components produced by [`SccFinder`]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check membership
    #[must_use]
    pub fn contains(&self, node: &str) -> bool {
        self.nodes.iter().any(|n| n == node)
    }

    /// True if the component contains a cycle: more than one member, or a
    /// single member with an edge to itself
    #[must_use]
    pub fn is_cycle(&self, graph: &DirectedGraph) -> bool {
        match self.nodes.as_slice() {
            [] => false,
            [only] => graph.contains_edge(only, only),
            _ => true,
        }
    }

    /// Sort members by identifier
    pub fn sort(&mut self) {
        self.nodes.sort_unstable();
    }
}

/// Tarjan's SCC search over one graph
pub struct SccFinder<'g> {
    /// Keys, indexed by position
    nodes: Vec<&'g Node>,
    /// Successor positions, restricted to keys
    successors: Vec<Vec<usize>>,
    /// Discovery index for each node (None if not yet visited)
    discovery: Vec<Option<usize>>,
    /// Lowest discovery index reachable within the current search
    low_link: Vec<usize>,
    /// Membership set for `stack`
    on_stack: Vec<bool>,
    /// Candidate members of the component being built
    stack: Vec<usize>,
    /// Next discovery index
    counter: usize,
    /// Closed components, as positions
    components: Vec<Vec<usize>>,
}

impl<'g> SccFinder<'g> {
    /// Prepare a search over `graph`
    #[must_use]
    pub fn new(graph: &'g DirectedGraph) -> Self {
        let nodes: Vec<&Node> = graph.nodes().collect();
        let position: HashMap<&str, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.as_str(), i))
            .collect();
        let successors = graph
            .iter()
            .map(|(_, targets)| {
                targets
                    .iter()
                    .filter_map(|t| position.get(t.as_str()).copied())
                    .collect()
            })
            .collect();

        let n = nodes.len();
        Self {
            nodes,
            successors,
            discovery: vec![None; n],
            low_link: vec![0; n],
            on_stack: vec![false; n],
            stack: Vec::new(),
            counter: 0,
            components: Vec::new(),
        }
    }

    /// Run the search and return every component.
    ///
    /// Components come out in the order they close (reverse topological
    /// order of the condensation); members in stack-pop order.
    #[must_use]
    pub fn run(mut self) -> Vec<Scc> {
        for root in 0..self.nodes.len() {
            if self.discovery[root].is_none() {
                self.strongconnect(root);
            }
        }

        debug!(
            "Found {} strongly connected components over {} nodes",
            self.components.len(),
            self.nodes.len()
        );

        let nodes = self.nodes;
        self.components
            .into_iter()
            .map(|members| Scc::new(members.into_iter().map(|i| nodes[i].clone()).collect()))
            .collect()
    }

    fn visit(&mut self, u: usize) {
        self.discovery[u] = Some(self.counter);
        self.low_link[u] = self.counter;
        self.counter += 1;
        self.stack.push(u);
        self.on_stack[u] = true;
    }

    fn strongconnect(&mut self, root: usize) {
        let mut frames: Vec<(usize, usize)> = vec![(root, 0)];
        self.visit(root);

        while let Some(frame) = frames.last_mut() {
            let (u, pos) = *frame;

            if let Some(&v) = self.successors[u].get(pos) {
                frame.1 += 1;
                if self.discovery[v].is_none() {
                    // Tree edge; low-link propagates when the child frame closes
                    self.visit(v);
                    frames.push((v, 0));
                } else if self.on_stack[v] {
                    self.low_link[u] = self.low_link[u].min(self.low_link[v]);
                }
                continue;
            }

            frames.pop();

            if Some(self.low_link[u]) == self.discovery[u] {
                self.close_component(u);
            }

            if let Some(&(parent, _)) = frames.last() {
                self.low_link[parent] = self.low_link[parent].min(self.low_link[u]);
            }
        }
    }

    fn close_component(&mut self, root: usize) {
        let mut members = Vec::new();
        while let Some(w) = self.stack.pop() {
            self.on_stack[w] = false;
            members.push(w);
            if w == root {
                break;
            }
        }
        self.components.push(members);
    }
}

/// All strongly connected components of `graph`
#[must_use]
pub fn strongly_connected_components(graph: &DirectedGraph) -> Vec<Scc> {
    SccFinder::new(graph).run()
}

/// Components that contain a cycle and have at least `min_size` members.
///
/// Members are sorted by identifier; components are ordered largest first,
/// ties broken by their members.
#[must_use]
pub fn find_cycles(graph: &DirectedGraph, min_size: usize) -> Vec<Scc> {
    let mut cycles: Vec<Scc> = strongly_connected_components(graph)
        .into_iter()
        .filter(|scc| scc.len() >= min_size && scc.is_cycle(graph))
        .map(|mut scc| {
            scc.sort();
            scc
        })
        .collect();

    cycles.sort_by(|a, b| {
        (Reverse(a.len()), a.nodes()).cmp(&(Reverse(b.len()), b.nodes()))
    });
    cycles
}
