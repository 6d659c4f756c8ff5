// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Induced subgraph extraction

use crate::error::{MissingContext, MissingNode};
use crate::graph::DirectedGraph;
use indexmap::IndexSet;

/// Subgraph induced by `subset`, plus a warning for every member the
/// source graph does not reference at all (neither a key nor an edge
/// target).
///
/// Every member becomes a key of the result (absent ones with no edges).
/// Only edges whose source and target both lie in `subset` are copied.
pub fn induced_subgraph<I, S>(graph: &DirectedGraph, subset: I) -> (DirectedGraph, Vec<MissingNode>)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let members: IndexSet<String> = subset
        .into_iter()
        .map(|node| node.as_ref().to_owned())
        .collect();

    let mut missing = Vec::new();
    let adjacency: Vec<(String, Vec<String>)> = members
        .iter()
        .map(|node| match graph.out_neighbors(node) {
            Ok(targets) => (
                node.clone(),
                targets
                    .iter()
                    .filter(|t| members.contains(t.as_str()))
                    .cloned()
                    .collect(),
            ),
            Err(_) => {
                if !graph.references(node) {
                    missing.push(MissingNode::new(node.as_str(), MissingContext::SubgraphMember));
                }
                (node.clone(), Vec::new())
            }
        })
        .collect();

    (DirectedGraph::from_adjacency(adjacency), missing)
}
