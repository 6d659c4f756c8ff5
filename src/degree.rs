// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! In/out degree computation

use crate::graph::DirectedGraph;
use crate::types::{Degree, Node};
use indexmap::IndexMap;

/// Degree of every node the graph references.
///
/// Keys come first in insertion order, followed by edge targets that are
/// not keys in the order they are first seen. A self-loop counts once
/// towards each direction.
#[must_use]
pub fn degrees(graph: &DirectedGraph) -> IndexMap<Node, Degree> {
    let mut degrees: IndexMap<Node, Degree> = graph
        .iter()
        .map(|(node, targets)| {
            (
                node.clone(),
                Degree {
                    in_degree: 0,
                    out_degree: targets.len(),
                },
            )
        })
        .collect();

    for (_, target) in graph.edges() {
        if let Some(degree) = degrees.get_mut(target) {
            degree.in_degree += 1;
        } else {
            degrees.insert(
                target.clone(),
                Degree {
                    in_degree: 1,
                    out_degree: 0,
                },
            );
        }
    }

    degrees
}

/// Nodes with neither incoming nor outgoing edges, in key order
#[must_use]
pub fn zero_degree_nodes(graph: &DirectedGraph) -> Vec<Node> {
    degrees(graph)
        .into_iter()
        .filter(|(_, degree)| degree.is_zero())
        .map(|(node, _)| node)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degrees_include_targets() {
        let graph = DirectedGraph::try_from_edges([("a", "b"), ("a", "c"), ("b", "c")]).unwrap();

        let d = degrees(&graph);

        assert_eq!(d.len(), 3);
        assert_eq!(d["a"], Degree { in_degree: 0, out_degree: 2 });
        assert_eq!(d["b"], Degree { in_degree: 1, out_degree: 1 });
        assert_eq!(d["c"], Degree { in_degree: 2, out_degree: 0 });
    }

    #[test]
    fn test_self_loop_degree() {
        let graph = DirectedGraph::try_from_edges([("a", "a")]).unwrap();

        assert_eq!(degrees(&graph)["a"], Degree { in_degree: 1, out_degree: 1 });
    }

    #[test]
    fn test_zero_degree_nodes() {
        let mut graph = DirectedGraph::try_from_edges([("a", "b")]).unwrap();
        graph.add_node("solo");
        graph.add_node("b");

        assert_eq!(zero_degree_nodes(&graph), vec!["solo".to_string()]);
    }

    #[test]
    fn test_empty_graph() {
        assert!(degrees(&DirectedGraph::new()).is_empty());
    }
}
