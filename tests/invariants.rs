// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Invariant tests for the dependency graph
//!
//! These tests verify critical invariants:
//! 1. Merge is a pure union
//! 2. Hanging-edge repair is idempotent
//! 3. Induced subgraphs are projections
//! 4. SCCs partition the keys and match mutual reachability

use depcycles::dotfile;
use depcycles::graph::DirectedGraph;
use depcycles::scc::{find_cycles, strongly_connected_components};
use depcycles::subgraph::induced_subgraph;
use depcycles::types::Summary;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap, HashSet};

// =============================================================================
// Test Helpers
// =============================================================================

fn name(i: u8) -> String {
    format!("n{i}")
}

/// Random graphs over at most `max_nodes` names; some targets are not keys
fn arb_graph(max_nodes: u8) -> impl Strategy<Value = DirectedGraph> {
    let names = 0..max_nodes;
    (
        prop::collection::vec((names.clone(), names.clone()), 0..60),
        prop::collection::vec(names, 0..8),
    )
        .prop_map(|(edges, isolated)| {
            let mut graph = DirectedGraph::from_adjacency(
                edges.into_iter().map(|(u, v)| (name(u), vec![name(v)])),
            );
            for n in isolated {
                graph.add_node(name(n));
            }
            graph
        })
}

/// Names mixing letters with characters that need quoting or escaping
fn arb_name() -> impl Strategy<Value = String> {
    "[a-z\\\\\"\\[\\] ;>-]{1,6}"
}

fn edge_set(graph: &DirectedGraph) -> BTreeSet<(String, String)> {
    graph.edge_list().into_iter().collect()
}

fn reachable(graph: &DirectedGraph, from: &str) -> HashSet<String> {
    let mut seen = HashSet::from([from.to_string()]);
    let mut todo = vec![from.to_string()];
    while let Some(u) = todo.pop() {
        if let Ok(targets) = graph.out_neighbors(&u) {
            for v in targets {
                if graph.contains_node(v) && seen.insert(v.clone()) {
                    todo.push(v.clone());
                }
            }
        }
    }
    seen
}

fn partition(sccs: Vec<depcycles::scc::Scc>) -> BTreeSet<BTreeSet<String>> {
    sccs.into_iter()
        .map(|s| s.into_nodes().into_iter().collect())
        .collect()
}

/// Components computed by petgraph over the keys only
fn oracle(graph: &DirectedGraph) -> BTreeSet<BTreeSet<String>> {
    let mut pg = petgraph::graph::DiGraph::<String, ()>::new();
    let index: HashMap<&String, _> = graph.nodes().map(|n| (n, pg.add_node(n.clone()))).collect();
    for (u, v) in graph.edges() {
        if let Some(&t) = index.get(v) {
            pg.add_edge(index[u], t, ());
        }
    }
    petgraph::algo::tarjan_scc(&pg)
        .into_iter()
        .map(|c| c.into_iter().map(|i| pg[i].clone()).collect())
        .collect()
}

// =============================================================================
// Documented Examples
// =============================================================================

#[test]
fn test_example_acyclic_graph() {
    let mut graph = DirectedGraph::try_from_edges([("a", "b"), ("a", "c"), ("b", "c")]).unwrap();
    assert_eq!(graph.summary(), Summary { nodes: 3, edges: 3 });

    graph.fix_hanging_edges();
    assert_eq!(graph.summary(), Summary { nodes: 3, edges: 3 });

    let sccs = strongly_connected_components(&graph);
    assert_eq!(sccs.len(), 3);
    assert!(sccs.iter().all(|s| s.len() == 1));
}

#[test]
fn test_example_three_cycle() {
    let graph = DirectedGraph::try_from_edges([("a", "b"), ("b", "c"), ("c", "a")]).unwrap();

    let sccs = partition(strongly_connected_components(&graph));

    let expected: BTreeSet<BTreeSet<String>> =
        [["a", "b", "c"].iter().map(|s| s.to_string()).collect()].into_iter().collect();
    assert_eq!(sccs, expected);
}

#[test]
fn test_example_merge_from_files() {
    let first = dotfile::load_str("digraph G {\n  a -> b;\n  a -> c;\n  b -> c;\n}\n").unwrap();
    let second = dotfile::load_str("digraph G {\n  a -> b;\n  a -> c;\n  b -> a;\n  c -> a;\n}\n").unwrap();

    let merged = &first | &second;

    let expected = DirectedGraph::from_adjacency([
        ("a", vec!["b", "c"]),
        ("b", vec!["a", "c"]),
        ("c", vec!["a"]),
    ]);
    assert_eq!(merged, expected);
}

#[test]
fn test_example_duplicate_edge() {
    let mut graph = DirectedGraph::new();
    assert!(graph.add_edge("a", "b").is_ok());
    assert!(graph.add_edge("a", "b").is_err());
}

#[test]
fn test_example_delete_node() {
    let mut graph = DirectedGraph::try_from_edges([("x", "y"), ("y", "x")]).unwrap();

    assert!(graph.delete_node("x").is_applied());

    assert_eq!(graph, DirectedGraph::from_adjacency([("y", Vec::<&str>::new())]));
}

#[test]
fn test_remove_then_fix_is_not_identity() {
    let original = DirectedGraph::try_from_edges([("a", "b")]).unwrap();

    let mut graph = original.clone();
    graph.remove_hanging_edges();
    graph.fix_hanging_edges();

    assert_ne!(graph, original);
    assert!(graph.contains_node("a"));
    assert!(!graph.contains_node("b"));
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_merge_is_union(a in arb_graph(12), b in arb_graph(12)) {
        let merged = a.merge(&b);

        let expected: BTreeSet<_> = edge_set(&a).union(&edge_set(&b)).cloned().collect();
        prop_assert_eq!(edge_set(&merged), expected);
        prop_assert_eq!(&merged, &b.merge(&a));
    }

    #[test]
    fn prop_merge_with_self_is_noop(a in arb_graph(12)) {
        let mut merged = a.clone();
        merged.merge_in_place(&a);
        prop_assert_eq!(merged, a);
    }

    #[test]
    fn prop_fix_hanging_edges_idempotent(a in arb_graph(12)) {
        let mut once = a.clone();
        once.fix_hanging_edges();
        let mut twice = once.clone();
        prop_assert!(twice.fix_hanging_edges().is_empty());
        prop_assert_eq!(once.summary(), a.summary());
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn prop_induced_subgraph_is_projection(
        a in arb_graph(12),
        subset in prop::collection::hash_set(0u8..12, 0..12),
    ) {
        let members: HashSet<String> = subset.into_iter().map(name).collect();
        let (sub, _) = induced_subgraph(&a, &members);

        for (u, v) in sub.edges() {
            prop_assert!(a.contains_edge(u, v));
            prop_assert!(members.contains(u) && members.contains(v));
        }
        for (u, v) in a.edges() {
            if members.contains(u) && members.contains(v) {
                prop_assert!(sub.contains_edge(u, v));
            }
        }
        prop_assert_eq!(sub.node_count(), members.len());
    }

    #[test]
    fn prop_scc_partitions_keys(a in arb_graph(16)) {
        let sccs = strongly_connected_components(&a);

        let mut seen = HashSet::new();
        for scc in &sccs {
            prop_assert!(!scc.is_empty());
            for node in scc.nodes() {
                prop_assert!(seen.insert(node.clone()), "{} appears twice", node);
            }
        }
        let keys: HashSet<String> = a.nodes().cloned().collect();
        prop_assert_eq!(seen, keys);
    }

    #[test]
    fn prop_scc_is_mutual_reachability(a in arb_graph(10)) {
        let sccs = strongly_connected_components(&a);
        let component: HashMap<&String, usize> = sccs
            .iter()
            .enumerate()
            .flat_map(|(i, s)| s.nodes().iter().map(move |n| (n, i)))
            .collect();
        let reach: HashMap<&String, HashSet<String>> =
            a.nodes().map(|n| (n, reachable(&a, n))).collect();

        for u in a.nodes() {
            for v in a.nodes() {
                let mutual = reach[u].contains(v) && reach[v].contains(u);
                prop_assert_eq!(component[u] == component[v], mutual);
            }
        }
    }

    #[test]
    fn prop_scc_matches_petgraph(a in arb_graph(20)) {
        prop_assert_eq!(partition(strongly_connected_components(&a)), oracle(&a));
    }

    #[test]
    fn prop_cycles_are_sorted_and_sized(a in arb_graph(16), min_size in 1usize..4) {
        for cycle in find_cycles(&a, min_size) {
            prop_assert!(cycle.len() >= min_size);
            prop_assert!(cycle.is_cycle(&a));
            prop_assert!(cycle.nodes().windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn prop_zero_degree_removal_fixed_point(a in arb_graph(12)) {
        let mut graph = a;
        graph.remove_zero_degree_nodes();
        prop_assert!(graph.degrees().values().all(|d| !d.is_zero()));
    }

    #[test]
    fn prop_dot_round_trip_escaped_names(
        edges in prop::collection::vec((arb_name(), arb_name()), 0..20),
        isolated in prop::collection::vec(arb_name(), 0..4),
    ) {
        let mut graph = DirectedGraph::from_adjacency(edges.into_iter().map(|(u, v)| (u, vec![v])));
        for n in isolated {
            graph.add_node(n);
        }

        let reloaded = dotfile::load_str(&graph.to_dot("G")).unwrap();

        prop_assert_eq!(reloaded, graph);
    }

    #[test]
    fn prop_dot_round_trip(a in arb_graph(12)) {
        let reloaded = dotfile::load_str(&a.to_dot("G")).unwrap();
        prop_assert_eq!(edge_set(&reloaded), edge_set(&a));
        prop_assert_eq!(
            reloaded.nodes().cloned().collect::<HashSet<_>>(),
            a.nodes().cloned().collect::<HashSet<_>>()
        );
    }
}
