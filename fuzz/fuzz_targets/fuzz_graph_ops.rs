// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
#![no_main]

use arbitrary::Arbitrary;
use depcycles::graph::DirectedGraph;
use depcycles::scc::strongly_connected_components;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    AddEdge(u8, u8),
    AddNode(u8),
    DeleteNode(u8),
    DeleteEdge(u8, u8),
    RemoveHanging,
    FixHanging,
    RemoveZeroDegree,
}

fn name(i: u8) -> String {
    format!("n{}", i % 32)
}

fuzz_target!(|ops: Vec<Op>| {
    let mut graph = DirectedGraph::new();
    for op in ops {
        match op {
            Op::AddEdge(u, v) => {
                let _ = graph.add_edge(name(u), name(v));
            }
            Op::AddNode(u) => {
                graph.add_node(name(u));
            }
            Op::DeleteNode(u) => {
                graph.delete_node(&name(u));
            }
            Op::DeleteEdge(u, v) => {
                graph.delete_edges([(name(u), name(v))]);
            }
            Op::RemoveHanging => {
                graph.remove_hanging_edges();
            }
            Op::FixHanging => {
                graph.fix_hanging_edges();
            }
            Op::RemoveZeroDegree => {
                graph.remove_zero_degree_nodes();
            }
        }
    }

    let total: usize = strongly_connected_components(&graph).iter().map(|s| s.len()).sum();
    assert_eq!(total, graph.node_count());
});
