// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Filter command - restricts a graph to the packages of a reference list

use super::{write_lines, OutputOptions};
use crate::dotfile;
use crate::graph::DirectedGraph;
use crate::reference::ReferenceList;
use crate::types::{Edge, Node, Summary};
use anyhow::Result;
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, info};

/// Arguments for the filter command
pub struct FilterArgs {
    /// Graph file to filter
    pub input: PathBuf,
    /// Packages to keep, with levels
    pub reference: PathBuf,
    /// Directory for the filtered graph and reports
    pub output_dir: PathBuf,
    /// Name of the written digraph
    pub graph_name: String,
}

/// Result of filtering a graph by a reference list
#[derive(Debug, Clone, Serialize)]
pub struct FilterOutcome {
    /// Nodes left after cleaning the input
    pub input_nodes: usize,
    /// Packages in the reference list
    pub reference_nodes: usize,
    /// Nodes in both
    pub shared_nodes: usize,
    /// Graph nodes the reference list has no level for
    pub unlevelled: Vec<Node>,
    /// Edges dropped because an endpoint is not shared
    pub removed_edges: Vec<Edge>,
    /// Nodes dropped because filtering left them without edges
    pub isolated: Vec<Node>,
    /// The filtered graph
    #[serde(skip)]
    pub graph: DirectedGraph,
    /// Counts of the filtered graph
    pub summary: Summary,
}

/// Clean `graph`, then keep only the nodes `reference` lists
#[must_use]
pub fn filter_graph(mut graph: DirectedGraph, reference: &ReferenceList) -> FilterOutcome {
    let hanging = graph.remove_hanging_edges();
    let zero = graph.remove_zero_degree_nodes();
    debug!("Cleaned input: {} hanging edges, {} isolated nodes", hanging.len(), zero.len());

    let input: HashSet<&Node> = graph.nodes().collect();
    let shared: HashSet<Node> = input
        .iter()
        .filter(|n| reference.contains(n))
        .map(|n| (*n).clone())
        .collect();
    let unlevelled: Vec<Node> = graph
        .nodes()
        .filter(|n| !shared.contains(*n))
        .cloned()
        .collect();
    let input_nodes = input.len();

    let removed_edges = graph.retain_nodes(|n| shared.contains(n));
    let isolated = graph.remove_zero_degree_nodes();

    FilterOutcome {
        input_nodes,
        reference_nodes: reference.len(),
        shared_nodes: shared.len(),
        unlevelled,
        removed_edges,
        isolated,
        summary: graph.summary(),
        graph,
    }
}

/// Run the filter command
pub fn run(args: FilterArgs, out: OutputOptions) -> Result<()> {
    let graph = dotfile::load_file(&args.input)?;
    let reference = ReferenceList::load(&args.reference)?;

    let outcome = filter_graph(graph, &reference);

    let file_name = args
        .input
        .file_name()
        .map_or_else(|| "graph.dot".to_string(), |n| n.to_string_lossy().into_owned());
    let dir = &args.output_dir;

    write_lines(&dir.join("unlevelled.txt"), &outcome.unlevelled)?;
    write_lines(
        &dir.join("removed_edges.txt"),
        outcome.removed_edges.iter().map(|(u, v)| format!("{u} -> {v}")),
    )?;

    let graph_path = dir.join(format!("filtered_{file_name}"));
    dotfile::write_file(&outcome.graph, &graph_path, &args.graph_name)?;

    let reference_path = dir.join("filtered_reference.txt");
    write_lines(
        &reference_path,
        reference
            .sorted_by_level()
            .into_iter()
            .filter(|(node, _)| outcome.graph.contains_node(node))
            .map(|(node, level)| format!("{}\t{}", node, level.unwrap_or(""))),
    )?;
    info!("Filtered graph written to {}", graph_path.display());

    if out.json {
        return out.print_json(&outcome);
    }

    println!("input node number: {}", out.value(outcome.input_nodes));
    println!("reference node number: {}", out.value(outcome.reference_nodes));
    println!("both node number: {}", out.value(outcome.shared_nodes));
    println!("edges removed: {}", out.value(outcome.removed_edges.len()));
    if !outcome.isolated.is_empty() {
        println!(
            "{}",
            out.warn(&format!("nodes left without edges: {}", outcome.isolated.len()))
        );
    }
    println!("{} {}", out.heading("Filtered graph:"), outcome.summary);
    println!("Written to {}", dir.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_graph() {
        let graph = DirectedGraph::from_adjacency([
            ("a", vec!["b", "c", "ghost"]),
            ("b", vec!["a"]),
            ("c", vec!["a"]),
            ("d", vec![]),
        ]);
        let reference = ReferenceList::parse("a 1\nb 1\nzzz 3\n").unwrap();

        let outcome = filter_graph(graph, &reference);

        // `ghost` edge is hanging, `d` has no edges
        assert_eq!(outcome.input_nodes, 3);
        assert_eq!(outcome.shared_nodes, 2);
        assert_eq!(outcome.unlevelled, ["c"]);
        assert_eq!(
            outcome.removed_edges,
            vec![("a".to_string(), "c".to_string()), ("c".to_string(), "a".to_string())]
        );
        assert!(outcome.isolated.is_empty());
        assert_eq!(outcome.summary, Summary { nodes: 2, edges: 2 });
    }

    #[test]
    fn test_filter_drops_newly_isolated_nodes() {
        let graph = DirectedGraph::from_adjacency([("a", vec!["b"]), ("b", vec!["c"]), ("c", vec![])]);
        let reference = ReferenceList::parse("a\nc\n").unwrap();

        let outcome = filter_graph(graph, &reference);

        assert_eq!(outcome.isolated, ["a", "c"]);
        assert!(outcome.graph.is_empty());
    }
}
