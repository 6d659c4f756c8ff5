// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Merge command - unions several dependency graphs into one file

use super::OutputOptions;
use crate::dotfile;
use crate::graph::DirectedGraph;
use crate::types::Summary;
use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// Clean-up steps applied to the merged graph, in this order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cleanup {
    /// Drop edges whose target is not a node
    pub remove_hanging_edges: bool,
    /// Add nodes for edge targets that are not nodes
    pub fix_hanging_edges: bool,
    /// Drop nodes with no edges at all
    pub remove_zero_degree: bool,
}

/// Arguments for the merge command
pub struct MergeArgs {
    /// Graph files to merge
    pub inputs: Vec<PathBuf>,
    /// Where to write the merged graph
    pub output: PathBuf,
    /// Post-merge clean-up
    pub cleanup: Cleanup,
    /// Name of the written digraph
    pub graph_name: String,
}

/// What the merge produced
#[derive(Debug, Clone, Serialize)]
pub struct MergeReport {
    /// Per-input summaries
    pub inputs: Vec<(PathBuf, Summary)>,
    /// Edges dropped by hanging-edge removal
    pub removed_hanging_edges: usize,
    /// Nodes added by hanging-edge repair
    pub added_nodes: usize,
    /// Nodes dropped by zero-degree removal
    pub removed_nodes: usize,
    /// Summary of the written graph
    pub merged: Summary,
    /// Written file
    pub output: PathBuf,
}

/// Union `graphs` and apply `cleanup`. Returns the graph and the counts of
/// removed edges, added nodes and removed nodes.
#[must_use]
pub fn merge_graphs(graphs: Vec<DirectedGraph>, cleanup: Cleanup) -> (DirectedGraph, usize, usize, usize) {
    let mut merged: DirectedGraph = graphs.into_iter().collect();

    let removed_edges = if cleanup.remove_hanging_edges {
        merged.remove_hanging_edges().len()
    } else {
        0
    };
    let added = if cleanup.fix_hanging_edges {
        merged.fix_hanging_edges().len()
    } else {
        0
    };
    let removed_nodes = if cleanup.remove_zero_degree {
        merged.remove_zero_degree_nodes().len()
    } else {
        0
    };

    (merged, removed_edges, added, removed_nodes)
}

/// Run the merge command
pub fn run(args: MergeArgs, out: OutputOptions) -> Result<()> {
    info!("Merging {} graphs", args.inputs.len());

    let graphs = dotfile::load_files(&args.inputs)?;
    let inputs: Vec<(PathBuf, Summary)> = args
        .inputs
        .iter()
        .cloned()
        .zip(graphs.iter().map(DirectedGraph::summary))
        .collect();

    let (merged, removed_hanging_edges, added_nodes, removed_nodes) = merge_graphs(graphs, args.cleanup);
    dotfile::write_file(&merged, &args.output, &args.graph_name)?;

    let report = MergeReport {
        inputs,
        removed_hanging_edges,
        added_nodes,
        removed_nodes,
        merged: merged.summary(),
        output: args.output,
    };

    if out.json {
        return out.print_json(&report);
    }

    for (path, summary) in &report.inputs {
        println!("  {}: {}", path.display(), summary);
    }
    if args.cleanup.remove_hanging_edges {
        println!("Removed {} hanging edges", out.value(report.removed_hanging_edges));
    }
    if args.cleanup.fix_hanging_edges {
        println!("Added {} nodes for hanging edges", out.value(report.added_nodes));
    }
    if args.cleanup.remove_zero_degree {
        println!("Removed {} nodes without edges", out.value(report.removed_nodes));
    }
    println!("{} {}", out.heading("Summary of merged graph:"), report.merged);
    println!("Merged graph written to {}", report.output.display());

    Ok(())
}
