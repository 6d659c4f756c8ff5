// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Diff command - compares graph nodes against curated reference lists

use super::{stem, write_lines, OutputOptions};
use crate::dotfile;
use crate::graph::DirectedGraph;
use crate::reference::ReferenceList;
use crate::types::Node;
use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Arguments for the diff command
pub struct DiffArgs {
    /// Graph files to compare
    pub inputs: Vec<PathBuf>,
    /// Packages that are kept
    pub reference: PathBuf,
    /// Every package the curators know about, kept or not
    pub total: Option<PathBuf>,
    /// Directory for the node lists
    pub output_dir: PathBuf,
}

/// Comparison of one graph with the reference lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffReport {
    /// Graph file
    pub path: PathBuf,
    /// Nodes of the graph
    pub nodes: usize,
    /// Edges of the graph
    pub edges: usize,
    /// Nodes absent from the reference list
    pub removed: Vec<Node>,
    /// Edges lost when the removed nodes are deleted
    pub removed_edges: usize,
    /// Nodes absent from the total list
    pub unknown: Option<Vec<Node>>,
    /// Nodes the total list knows but the reference list drops, with their
    /// level in the total list
    pub dropped: Option<Vec<(Node, Option<String>)>>,
}

/// Compare the keys of `graph` with `reference` (and `total` if given)
#[must_use]
pub fn diff_graph(
    path: &Path,
    graph: &DirectedGraph,
    reference: &ReferenceList,
    total: Option<&ReferenceList>,
) -> DiffReport {
    let removed: Vec<Node> = graph
        .nodes()
        .filter(|n| !reference.contains(n))
        .cloned()
        .collect();

    let mut pruned = graph.clone();
    pruned.delete_nodes(&removed);
    let removed_edges = graph.edge_count() - pruned.edge_count();

    let unknown = total.map(|total| {
        graph
            .nodes()
            .filter(|n| !total.contains(n))
            .cloned()
            .collect()
    });

    let dropped = total.map(|total| {
        graph
            .nodes()
            .filter(|n| total.contains(n) && !reference.contains(n))
            .map(|n| (n.clone(), total.level(n).map(str::to_string)))
            .collect()
    });

    DiffReport {
        path: path.to_path_buf(),
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        removed,
        removed_edges,
        unknown,
        dropped,
    }
}

fn write_report(report: &DiffReport, output_dir: &Path) -> Result<()> {
    let name = stem(&report.path);

    let path = output_dir.join(format!("{name}.removed.txt"));
    write_lines(&path, &report.removed)?;
    info!("Saved removed nodes to {}", path.display());

    if let Some(unknown) = &report.unknown {
        let path = output_dir.join(format!("{name}.unknown.txt"));
        write_lines(&path, unknown)?;
        info!("Saved unknown nodes to {}", path.display());
    }

    if let Some(dropped) = &report.dropped {
        let path = output_dir.join(format!("{name}.dropped.txt"));
        write_lines(
            &path,
            dropped
                .iter()
                .map(|(node, level)| format!("{}\t{}", node, level.as_deref().unwrap_or(""))),
        )?;
        info!("Saved dropped nodes to {}", path.display());
    }

    Ok(())
}

/// Run the diff command
pub fn run(args: DiffArgs, out: OutputOptions) -> Result<()> {
    let reference = ReferenceList::load(&args.reference)?;
    let total = args.total.as_deref().map(ReferenceList::load).transpose()?;

    let mut reports = Vec::with_capacity(args.inputs.len());
    for path in &args.inputs {
        let graph = dotfile::load_file(path)?;
        let report = diff_graph(path, &graph, &reference, total.as_ref());
        write_report(&report, &args.output_dir)?;
        reports.push(report);
    }

    if out.json {
        return out.print_json(&reports);
    }

    let rule = "=".repeat(72);
    for report in &reports {
        println!("{rule}");
        println!("{}", out.heading(&report.path.display().to_string()));
        println!("node: {}", out.value(report.nodes));
        if let Some(unknown) = &report.unknown {
            println!("node not contained in total list: {}", out.value(unknown.len()));
        }
        println!("node will be removed: {}", out.value(report.removed.len()));
        if let Some(dropped) = &report.dropped {
            println!("node contained but will be removed: {}", out.value(dropped.len()));
        }
        println!("edge: {}", out.value(report.edges));
        println!("edge will be removed: {}", out.value(report.removed_edges));
    }
    println!("{rule}");
    println!("Node lists written to {}", args.output_dir.display());

    Ok(())
}
