// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Cycles command - finds dependency cycles left after removing anchors
//!
//! Anchors are packages known to be built first (toolchain, libc, ...).
//! Deleting them before the search splits the huge component they hold
//! together, so what remains are the cycles that need manual breaking.

use super::OutputOptions;
use crate::dotfile;
use crate::error::{warnings, MissingNode};
use crate::graph::DirectedGraph;
use crate::scc::{find_cycles, Scc};
use crate::subgraph::induced_subgraph;
use crate::types::{Node, Summary};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Arguments for the cycles command
pub struct CyclesArgs {
    /// Graph file to analyze
    pub input: PathBuf,
    /// Packages deleted before the search
    pub anchors: Vec<Node>,
    /// Smallest component reported
    pub min_size: usize,
    /// Directory for `cycle_<n>.dot` files and `summary.json`
    pub output_dir: PathBuf,
    /// Break the largest cycle by cutting edges across this name boundary
    pub break_between: Option<String>,
    /// Name of the written digraphs
    pub graph_name: String,
}

/// One detected cycle
#[derive(Debug, Clone, Serialize)]
pub struct CycleEntry {
    /// File the cycle's subgraph was written to
    pub file: String,
    /// Members, sorted
    pub nodes: Scc,
    /// Counts of the cycle's induced subgraph
    pub summary: Summary,
}

/// Everything a cycle search found
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    /// Anchors that were deleted
    pub anchors: Vec<Node>,
    /// Anchors the graph did not contain
    pub missing_anchors: Vec<Node>,
    /// Counts of the graph that was searched
    pub searched: Summary,
    /// Cycles, largest first
    pub cycles: Vec<CycleEntry>,
    /// When the search ran
    pub generated_at: DateTime<Utc>,
}

/// A cycle together with its induced subgraph
pub struct DetectedCycle {
    /// Members, sorted
    pub scc: Scc,
    /// Subgraph induced by the members
    pub subgraph: DirectedGraph,
}

/// Prepare `graph` for a search: give every edge target a node, then
/// delete the anchors. Returns the anchors that were not found.
pub fn prepare(graph: &mut DirectedGraph, anchors: &[Node]) -> Vec<MissingNode> {
    let added = graph.fix_hanging_edges();
    info!("Added {} nodes for hanging edges: {}", added.len(), graph.summary());

    let outcomes = graph.delete_nodes(anchors);
    let missing: Vec<MissingNode> = warnings(&outcomes).into_iter().cloned().collect();
    info!("Deleted {} anchors: {}", anchors.len() - missing.len(), graph.summary());
    missing
}

/// Find cycles of at least `min_size` nodes and extract their subgraphs
#[must_use]
pub fn detect(graph: &DirectedGraph, min_size: usize) -> Vec<DetectedCycle> {
    find_cycles(graph, min_size)
        .into_iter()
        .map(|scc| {
            // Members come from the graph's keys, so nothing can be missing
            let (subgraph, _) = induced_subgraph(graph, scc.nodes());
            DetectedCycle { scc, subgraph }
        })
        .collect()
}

/// Edges of `graph` with exactly one endpoint whose name contains `marker`
#[must_use]
pub fn boundary_edges(graph: &DirectedGraph, marker: &str) -> Vec<(Node, Node)> {
    graph
        .edges()
        .filter(|(u, v)| u.contains(marker) != v.contains(marker))
        .map(|(u, v)| (u.clone(), v.clone()))
        .collect()
}

fn write_cycles(cycles: &[DetectedCycle], dir: &Path, graph_name: &str) -> Result<Vec<CycleEntry>> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create directory {}", dir.display()))?;

    let mut entries = Vec::with_capacity(cycles.len());
    for (i, cycle) in cycles.iter().enumerate() {
        let file = format!("cycle_{}.dot", i + 1);
        dotfile::write_file(&cycle.subgraph, &dir.join(&file), graph_name)?;
        entries.push(CycleEntry {
            file,
            nodes: cycle.scc.clone(),
            summary: cycle.subgraph.summary(),
        });
    }
    Ok(entries)
}

fn write_summary(report: &CycleReport, dir: &Path) -> Result<()> {
    let path = dir.join("summary.json");
    let json = serde_json::to_string_pretty(report).context("Failed to serialize cycle summary")?;
    fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))
}

fn print_report(report: &CycleReport, dir: &Path, out: OutputOptions) {
    println!(
        "{} {} in {}",
        out.heading("Cycles found:"),
        out.value(report.cycles.len()),
        report.searched
    );
    for entry in &report.cycles {
        println!("  {}: {} ({})", entry.file, entry.nodes.len(), entry.summary);
    }
    if !report.missing_anchors.is_empty() {
        println!(
            "{}",
            out.warn(&format!("Anchors not in graph: {}", report.missing_anchors.join(", ")))
        );
    }
    println!("Written to {}", dir.display());
}

/// Run the cycles command
pub fn run(args: CyclesArgs, out: OutputOptions) -> Result<()> {
    let mut graph = dotfile::load_file(&args.input)?;
    let missing = prepare(&mut graph, &args.anchors);

    let cycles = detect(&graph, args.min_size);
    let entries = write_cycles(&cycles, &args.output_dir, &args.graph_name)?;
    let report = CycleReport {
        anchors: args.anchors.clone(),
        missing_anchors: missing.into_iter().map(|m| m.node).collect(),
        searched: graph.summary(),
        cycles: entries,
        generated_at: Utc::now(),
    };
    write_summary(&report, &args.output_dir)?;

    let mut reports = vec![(report, args.output_dir.clone())];

    if let Some(marker) = &args.break_between {
        match cycles.first() {
            Some(largest) => {
                let mut cut = largest.subgraph.clone();
                let edges = boundary_edges(&cut, marker);
                info!("Cutting {} edges across `{}`", edges.len(), marker);
                cut.delete_edges(edges.iter().map(|(u, v)| (u, v)));

                let dir = args.output_dir.join("broken");
                let remaining = detect(&cut, args.min_size);
                let report = CycleReport {
                    anchors: args.anchors.clone(),
                    missing_anchors: Vec::new(),
                    searched: cut.summary(),
                    cycles: write_cycles(&remaining, &dir, &args.graph_name)?,
                    generated_at: Utc::now(),
                };
                write_summary(&report, &dir)?;
                reports.push((report, dir));
            }
            None => warn!("No cycle to break"),
        }
    }

    if out.json {
        let all: Vec<&CycleReport> = reports.iter().map(|(r, _)| r).collect();
        return out.print_json(&all);
    }

    for (report, dir) in &reports {
        print_report(report, dir, out);
    }

    Ok(())
}
