// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Summary command - node and edge counts of graph files

use super::OutputOptions;
use crate::dotfile;
use crate::types::Summary;
use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

/// Counts for one graph file
#[derive(Debug, Clone, Serialize)]
pub struct FileSummary {
    /// Graph file
    pub path: PathBuf,
    /// Nodes (including edge targets) and edges
    #[serde(flatten)]
    pub summary: Summary,
    /// Nodes recorded as keys
    pub keys: usize,
    /// Edges whose target is not a key
    pub hanging_edges: usize,
}

/// Run the summary command
pub fn run(inputs: &[PathBuf], out: OutputOptions) -> Result<()> {
    let mut summaries = Vec::with_capacity(inputs.len());
    for path in inputs {
        let graph = dotfile::load_file(path)?;
        let hanging_edges = graph
            .edges()
            .filter(|(_, to)| !graph.contains_node(to))
            .count();
        summaries.push(FileSummary {
            path: path.clone(),
            summary: graph.summary(),
            keys: graph.node_count(),
            hanging_edges,
        });
    }

    if out.json {
        return out.print_json(&summaries);
    }

    for s in &summaries {
        println!("{}", out.heading(&s.path.display().to_string()));
        println!("  nodes: {}", out.value(s.summary.nodes));
        println!("  edges: {}", out.value(s.summary.edges));
        println!("  keys:  {}", out.value(s.keys));
        if s.hanging_edges > 0 {
            println!("  {}", out.warn(&format!("hanging edges: {}", s.hanging_edges)));
        }
    }

    Ok(())
}
