// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Depcycles library - dependency graph analysis for package sets
//!
//! This crate provides an insertion-ordered directed graph of package
//! dependencies together with the analyses used to untangle it: merging,
//! hanging-edge repair, degree computation, induced subgraphs and
//! strongly connected component detection for manual cycle breaking.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod commands;
pub mod config;
pub mod degree;
pub mod dotfile;
pub mod error;
pub mod graph;
pub mod reference;
pub mod scc;
pub mod subgraph;

/// Core data types shared by the graph, the analyses and the reports
pub mod types {
    use serde::{Deserialize, Serialize};
    use std::fmt;

    /// A graph vertex; in practice a package name
    pub type Node = String;

    /// A directed dependency `(source, target)`
    pub type Edge = (Node, Node);

    // =========================================================================
    // Summary
    // =========================================================================

    /// Node and edge counts of a graph, used for logging and reports
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Summary {
        /// Number of distinct nodes referenced by the graph
        pub nodes: usize,
        /// Number of recorded edges
        pub edges: usize,
    }

    impl fmt::Display for Summary {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{} nodes, {} edges", self.nodes, self.edges)
        }
    }

    // =========================================================================
    // Degree
    // =========================================================================

    /// In/out degree of a single node
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Degree {
        /// Number of edges pointing at the node
        pub in_degree: usize,
        /// Number of edges leaving the node
        pub out_degree: usize,
    }

    impl Degree {
        /// True when the node has neither incoming nor outgoing edges
        #[must_use]
        pub fn is_zero(&self) -> bool {
            self.in_degree == 0 && self.out_degree == 0
        }
    }
}

/// Prelude for common imports
pub mod prelude {
    pub use crate::error::{GraphError, MissingNode, Outcome};
    pub use crate::graph::DirectedGraph;
    pub use crate::scc::{Scc, SccFinder};
    pub use crate::subgraph::induced_subgraph;
    pub use crate::types::*;
    pub use anyhow::{Context, Result};
}
