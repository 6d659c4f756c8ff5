// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Error and warning types for graph operations
//!
//! Two severities exist:
//!
//! - [`GraphError`] is fatal to the operation that raised it (a duplicate
//!   edge while loading, a neighbor lookup on an unknown node).
//! - [`MissingNode`] is a warning. Batch mutations skip the affected item,
//!   log it and carry on; the caller gets one [`Outcome`] per item.

use crate::types::Node;
use std::fmt;
use thiserror::Error;

/// Result type for fallible graph operations
pub type Result<T> = std::result::Result<T, GraphError>;

/// Structural errors raised by the graph
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// The edge is already recorded
    #[error("trying to add existing edge `{from} -> {to}`")]
    DuplicateEdge {
        /// Edge source
        from: Node,
        /// Edge target
        to: Node,
    },

    /// The node is not a key of the graph
    #[error("graph does not have node `{0}`")]
    NodeNotFound(Node),
}

/// Where a missing node was encountered.
///
/// A node is missing only when the graph does not reference it at all:
/// neither as a key nor as the target of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissingContext {
    /// `delete_node` on a node the graph never referenced
    DeleteNode,
    /// `delete_edges` with an unreferenced source
    EdgeSource,
    /// `induced_subgraph` member absent from the source graph
    SubgraphMember,
}

impl fmt::Display for MissingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::DeleteNode => "delete node",
            Self::EdgeSource => "delete edge",
            Self::SubgraphMember => "induced subgraph",
        };
        f.write_str(s)
    }
}

/// Non-fatal warning: an operation referred to a node the graph lacks
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MissingNode {
    /// The absent node
    pub node: Node,
    /// Operation that hit it
    pub context: MissingContext,
}

impl MissingNode {
    pub(crate) fn new(node: impl Into<Node>, context: MissingContext) -> Self {
        let warning = Self {
            node: node.into(),
            context,
        };
        tracing::warn!("{}", warning);
        warning
    }
}

impl fmt::Display for MissingNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: node `{}` does not exist, skipped", self.context, self.node)
    }
}

/// Per-item result of a batch mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The mutation was applied
    Applied,
    /// The item was skipped
    Skipped(MissingNode),
}

impl Outcome {
    /// True if the mutation was applied
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    /// The warning, if the item was skipped
    #[must_use]
    pub fn warning(&self) -> Option<&MissingNode> {
        match self {
            Self::Applied => None,
            Self::Skipped(w) => Some(w),
        }
    }
}

/// Collect the warnings out of a batch result
#[must_use]
pub fn warnings(outcomes: &[Outcome]) -> Vec<&MissingNode> {
    outcomes.iter().filter_map(Outcome::warning).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_edge_message() {
        let err = GraphError::DuplicateEdge {
            from: "a".into(),
            to: "b".into(),
        };
        assert_eq!(err.to_string(), "trying to add existing edge `a -> b`");
    }

    #[test]
    fn test_warnings_filters_applied() {
        let outcomes = vec![
            Outcome::Applied,
            Outcome::Skipped(MissingNode::new("x", MissingContext::DeleteNode)),
        ];
        let w = warnings(&outcomes);
        assert_eq!(w.len(), 1);
        assert_eq!(w[0].node, "x");
        assert!(w[0].to_string().contains("does not exist"));
    }
}
