// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for graph store mutations.

use crate::graph::{EdgeId, NodeId};
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Edge created between two nodes.
///
/// # Log Level
/// `debug!` - Routine store mutation
pub struct EdgeCreated<'a> {
    pub edge: EdgeId,
    pub edge_type: &'a str,
    pub source: NodeId,
    pub target: NodeId,
    pub directed: bool,
}

impl Display for EdgeCreated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let arrow = if self.directed { "-->" } else { "<->" };
        write!(
            f,
            "Edge {} ({}) created: {} {} {}",
            self.edge, self.edge_type, self.source, arrow, self.target
        )
    }
}

impl StructuredLog for EdgeCreated<'_> {
    fn log(&self) {
        tracing::debug!(
            edge = %self.edge,
            edge_type = self.edge_type,
            source = %self.source,
            target = %self.target,
            directed = self.directed,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "edge_created",
            span_name = name,
            edge = %self.edge,
            edge_type = self.edge_type,
        )
    }
}

/// Edge removed on its own (not as part of a node deletion).
///
/// # Log Level
/// `debug!` - Routine store mutation
pub struct EdgeRemoved {
    pub edge: EdgeId,
}

impl Display for EdgeRemoved {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Edge {} removed", self.edge)
    }
}

impl StructuredLog for EdgeRemoved {
    fn log(&self) {
        tracing::debug!(edge = %self.edge, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("edge_removed", span_name = name, edge = %self.edge)
    }
}

/// Node deleted together with its incident edges.
///
/// # Log Level
/// `info!` - Structural change other walkers may observe as stale queue entries
///
/// # Example
/// ```
/// use the_wayfarer::graph::NodeId;
/// use the_wayfarer::observability::messages::graph::NodeDeleted;
///
/// let msg = NodeDeleted { node: NodeId(7), edges_removed: 3 };
/// assert_eq!(msg.to_string(), "Node node#7 deleted with 3 incident edges");
/// ```
pub struct NodeDeleted {
    pub node: NodeId,
    pub edges_removed: usize,
}

impl Display for NodeDeleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Node {} deleted with {} incident edges",
            self.node, self.edges_removed
        )
    }
}

impl StructuredLog for NodeDeleted {
    fn log(&self) {
        tracing::info!(
            node = %self.node,
            edges_removed = self.edges_removed,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "node_deleted",
            span_name = name,
            node = %self.node,
            edges_removed = self.edges_removed,
        )
    }
}
