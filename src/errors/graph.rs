// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised by the graph store, the edge query engine and the permission gate.

use thiserror::Error;

use crate::graph::{AccessLevel, Location, NodeId};

/// Errors that can occur while reading or mutating the shared graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// The referenced node or edge does not exist (never did, or was deleted).
    #[error("{0} not found")]
    NotFound(Location),

    /// A value or archetype did not have the expected shape.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// The permission gate rejected the requested access level.
    #[error("permission denied: {level} access to {target}")]
    PermissionDenied { target: Location, level: AccessLevel },

    /// Context roots stay alive for as long as their context does.
    #[error("{0} is an active context root and cannot be deleted")]
    PinnedNode(NodeId),
}

impl GraphError {
    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// The target is already gone, which callers deleting it may treat as success.
    pub fn is_not_found(&self) -> bool {
        matches!(self, GraphError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_not_found() {
        assert!(GraphError::NotFound(Location::Node(NodeId(7))).is_not_found());
        assert!(!GraphError::PinnedNode(NodeId(7)).is_not_found());
    }
}
