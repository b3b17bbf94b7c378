// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Identifiers for graph elements and walker locations.
//!
//! Nodes and edges live in the store's arena and are referenced everywhere
//! else by id only. Ids are never reused within one store, so a stale id
//! simply stops resolving once its element has been deleted.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "edge#{}", self.0)
    }
}

/// Something a walker can stand on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Location {
    Node(NodeId),
    Edge(EdgeId),
}

/// Node or edge, without the id. Used by dispatch patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationKind {
    Node,
    Edge,
}

impl Location {
    pub fn kind(&self) -> LocationKind {
        match self {
            Location::Node(_) => LocationKind::Node,
            Location::Edge(_) => LocationKind::Edge,
        }
    }

    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            Location::Node(id) => Some(*id),
            Location::Edge(_) => None,
        }
    }

    pub fn as_edge(&self) -> Option<EdgeId> {
        match self {
            Location::Edge(id) => Some(*id),
            Location::Node(_) => None,
        }
    }
}

impl From<NodeId> for Location {
    fn from(id: NodeId) -> Self {
        Location::Node(id)
    }
}

impl From<EdgeId> for Location {
    fn from(id: EdgeId) -> Self {
        Location::Edge(id)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Node(id) => id.fmt(f),
            Location::Edge(id) => id.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display_and_accessors() {
        let node = Location::from(NodeId(3));
        let edge = Location::from(EdgeId(7));

        assert_eq!(node.to_string(), "node#3");
        assert_eq!(edge.to_string(), "edge#7");
        assert_eq!(node.as_node(), Some(NodeId(3)));
        assert_eq!(node.as_edge(), None);
        assert_eq!(edge.kind(), LocationKind::Edge);
    }

    #[test]
    fn test_location_serializes_with_kind_tag() {
        let json = serde_json::to_value(Location::Node(NodeId(4))).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "node", "id": 4}));
    }
}
