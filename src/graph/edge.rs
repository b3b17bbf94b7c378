// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

use crate::graph::archetype::{Archetype, Properties, TypeTag};
use crate::graph::ids::{EdgeId, NodeId};

/// Which way along an edge a query or lookup may travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Forward,
    Backward,
    Both,
}

/// A typed connection between two nodes, itself property-bearing.
///
/// Directed edges are travelled forward from source to target and backward
/// from target to source. Bidirectional edges are travelled either way from
/// either end.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    id: EdgeId,
    type_tag: TypeTag,
    properties: Properties,
    source: NodeId,
    target: NodeId,
    directed: bool,
}

impl Edge {
    pub(crate) fn new(
        id: EdgeId,
        type_tag: TypeTag,
        properties: Properties,
        source: NodeId,
        target: NodeId,
        directed: bool,
    ) -> Self {
        Self {
            id,
            type_tag,
            properties,
            source,
            target,
            directed,
        }
    }

    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub(crate) fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }

    /// The node on the far side of this edge when leaving `from` in `direction`,
    /// or `None` if the edge cannot be travelled that way from `from`.
    pub fn neighbor(&self, from: NodeId, direction: Direction) -> Option<NodeId> {
        let outgoing = self.source == from || (!self.directed && self.target == from);
        let incoming = self.target == from || (!self.directed && self.source == from);
        let travels = match direction {
            Direction::Forward => outgoing,
            Direction::Backward => incoming,
            Direction::Both => outgoing || incoming,
        };
        if !travels {
            return None;
        }
        if self.source == from {
            Some(self.target)
        } else {
            Some(self.source)
        }
    }
}

impl Archetype for Edge {
    fn type_tag(&self) -> &TypeTag {
        &self.type_tag
    }

    fn properties(&self) -> &Properties {
        &self.properties
    }
}
