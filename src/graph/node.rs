// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Serialize;

use crate::graph::archetype::{Archetype, Properties, TypeTag};
use crate::graph::ids::{EdgeId, NodeId};

/// A typed, property-bearing vertex.
///
/// Values handed out by the store are snapshots; writes go back through
/// `GraphStore::set_property` or `GraphStore::update_node`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    id: NodeId,
    type_tag: TypeTag,
    properties: Properties,
    /// Incident edges in creation order.
    edges: Vec<EdgeId>,
}

impl Node {
    pub(crate) fn new(id: NodeId, type_tag: TypeTag, properties: Properties) -> Self {
        Self {
            id,
            type_tag,
            properties,
            edges: Vec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    pub(crate) fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }

    pub(crate) fn attach(&mut self, edge: EdgeId) {
        if !self.edges.contains(&edge) {
            self.edges.push(edge);
        }
    }

    pub(crate) fn detach(&mut self, edge: EdgeId) {
        self.edges.retain(|e| *e != edge);
    }
}

impl Archetype for Node {
    fn type_tag(&self) -> &TypeTag {
        &self.type_tag
    }

    fn properties(&self) -> &Properties {
        &self.properties
    }
}
