// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The view an ability gets while it runs.
//!
//! An [`AbilityContext`] lends the firing ability three things at once: the
//! walker instance (`here`'s visitor), the location it is standing on, and a
//! permission-checked handle to the shared graph. Every graph access made
//! through the context runs as the actor of the spawning
//! [`ExecutionContext`].

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::dispatch::{Phase, Side};
use crate::engine::walker::WalkerState;
use crate::errors::{AbilityError, GraphError};
use crate::graph::{
    require, AccessLevel, Actor, Archetype, Direction, Edge, EdgeId, EdgeQuery, ExecutionContext,
    GraphStore, Location, Node, NodeId, Properties, QueryResult, TypeTag,
};
use crate::traits::PermissionGate;

pub struct AbilityContext<'a> {
    walker: &'a mut WalkerState,
    graph: &'a GraphStore,
    gate: &'a dyn PermissionGate,
    context: &'a ExecutionContext,
    here: Location,
    side: Side,
    phase: Phase,
}

impl<'a> AbilityContext<'a> {
    pub(crate) fn new(
        walker: &'a mut WalkerState,
        graph: &'a GraphStore,
        gate: &'a dyn PermissionGate,
        context: &'a ExecutionContext,
        side: Side,
        phase: Phase,
    ) -> Self {
        let here = walker.current();
        Self {
            walker,
            graph,
            gate,
            context,
            here,
            side,
            phase,
        }
    }

    /// The location the walker is standing on.
    pub fn here(&self) -> Location {
        self.here
    }

    pub fn here_node(&self) -> Option<NodeId> {
        self.here.as_node()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Which side of the encounter registered the running ability.
    pub fn side(&self) -> Side {
        self.side
    }

    pub fn root(&self) -> NodeId {
        self.context.root()
    }

    pub fn tenant(&self) -> &str {
        self.context.tenant()
    }

    pub fn actor(&self) -> &Actor {
        self.context.actor()
    }

    pub fn walker_type(&self) -> &TypeTag {
        self.walker.type_tag()
    }

    // ---- walker fields ----

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.walker.property(key)
    }

    pub fn field_as<T: DeserializeOwned>(&self, key: &str) -> Result<T, GraphError> {
        self.walker.get_as(key)
    }

    pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.walker.fields_mut().insert(key.into(), value.into())
    }

    pub fn fields(&self) -> &Properties {
        self.walker.properties()
    }

    // ---- the current location ----

    /// Snapshot of the current node. Fails on an edge location.
    pub fn node(&self) -> Result<Node, GraphError> {
        let id = self.here.as_node().ok_or_else(|| GraphError::TypeMismatch {
            expected: "node location".to_string(),
            found: "edge location".to_string(),
        })?;
        self.graph().get_node(id)
    }

    /// Snapshot of the current edge. Fails on a node location.
    pub fn edge(&self) -> Result<Edge, GraphError> {
        let id = self.here.as_edge().ok_or_else(|| GraphError::TypeMismatch {
            expected: "edge location".to_string(),
            found: "node location".to_string(),
        })?;
        self.graph().get_edge(id)
    }

    /// Read a property of the current location.
    pub fn property(&self, key: &str) -> Result<Option<Value>, GraphError> {
        self.require(self.here, AccessLevel::Read)?;
        let found = match self.here {
            Location::Node(id) => self.graph.with_node(id, |n| n.property(key).cloned()),
            Location::Edge(id) => self.graph.with_edge(id, |e| e.property(key).cloned()),
        };
        found.ok_or(GraphError::NotFound(self.here))
    }

    /// Copy of every property of the current location.
    pub fn location_properties(&self) -> Result<Properties, GraphError> {
        self.require(self.here, AccessLevel::Read)?;
        let found = match self.here {
            Location::Node(id) => self.graph.with_node(id, |n| n.properties().clone()),
            Location::Edge(id) => self.graph.with_edge(id, |e| e.properties().clone()),
        };
        found.ok_or(GraphError::NotFound(self.here))
    }

    pub fn property_as<T: DeserializeOwned>(&self, key: &str) -> Result<T, GraphError> {
        self.require(self.here, AccessLevel::Read)?;
        match self.here {
            Location::Node(id) => self.graph.get_node(id)?.get_as(key),
            Location::Edge(id) => self.graph.get_edge(id)?.get_as(key),
        }
    }

    /// Write a property of the current location. Visible to every walker immediately.
    pub fn set_property(
        &self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, GraphError> {
        self.graph().set_property(self.here, key, value)
    }

    // ---- traversal ----

    /// Run `query` from the current location. An edge location starts from its target.
    pub fn query(&self, query: &EdgeQuery) -> Result<QueryResult, GraphError> {
        let from = match self.here {
            Location::Node(id) => id,
            Location::Edge(id) => self.graph.get_edge(id)?.target(),
        };
        Ok(self.query_from(query, &[from]))
    }

    /// Run `query` from explicit start nodes, filtered by what the actor may read.
    pub fn query_from(&self, query: &EdgeQuery, from: &[NodeId]) -> QueryResult {
        query.run_as(self.graph, from, self.gate, self.context.actor())
    }

    /// Append locations to the visit queue. Returns how many were queued;
    /// ignored locations, anything queued after `disengage` and visits made
    /// from Exit abilities are dropped.
    pub fn visit<I, L>(&mut self, targets: I) -> usize
    where
        I: IntoIterator<Item = L>,
        L: Into<Location>,
    {
        self.walker.enqueue(targets.into_iter().map(Into::into))
    }

    /// Queue every node `query` reaches from here.
    pub fn visit_query(&mut self, query: &EdgeQuery) -> Result<usize, GraphError> {
        let reached = self.query(query)?;
        Ok(self.visit(reached.nodes))
    }

    /// Never enqueue these locations again for the rest of this run.
    pub fn ignore<I, L>(&mut self, targets: I)
    where
        I: IntoIterator<Item = L>,
        L: Into<Location>,
    {
        self.walker.ignore(targets.into_iter().map(Into::into));
    }

    pub fn report(&mut self, value: impl Into<Value>) {
        self.walker.report(value.into());
    }

    pub fn report_serialized<T: Serialize>(&mut self, value: &T) -> Result<(), AbilityError> {
        let value = serde_json::to_value(value).map_err(anyhow::Error::from)?;
        self.walker.report(value);
        Ok(())
    }

    /// Stop the walk. Remaining abilities at this location do not fire and
    /// the queue is discarded.
    pub fn disengage(&mut self) {
        self.walker.disengage();
    }

    pub fn is_disengaged(&self) -> bool {
        self.walker.is_disengaged()
    }

    /// Skip the remaining abilities at this location and move on.
    pub fn skip(&mut self) {
        self.walker.request_skip();
    }

    /// Permission-checked access to the graph as this run's actor.
    pub fn graph(&self) -> GraphHandle<'_> {
        GraphHandle {
            graph: self.graph,
            gate: self.gate,
            actor: self.context.actor(),
        }
    }

    fn require(&self, target: Location, level: AccessLevel) -> Result<(), GraphError> {
        require(self.gate, self.context.actor(), target, level)
    }
}

/// Graph operations gated by a [`PermissionGate`] for one actor.
///
/// Reads need `Read`, property writes and deletes need `Write`, and
/// connecting two nodes needs `Connect` on both of them.
#[derive(Clone, Copy)]
pub struct GraphHandle<'a> {
    graph: &'a GraphStore,
    gate: &'a dyn PermissionGate,
    actor: &'a Actor,
}

impl<'a> GraphHandle<'a> {
    pub fn new(graph: &'a GraphStore, gate: &'a dyn PermissionGate, actor: &'a Actor) -> Self {
        Self { graph, gate, actor }
    }

    fn require(&self, target: Location, level: AccessLevel) -> Result<(), GraphError> {
        require(self.gate, self.actor, target, level)
    }

    pub fn create_node(&self, type_tag: impl Into<TypeTag>, properties: Properties) -> NodeId {
        self.graph.create_node(type_tag, properties)
    }

    pub fn connect(
        &self,
        source: NodeId,
        target: NodeId,
        edge_type: impl Into<TypeTag>,
        properties: Properties,
        directed: bool,
    ) -> Result<EdgeId, GraphError> {
        self.require(source.into(), AccessLevel::Connect)?;
        self.require(target.into(), AccessLevel::Connect)?;
        self.graph.connect(source, target, edge_type, properties, directed)
    }

    pub fn disconnect(&self, edge: EdgeId) -> Result<(), GraphError> {
        self.require(edge.into(), AccessLevel::Write)?;
        self.graph.disconnect(edge)
    }

    pub fn delete_node(&self, node: NodeId) -> Result<(), GraphError> {
        self.require(node.into(), AccessLevel::Write)?;
        self.graph.delete_node(node)
    }

    pub fn get_node(&self, node: NodeId) -> Result<Node, GraphError> {
        self.require(node.into(), AccessLevel::Read)?;
        self.graph.get_node(node)
    }

    pub fn get_edge(&self, edge: EdgeId) -> Result<Edge, GraphError> {
        self.require(edge.into(), AccessLevel::Read)?;
        self.graph.get_edge(edge)
    }

    /// Incident edges of `node` travelling in `direction`, minus unreadable ones.
    pub fn get_edges(&self, node: NodeId, direction: Direction) -> Result<Vec<EdgeId>, GraphError> {
        self.require(node.into(), AccessLevel::Read)?;
        Ok(self
            .graph
            .get_edges(node, direction)?
            .into_iter()
            .filter(|edge| self.gate.allowed(self.actor, (*edge).into(), AccessLevel::Read))
            .collect())
    }

    pub fn set_property(
        &self,
        location: Location,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, GraphError> {
        self.require(location, AccessLevel::Write)?;
        self.graph.set_property(location, key, value.into())
    }

    /// Atomic read-modify-write of a node's properties.
    pub fn update_node<R>(
        &self,
        node: NodeId,
        update: impl FnOnce(&mut Properties) -> R,
    ) -> Result<R, GraphError> {
        self.require(node.into(), AccessLevel::Write)?;
        self.graph.update_node(node, update)
    }

    pub fn update_edge<R>(
        &self,
        edge: EdgeId,
        update: impl FnOnce(&mut Properties) -> R,
    ) -> Result<R, GraphError> {
        self.require(edge.into(), AccessLevel::Write)?;
        self.graph.update_edge(edge, update)
    }
}
