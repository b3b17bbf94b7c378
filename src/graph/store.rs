// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Arena-style store owning every node and edge.
//!
//! # Locking
//!
//! Two layers of synchronization keep concurrent walker runs honest:
//!
//! * **Topology lock**: a `parking_lot::RwLock<()>` taken for writing by
//!   structural changes (connect, disconnect, delete) and for reading by edge
//!   lookups and queries, so a query sees one consistent edge set.
//! * **Entry locks**: nodes and edges live in `DashMap`s, so property writes
//!   lock only the shard holding that element. Reads of unrelated elements are
//!   not blocked by them.
//!
//! Lock order is always topology first, then entries. No entry reference is
//! held while acquiring another entry of the same map.

use dashmap::{DashMap, DashSet};
use parking_lot::{RwLock, RwLockReadGuard};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::errors::GraphError;
use crate::graph::archetype::{Archetype, Properties, TypeTag};
use crate::graph::edge::{Direction, Edge};
use crate::graph::ids::{EdgeId, Location, NodeId};
use crate::graph::node::Node;
use crate::observability::messages::graph::{EdgeCreated, EdgeRemoved, NodeDeleted};
use crate::observability::messages::StructuredLog;

#[derive(Debug, Default)]
pub struct GraphStore {
    topology: RwLock<()>,
    nodes: DashMap<NodeId, Node>,
    edges: DashMap<EdgeId, Edge>,
    pinned: DashSet<NodeId>,
    next_node: AtomicU64,
    next_edge: AtomicU64,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_node(&self, type_tag: impl Into<TypeTag>, properties: Properties) -> NodeId {
        let id = NodeId(self.next_node.fetch_add(1, Ordering::Relaxed) + 1);
        self.nodes.insert(id, Node::new(id, type_tag.into(), properties));
        tracing::trace!(node = %id, "node created");
        id
    }

    /// Connect `source` to `target`. Both nodes must exist.
    pub fn connect(
        &self,
        source: NodeId,
        target: NodeId,
        edge_type: impl Into<TypeTag>,
        properties: Properties,
        directed: bool,
    ) -> Result<EdgeId, GraphError> {
        let _topology = self.topology.write();

        for endpoint in [source, target] {
            if !self.nodes.contains_key(&endpoint) {
                return Err(GraphError::NotFound(Location::Node(endpoint)));
            }
        }

        let id = EdgeId(self.next_edge.fetch_add(1, Ordering::Relaxed) + 1);
        let edge = Edge::new(id, edge_type.into(), properties, source, target, directed);

        EdgeCreated {
            edge: id,
            edge_type: edge.type_tag().as_str(),
            source,
            target,
            directed,
        }
        .log();

        self.edges.insert(id, edge);
        if let Some(mut node) = self.nodes.get_mut(&source) {
            node.attach(id);
        }
        if target != source {
            if let Some(mut node) = self.nodes.get_mut(&target) {
                node.attach(id);
            }
        }
        Ok(id)
    }

    /// Remove one edge, detaching it from both endpoints.
    pub fn disconnect(&self, edge: EdgeId) -> Result<(), GraphError> {
        let _topology = self.topology.write();
        self.remove_edge_locked(edge)
            .ok_or(GraphError::NotFound(Location::Edge(edge)))?;
        EdgeRemoved { edge }.log();
        Ok(())
    }

    /// Remove a node together with every incident edge.
    pub fn delete_node(&self, id: NodeId) -> Result<(), GraphError> {
        let _topology = self.topology.write();

        if self.pinned.contains(&id) {
            return Err(GraphError::PinnedNode(id));
        }
        let (_, node) = self
            .nodes
            .remove(&id)
            .ok_or(GraphError::NotFound(Location::Node(id)))?;

        let incident = node.edges().to_vec();
        for edge in &incident {
            self.remove_edge_locked(*edge);
        }

        NodeDeleted {
            node: id,
            edges_removed: incident.len(),
        }
        .log();
        Ok(())
    }

    /// Caller must hold the topology write lock.
    fn remove_edge_locked(&self, edge: EdgeId) -> Option<Edge> {
        let (_, removed) = self.edges.remove(&edge)?;
        for endpoint in [removed.source(), removed.target()] {
            if let Some(mut node) = self.nodes.get_mut(&endpoint) {
                node.detach(edge);
            }
        }
        Some(removed)
    }

    /// Snapshot of a node.
    pub fn get_node(&self, id: NodeId) -> Result<Node, GraphError> {
        self.nodes
            .get(&id)
            .map(|node| node.clone())
            .ok_or(GraphError::NotFound(Location::Node(id)))
    }

    /// Snapshot of an edge.
    pub fn get_edge(&self, id: EdgeId) -> Result<Edge, GraphError> {
        self.edges
            .get(&id)
            .map(|edge| edge.clone())
            .ok_or(GraphError::NotFound(Location::Edge(id)))
    }

    pub fn contains(&self, location: Location) -> bool {
        match location {
            Location::Node(id) => self.nodes.contains_key(&id),
            Location::Edge(id) => self.edges.contains_key(&id),
        }
    }

    /// Archetype of whatever sits at `location`.
    pub fn type_of(&self, location: Location) -> Result<TypeTag, GraphError> {
        let found = match location {
            Location::Node(id) => self.nodes.get(&id).map(|n| n.type_tag().clone()),
            Location::Edge(id) => self.edges.get(&id).map(|e| e.type_tag().clone()),
        };
        found.ok_or(GraphError::NotFound(location))
    }

    /// Incident edges of `node` that can be travelled in `direction`, in creation order.
    pub fn get_edges(&self, node: NodeId, direction: Direction) -> Result<Vec<EdgeId>, GraphError> {
        let _topology = self.topology.read();
        let incident = self
            .incident_edges(node)
            .ok_or(GraphError::NotFound(Location::Node(node)))?;
        Ok(incident
            .into_iter()
            .filter(|edge| {
                self.with_edge(*edge, |e| e.neighbor(node, direction).is_some())
                    .unwrap_or(false)
            })
            .collect())
    }

    /// Overwrite one property, returning the previous value.
    pub fn set_property(
        &self,
        location: Location,
        key: impl Into<String>,
        value: Value,
    ) -> Result<Option<Value>, GraphError> {
        let key = key.into();
        match location {
            Location::Node(id) => self.update_node(id, |props| props.insert(key, value)),
            Location::Edge(id) => self.update_edge(id, |props| props.insert(key, value)),
        }
    }

    /// Read-modify-write a node's properties under its entry lock.
    ///
    /// The closure must not call back into the store.
    pub fn update_node<R>(
        &self,
        id: NodeId,
        update: impl FnOnce(&mut Properties) -> R,
    ) -> Result<R, GraphError> {
        let mut node = self
            .nodes
            .get_mut(&id)
            .ok_or(GraphError::NotFound(Location::Node(id)))?;
        Ok(update(node.properties_mut()))
    }

    /// Read-modify-write an edge's properties under its entry lock.
    ///
    /// The closure must not call back into the store.
    pub fn update_edge<R>(
        &self,
        id: EdgeId,
        update: impl FnOnce(&mut Properties) -> R,
    ) -> Result<R, GraphError> {
        let mut edge = self
            .edges
            .get_mut(&id)
            .ok_or(GraphError::NotFound(Location::Edge(id)))?;
        Ok(update(edge.properties_mut()))
    }

    /// Protect a node from deletion (context roots).
    pub fn pin(&self, id: NodeId) -> Result<(), GraphError> {
        if !self.nodes.contains_key(&id) {
            return Err(GraphError::NotFound(Location::Node(id)));
        }
        self.pinned.insert(id);
        Ok(())
    }

    pub fn unpin(&self, id: NodeId) {
        self.pinned.remove(&id);
    }

    pub fn is_pinned(&self, id: NodeId) -> bool {
        self.pinned.contains(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    // Helpers for the query engine. Callers hold the topology read guard.

    pub(crate) fn read_topology(&self) -> RwLockReadGuard<'_, ()> {
        self.topology.read()
    }

    pub(crate) fn incident_edges(&self, node: NodeId) -> Option<Vec<EdgeId>> {
        self.nodes.get(&node).map(|n| n.edges().to_vec())
    }

    pub(crate) fn with_node<R>(&self, id: NodeId, f: impl FnOnce(&Node) -> R) -> Option<R> {
        self.nodes.get(&id).map(|node| f(&node))
    }

    pub(crate) fn with_edge<R>(&self, id: EdgeId, f: impl FnOnce(&Edge) -> R) -> Option<R> {
        self.edges.get(&id).map(|edge| f(&edge))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::archetype::props;
    use serde_json::json;
    use std::sync::Arc;

    fn person(store: &GraphStore, name: &str) -> NodeId {
        store.create_node("Person", props(json!({ "name": name })))
    }

    #[test]
    fn test_create_and_get_node() {
        let store = GraphStore::new();
        let a = person(&store, "A");

        let node = store.get_node(a).unwrap();
        assert_eq!(node.id(), a);
        assert!(node.is_a("Person"));
        assert_eq!(node.get_as::<String>("name").unwrap(), "A");
        assert_eq!(store.node_count(), 1);
    }

    #[test]
    fn test_connect_requires_existing_endpoints() {
        let store = GraphStore::new();
        let a = person(&store, "A");

        let err = store
            .connect(a, NodeId(999), "Friend", Properties::new(), true)
            .unwrap_err();
        assert_eq!(err, GraphError::NotFound(Location::Node(NodeId(999))));
        assert_eq!(store.edge_count(), 0);
    }

    #[test]
    fn test_get_edges_respects_direction() {
        let store = GraphStore::new();
        let a = person(&store, "A");
        let b = person(&store, "B");
        let c = person(&store, "C");
        let ab = store.connect(a, b, "Friend", Properties::new(), true).unwrap();
        let ca = store.connect(c, a, "Friend", Properties::new(), true).unwrap();

        assert_eq!(store.get_edges(a, Direction::Forward).unwrap(), vec![ab]);
        assert_eq!(store.get_edges(a, Direction::Backward).unwrap(), vec![ca]);
        assert_eq!(store.get_edges(a, Direction::Both).unwrap(), vec![ab, ca]);
        assert!(store.get_edges(b, Direction::Forward).unwrap().is_empty());
    }

    #[test]
    fn test_delete_node_removes_incident_edges() {
        let store = GraphStore::new();
        let a = person(&store, "A");
        let b = person(&store, "B");
        let c = person(&store, "C");
        store.connect(a, b, "Friend", Properties::new(), true).unwrap();
        store.connect(b, c, "Friend", Properties::new(), false).unwrap();

        store.delete_node(b).unwrap();

        assert_eq!(store.edge_count(), 0);
        assert!(store.get_node(a).unwrap().edges().is_empty());
        assert!(store.get_node(c).unwrap().edges().is_empty());
        assert_eq!(store.delete_node(b), Err(GraphError::NotFound(Location::Node(b))));
    }

    #[test]
    fn test_pinned_nodes_cannot_be_deleted() {
        let store = GraphStore::new();
        let root = store.create_node("root", Properties::new());
        store.pin(root).unwrap();

        assert_eq!(store.delete_node(root), Err(GraphError::PinnedNode(root)));

        store.unpin(root);
        assert!(store.delete_node(root).is_ok());
    }

    #[test]
    fn test_disconnect_detaches_edge() {
        let store = GraphStore::new();
        let a = person(&store, "A");
        let b = person(&store, "B");
        let ab = store.connect(a, b, "Friend", Properties::new(), true).unwrap();

        store.disconnect(ab).unwrap();

        assert!(store.get_node(a).unwrap().edges().is_empty());
        assert!(store.get_edge(ab).is_err());
        assert_eq!(store.disconnect(ab), Err(GraphError::NotFound(Location::Edge(ab))));
    }

    #[test]
    fn test_set_property_and_type_of() {
        let store = GraphStore::new();
        let a = person(&store, "A");
        let b = person(&store, "B");
        let ab = store.connect(a, b, "Friend", Properties::new(), true).unwrap();

        let previous = store.set_property(Location::Node(a), "name", json!("Ada")).unwrap();
        assert_eq!(previous, Some(json!("A")));
        store.set_property(Location::Edge(ab), "since", json!(2020)).unwrap();

        assert_eq!(store.get_edge(ab).unwrap().get_as::<i64>("since").unwrap(), 2020);
        assert_eq!(store.type_of(Location::Edge(ab)).unwrap().as_str(), "Friend");
        assert!(store.type_of(Location::Node(NodeId(42))).is_err());
    }

    #[test]
    fn test_concurrent_updates_do_not_lose_writes() {
        let store = Arc::new(GraphStore::new());
        let counter = store.create_node("Counter", props(json!({ "count": 0 })));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        store
                            .update_node(counter, |p| {
                                let n = p.get("count").and_then(Value::as_i64).unwrap_or(0);
                                p.insert("count".into(), json!(n + 1));
                            })
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.get_node(counter).unwrap().get_as::<i64>("count").unwrap(), 800);
    }
}
