// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Edge query engine.
//!
//! An `EdgeQuery` is a chain of hops. Each hop leaves every node of the
//! current input set along its incident edges in one direction, keeping the
//! edges and far-side nodes that pass its filters. The nodes reached become
//! the input of the next hop, so "friends of friends" is two hops:
//!
//! ```
//! use the_wayfarer::graph::{EdgeQuery, GraphStore, Properties};
//!
//! let store = GraphStore::new();
//! let a = store.create_node("Person", Properties::new());
//! let b = store.create_node("Person", Properties::new());
//! let c = store.create_node("Person", Properties::new());
//! store.connect(a, b, "Friend", Properties::new(), true).unwrap();
//! store.connect(b, c, "Friend", Properties::new(), true).unwrap();
//!
//! let fof = EdgeQuery::outgoing().edge_type("Friend").then_outgoing().edge_type("Friend");
//! assert_eq!(fof.nodes(&store, &[a]), vec![c]);
//! ```
//!
//! Results follow input order, then edge creation order. Nodes reached more
//! than once in a hop are kept at their first position. Missing start nodes,
//! empty inputs and empty matches all produce an empty result, never an error.
//! When a permission gate is supplied, edges and nodes the actor cannot read
//! are silently left out.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::graph::archetype::{Archetype, Properties, TypeTag};
use crate::graph::edge::{Direction, Edge};
use crate::graph::filter::PropertyFilter;
use crate::graph::ids::{EdgeId, Location, NodeId};
use crate::graph::node::Node;
use crate::graph::permission::{AccessLevel, Actor};
use crate::graph::store::GraphStore;
use crate::traits::PermissionGate;

pub type PropertyPredicate = Arc<dyn Fn(&Properties) -> bool + Send + Sync>;

#[derive(Clone)]
pub enum Predicate {
    Filter(PropertyFilter),
    Custom(PropertyPredicate),
}

impl Predicate {
    pub fn test(&self, properties: &Properties) -> bool {
        match self {
            Predicate::Filter(filter) => filter.matches(properties),
            Predicate::Custom(predicate) => predicate(properties),
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Filter(filter) => f.debug_tuple("Filter").field(filter).finish(),
            Predicate::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// One step of a query.
#[derive(Debug, Clone, Default)]
pub struct Hop {
    pub direction: Direction,
    pub edge_type: Option<TypeTag>,
    pub edge_predicate: Option<Predicate>,
    pub node_type: Option<TypeTag>,
    pub node_predicate: Option<Predicate>,
}

impl Hop {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            ..Default::default()
        }
    }

    /// Far-side node if `edge` passes this hop's edge filters when leaving `from`.
    fn admit_edge(&self, edge: &Edge, from: NodeId) -> Option<NodeId> {
        if let Some(edge_type) = &self.edge_type {
            if edge.type_tag() != edge_type {
                return None;
            }
        }
        let neighbor = edge.neighbor(from, self.direction)?;
        match &self.edge_predicate {
            Some(predicate) if !predicate.test(edge.properties()) => None,
            _ => Some(neighbor),
        }
    }

    fn admit_node(&self, node: &Node) -> bool {
        if let Some(node_type) = &self.node_type {
            if node.type_tag() != node_type {
                return false;
            }
        }
        self.node_predicate
            .as_ref()
            .map_or(true, |predicate| predicate.test(node.properties()))
    }
}

/// Output of a query run: the nodes reached by the last hop and the edges it travelled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub nodes: Vec<NodeId>,
    pub edges: Vec<EdgeId>,
}

#[derive(Debug, Clone)]
pub struct EdgeQuery {
    hops: Vec<Hop>,
}

impl EdgeQuery {
    pub fn new(direction: Direction) -> Self {
        Self {
            hops: vec![Hop::new(direction)],
        }
    }

    pub fn outgoing() -> Self {
        Self::new(Direction::Forward)
    }

    pub fn incoming() -> Self {
        Self::new(Direction::Backward)
    }

    pub fn both() -> Self {
        Self::new(Direction::Both)
    }

    pub fn from_hops(hops: Vec<Hop>) -> Option<Self> {
        if hops.is_empty() {
            None
        } else {
            Some(Self { hops })
        }
    }

    pub fn hops(&self) -> &[Hop] {
        &self.hops
    }

    fn last(&mut self) -> &mut Hop {
        // `hops` is never empty: every constructor pushes one.
        let index = self.hops.len() - 1;
        &mut self.hops[index]
    }

    pub fn edge_type(mut self, edge_type: impl Into<TypeTag>) -> Self {
        self.last().edge_type = Some(edge_type.into());
        self
    }

    pub fn where_edge(mut self, filter: PropertyFilter) -> Self {
        self.last().edge_predicate = Some(Predicate::Filter(filter));
        self
    }

    pub fn where_edge_fn(
        mut self,
        predicate: impl Fn(&Properties) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.last().edge_predicate = Some(Predicate::Custom(Arc::new(predicate)));
        self
    }

    pub fn node_type(mut self, node_type: impl Into<TypeTag>) -> Self {
        self.last().node_type = Some(node_type.into());
        self
    }

    pub fn where_node(mut self, filter: PropertyFilter) -> Self {
        self.last().node_predicate = Some(Predicate::Filter(filter));
        self
    }

    pub fn where_node_fn(
        mut self,
        predicate: impl Fn(&Properties) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.last().node_predicate = Some(Predicate::Custom(Arc::new(predicate)));
        self
    }

    /// Start another hop from the nodes reached so far.
    pub fn then(mut self, direction: Direction) -> Self {
        self.hops.push(Hop::new(direction));
        self
    }

    pub fn then_outgoing(self) -> Self {
        self.then(Direction::Forward)
    }

    pub fn then_incoming(self) -> Self {
        self.then(Direction::Backward)
    }

    /// Nodes reached, without permission checks.
    pub fn nodes(&self, store: &GraphStore, from: &[NodeId]) -> Vec<NodeId> {
        self.run(store, from, None).nodes
    }

    /// Edges travelled by the last hop, without permission checks.
    pub fn edges(&self, store: &GraphStore, from: &[NodeId]) -> Vec<EdgeId> {
        self.run(store, from, None).edges
    }

    /// Run the query as `actor`, dropping anything `gate` does not let it read.
    pub fn run_as(
        &self,
        store: &GraphStore,
        from: &[NodeId],
        gate: &dyn PermissionGate,
        actor: &Actor,
    ) -> QueryResult {
        self.run(store, from, Some((gate, actor)))
    }

    pub fn run(
        &self,
        store: &GraphStore,
        from: &[NodeId],
        access: Option<(&dyn PermissionGate, &Actor)>,
    ) -> QueryResult {
        let readable = |location: Location| {
            access.map_or(true, |(gate, actor)| gate.allowed(actor, location, AccessLevel::Read))
        };

        let _snapshot = store.read_topology();
        let mut frontier: Vec<NodeId> = from.to_vec();
        let mut travelled = Vec::new();

        for hop in &self.hops {
            let mut seen = HashSet::new();
            let mut reached = Vec::new();
            travelled.clear();

            for &node in &frontier {
                let Some(incident) = store.incident_edges(node) else {
                    continue;
                };
                for edge in incident {
                    let Some(neighbor) = store.with_edge(edge, |e| hop.admit_edge(e, node)).flatten()
                    else {
                        continue;
                    };
                    if !readable(Location::Edge(edge)) {
                        continue;
                    }
                    let admitted = store
                        .with_node(neighbor, |n| hop.admit_node(n))
                        .unwrap_or(false);
                    if !admitted || !readable(Location::Node(neighbor)) {
                        continue;
                    }
                    travelled.push(edge);
                    if seen.insert(neighbor) {
                        reached.push(neighbor);
                    }
                }
            }
            frontier = reached;
        }

        QueryResult {
            nodes: frontier,
            edges: travelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::archetype::props;
    use crate::graph::permission::GrantTable;
    use serde_json::json;

    struct Fixture {
        store: GraphStore,
        a: NodeId,
        b: NodeId,
        c: NodeId,
        d: NodeId,
    }

    /// a -Friend-> b, a -Coworker-> c, b -Friend-> d, c -Friend-> d
    fn fixture() -> Fixture {
        let store = GraphStore::new();
        let a = store.create_node("Person", props(json!({"name": "A"})));
        let b = store.create_node("Person", props(json!({"name": "B"})));
        let c = store.create_node("Person", props(json!({"name": "C"})));
        let d = store.create_node("Pet", props(json!({"name": "D"})));
        store.connect(a, b, "Friend", props(json!({"since": 2015})), true).unwrap();
        store.connect(a, c, "Coworker", props(json!({"since": 2021})), true).unwrap();
        store.connect(b, d, "Friend", Properties::new(), true).unwrap();
        store.connect(c, d, "Friend", Properties::new(), true).unwrap();
        Fixture { store, a, b, c, d }
    }

    #[test]
    fn test_edge_type_filter() {
        let f = fixture();
        let friends = EdgeQuery::outgoing().edge_type("Friend").nodes(&f.store, &[f.a]);
        assert_eq!(friends, vec![f.b]);
    }

    #[test]
    fn test_unfiltered_results_follow_edge_creation_order() {
        let f = fixture();
        assert_eq!(EdgeQuery::outgoing().nodes(&f.store, &[f.a]), vec![f.b, f.c]);
        assert_eq!(EdgeQuery::incoming().nodes(&f.store, &[f.d]), vec![f.b, f.c]);
    }

    #[test]
    fn test_edge_and_node_predicates() {
        let f = fixture();
        let recent = EdgeQuery::outgoing()
            .where_edge(PropertyFilter::gt("since", 2020.0))
            .nodes(&f.store, &[f.a]);
        assert_eq!(recent, vec![f.c]);

        let named_b = EdgeQuery::outgoing()
            .where_node_fn(|p| p.get("name") == Some(&json!("B")))
            .nodes(&f.store, &[f.a]);
        assert_eq!(named_b, vec![f.b]);

        let pets = EdgeQuery::outgoing().node_type("Pet").nodes(&f.store, &[f.b]);
        assert_eq!(pets, vec![f.d]);
    }

    #[test]
    fn test_multi_hop_deduplicates_nodes_but_keeps_edges() {
        let f = fixture();
        let query = EdgeQuery::outgoing().then_outgoing().edge_type("Friend");
        let result = query.run(&f.store, &[f.a], None);

        assert_eq!(result.nodes, vec![f.d]);
        assert_eq!(result.edges.len(), 2);
    }

    #[test]
    fn test_empty_and_missing_inputs() {
        let f = fixture();
        assert!(EdgeQuery::outgoing().nodes(&f.store, &[]).is_empty());
        assert!(EdgeQuery::outgoing().nodes(&f.store, &[NodeId(999)]).is_empty());
        assert!(EdgeQuery::outgoing().nodes(&f.store, &[f.d]).is_empty());
        assert!(EdgeQuery::from_hops(vec![]).is_none());
    }

    #[test]
    fn test_deleted_node_disappears_from_results() {
        let f = fixture();
        f.store.delete_node(f.b).unwrap();
        assert_eq!(EdgeQuery::outgoing().nodes(&f.store, &[f.a]), vec![f.c]);
    }

    #[test]
    fn test_unreadable_elements_are_filtered_not_errors() {
        let f = fixture();
        let gate = GrantTable::new(AccessLevel::None);
        let guest = Actor::new("guest");

        let result = EdgeQuery::outgoing().run_as(&f.store, &[f.a], &gate, &guest);
        assert!(result.nodes.is_empty());

        for edge in f.store.get_edges(f.a, Direction::Forward).unwrap() {
            gate.grant(&guest, edge, AccessLevel::Read);
        }
        gate.grant(&guest, f.c, AccessLevel::Read);
        let result = EdgeQuery::outgoing().run_as(&f.store, &[f.a], &gate, &guest);
        assert_eq!(result.nodes, vec![f.c]);
    }
}
