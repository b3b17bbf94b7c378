// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Typed graph: the shared store, the query engine and the access gate.

pub mod archetype;
pub mod context;
pub mod edge;
pub mod filter;
pub mod ids;
pub mod node;
pub mod permission;
pub mod query;
pub mod store;

pub use archetype::{props, Archetype, Properties, TypeTag};
pub use context::{ContextRegistry, ExecutionContext};
pub use edge::{Direction, Edge};
pub use filter::PropertyFilter;
pub use ids::{EdgeId, Location, LocationKind, NodeId};
pub use node::Node;
pub use permission::{require, AccessLevel, Actor, AllowAll, GrantTable};
pub use query::{EdgeQuery, Hop, Predicate, QueryResult};
pub use store::GraphStore;
