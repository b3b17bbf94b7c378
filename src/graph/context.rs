// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-tenant execution contexts and their Root nodes.
//!
//! Each tenant gets exactly one Root, created the first time the context is
//! opened and pinned in the store until the context is closed. Roots are
//! ordinary nodes of archetype `root` otherwise.

use dashmap::DashMap;
use std::sync::Arc;

use crate::config::consts::ROOT_ARCHETYPE;
use crate::errors::GraphError;
use crate::graph::archetype::Properties;
use crate::graph::ids::NodeId;
use crate::graph::permission::Actor;
use crate::graph::store::GraphStore;

/// Handle on one open context: who is acting and where their graph starts.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionContext {
    tenant: String,
    root: NodeId,
    actor: Actor,
}

impl ExecutionContext {
    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    /// Same context, acting as someone else.
    pub fn with_actor(mut self, actor: Actor) -> Self {
        self.actor = actor;
        self
    }
}

#[derive(Debug)]
pub struct ContextRegistry {
    graph: Arc<GraphStore>,
    roots: DashMap<String, NodeId>,
}

impl ContextRegistry {
    pub fn new(graph: Arc<GraphStore>) -> Self {
        Self {
            graph,
            roots: DashMap::new(),
        }
    }

    /// Open (or reopen) the context for `tenant`, creating its Root on first use.
    pub fn open(&self, tenant: &str) -> ExecutionContext {
        let root = *self.roots.entry(tenant.to_string()).or_insert_with(|| {
            let root = self.graph.create_node(ROOT_ARCHETYPE, Properties::new());
            self.graph.pin(root).ok();
            tracing::debug!(tenant, root = %root, "context root created");
            root
        });
        ExecutionContext {
            tenant: tenant.to_string(),
            root,
            actor: Actor::new(tenant),
        }
    }

    pub fn root_of(&self, tenant: &str) -> Option<NodeId> {
        self.roots.get(tenant).map(|root| *root)
    }

    pub fn is_root(&self, node: NodeId) -> bool {
        self.roots.iter().any(|entry| *entry.value() == node)
    }

    /// Close a context, deleting its Root and the Root's edges.
    /// Returns `false` if the tenant had no open context.
    pub fn close(&self, tenant: &str) -> Result<bool, GraphError> {
        let Some((_, root)) = self.roots.remove(tenant) else {
            return Ok(false);
        };
        self.graph.unpin(root);
        match self.graph.delete_node(root) {
            Ok(()) => Ok(true),
            Err(err) if err.is_not_found() => Ok(true),
            Err(other) => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::archetype::Archetype;

    #[test]
    fn test_open_creates_one_root_per_tenant() {
        let graph = Arc::new(GraphStore::new());
        let registry = ContextRegistry::new(graph.clone());

        let first = registry.open("acme");
        let again = registry.open("acme");
        let other = registry.open("globex");

        assert_eq!(first.root(), again.root());
        assert_ne!(first.root(), other.root());
        assert_eq!(first.actor().as_str(), "acme");
        assert!(graph.get_node(first.root()).unwrap().is_a(ROOT_ARCHETYPE));
        assert!(registry.is_root(other.root()));
    }

    #[test]
    fn test_root_is_pinned_until_close() {
        let graph = Arc::new(GraphStore::new());
        let registry = ContextRegistry::new(graph.clone());
        let ctx = registry.open("acme");

        assert_eq!(graph.delete_node(ctx.root()), Err(GraphError::PinnedNode(ctx.root())));

        assert!(registry.close("acme").unwrap());
        assert!(graph.get_node(ctx.root()).is_err());
        assert!(registry.root_of("acme").is_none());
        assert!(!registry.close("acme").unwrap());
    }
}
