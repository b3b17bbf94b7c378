// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde::Deserialize;

use crate::engine::AbilityContext;
use crate::errors::AbilityError;
use crate::graph::{Direction, EdgeQuery, PropertyFilter};
use crate::traits::Ability;

/// Options for [`VisitEdges`].
///
/// # Example
/// ```yaml
/// ability: visit_edges
/// options:
///   direction: forward
///   edge_type: Friend
///   node_filter:
///     gt: { key: age, value: 30 }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VisitEdgesConfig {
    #[serde(default)]
    pub direction: Direction,
    pub edge_type: Option<String>,
    pub node_type: Option<String>,
    pub edge_filter: Option<PropertyFilter>,
    pub node_filter: Option<PropertyFilter>,
}

/// Queues every neighbor reachable over one hop from the current location.
pub struct VisitEdges {
    query: EdgeQuery,
}

impl VisitEdges {
    pub fn new(config: VisitEdgesConfig) -> Self {
        let mut query = EdgeQuery::new(config.direction);
        if let Some(edge_type) = config.edge_type {
            query = query.edge_type(edge_type);
        }
        if let Some(node_type) = config.node_type {
            query = query.node_type(node_type);
        }
        if let Some(filter) = config.edge_filter {
            query = query.where_edge(filter);
        }
        if let Some(filter) = config.node_filter {
            query = query.where_node(filter);
        }
        Self { query }
    }

    pub fn outgoing() -> Self {
        Self::new(VisitEdgesConfig::default())
    }

    pub fn query(&self) -> &EdgeQuery {
        &self.query
    }
}

#[async_trait]
impl Ability for VisitEdges {
    async fn run(&self, cx: &mut AbilityContext<'_>) -> Result<(), AbilityError> {
        let queued = cx.visit_query(&self.query)?;
        tracing::trace!(location = %cx.here(), queued, "visit_edges");
        Ok(())
    }

    fn name(&self) -> &str {
        "visit_edges"
    }
}
