// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::Arc;

use crate::abilities::BuiltinAbilityFactory;
use crate::config::consts::{DEFAULT_TENANT, ROOT_KEY};
use crate::config::{Config, SpawnConfig};
use crate::dispatch::DispatchTable;
use crate::engine::{RunResult, SchedulerFactory, WalkerScheduler};
use crate::errors::{ConfigError, ValidationError};
use crate::graph::{ExecutionContext, GraphStore, NodeId};
use crate::traits::PermissionGate;

/// A scenario ready to run: scheduler, tenant context and fixture node ids.
pub struct Runtime {
    pub scheduler: WalkerScheduler,
    pub context: ExecutionContext,
    nodes: HashMap<String, NodeId>,
    spawn: Option<SpawnConfig>,
}

impl Runtime {
    /// Id of the fixture node declared under `key`. `root` names the context root.
    pub fn node(&self, key: &str) -> Option<NodeId> {
        self.nodes.get(key).copied()
    }

    pub fn spawn_config(&self) -> Option<&SpawnConfig> {
        self.spawn.as_ref()
    }

    /// Run the configured spawn, if the scenario has one.
    pub async fn run_spawn(&self) -> Result<Option<RunResult>, ConfigError> {
        let Some(spawn) = &self.spawn else {
            return Ok(None);
        };
        let start = self.node(&spawn.start).ok_or_else(|| {
            ConfigError::Invalid(vec![ValidationError::UnresolvedSpawnStart {
                key: spawn.start.clone(),
            }])
        })?;
        let result = self
            .scheduler
            .spawn(&self.context, spawn.walker.as_str(), start, spawn.fields.clone())
            .await;
        Ok(Some(result))
    }
}

/// Walker runtime builder - orchestrates fixture graph, dispatch table and scheduler creation from configuration.
///
/// # Examples
///
/// ```
/// use the_wayfarer::config::{Config, RuntimeBuilder};
///
/// let config: Config = serde_yaml::from_str(r#"
/// graph:
///   nodes:
///     - { key: a, type: Person, properties: { name: a } }
///   edges:
///     - { from: root, to: a, type: Link }
/// walkers:
///   - type: Collector
///     abilities:
///       - { on: any_node, ability: report_property, options: { key: name } }
///       - { on: any, ability: visit_edges }
/// spawn:
///   walker: Collector
/// "#).unwrap();
///
/// let runtime = RuntimeBuilder::from_config(&config).unwrap();
/// assert!(runtime.node("a").is_some());
/// assert_eq!(runtime.scheduler.graph().node_count(), 2);
/// ```
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    /// Build a runtime with no access control.
    pub fn from_config(cfg: &Config) -> Result<Runtime, ConfigError> {
        Self::build(cfg, None)
    }

    pub fn from_config_with_gate(
        cfg: &Config,
        gate: Arc<dyn PermissionGate>,
    ) -> Result<Runtime, ConfigError> {
        Self::build(cfg, Some(gate))
    }

    /// Build the dispatch table from the `walkers` and `locations` sections.
    pub fn dispatch_table(cfg: &Config) -> Result<DispatchTable, ConfigError> {
        let mut table = DispatchTable::new();
        for walker in &cfg.walkers {
            table.declare_walker(walker.type_tag.as_str(), walker.fields.clone());
            for binding in &walker.abilities {
                let ability = BuiltinAbilityFactory::create(&binding.ability, &binding.options)?;
                table.on_walker(walker.type_tag.as_str(), binding.on.clone(), binding.phase, ability);
            }
        }
        for binding in &cfg.locations {
            let ability = BuiltinAbilityFactory::create(&binding.ability, &binding.options)?;
            table.on_location(
                binding.location_type.as_str(),
                binding.visitor.clone(),
                binding.phase,
                ability,
            );
        }
        Ok(table)
    }

    fn build(cfg: &Config, gate: Option<Arc<dyn PermissionGate>>) -> Result<Runtime, ConfigError> {
        let dispatch = Self::dispatch_table(cfg)?;
        let graph = Arc::new(GraphStore::new());
        let scheduler = match gate {
            Some(gate) => SchedulerFactory::from_config_with_gate(cfg, graph.clone(), dispatch, gate),
            None => SchedulerFactory::from_config(cfg, graph.clone(), dispatch),
        };

        let tenant = cfg
            .spawn
            .as_ref()
            .and_then(|spawn| spawn.tenant.as_deref())
            .unwrap_or(DEFAULT_TENANT);
        let context = scheduler.open_context(tenant);

        let mut nodes = HashMap::new();
        nodes.insert(ROOT_KEY.to_string(), context.root());
        for node in &cfg.graph.nodes {
            let id = graph.create_node(node.type_tag.as_str(), node.properties.clone());
            nodes.insert(node.key.clone(), id);
        }

        for (edge_index, edge) in cfg.graph.edges.iter().enumerate() {
            let resolve = |key: &str| {
                nodes.get(key).copied().ok_or_else(|| {
                    ConfigError::Invalid(vec![ValidationError::UnresolvedEdgeEndpoint {
                        edge_index,
                        missing_key: key.to_string(),
                    }])
                })
            };
            let source = resolve(&edge.from)?;
            let target = resolve(&edge.to)?;
            graph.connect(
                source,
                target,
                edge.type_tag.as_str(),
                edge.properties.clone(),
                edge.directed,
            )?;
        }

        tracing::debug!(
            tenant,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            abilities = scheduler.dispatch().ability_count(),
            "runtime built"
        );

        Ok(Runtime {
            scheduler,
            context,
            nodes,
            spawn: cfg.spawn.clone(),
        })
    }
}
