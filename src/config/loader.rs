// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::abilities::factory::AbilityOptions;
use crate::config::consts::ROOT_KEY;
use crate::dispatch::{DispatchOrder, LocationPattern, Phase, VisitorPattern};
use crate::errors::ConfigError;
use crate::graph::Properties;

/// Main configuration structure for a walker scenario.
///
/// A scenario describes a fixture graph, the walker archetypes and
/// location abilities that react to each other, and optionally one spawn
/// to run. It is typically loaded from a YAML file.
///
/// # Fields
/// * `engine` - Scheduler options (optional)
/// * `graph` - Fixture nodes and edges (optional)
/// * `walkers` - Walker archetypes with their default fields and walker-side abilities
/// * `locations` - Node- and edge-side abilities
/// * `spawn` - The walker to run (optional)
///
/// # Example
/// ```yaml
/// engine:
///   timeout_ms: 5000
///   dispatch_order: location_first
/// graph:
///   nodes:
///     - key: a
///       type: Person
///       properties: { name: a }
///   edges:
///     - from: root
///       to: a
///       type: Link
/// walkers:
///   - type: Collector
///     abilities:
///       - on: any_node
///         ability: report_property
///         options: { key: name }
///       - on: any
///         ability: visit_edges
/// spawn:
///   walker: Collector
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineOptions,
    #[serde(default)]
    pub graph: GraphFixture,
    #[serde(default)]
    pub walkers: Vec<WalkerConfig>,
    #[serde(default)]
    pub locations: Vec<LocationAbilityConfig>,
    pub spawn: Option<SpawnConfig>,
}

/// Scheduler configuration options.
///
/// # Fields
/// * `timeout_ms` - Wall-clock limit per run in milliseconds (optional)
/// * `dispatch_order` - Which side of an encounter fires first (defaults to `location_first`)
/// * `max_steps` - Most locations one run may enter (optional)
#[derive(Debug, Default, Deserialize)]
pub struct EngineOptions {
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub dispatch_order: DispatchOrder,
    pub max_steps: Option<usize>,
}

impl EngineOptions {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// Nodes and edges created before any walker runs.
#[derive(Debug, Default, Deserialize)]
pub struct GraphFixture {
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,
    #[serde(default)]
    pub edges: Vec<EdgeConfig>,
}

/// A fixture node. `key` names it inside the config only.
#[derive(Debug, Deserialize)]
pub struct NodeConfig {
    pub key: String,
    #[serde(rename = "type")]
    pub type_tag: String,
    #[serde(default)]
    pub properties: Properties,
}

fn default_directed() -> bool {
    true
}

/// A fixture edge between two node keys. `root` is always a valid key.
#[derive(Debug, Deserialize)]
pub struct EdgeConfig {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub type_tag: String,
    #[serde(default = "default_directed")]
    pub directed: bool,
    #[serde(default)]
    pub properties: Properties,
}

/// A walker archetype.
///
/// # Example
/// ```yaml
/// type: Counter
/// fields: { count: 0 }
/// abilities:
///   - on: { type: Person }
///     ability: increment_field
///     options: { key: count }
/// ```
#[derive(Debug, Deserialize)]
pub struct WalkerConfig {
    #[serde(rename = "type")]
    pub type_tag: String,
    #[serde(default)]
    pub fields: Properties,
    #[serde(default)]
    pub abilities: Vec<WalkerAbilityConfig>,
}

fn any_location() -> LocationPattern {
    LocationPattern::Any
}

fn any_visitor() -> VisitorPattern {
    VisitorPattern::Any
}

/// A walker-side ability binding.
#[derive(Debug, Deserialize)]
pub struct WalkerAbilityConfig {
    #[serde(default = "any_location")]
    pub on: LocationPattern,
    #[serde(default)]
    pub phase: Phase,
    pub ability: String,
    #[serde(default)]
    pub options: AbilityOptions,
}

/// A node- or edge-side ability binding.
///
/// # Example
/// ```yaml
/// type: Person
/// visitor: { type: Counter }
/// ability: increment_property
/// options: { key: visits }
/// ```
#[derive(Debug, Deserialize)]
pub struct LocationAbilityConfig {
    #[serde(rename = "type")]
    pub location_type: String,
    #[serde(default = "any_visitor")]
    pub visitor: VisitorPattern,
    #[serde(default)]
    pub phase: Phase,
    pub ability: String,
    #[serde(default)]
    pub options: AbilityOptions,
}

fn default_start() -> String {
    ROOT_KEY.to_string()
}

/// The walker run requested by the scenario.
#[derive(Debug, Clone, Deserialize)]
pub struct SpawnConfig {
    pub walker: String,
    #[serde(default = "default_start")]
    pub start: String,
    #[serde(default)]
    pub fields: Properties,
    pub tenant: Option<String>,
}

/// Load a config from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&content)?;
    Ok(cfg)
}

/// Load and validate a config from a YAML file
///
/// Every validation problem is collected and reported together.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let cfg = load_config(path)?;
    crate::config::validate_config(&cfg).map_err(ConfigError::Invalid)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(yaml: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parse_basic_config() {
        let yaml = r#"
engine:
  timeout_ms: 250
  dispatch_order: walker_first
graph:
  nodes:
    - key: a
      type: Person
      properties: { name: a, age: 31 }
  edges:
    - from: root
      to: a
      type: Link
      directed: false
walkers:
  - type: Collector
    fields: { seen: 0 }
    abilities:
      - on: { type: Person }
        ability: report_property
        options: { key: name }
      - phase: exit
        ability: report_field
        options: { key: seen }
locations:
  - type: Person
    visitor: { type: Collector }
    ability: increment_property
    options: { key: visits }
spawn:
  walker: Collector
"#;

        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.engine.timeout(), Some(Duration::from_millis(250)));
        assert_eq!(cfg.engine.dispatch_order, DispatchOrder::WalkerFirst);
        assert_eq!(cfg.graph.nodes[0].properties.get("age"), Some(&json!(31)));
        assert!(!cfg.graph.edges[0].directed);
        assert_eq!(cfg.walkers[0].abilities[0].on, LocationPattern::of("Person"));
        assert_eq!(cfg.walkers[0].abilities[1].on, LocationPattern::Any);
        assert_eq!(cfg.walkers[0].abilities[1].phase, Phase::Exit);
        assert_eq!(cfg.locations[0].visitor, VisitorPattern::of("Collector"));

        let spawn = cfg.spawn.unwrap();
        assert_eq!(spawn.start, "root");
        assert!(spawn.tenant.is_none());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(cfg.engine.dispatch_order, DispatchOrder::LocationFirst);
        assert!(cfg.engine.timeout().is_none());
        assert!(cfg.graph.nodes.is_empty());
        assert!(cfg.spawn.is_none());
    }

    #[test]
    fn test_load_and_validate_valid_config() {
        let file = write_config(
            r#"
graph:
  nodes:
    - { key: a, type: Person }
  edges:
    - { from: root, to: a, type: Link }
walkers:
  - type: Visitor
spawn:
  walker: Visitor
"#,
        );

        let result = load_and_validate_config(file.path());
        assert!(result.is_ok());
    }

    #[test]
    fn test_load_and_validate_unresolved_endpoint() {
        let file = write_config(
            r#"
graph:
  edges:
    - { from: root, to: nowhere, type: Link }
"#,
        );

        let error_msg = load_and_validate_config(file.path()).unwrap_err().to_string();
        assert!(error_msg.contains("Configuration validation failed"));
        assert!(error_msg.contains("'nowhere'"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_config("/definitely/not/here.yaml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_malformed_yaml() {
        let file = write_config("graph: [unclosed");
        assert!(matches!(load_config(file.path()), Err(ConfigError::Parse(_))));
    }
}
