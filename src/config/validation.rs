// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Configuration validation for scenario integrity.
//!
//! Every check runs, whatever the earlier ones found, so one pass reports
//! every problem in the file:
//!
//! 1. **Node keys are unique**, and none of them redeclares `root`
//! 2. **Edge endpoints resolve** to a declared key or `root`
//! 3. **Walker types are declared once**
//! 4. **The spawn section resolves**: its walker is declared and its start key exists
//!
//! Ability names are not checked here; building the runtime rejects unknown
//! abilities with [`ConfigError::UnknownAbility`](crate::errors::ConfigError).
//!
//! # Example
//!
//! ```rust
//! use the_wayfarer::config::{validate_config, Config};
//! use the_wayfarer::errors::ValidationError;
//!
//! let config: Config = serde_yaml::from_str(r#"
//! graph:
//!   nodes:
//!     - { key: a, type: Person }
//!     - { key: a, type: Person }
//! spawn:
//!   walker: Ghost
//! "#).unwrap();
//!
//! let errors = validate_config(&config).unwrap_err();
//! assert!(errors.contains(&ValidationError::DuplicateNodeKey { key: "a".to_string() }));
//! assert!(errors.contains(&ValidationError::UndeclaredWalker { walker: "Ghost".to_string() }));
//! ```

use std::collections::HashSet;

use crate::config::consts::ROOT_KEY;
use crate::config::Config;
use crate::errors::ValidationError;
use crate::observability::messages::validation::{
    DuplicateNodeKey, UnresolvedEdgeEndpoint, ValidationCompleted, ValidationFailed,
    ValidationStarted,
};
use crate::observability::messages::StructuredLog;

/// Validate a scenario configuration.
///
/// # Returns
///
/// * `Ok(())` - The fixture graph can be built and the spawn resolves
/// * `Err(Vec<ValidationError>)` - Every problem found, in file order
pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    ValidationStarted {
        node_count: config.graph.nodes.len(),
        edge_count: config.graph.edges.len(),
    }
    .log();

    let mut errors = Vec::new();
    let keys = validate_node_keys(config, &mut errors);
    validate_edge_endpoints(config, &keys, &mut errors);
    validate_walkers(config, &keys, &mut errors);

    if errors.is_empty() {
        ValidationCompleted {
            node_count: config.graph.nodes.len(),
            walker_count: config.walkers.len(),
        }
        .log();
        Ok(())
    } else {
        ValidationFailed {
            error_count: errors.len(),
        }
        .log();
        Err(errors)
    }
}

/// Collect the declared node keys, flagging duplicates and `root` redeclarations.
fn validate_node_keys<'a>(config: &'a Config, errors: &mut Vec<ValidationError>) -> HashSet<&'a str> {
    let mut keys = HashSet::new();
    keys.insert(ROOT_KEY);

    for node in &config.graph.nodes {
        if node.key == ROOT_KEY {
            errors.push(ValidationError::ReservedKey {
                key: node.key.clone(),
            });
        } else if !keys.insert(node.key.as_str()) {
            DuplicateNodeKey { key: &node.key }.log();
            errors.push(ValidationError::DuplicateNodeKey {
                key: node.key.clone(),
            });
        }
    }
    keys
}

fn validate_edge_endpoints(
    config: &Config,
    keys: &HashSet<&str>,
    errors: &mut Vec<ValidationError>,
) {
    for (edge_index, edge) in config.graph.edges.iter().enumerate() {
        for endpoint in [&edge.from, &edge.to] {
            if !keys.contains(endpoint.as_str()) {
                UnresolvedEdgeEndpoint {
                    edge_index,
                    missing_key: endpoint,
                }
                .log();
                errors.push(ValidationError::UnresolvedEdgeEndpoint {
                    edge_index,
                    missing_key: endpoint.clone(),
                });
            }
        }
    }
}

fn validate_walkers(config: &Config, keys: &HashSet<&str>, errors: &mut Vec<ValidationError>) {
    let mut declared = HashSet::new();
    for walker in &config.walkers {
        if !declared.insert(walker.type_tag.as_str()) {
            errors.push(ValidationError::DuplicateWalker {
                walker: walker.type_tag.clone(),
            });
        }
    }

    if let Some(spawn) = &config.spawn {
        if !declared.contains(spawn.walker.as_str()) {
            errors.push(ValidationError::UndeclaredWalker {
                walker: spawn.walker.clone(),
            });
        }
        if !keys.contains(spawn.start.as_str()) {
            errors.push(ValidationError::UnresolvedSpawnStart {
                key: spawn.start.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Config {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_valid_config() {
        let config = parse(
            r#"
graph:
  nodes:
    - { key: a, type: Person }
    - { key: b, type: Person }
  edges:
    - { from: root, to: a, type: Link }
    - { from: a, to: b, type: Link }
walkers:
  - type: Visitor
spawn:
  walker: Visitor
  start: a
"#,
        );
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_root_key_is_reserved() {
        let config = parse("graph:\n  nodes:\n    - { key: root, type: Person }\n");
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::ReservedKey {
                key: "root".to_string()
            }]
        );
    }

    #[test]
    fn test_all_errors_are_collected() {
        let config = parse(
            r#"
graph:
  nodes:
    - { key: a, type: Person }
    - { key: a, type: Pet }
  edges:
    - { from: a, to: ghost, type: Link }
walkers:
  - type: Visitor
  - type: Visitor
spawn:
  walker: Stranger
  start: nowhere
"#,
        );

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::DuplicateNodeKey {
                    key: "a".to_string()
                },
                ValidationError::UnresolvedEdgeEndpoint {
                    edge_index: 0,
                    missing_key: "ghost".to_string()
                },
                ValidationError::DuplicateWalker {
                    walker: "Visitor".to_string()
                },
                ValidationError::UndeclaredWalker {
                    walker: "Stranger".to_string()
                },
                ValidationError::UnresolvedSpawnStart {
                    key: "nowhere".to_string()
                },
            ]
        );
    }
}
