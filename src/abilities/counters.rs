// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::engine::AbilityContext;
use crate::errors::{AbilityError, GraphError};
use crate::graph::archetype::describe_value;
use crate::graph::{Location, Properties};
use crate::traits::Ability;

fn default_step() -> i64 {
    1
}

/// Options shared by the counter abilities.
#[derive(Debug, Clone, Deserialize)]
pub struct IncrementConfig {
    pub key: String,
    #[serde(default = "default_step")]
    pub by: i64,
}

impl IncrementConfig {
    pub fn key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            by: default_step(),
        }
    }
}

/// Add `by` to the integer stored under `key`. A missing key counts from zero.
fn increment(properties: &mut Properties, key: &str, by: i64) -> Result<i64, GraphError> {
    let current = match properties.get(key) {
        None | Some(Value::Null) => 0,
        Some(value) => value
            .as_i64()
            .ok_or_else(|| GraphError::type_mismatch("integer", describe_value(value)))?,
    };
    let next = current.checked_add(by).ok_or_else(|| {
        GraphError::type_mismatch(
            "integer within i64 range",
            format!("{} + {} overflows", current, by),
        )
    })?;
    properties.insert(key.to_string(), Value::from(next));
    Ok(next)
}

/// Bumps an integer field on the visiting walker.
pub struct IncrementField {
    config: IncrementConfig,
}

impl IncrementField {
    pub fn new(config: IncrementConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Ability for IncrementField {
    async fn run(&self, cx: &mut AbilityContext<'_>) -> Result<(), AbilityError> {
        let mut fields = cx.fields().clone();
        let next = increment(&mut fields, &self.config.key, self.config.by)?;
        cx.set_field(self.config.key.clone(), next);
        Ok(())
    }

    fn name(&self) -> &str {
        "increment_field"
    }
}

/// Bumps an integer property on the current location.
///
/// The read-modify-write happens under the element's entry lock, so
/// concurrent walkers never lose an increment.
pub struct IncrementProperty {
    config: IncrementConfig,
}

impl IncrementProperty {
    pub fn new(config: IncrementConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Ability for IncrementProperty {
    async fn run(&self, cx: &mut AbilityContext<'_>) -> Result<(), AbilityError> {
        let key = self.config.key.as_str();
        let by = self.config.by;
        let graph = cx.graph();
        match cx.here() {
            Location::Node(id) => graph.update_node(id, |props| increment(props, key, by))??,
            Location::Edge(id) => graph.update_edge(id, |props| increment(props, key, by))??,
        };
        Ok(())
    }

    fn name(&self) -> &str {
        "increment_property"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::props;
    use serde_json::json;

    #[test]
    fn test_increment_counts_from_zero() {
        let mut properties = Properties::new();
        assert_eq!(increment(&mut properties, "hits", 1).unwrap(), 1);
        assert_eq!(increment(&mut properties, "hits", 2).unwrap(), 3);
    }

    #[test]
    fn test_increment_rejects_non_integer() {
        let mut properties = props(json!({"hits": "many"}));
        let err = increment(&mut properties, "hits", 1).unwrap_err();
        assert!(matches!(err, GraphError::TypeMismatch { .. }));
    }

    #[test]
    fn test_increment_overflow_is_rejected_and_value_kept() {
        let mut properties = props(json!({"hits": i64::MAX}));
        let err = increment(&mut properties, "hits", 1).unwrap_err();

        assert!(matches!(err, GraphError::TypeMismatch { .. }));
        assert_eq!(properties.get("hits"), Some(&json!(i64::MAX)));
    }

    #[test]
    fn test_negative_step_overflow_is_rejected() {
        let mut properties = props(json!({"hits": i64::MIN}));
        assert!(increment(&mut properties, "hits", -1).is_err());
    }
}
