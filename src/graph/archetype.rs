// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The capability shared by nodes, edges and walkers: a type tag used as a
//! dispatch key plus a bag of named, typed values.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::errors::GraphError;

/// Named property values. Ordered by key so snapshots and reports are stable.
pub type Properties = serde_json::Map<String, Value>;

/// Build a property bag from a JSON object literal. Anything that is not an
/// object yields an empty bag.
///
/// ```
/// use the_wayfarer::graph::props;
///
/// let p = props(serde_json::json!({"name": "A", "count": 1}));
/// assert_eq!(p.len(), 2);
/// ```
pub fn props(value: Value) -> Properties {
    match value {
        Value::Object(map) => map,
        _ => Properties::new(),
    }
}

/// Archetype name of a node, edge or walker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeTag(String);

impl TypeTag {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TypeTag {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for TypeTag {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<&TypeTag> for TypeTag {
    fn from(tag: &TypeTag) -> Self {
        tag.clone()
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub trait Archetype {
    fn type_tag(&self) -> &TypeTag;

    fn properties(&self) -> &Properties;

    fn property(&self, key: &str) -> Option<&Value> {
        self.properties().get(key)
    }

    fn is_a(&self, type_tag: &str) -> bool {
        self.type_tag().as_str() == type_tag
    }

    /// Read a property as a concrete type.
    fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<T, GraphError> {
        let expected = std::any::type_name::<T>();
        let value = self.property(key).ok_or_else(|| {
            GraphError::type_mismatch(expected, format!("missing property '{}'", key))
        })?;
        serde_json::from_value(value.clone())
            .map_err(|_| GraphError::type_mismatch(expected, describe_value(value)))
    }
}

pub(crate) fn describe_value(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Bag {
        tag: TypeTag,
        properties: Properties,
    }

    impl Archetype for Bag {
        fn type_tag(&self) -> &TypeTag {
            &self.tag
        }

        fn properties(&self) -> &Properties {
            &self.properties
        }
    }

    #[test]
    fn test_get_as_reads_typed_values() {
        let bag = Bag {
            tag: "Person".into(),
            properties: props(json!({"name": "Ada", "age": 36})),
        };

        assert_eq!(bag.get_as::<String>("name").unwrap(), "Ada");
        assert_eq!(bag.get_as::<u32>("age").unwrap(), 36);
        assert!(bag.is_a("Person"));
    }

    #[test]
    fn test_get_as_reports_type_mismatch() {
        let bag = Bag {
            tag: "Person".into(),
            properties: props(json!({"name": "Ada"})),
        };

        match bag.get_as::<u32>("name") {
            Err(GraphError::TypeMismatch { found, .. }) => assert_eq!(found, "string"),
            other => panic!("expected TypeMismatch, got {:?}", other),
        }
        assert!(matches!(
            bag.get_as::<u32>("missing"),
            Err(GraphError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_props_ignores_non_objects() {
        assert!(props(json!([1, 2, 3])).is_empty());
    }
}
