// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Declarative property predicates.
//!
//! These are the serializable half of query predicates, so they can be
//! written in YAML configs as well as in code:
//!
//! ```yaml
//! where_edge:
//!   all:
//!     - gt: { key: since, value: 2019 }
//!     - ne: { key: status, value: blocked }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::graph::archetype::Properties;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyFilter {
    /// Property is present and equal to `value`.
    Eq { key: String, value: Value },
    /// Property is absent or differs from `value`.
    Ne { key: String, value: Value },
    /// Property is a number strictly greater than `value`.
    Gt { key: String, value: f64 },
    /// Property is a number strictly less than `value`.
    Lt { key: String, value: f64 },
    /// Property is present, whatever its value.
    Has { key: String },
    All(Vec<PropertyFilter>),
    Any(Vec<PropertyFilter>),
    Not(Box<PropertyFilter>),
}

impl PropertyFilter {
    pub fn eq(key: impl Into<String>, value: impl Into<Value>) -> Self {
        PropertyFilter::Eq {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn gt(key: impl Into<String>, value: f64) -> Self {
        PropertyFilter::Gt {
            key: key.into(),
            value,
        }
    }

    pub fn lt(key: impl Into<String>, value: f64) -> Self {
        PropertyFilter::Lt {
            key: key.into(),
            value,
        }
    }

    pub fn matches(&self, properties: &Properties) -> bool {
        match self {
            PropertyFilter::Eq { key, value } => properties.get(key) == Some(value),
            PropertyFilter::Ne { key, value } => properties.get(key) != Some(value),
            PropertyFilter::Gt { key, value } => number(properties, key).is_some_and(|n| n > *value),
            PropertyFilter::Lt { key, value } => number(properties, key).is_some_and(|n| n < *value),
            PropertyFilter::Has { key } => properties.contains_key(key),
            PropertyFilter::All(filters) => filters.iter().all(|f| f.matches(properties)),
            PropertyFilter::Any(filters) => filters.iter().any(|f| f.matches(properties)),
            PropertyFilter::Not(filter) => !filter.matches(properties),
        }
    }
}

fn number(properties: &Properties, key: &str) -> Option<f64> {
    properties.get(key).and_then(Value::as_f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::archetype::props;
    use serde_json::json;

    #[test]
    fn test_comparisons() {
        let p = props(json!({"since": 2020, "status": "active"}));

        assert!(PropertyFilter::eq("status", "active").matches(&p));
        assert!(PropertyFilter::gt("since", 2019.0).matches(&p));
        assert!(!PropertyFilter::lt("since", 2020.0).matches(&p));
        assert!(!PropertyFilter::gt("status", 1.0).matches(&p));
        assert!(PropertyFilter::Ne { key: "missing".into(), value: json!(1) }.matches(&p));
    }

    #[test]
    fn test_combinators() {
        let p = props(json!({"since": 2020}));
        let filter = PropertyFilter::All(vec![
            PropertyFilter::Has { key: "since".into() },
            PropertyFilter::Not(Box::new(PropertyFilter::eq("since", 1999))),
        ]);
        assert!(filter.matches(&p));
        assert!(!PropertyFilter::Any(vec![]).matches(&p));
    }

    #[test]
    fn test_deserializes_from_yaml() {
        let yaml = r#"
all:
  - gt: { key: since, value: 2019 }
  - eq: { key: status, value: active }
"#;
        let filter: PropertyFilter = serde_yaml::from_str(yaml).unwrap();
        assert!(filter.matches(&props(json!({"since": 2021, "status": "active"}))));
        assert!(!filter.matches(&props(json!({"since": 2018, "status": "active"}))));
    }
}
