// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Report collection for one walker run.

use serde::Serialize;
use serde_json::Value;

/// Append-only buffer, written by `report` calls while the run is active.
#[derive(Debug, Default)]
pub struct ReportCollector {
    values: Vec<Value>,
}

impl ReportCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Seal the buffer once the run has exited.
    pub fn finish(self) -> Reports {
        Reports(self.values)
    }
}

/// The ordered reports of a finished run.
///
/// Read-only: values can be inspected in place or consumed once.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Reports(Vec<Value>);

impl Reports {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }

    pub fn first(&self) -> Option<&Value> {
        self.0.first()
    }
}

impl IntoIterator for Reports {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reports_keep_append_order() {
        let mut collector = ReportCollector::new();
        collector.push(json!("first"));
        collector.push(json!(2));
        collector.push(json!({"third": true}));

        let reports = collector.finish();
        assert_eq!(reports.len(), 3);
        assert_eq!(reports.first(), Some(&json!("first")));
        let values: Vec<Value> = reports.into_iter().collect();
        assert_eq!(values, vec![json!("first"), json!(2), json!({"third": true})]);
    }
}
