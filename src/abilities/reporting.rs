// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::engine::AbilityContext;
use crate::errors::AbilityError;
use crate::graph::Location;
use crate::traits::Ability;

/// Options for [`ReportProperty`].
#[derive(Debug, Clone, Deserialize)]
pub struct ReportPropertyConfig {
    pub key: String,
}

/// Reports one property of the current location. Locations without it report nothing.
pub struct ReportProperty {
    config: ReportPropertyConfig,
}

impl ReportProperty {
    pub fn new(config: ReportPropertyConfig) -> Self {
        Self { config }
    }

    pub fn key(key: impl Into<String>) -> Self {
        Self::new(ReportPropertyConfig { key: key.into() })
    }
}

#[async_trait]
impl Ability for ReportProperty {
    async fn run(&self, cx: &mut AbilityContext<'_>) -> Result<(), AbilityError> {
        if let Some(value) = cx.property(&self.config.key)? {
            cx.report(value);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "report_property"
    }
}

/// Options for [`ReportField`].
#[derive(Debug, Clone, Deserialize)]
pub struct ReportFieldConfig {
    pub key: String,
}

/// Reports one field of the visiting walker. A missing field reports `null`.
pub struct ReportField {
    config: ReportFieldConfig,
}

impl ReportField {
    pub fn new(config: ReportFieldConfig) -> Self {
        Self { config }
    }

    pub fn key(key: impl Into<String>) -> Self {
        Self::new(ReportFieldConfig { key: key.into() })
    }
}

#[async_trait]
impl Ability for ReportField {
    async fn run(&self, cx: &mut AbilityContext<'_>) -> Result<(), AbilityError> {
        let value = cx.field(&self.config.key).cloned().unwrap_or(Value::Null);
        cx.report(value);
        Ok(())
    }

    fn name(&self) -> &str {
        "report_field"
    }
}

/// Reports a snapshot of the current node or edge.
pub struct ReportLocation;

impl ReportLocation {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Ability for ReportLocation {
    async fn run(&self, cx: &mut AbilityContext<'_>) -> Result<(), AbilityError> {
        match cx.here() {
            Location::Node(_) => {
                let node = cx.node()?;
                cx.report_serialized(&node)
            }
            Location::Edge(_) => {
                let edge = cx.edge()?;
                cx.report_serialized(&edge)
            }
        }
    }

    fn name(&self) -> &str {
        "report_location"
    }
}

/// Options for [`ReportValue`].
#[derive(Debug, Clone, Deserialize)]
pub struct ReportValueConfig {
    pub value: Value,
}

/// Reports a fixed value. Mostly useful for tracing which abilities fired.
pub struct ReportValue {
    config: ReportValueConfig,
}

impl ReportValue {
    pub fn new(config: ReportValueConfig) -> Self {
        Self { config }
    }

    pub fn value(value: impl Into<Value>) -> Self {
        Self::new(ReportValueConfig {
            value: value.into(),
        })
    }
}

#[async_trait]
impl Ability for ReportValue {
    async fn run(&self, cx: &mut AbilityContext<'_>) -> Result<(), AbilityError> {
        cx.report(self.config.value.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "report_value"
    }
}
