// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde::Deserialize;

use crate::engine::AbilityContext;
use crate::errors::AbilityError;
use crate::graph::PropertyFilter;
use crate::traits::Ability;

/// Options for [`DisengageWhen`].
#[derive(Debug, Clone, Deserialize)]
pub struct DisengageWhenConfig {
    pub filter: PropertyFilter,
    /// Property of the matching location to report before stopping.
    pub report: Option<String>,
}

/// Stops the walk at the first location whose properties match `filter`.
pub struct DisengageWhen {
    config: DisengageWhenConfig,
}

impl DisengageWhen {
    pub fn new(config: DisengageWhenConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Ability for DisengageWhen {
    async fn run(&self, cx: &mut AbilityContext<'_>) -> Result<(), AbilityError> {
        let properties = cx.location_properties()?;
        if !self.config.filter.matches(&properties) {
            return Ok(());
        }
        if let Some(value) = self
            .config
            .report
            .as_ref()
            .and_then(|key| properties.get(key))
        {
            cx.report(value.clone());
        }
        cx.disengage();
        Ok(())
    }

    fn name(&self) -> &str {
        "disengage_when"
    }
}

/// Options for [`SkipWhen`].
#[derive(Debug, Clone, Deserialize)]
pub struct SkipWhenConfig {
    pub filter: PropertyFilter,
}

/// Skips the remaining abilities at locations matching `filter`.
pub struct SkipWhen {
    config: SkipWhenConfig,
}

impl SkipWhen {
    pub fn new(config: SkipWhenConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Ability for SkipWhen {
    async fn run(&self, cx: &mut AbilityContext<'_>) -> Result<(), AbilityError> {
        if self.config.filter.matches(&cx.location_properties()?) {
            cx.skip();
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "skip_when"
    }
}

/// Marks the current location as ignored, so later visits never return to it.
/// Registered first on a location, it turns any walk into a cycle-safe one.
pub struct IgnoreHere;

#[async_trait]
impl Ability for IgnoreHere {
    async fn run(&self, cx: &mut AbilityContext<'_>) -> Result<(), AbilityError> {
        let here = cx.here();
        cx.ignore([here]);
        Ok(())
    }

    fn name(&self) -> &str {
        "ignore_here"
    }
}

/// Stops the walk unconditionally.
pub struct Disengage;

#[async_trait]
impl Ability for Disengage {
    async fn run(&self, cx: &mut AbilityContext<'_>) -> Result<(), AbilityError> {
        cx.disengage();
        Ok(())
    }

    fn name(&self) -> &str {
        "disengage"
    }
}
