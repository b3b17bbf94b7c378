// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;

use super::control::*;
use super::counters::*;
use super::reporting::*;
use super::traverse::*;
use crate::errors::ConfigError;
use crate::traits::Ability;

/// Ability options as they appear in configuration.
pub type AbilityOptions = HashMap<String, serde_yaml::Value>;

/// Factory for the stock abilities that configuration files can name.
pub struct BuiltinAbilityFactory;

impl BuiltinAbilityFactory {
    /// Create an ability instance from its configured name and options.
    ///
    /// - "report_property" -> ReportProperty (`key`)
    /// - "report_field" -> ReportField (`key`)
    /// - "report_location" -> ReportLocation
    /// - "report_value" -> ReportValue (`value`)
    /// - "visit_edges" -> VisitEdges (`direction`, `edge_type`, `node_type`, `edge_filter`, `node_filter`)
    /// - "disengage" -> Disengage
    /// - "disengage_when" -> DisengageWhen (`filter`, `report`)
    /// - "skip_when" -> SkipWhen (`filter`)
    /// - "ignore_here" -> IgnoreHere
    /// - "increment_field" -> IncrementField (`key`, `by`)
    /// - "increment_property" -> IncrementProperty (`key`, `by`)
    pub fn create(name: &str, options: &AbilityOptions) -> Result<Arc<dyn Ability>, ConfigError> {
        match name {
            "report_property" => Ok(Arc::new(ReportProperty::new(parse_options(name, options)?))),
            "report_field" => Ok(Arc::new(ReportField::new(parse_options(name, options)?))),
            "report_location" => Ok(Arc::new(ReportLocation::new())),
            "report_value" => Ok(Arc::new(ReportValue::new(parse_options(name, options)?))),

            "visit_edges" => Ok(Arc::new(VisitEdges::new(parse_options(name, options)?))),

            "disengage" => Ok(Arc::new(Disengage)),
            "disengage_when" => Ok(Arc::new(DisengageWhen::new(parse_options(name, options)?))),
            "skip_when" => Ok(Arc::new(SkipWhen::new(parse_options(name, options)?))),
            "ignore_here" => Ok(Arc::new(IgnoreHere)),

            "increment_field" => Ok(Arc::new(IncrementField::new(parse_options(name, options)?))),
            "increment_property" => {
                Ok(Arc::new(IncrementProperty::new(parse_options(name, options)?)))
            }

            _ => Err(ConfigError::UnknownAbility(name.to_string())),
        }
    }

    /// List all stock ability names
    pub fn list_available_abilities() -> Vec<&'static str> {
        vec![
            "report_property",
            "report_field",
            "report_location",
            "report_value",
            "visit_edges",
            "disengage",
            "disengage_when",
            "skip_when",
            "ignore_here",
            "increment_field",
            "increment_property",
        ]
    }

    pub fn is_ability_available(name: &str) -> bool {
        Self::list_available_abilities().contains(&name)
    }
}

/// Deserialize an options map into the ability's config struct.
fn parse_options<T: DeserializeOwned>(ability: &str, options: &AbilityOptions) -> Result<T, ConfigError> {
    let mapping: serde_yaml::Mapping = options
        .iter()
        .map(|(key, value)| (serde_yaml::Value::String(key.clone()), value.clone()))
        .collect();
    serde_yaml::from_value(serde_yaml::Value::Mapping(mapping)).map_err(|e| {
        ConfigError::InvalidOptions {
            ability: ability.to_string(),
            reason: e.to_string(),
        }
    })
}
