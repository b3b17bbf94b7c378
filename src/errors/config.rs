// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

use thiserror::Error;

use crate::errors::GraphError;

/// Errors that can occur while validating a scenario configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Two fixture nodes share the same key
    DuplicateNodeKey {
        /// The duplicate key
        key: String,
    },
    /// A fixture node tries to redeclare the context root
    ReservedKey {
        /// The reserved key that was redeclared
        key: String,
    },
    /// An edge references a node key that doesn't exist
    UnresolvedEdgeEndpoint {
        /// Position of the edge in the `graph.edges` list
        edge_index: usize,
        /// The endpoint key that couldn't be resolved
        missing_key: String,
    },
    /// A walker type is declared more than once
    DuplicateWalker {
        /// The duplicated walker type
        walker: String,
    },
    /// The spawn section names a walker that has no declaration
    UndeclaredWalker {
        /// The walker type requested by the spawn section
        walker: String,
    },
    /// The spawn section starts at a node key that doesn't exist
    UnresolvedSpawnStart {
        /// The missing start key
        key: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DuplicateNodeKey { key } => {
                write!(f, "Duplicate node key: '{}'", key)
            }
            ValidationError::ReservedKey { key } => {
                write!(f, "Node key '{}' is reserved for the context root", key)
            }
            ValidationError::UnresolvedEdgeEndpoint {
                edge_index,
                missing_key,
            } => {
                write!(
                    f,
                    "Edge #{} references node '{}' which does not exist",
                    edge_index, missing_key
                )
            }
            ValidationError::DuplicateWalker { walker } => {
                write!(f, "Walker '{}' is declared more than once", walker)
            }
            ValidationError::UndeclaredWalker { walker } => {
                write!(f, "Spawn references walker '{}' which is not declared", walker)
            }
            ValidationError::UnresolvedSpawnStart { key } => {
                write!(f, "Spawn starts at node '{}' which does not exist", key)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

fn join_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Errors raised while loading a configuration or building a runtime from it.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Configuration validation failed:\n{}", join_validation_errors(.0))]
    Invalid(Vec<ValidationError>),

    #[error("unknown stock ability '{0}'")]
    UnknownAbility(String),

    #[error("invalid options for ability '{ability}': {reason}")]
    InvalidOptions { ability: String, reason: String },

    #[error("failed to build fixture graph: {0}")]
    Graph(#[from] GraphError),
}
