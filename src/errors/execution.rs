// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors produced by ability bodies and by walker runs.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::errors::GraphError;
use crate::graph::{AccessLevel, Location};

/// Error returned from an ability body.
///
/// Graph errors convert with `?`, and so do opaque failures coming back from
/// external calls (anything that converts into `anyhow::Error`).
#[derive(Error, Debug)]
pub enum AbilityError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    External(#[from] anyhow::Error),
}

impl AbilityError {
    pub fn msg(message: impl Into<String>) -> Self {
        AbilityError::Message(message.into())
    }
}

/// Why a run was cut short without an ability failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The caller tripped the cancellation token.
    Token,
    /// The run exceeded its configured timeout.
    Timeout(Duration),
    /// The run drained more queue entries than the configured ceiling.
    StepLimit(usize),
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelReason::Token => write!(f, "cancellation requested by caller"),
            CancelReason::Timeout(limit) => write!(f, "timed out after {:?}", limit),
            CancelReason::StepLimit(limit) => write!(f, "exceeded step limit of {}", limit),
        }
    }
}

/// Error detail attached to a `RunResult` whose status is not a clean exit.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("{0} not found")]
    NotFound(Location),

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("permission denied: {level} access to {target}")]
    PermissionDenied { target: Location, level: AccessLevel },

    #[error("ability '{ability}' failed at {location}: {source}")]
    AbilityFailure {
        ability: String,
        location: Location,
        #[source]
        source: AbilityError,
    },

    #[error("walker run cancelled: {reason}")]
    Cancelled { reason: CancelReason },
}

impl From<GraphError> for ExecutionError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::NotFound(location) => ExecutionError::NotFound(location),
            GraphError::TypeMismatch { expected, found } => {
                ExecutionError::TypeMismatch { expected, found }
            }
            GraphError::PermissionDenied { target, level } => {
                ExecutionError::PermissionDenied { target, level }
            }
            GraphError::PinnedNode(id) => ExecutionError::PermissionDenied {
                target: Location::Node(id),
                level: AccessLevel::Write,
            },
        }
    }
}

impl ExecutionError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ExecutionError::Cancelled { .. })
    }
}
