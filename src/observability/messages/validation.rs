// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for configuration validation warnings and errors.
//!
//! This module contains message types for logging events related to:
//! * Fixture graph validation
//! * Duplicate node key detection
//! * Unresolved edge endpoint detection
//! * Validation start, completion and failure

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Duplicate node key detected in the fixture graph.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use the_wayfarer::observability::messages::validation::DuplicateNodeKey;
///
/// let msg = DuplicateNodeKey { key: "alice" };
///
/// tracing::error!("{}", msg);
/// ```
pub struct DuplicateNodeKey<'a> {
    pub key: &'a str,
}

impl Display for DuplicateNodeKey<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Duplicate node key: '{}'", self.key)
    }
}

impl StructuredLog for DuplicateNodeKey<'_> {
    fn log(&self) {
        tracing::error!(key = self.key, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(tracing::Level::ERROR, "span_name", name = name, key = self.key)
    }
}

/// Edge endpoint references a node key that is not declared.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct UnresolvedEdgeEndpoint<'a> {
    pub edge_index: usize,
    pub missing_key: &'a str,
}

impl Display for UnresolvedEdgeEndpoint<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Edge #{} references missing node '{}'",
            self.edge_index, self.missing_key
        )
    }
}

impl StructuredLog for UnresolvedEdgeEndpoint<'_> {
    fn log(&self) {
        tracing::error!(
            edge_index = self.edge_index,
            missing_key = self.missing_key,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "span_name",
            name = name,
            edge_index = self.edge_index,
            missing_key = self.missing_key,
        )
    }
}

/// Configuration validation started.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ValidationStarted {
    pub node_count: usize,
    pub edge_count: usize,
}

impl Display for ValidationStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting configuration validation for {} nodes and {} edges",
            self.node_count, self.edge_count
        )
    }
}

impl StructuredLog for ValidationStarted {
    fn log(&self) {
        tracing::info!(
            node_count = self.node_count,
            edge_count = self.edge_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::INFO,
            "span_name",
            name = name,
            node_count = self.node_count,
            edge_count = self.edge_count,
        )
    }
}

/// Configuration validation completed successfully.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_wayfarer::observability::messages::validation::ValidationCompleted;
///
/// let msg = ValidationCompleted {
///     node_count: 4,
///     walker_count: 1,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ValidationCompleted {
    pub node_count: usize,
    pub walker_count: usize,
}

impl Display for ValidationCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Configuration validation completed successfully for {} nodes and {} walkers",
            self.node_count, self.walker_count
        )
    }
}

impl StructuredLog for ValidationCompleted {
    fn log(&self) {
        tracing::info!(
            node_count = self.node_count,
            walker_count = self.walker_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::INFO,
            "span_name",
            name = name,
            node_count = self.node_count,
            walker_count = self.walker_count,
        )
    }
}

/// Configuration validation failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ValidationFailed {
    pub error_count: usize,
}

impl Display for ValidationFailed {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Configuration validation failed with {} errors",
            self.error_count
        )
    }
}

impl StructuredLog for ValidationFailed {
    fn log(&self) {
        tracing::error!(
            error_count = self.error_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "span_name",
            name = name,
            error_count = self.error_count,
        )
    }
}
