// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Messages are organized by subsystem:
//!
//! * `graph` - store mutations
//! * `walker` - walker run lifecycle and traversal events
//! * `validation` - configuration validation warnings and errors

use tracing::Span;

pub mod graph;
pub mod validation;
pub mod walker;

/// A log message that knows its own level and structured fields.
pub trait StructuredLog {
    /// Emit the message as an event at its natural level.
    fn log(&self);

    /// Build a span carrying the same fields.
    fn span(&self, name: &str) -> Span;
}
