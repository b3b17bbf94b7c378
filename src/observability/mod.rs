// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Diagnostic and operational log lines are modelled as small message
//! structs implementing `Display` plus `StructuredLog`, so the wording of a
//! log line lives in exactly one place and every event carries the same
//! structured fields wherever it is emitted.
//!
//! # Usage
//!
//! ```rust
//! use the_wayfarer::graph::NodeId;
//! use the_wayfarer::observability::messages::graph::NodeDeleted;
//! use the_wayfarer::observability::messages::StructuredLog;
//!
//! NodeDeleted { node: NodeId(3), edges_removed: 2 }.log();
//! ```

pub mod messages;
