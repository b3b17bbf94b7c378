// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for walker run lifecycle and traversal events.
//!
//! This module contains message types for logging events related to:
//! * Walker spawn and exit
//! * Ability failures
//! * Queue entries skipped because they went stale or were denied
//! * Cancellation

use crate::engine::RunStatus;
use crate::errors::CancelReason;
use crate::graph::{Actor, Location, NodeId};
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Walker spawned at a start node.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_wayfarer::graph::NodeId;
/// use the_wayfarer::observability::messages::walker::WalkerSpawned;
///
/// let msg = WalkerSpawned {
///     walker_type: "Collector",
///     start: NodeId(1),
///     tenant: "default",
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct WalkerSpawned<'a> {
    pub walker_type: &'a str,
    pub start: NodeId,
    pub tenant: &'a str,
}

impl Display for WalkerSpawned<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Walker '{}' spawned at {} for tenant '{}'",
            self.walker_type, self.start, self.tenant
        )
    }
}

impl StructuredLog for WalkerSpawned<'_> {
    fn log(&self) {
        tracing::info!(
            walker_type = self.walker_type,
            start = %self.start,
            tenant = self.tenant,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "walker_run",
            span_name = name,
            walker_type = self.walker_type,
            start = %self.start,
            tenant = self.tenant,
        )
    }
}

/// Walker run reached `Exited`.
///
/// # Log Level
/// `info!` for clean exits, `warn!` for failed or cancelled runs
pub struct WalkerExited<'a> {
    pub walker_type: &'a str,
    pub status: RunStatus,
    pub report_count: usize,
    pub steps: usize,
    pub duration: std::time::Duration,
}

impl Display for WalkerExited<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Walker '{}' exited {:?} after {} steps in {:?} with {} reports",
            self.walker_type, self.status, self.steps, self.duration, self.report_count
        )
    }
}

impl StructuredLog for WalkerExited<'_> {
    fn log(&self) {
        match self.status {
            RunStatus::Completed | RunStatus::Disengaged => tracing::info!(
                walker_type = self.walker_type,
                status = ?self.status,
                report_count = self.report_count,
                steps = self.steps,
                duration_ms = self.duration.as_millis() as u64,
                "{}", self
            ),
            RunStatus::Failed | RunStatus::Cancelled => tracing::warn!(
                walker_type = self.walker_type,
                status = ?self.status,
                report_count = self.report_count,
                steps = self.steps,
                duration_ms = self.duration.as_millis() as u64,
                "{}", self
            ),
        }
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "walker_exited",
            span_name = name,
            walker_type = self.walker_type,
            status = ?self.status,
            steps = self.steps,
        )
    }
}

/// Ability body returned an error; the run aborts.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct AbilityFailed<'a> {
    pub ability: &'a str,
    pub location: Location,
    pub error: &'a dyn std::error::Error,
}

impl Display for AbilityFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Ability '{}' failed at {}: {}",
            self.ability, self.location, self.error
        )
    }
}

impl StructuredLog for AbilityFailed<'_> {
    fn log(&self) {
        tracing::error!(
            ability = self.ability,
            location = %self.location,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "ability_failed",
            span_name = name,
            ability = self.ability,
            location = %self.location,
        )
    }
}

/// Queue entry no longer resolves (deleted mid-traversal) and was skipped.
///
/// # Log Level
/// `debug!` - Recovered locally
pub struct StaleEntrySkipped<'a> {
    pub walker_type: &'a str,
    pub location: Location,
}

impl Display for StaleEntrySkipped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Walker '{}' skipped stale queue entry {}",
            self.walker_type, self.location
        )
    }
}

impl StructuredLog for StaleEntrySkipped<'_> {
    fn log(&self) {
        tracing::debug!(
            walker_type = self.walker_type,
            location = %self.location,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "stale_entry_skipped",
            span_name = name,
            location = %self.location,
        )
    }
}

/// Queue entry the acting actor may not read; skipped silently.
///
/// # Log Level
/// `debug!` - Filtered, not an error
pub struct LocationDenied<'a> {
    pub walker_type: &'a str,
    pub location: Location,
    pub actor: &'a Actor,
}

impl Display for LocationDenied<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Walker '{}' may not enter {} as '{}'",
            self.walker_type, self.location, self.actor
        )
    }
}

impl StructuredLog for LocationDenied<'_> {
    fn log(&self) {
        tracing::debug!(
            walker_type = self.walker_type,
            location = %self.location,
            actor = %self.actor,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "location_denied",
            span_name = name,
            location = %self.location,
        )
    }
}

/// Run stopped between queue iterations by cancellation, timeout or step ceiling.
///
/// # Log Level
/// `warn!` - Run did not finish
///
/// # Example
/// ```
/// use the_wayfarer::errors::CancelReason;
/// use the_wayfarer::observability::messages::walker::RunCancelled;
///
/// let msg = RunCancelled { walker_type: "Crawler", reason: CancelReason::StepLimit(100) };
/// assert_eq!(msg.to_string(), "Walker 'Crawler' cancelled: exceeded step limit of 100");
/// ```
pub struct RunCancelled<'a> {
    pub walker_type: &'a str,
    pub reason: CancelReason,
}

impl Display for RunCancelled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Walker '{}' cancelled: {}", self.walker_type, self.reason)
    }
}

impl StructuredLog for RunCancelled<'_> {
    fn log(&self) {
        tracing::warn!(
            walker_type = self.walker_type,
            reason = %self.reason,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "run_cancelled",
            span_name = name,
            walker_type = self.walker_type,
            reason = %self.reason,
        )
    }
}
