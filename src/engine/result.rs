// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Serialize;
use std::time::Duration;

use crate::engine::report::Reports;
use crate::errors::ExecutionError;
use crate::graph::{Properties, TypeTag};

/// How a walker run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// The visit queue drained.
    Completed,
    /// An ability called `disengage`.
    Disengaged,
    /// An ability returned an error, or the spawn was rejected.
    Failed,
    /// The token was cancelled, the timeout elapsed, or the step limit was hit.
    Cancelled,
}

impl RunStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::Disengaged)
    }
}

/// Everything a caller gets back from one spawn.
///
/// Reports collected before a failure or cancellation are kept.
#[derive(Debug)]
pub struct RunResult {
    pub walker_type: TypeTag,
    pub status: RunStatus,
    pub reports: Reports,
    pub final_fields: Properties,
    pub error: Option<ExecutionError>,
    pub steps: usize,
    pub duration: Duration,
}

impl RunResult {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Reports on success, the error otherwise.
    pub fn into_result(self) -> Result<Reports, ExecutionError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.reports),
        }
    }
}
