// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::config::Config;
use crate::dispatch::DispatchTable;
use crate::engine::scheduler::{SchedulerOptions, WalkerScheduler};
use crate::graph::{AllowAll, GraphStore};
use crate::traits::PermissionGate;

/// Factory for creating walker schedulers from configuration
pub struct SchedulerFactory;

impl SchedulerFactory {
    /// Scheduler options from the `engine` section
    pub fn options(cfg: &Config) -> SchedulerOptions {
        SchedulerOptions {
            timeout: cfg.engine.timeout(),
            dispatch_order: cfg.engine.dispatch_order,
            max_steps: cfg.engine.max_steps,
        }
    }

    /// Create a scheduler with no access control
    pub fn from_config(cfg: &Config, graph: Arc<GraphStore>, dispatch: DispatchTable) -> WalkerScheduler {
        Self::from_config_with_gate(cfg, graph, dispatch, Arc::new(AllowAll))
    }

    pub fn from_config_with_gate(
        cfg: &Config,
        graph: Arc<GraphStore>,
        dispatch: DispatchTable,
        gate: Arc<dyn PermissionGate>,
    ) -> WalkerScheduler {
        WalkerScheduler::with_gate(graph, dispatch, gate, Self::options(cfg))
    }
}
