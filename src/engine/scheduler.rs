// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Walker scheduler: spawns walkers and drives each run to `Exited`.
//!
//! # Run Loop
//!
//! ```text
//! spawn(start) ──► Entry abilities at start ──► pop queue ──► Entry abilities ──┐
//!                                                  ▲                              │
//!                                                  └──────────── queue non-empty ◄┘
//!                                                               queue empty
//!                                                                   │
//!                                                     Exit abilities at final location
//! ```
//!
//! Each popped entry is checked before the walker moves:
//!
//! - **Ignored** locations are dropped.
//! - **Stale** entries (deleted since they were queued) are skipped and logged.
//! - **Unreadable** locations (the gate refuses `Read`) are skipped and logged.
//!
//! # Dispatch
//!
//! At every location the [`DispatchTable`] resolves the location-side and
//! walker-side abilities for the encounter, ordered by
//! [`SchedulerOptions::dispatch_order`]. Abilities fire one at a time and are
//! awaited before the next one starts. After each ability the scheduler
//! checks, in order, for disengage, skip and deletion of the current
//! location.
//!
//! An ability that returns an error or panics fails the run. A panic is
//! caught at the ability boundary and reported as an ability failure.
//!
//! # Cancellation
//!
//! A run stops with [`RunStatus::Cancelled`] when its `CancellationToken`
//! fires, when the configured timeout elapses, or when it would enter more
//! locations than `max_steps`. Token and timeout also interrupt an ability
//! that is suspended on external work. Reports collected so far are kept.
//!
//! # Concurrency
//!
//! The scheduler is cheap to clone and every run owns its walker instance, so
//! independent spawns can run on separate tokio tasks against the same
//! [`GraphStore`]. Graph writes are serialized per element by the store.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::dispatch::{DispatchOrder, DispatchTable, Encounter, Phase, Resolved};
use crate::engine::context::AbilityContext;
use crate::engine::report::Reports;
use crate::engine::result::{RunResult, RunStatus};
use crate::engine::walker::WalkerState;
use crate::errors::{AbilityError, CancelReason, ExecutionError, GraphError};
use crate::graph::{
    AccessLevel, AllowAll, Archetype, ContextRegistry, ExecutionContext, GraphStore, Location,
    NodeId, Properties, TypeTag,
};
use crate::observability::messages::walker::{
    AbilityFailed, LocationDenied, RunCancelled, StaleEntrySkipped, WalkerExited, WalkerSpawned,
};
use crate::observability::messages::StructuredLog;
use crate::traits::PermissionGate;

/// Knobs applied to every run started by one scheduler.
#[derive(Debug, Clone, Default)]
pub struct SchedulerOptions {
    /// Wall-clock limit for a single run.
    pub timeout: Option<Duration>,
    pub dispatch_order: DispatchOrder,
    /// Most locations one run may enter, the spawn location included.
    pub max_steps: Option<usize>,
}

struct Inner {
    graph: Arc<GraphStore>,
    dispatch: DispatchTable,
    gate: Arc<dyn PermissionGate>,
    options: SchedulerOptions,
    contexts: ContextRegistry,
}

#[derive(Clone)]
pub struct WalkerScheduler {
    inner: Arc<Inner>,
}

/// Why the run loop stopped early.
enum Halt {
    Disengaged,
    Failed(ExecutionError),
    Cancelled(CancelReason),
}

/// Token and deadline shared by one run.
struct Guard {
    token: CancellationToken,
    deadline: Option<(Instant, Duration)>,
}

impl Guard {
    fn check(&self) -> Result<(), CancelReason> {
        if self.token.is_cancelled() {
            return Err(CancelReason::Token);
        }
        match self.deadline {
            Some((deadline, timeout)) if Instant::now() >= deadline => {
                Err(CancelReason::Timeout(timeout))
            }
            _ => Ok(()),
        }
    }

    /// Await `work` unless the token or the deadline fires first.
    async fn race<F: Future>(&self, work: F) -> Result<F::Output, CancelReason> {
        let deadline = async {
            match self.deadline {
                Some((deadline, timeout)) => {
                    tokio::time::sleep_until(deadline).await;
                    timeout
                }
                None => std::future::pending::<Duration>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(CancelReason::Token),
            timeout = deadline => Err(CancelReason::Timeout(timeout)),
            output = work => Ok(output),
        }
    }
}

impl WalkerScheduler {
    /// Scheduler with default options and no access control.
    pub fn new(graph: Arc<GraphStore>, dispatch: DispatchTable) -> Self {
        Self::with_gate(graph, dispatch, Arc::new(AllowAll), SchedulerOptions::default())
    }

    pub fn with_gate(
        graph: Arc<GraphStore>,
        dispatch: DispatchTable,
        gate: Arc<dyn PermissionGate>,
        options: SchedulerOptions,
    ) -> Self {
        let contexts = ContextRegistry::new(graph.clone());
        Self {
            inner: Arc::new(Inner {
                graph,
                dispatch,
                gate,
                options,
                contexts,
            }),
        }
    }

    pub fn graph(&self) -> &Arc<GraphStore> {
        &self.inner.graph
    }

    pub fn dispatch(&self) -> &DispatchTable {
        &self.inner.dispatch
    }

    pub fn options(&self) -> &SchedulerOptions {
        &self.inner.options
    }

    pub fn contexts(&self) -> &ContextRegistry {
        &self.inner.contexts
    }

    /// Open (or reopen) the execution context of `tenant`.
    pub fn open_context(&self, tenant: &str) -> ExecutionContext {
        self.inner.contexts.open(tenant)
    }

    /// Spawn `walker_type` at `start` and run it to completion.
    pub async fn spawn(
        &self,
        context: &ExecutionContext,
        walker_type: impl Into<TypeTag>,
        start: NodeId,
        fields: Properties,
    ) -> RunResult {
        self.spawn_with_token(context, walker_type, start, fields, CancellationToken::new())
            .await
    }

    /// Like [`spawn`](Self::spawn), stopping early when `token` is cancelled.
    pub async fn spawn_with_token(
        &self,
        context: &ExecutionContext,
        walker_type: impl Into<TypeTag>,
        start: NodeId,
        fields: Properties,
        token: CancellationToken,
    ) -> RunResult {
        let walker_type = walker_type.into();
        let spawned = WalkerSpawned {
            walker_type: walker_type.as_str(),
            start,
            tenant: context.tenant(),
        };
        let span = spawned.span("spawn");
        spawned.log();

        self.run(context, walker_type, start, fields, token)
            .instrument(span)
            .await
    }

    /// Run a walker on its own tokio task.
    pub fn spawn_detached(
        &self,
        context: ExecutionContext,
        walker_type: impl Into<TypeTag>,
        start: NodeId,
        fields: Properties,
        token: CancellationToken,
    ) -> JoinHandle<RunResult> {
        let scheduler = self.clone();
        let walker_type = walker_type.into();
        tokio::spawn(async move {
            scheduler
                .spawn_with_token(&context, walker_type, start, fields, token)
                .await
        })
    }

    async fn run(
        &self,
        context: &ExecutionContext,
        walker_type: TypeTag,
        start: NodeId,
        fields: Properties,
        token: CancellationToken,
    ) -> RunResult {
        let started = Instant::now();

        let mut walker = match self.prepare(context, &walker_type, start, fields) {
            Ok(walker) => walker,
            Err((fields, err)) => {
                return finish(
                    walker_type,
                    RunStatus::Failed,
                    Some(err),
                    fields,
                    Reports::default(),
                    0,
                    started,
                );
            }
        };

        let guard = Guard {
            token,
            deadline: self
                .inner
                .options
                .timeout
                .map(|timeout| (started + timeout, timeout)),
        };

        let mut steps = 0;
        let outcome = self.drive(context, &mut walker, &guard, &mut steps).await;

        let (status, error) = match outcome {
            Ok(()) => (RunStatus::Completed, None),
            Err(Halt::Disengaged) => (RunStatus::Disengaged, None),
            Err(Halt::Failed(err)) => (RunStatus::Failed, Some(err)),
            Err(Halt::Cancelled(reason)) => {
                RunCancelled {
                    walker_type: walker_type.as_str(),
                    reason,
                }
                .log();
                (RunStatus::Cancelled, Some(ExecutionError::Cancelled { reason }))
            }
        };

        let (final_fields, reports) = walker.exit();
        finish(walker_type, status, error, final_fields, reports.finish(), steps, started)
    }

    /// Build the walker instance, or explain why it cannot be spawned.
    fn prepare(
        &self,
        context: &ExecutionContext,
        walker_type: &TypeTag,
        start: NodeId,
        fields: Properties,
    ) -> Result<WalkerState, (Properties, ExecutionError)> {
        let fields = match self.inner.dispatch.walker_declaration(walker_type) {
            None => fields,
            Some(defaults) => {
                if let Some(unknown) = fields.keys().find(|key| !defaults.contains_key(*key)) {
                    let err = ExecutionError::TypeMismatch {
                        expected: format!("a field declared by walker '{}'", walker_type),
                        found: format!("undeclared field '{}'", unknown),
                    };
                    return Err((fields, err));
                }
                let mut merged = defaults.clone();
                merged.extend(fields);
                merged
            }
        };

        let location = Location::Node(start);
        if !self.inner.graph.contains(location) {
            return Err((fields, ExecutionError::NotFound(location)));
        }
        if !self
            .inner
            .gate
            .allowed(context.actor(), location, AccessLevel::Read)
        {
            let err = GraphError::PermissionDenied {
                target: location,
                level: AccessLevel::Read,
            };
            return Err((fields, err.into()));
        }

        Ok(WalkerState::spawn(walker_type.clone(), fields, location))
    }

    async fn drive(
        &self,
        context: &ExecutionContext,
        walker: &mut WalkerState,
        guard: &Guard,
        steps: &mut usize,
    ) -> Result<(), Halt> {
        walker.activate();
        *steps = 1;
        let at_spawn_root = walker.current() == Location::Node(context.root());
        self.fire(context, walker, Phase::Entry, at_spawn_root, guard)
            .await?;

        while walker.has_queued() {
            guard.check().map_err(Halt::Cancelled)?;

            let Some(next) = walker.next_location() else {
                break;
            };
            if walker.is_ignored(&next) {
                continue;
            }
            if !self.inner.graph.contains(next) {
                StaleEntrySkipped {
                    walker_type: walker.type_tag().as_str(),
                    location: next,
                }
                .log();
                continue;
            }
            if !self
                .inner
                .gate
                .allowed(context.actor(), next, AccessLevel::Read)
            {
                LocationDenied {
                    walker_type: walker.type_tag().as_str(),
                    location: next,
                    actor: context.actor(),
                }
                .log();
                continue;
            }
            if let Some(max_steps) = self.inner.options.max_steps {
                if *steps >= max_steps {
                    return Err(Halt::Cancelled(CancelReason::StepLimit(max_steps)));
                }
            }

            walker.move_to(next);
            *steps += 1;
            self.fire(context, walker, Phase::Entry, false, guard).await?;
        }

        walker.begin_exit();
        self.fire(context, walker, Phase::Exit, false, guard).await
    }

    /// Fire every ability resolved for the walker's current location.
    async fn fire(
        &self,
        context: &ExecutionContext,
        walker: &mut WalkerState,
        phase: Phase,
        at_spawn_root: bool,
        guard: &Guard,
    ) -> Result<(), Halt> {
        let here = walker.current();
        let Ok(location_type) = self.inner.graph.type_of(here) else {
            return Ok(());
        };

        let resolved = self.inner.dispatch.resolve(
            &Encounter {
                walker_type: walker.type_tag(),
                location_type: &location_type,
                kind: here.kind(),
                phase,
                at_spawn_root,
            },
            self.inner.options.dispatch_order,
        );

        walker.take_skip();
        for Resolved { side, ability } in resolved {
            let outcome = {
                let mut cx = AbilityContext::new(
                    walker,
                    &self.inner.graph,
                    self.inner.gate.as_ref(),
                    context,
                    side,
                    phase,
                );
                guard
                    .race(AssertUnwindSafe(ability.run(&mut cx)).catch_unwind())
                    .await
            };

            match outcome {
                Err(reason) => return Err(Halt::Cancelled(reason)),
                Ok(Err(payload)) => {
                    let source = AbilityError::msg(panic_message(payload.as_ref()));
                    return Err(Halt::Failed(ability_failure(ability.name(), here, source)));
                }
                Ok(Ok(Err(source))) => {
                    return Err(Halt::Failed(ability_failure(ability.name(), here, source)))
                }
                Ok(Ok(Ok(()))) => {}
            }

            if walker.is_disengaged() {
                return Err(Halt::Disengaged);
            }
            if walker.take_skip() || !self.inner.graph.contains(here) {
                break;
            }
        }
        Ok(())
    }
}

fn finish(
    walker_type: TypeTag,
    status: RunStatus,
    error: Option<ExecutionError>,
    final_fields: Properties,
    reports: Reports,
    steps: usize,
    started: Instant,
) -> RunResult {
    let duration = started.elapsed();
    WalkerExited {
        walker_type: walker_type.as_str(),
        status,
        report_count: reports.len(),
        steps,
        duration,
    }
    .log();

    RunResult {
        walker_type,
        status,
        reports,
        final_fields,
        error,
        steps,
        duration,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|message| message.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    format!("ability panicked: {}", detail)
}

fn ability_failure(ability: &str, location: Location, source: AbilityError) -> ExecutionError {
    AbilityFailed {
        ability,
        location,
        error: &source,
    }
    .log();
    ExecutionError::AbilityFailure {
        ability: ability.to_string(),
        location,
        source,
    }
}

impl std::fmt::Debug for WalkerScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalkerScheduler")
            .field("dispatch", &self.inner.dispatch)
            .field("options", &self.inner.options)
            .finish()
    }
}
