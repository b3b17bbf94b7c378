// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-run walker instance.
//!
//! A `WalkerState` is created by the scheduler at spawn time, lent to each
//! ability as it fires, and consumed when the run exits. Nothing outside the
//! run ever holds it.

use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

use crate::engine::report::ReportCollector;
use crate::engine::visit_queue::VisitQueue;
use crate::graph::{Archetype, Location, Properties, TypeTag};

/// `Spawned` -> `Active` -> `Exited`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    Spawned,
    Active,
    Exited,
}

#[derive(Debug)]
pub struct WalkerState {
    type_tag: TypeTag,
    fields: Properties,
    queue: VisitQueue,
    reports: ReportCollector,
    current: Location,
    ignored: HashSet<Location>,
    lifecycle: Lifecycle,
    disengaged: bool,
    exiting: bool,
    skip_requested: bool,
}

impl WalkerState {
    pub(crate) fn spawn(type_tag: TypeTag, fields: Properties, start: Location) -> Self {
        Self {
            type_tag,
            fields,
            queue: VisitQueue::new(),
            reports: ReportCollector::new(),
            current: start,
            ignored: HashSet::new(),
            lifecycle: Lifecycle::Spawned,
            disengaged: false,
            exiting: false,
            skip_requested: false,
        }
    }

    pub fn current(&self) -> Location {
        self.current
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn queue(&self) -> &VisitQueue {
        &self.queue
    }

    pub fn report_count(&self) -> usize {
        self.reports.len()
    }

    pub fn is_disengaged(&self) -> bool {
        self.disengaged
    }

    pub fn is_ignored(&self, location: &Location) -> bool {
        self.ignored.contains(location)
    }

    pub(crate) fn activate(&mut self) {
        self.lifecycle = Lifecycle::Active;
    }

    pub(crate) fn move_to(&mut self, location: Location) {
        self.current = location;
    }

    pub(crate) fn next_location(&mut self) -> Option<Location> {
        self.queue.pop()
    }

    pub(crate) fn has_queued(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Enqueue at the back, dropping ignored locations. Returns how many were queued.
    /// Nothing is queued once the walker has disengaged or started its Exit phase.
    pub(crate) fn enqueue(&mut self, locations: impl IntoIterator<Item = Location>) -> usize {
        if self.disengaged || self.exiting {
            return 0;
        }
        let before = self.queue.len();
        let ignored = &self.ignored;
        self.queue
            .extend(locations.into_iter().filter(|location| !ignored.contains(location)));
        self.queue.len() - before
    }

    pub(crate) fn ignore(&mut self, locations: impl IntoIterator<Item = Location>) {
        self.ignored.extend(locations);
    }

    pub(crate) fn report(&mut self, value: Value) {
        if !self.disengaged {
            self.reports.push(value);
        }
    }

    pub(crate) fn disengage(&mut self) {
        self.disengaged = true;
        self.queue.clear();
    }

    /// The queue has drained; only Exit abilities remain.
    pub(crate) fn begin_exit(&mut self) {
        self.exiting = true;
    }

    pub(crate) fn request_skip(&mut self) {
        self.skip_requested = true;
    }

    pub(crate) fn take_skip(&mut self) -> bool {
        std::mem::take(&mut self.skip_requested)
    }

    pub(crate) fn fields_mut(&mut self) -> &mut Properties {
        &mut self.fields
    }

    /// Consume the instance, keeping what the caller gets back.
    pub(crate) fn exit(mut self) -> (Properties, ReportCollector) {
        self.lifecycle = Lifecycle::Exited;
        self.queue.clear();
        (self.fields, self.reports)
    }
}

impl Archetype for WalkerState {
    fn type_tag(&self) -> &TypeTag {
        &self.type_tag
    }

    fn properties(&self) -> &Properties {
        &self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeId;
    use serde_json::json;

    fn walker() -> WalkerState {
        WalkerState::spawn("Visitor".into(), Properties::new(), Location::Node(NodeId(1)))
    }

    #[test]
    fn test_enqueue_drops_ignored_locations() {
        let mut w = walker();
        w.ignore([Location::Node(NodeId(3))]);

        let queued = w.enqueue([Location::Node(NodeId(2)), Location::Node(NodeId(3))]);

        assert_eq!(queued, 1);
        assert_eq!(w.next_location(), Some(Location::Node(NodeId(2))));
        assert_eq!(w.next_location(), None);
    }

    #[test]
    fn test_disengage_clears_queue_and_silences_reports() {
        let mut w = walker();
        w.enqueue([Location::Node(NodeId(2))]);
        w.report(json!("before"));

        w.disengage();
        w.report(json!("after"));

        assert_eq!(w.enqueue([Location::Node(NodeId(4))]), 0);
        assert!(!w.has_queued());
        let (_, reports) = w.exit();
        assert_eq!(reports.finish().as_slice(), &[json!("before")]);
    }

    #[test]
    fn test_enqueue_is_refused_during_exit() {
        let mut w = walker();
        w.activate();
        w.begin_exit();

        assert_eq!(w.enqueue([Location::Node(NodeId(2))]), 0);
        assert!(!w.has_queued());
    }

    #[test]
    fn test_lifecycle_and_skip_flag() {
        let mut w = walker();
        assert_eq!(w.lifecycle(), Lifecycle::Spawned);
        w.activate();
        assert_eq!(w.lifecycle(), Lifecycle::Active);

        w.request_skip();
        assert!(w.take_skip());
        assert!(!w.take_skip());
    }
}
