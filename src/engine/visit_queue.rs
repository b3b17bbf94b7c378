// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! FIFO visit queue owned by one walker instance.
//!
//! Locations are drained in the order they were enqueued, across however many
//! `visit` calls and abilities produced them. Nothing is validated on the way
//! in: entries can go stale while they wait, and the scheduler checks each
//! one as it comes off the front.
//!
//! # Examples
//!
//! ```rust
//! use the_wayfarer::engine::VisitQueue;
//! use the_wayfarer::graph::{Location, NodeId};
//!
//! let mut queue = VisitQueue::new();
//! queue.push(Location::Node(NodeId(2)));
//! queue.extend([Location::Node(NodeId(3)), Location::Node(NodeId(4))]);
//!
//! assert_eq!(queue.pop(), Some(Location::Node(NodeId(2))));
//! assert_eq!(queue.len(), 2);
//! queue.clear();
//! assert!(queue.is_empty());
//! ```

use std::collections::VecDeque;

use crate::graph::Location;

#[derive(Debug, Clone, Default)]
pub struct VisitQueue {
    entries: VecDeque<Location>,
}

impl VisitQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, location: Location) {
        self.entries.push_back(location);
    }

    pub fn extend(&mut self, locations: impl IntoIterator<Item = Location>) {
        self.entries.extend(locations);
    }

    pub fn pop(&mut self) -> Option<Location> {
        self.entries.pop_front()
    }

    pub fn peek(&self) -> Option<&Location> {
        self.entries.front()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeId, NodeId};

    #[test]
    fn test_fifo_across_pushes() {
        let mut queue = VisitQueue::new();
        queue.extend([Location::Node(NodeId(1)), Location::Node(NodeId(2))]);
        queue.push(Location::Edge(EdgeId(9)));
        queue.extend([Location::Node(NodeId(3))]);

        let drained: Vec<_> = std::iter::from_fn(|| queue.pop()).collect();
        assert_eq!(
            drained,
            vec![
                Location::Node(NodeId(1)),
                Location::Node(NodeId(2)),
                Location::Edge(EdgeId(9)),
                Location::Node(NodeId(3)),
            ]
        );
        assert_eq!(queue.peek(), None);
    }
}
