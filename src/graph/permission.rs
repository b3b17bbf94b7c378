// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Access levels, actors, and the two stock permission gates.
//!
//! The policy engine itself lives outside this crate; anything implementing
//! `PermissionGate` can be plugged into an engine. `AllowAll` is the default,
//! `GrantTable` is a small in-memory policy used by configs and tests.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::GraphError;
use crate::graph::ids::Location;
use crate::traits::PermissionGate;

/// Requested or granted access. Levels are ordered: a grant of `Write`
/// satisfies `Connect` and `Read` requests, `Connect` satisfies `Read`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    None,
    Read,
    Connect,
    Write,
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AccessLevel::None => "none",
            AccessLevel::Read => "read",
            AccessLevel::Connect => "connect",
            AccessLevel::Write => "write",
        };
        f.write_str(name)
    }
}

/// Whoever a walker run acts on behalf of.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Actor(String);

impl Actor {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ask `gate` and turn a refusal into `PermissionDenied`.
pub fn require(
    gate: &dyn PermissionGate,
    actor: &Actor,
    target: Location,
    level: AccessLevel,
) -> Result<(), GraphError> {
    if gate.allowed(actor, target, level) {
        Ok(())
    } else {
        Err(GraphError::PermissionDenied { target, level })
    }
}

/// Grants every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl PermissionGate for AllowAll {
    fn allowed(&self, _actor: &Actor, _target: Location, _level: AccessLevel) -> bool {
        true
    }
}

/// Per-actor, per-location grants on top of a default level.
#[derive(Debug)]
pub struct GrantTable {
    default_level: AccessLevel,
    grants: DashMap<(Actor, Location), AccessLevel>,
}

impl GrantTable {
    pub fn new(default_level: AccessLevel) -> Self {
        Self {
            default_level,
            grants: DashMap::new(),
        }
    }

    pub fn grant(&self, actor: &Actor, target: impl Into<Location>, level: AccessLevel) {
        self.grants.insert((actor.clone(), target.into()), level);
    }

    pub fn revoke(&self, actor: &Actor, target: impl Into<Location>) {
        self.grants.remove(&(actor.clone(), target.into()));
    }

    pub fn level_for(&self, actor: &Actor, target: Location) -> AccessLevel {
        self.grants
            .get(&(actor.clone(), target))
            .map(|level| *level)
            .unwrap_or(self.default_level)
    }
}

impl PermissionGate for GrantTable {
    fn allowed(&self, actor: &Actor, target: Location, level: AccessLevel) -> bool {
        level == AccessLevel::None || self.level_for(actor, target) >= level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ids::NodeId;

    #[test]
    fn test_access_levels_are_ordered() {
        assert!(AccessLevel::Write > AccessLevel::Connect);
        assert!(AccessLevel::Connect > AccessLevel::Read);
        assert!(AccessLevel::Read > AccessLevel::None);
    }

    #[test]
    fn test_grant_table_uses_default_and_overrides() {
        let table = GrantTable::new(AccessLevel::Read);
        let alice = Actor::new("alice");
        let node = Location::Node(NodeId(1));

        assert!(table.allowed(&alice, node, AccessLevel::Read));
        assert!(!table.allowed(&alice, node, AccessLevel::Write));

        table.grant(&alice, NodeId(1), AccessLevel::Write);
        assert!(table.allowed(&alice, node, AccessLevel::Connect));

        table.grant(&alice, NodeId(1), AccessLevel::None);
        assert!(!table.allowed(&alice, node, AccessLevel::Read));
        assert!(table.allowed(&alice, node, AccessLevel::None));

        table.revoke(&alice, NodeId(1));
        assert_eq!(table.level_for(&alice, node), AccessLevel::Read);
    }

    #[test]
    fn test_require_maps_refusal_to_permission_denied() {
        let table = GrantTable::new(AccessLevel::None);
        let err = require(&table, &Actor::new("bob"), Location::Node(NodeId(2)), AccessLevel::Read)
            .unwrap_err();
        assert_eq!(
            err,
            GraphError::PermissionDenied {
                target: Location::Node(NodeId(2)),
                level: AccessLevel::Read,
            }
        );
        assert!(require(&AllowAll, &Actor::new("bob"), Location::Node(NodeId(2)), AccessLevel::Write).is_ok());
    }
}
