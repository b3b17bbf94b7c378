use crate::graph::{AccessLevel, Actor, Location};

/// Externally supplied access policy, consulted before a traversal step,
/// query result or mutation touches a node or edge.
pub trait PermissionGate: Send + Sync {
    fn allowed(&self, actor: &Actor, target: Location, level: AccessLevel) -> bool;
}
