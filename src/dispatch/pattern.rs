// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Dispatch keys: phases, the two pattern kinds, and firing order.

use serde::{Deserialize, Serialize};

use crate::graph::{LocationKind, TypeTag};

/// When an ability fires.
///
/// `Entry` fires each time the walker's location becomes a matching node or
/// edge. `Exit` fires once, when the walker is about to leave the graph after
/// its queue drains, against its final location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Entry,
    Exit,
}

/// Which participant an ability belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Walker,
    Location,
}

/// Firing order between the two sides of one encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchOrder {
    /// The node or edge reacts first, then the visiting walker.
    #[default]
    LocationFirst,
    WalkerFirst,
}

/// The location half of a walker-side key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationPattern {
    /// Nodes or edges of exactly this archetype.
    Type(TypeTag),
    AnyNode,
    AnyEdge,
    Any,
    /// The context Root, only at the spawn step of a run that starts there.
    Root,
}

impl LocationPattern {
    pub fn of(type_tag: impl Into<TypeTag>) -> Self {
        LocationPattern::Type(type_tag.into())
    }

    pub fn matches(&self, encounter: &Encounter<'_>) -> bool {
        match self {
            LocationPattern::Type(tag) => tag == encounter.location_type,
            LocationPattern::AnyNode => encounter.kind == LocationKind::Node,
            LocationPattern::AnyEdge => encounter.kind == LocationKind::Edge,
            LocationPattern::Any => true,
            LocationPattern::Root => encounter.at_spawn_root,
        }
    }
}

/// The walker half of a location-side key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitorPattern {
    Type(TypeTag),
    Any,
}

impl VisitorPattern {
    pub fn of(type_tag: impl Into<TypeTag>) -> Self {
        VisitorPattern::Type(type_tag.into())
    }

    pub fn matches(&self, walker_type: &TypeTag) -> bool {
        match self {
            VisitorPattern::Type(tag) => tag == walker_type,
            VisitorPattern::Any => true,
        }
    }
}

/// One walker meeting one location in one phase.
#[derive(Debug, Clone, Copy)]
pub struct Encounter<'a> {
    pub walker_type: &'a TypeTag,
    pub location_type: &'a TypeTag,
    pub kind: LocationKind,
    pub phase: Phase,
    pub at_spawn_root: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encounter<'a>(walker: &'a TypeTag, location: &'a TypeTag, kind: LocationKind) -> Encounter<'a> {
        Encounter {
            walker_type: walker,
            location_type: location,
            kind,
            phase: Phase::Entry,
            at_spawn_root: false,
        }
    }

    #[test]
    fn test_location_patterns() {
        let walker = TypeTag::from("Visitor");
        let person = TypeTag::from("Person");
        let at_node = encounter(&walker, &person, LocationKind::Node);
        let at_edge = encounter(&walker, &person, LocationKind::Edge);

        assert!(LocationPattern::of("Person").matches(&at_node));
        assert!(!LocationPattern::of("Pet").matches(&at_node));
        assert!(LocationPattern::AnyNode.matches(&at_node));
        assert!(!LocationPattern::AnyNode.matches(&at_edge));
        assert!(LocationPattern::AnyEdge.matches(&at_edge));
        assert!(LocationPattern::Any.matches(&at_edge));
        assert!(!LocationPattern::Root.matches(&at_node));
        assert!(LocationPattern::Root.matches(&Encounter { at_spawn_root: true, ..at_node }));
    }

    #[test]
    fn test_visitor_patterns() {
        let walker = TypeTag::from("Visitor");
        assert!(VisitorPattern::Any.matches(&walker));
        assert!(VisitorPattern::of("Visitor").matches(&walker));
        assert!(!VisitorPattern::of("Other").matches(&walker));
    }

    #[test]
    fn test_patterns_deserialize_from_yaml() {
        let typed: LocationPattern = serde_yaml::from_str("type: Person").unwrap();
        assert_eq!(typed, LocationPattern::of("Person"));
        let any: LocationPattern = serde_yaml::from_str("any_node").unwrap();
        assert_eq!(any, LocationPattern::AnyNode);
        let order: DispatchOrder = serde_yaml::from_str("walker_first").unwrap();
        assert_eq!(order, DispatchOrder::WalkerFirst);
    }
}
