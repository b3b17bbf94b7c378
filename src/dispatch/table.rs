// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The two dispatch maps.
//!
//! Walker-side abilities are keyed by `(walker type, phase)` and carry a
//! `LocationPattern`; location-side abilities are keyed by
//! `(node or edge type, phase)` and carry a `VisitorPattern`. Resolving an
//! encounter looks up both keys, keeps the bindings whose pattern matches,
//! and concatenates the two lists in the requested `DispatchOrder`. Within a
//! side, bindings fire in registration order.
//!
//! An encounter matching nothing resolves to an empty list; the scheduler
//! just moves on.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::dispatch::pattern::{DispatchOrder, Encounter, LocationPattern, Phase, Side, VisitorPattern};
use crate::graph::{Properties, TypeTag};
use crate::traits::Ability;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DispatchKey {
    pub owner: TypeTag,
    pub phase: Phase,
}

impl DispatchKey {
    pub fn new(owner: impl Into<TypeTag>, phase: Phase) -> Self {
        Self {
            owner: owner.into(),
            phase,
        }
    }
}

#[derive(Clone)]
struct WalkerBinding {
    pattern: LocationPattern,
    ability: Arc<dyn Ability>,
}

#[derive(Clone)]
struct LocationBinding {
    visitor: VisitorPattern,
    ability: Arc<dyn Ability>,
}

/// An ability selected for an encounter.
#[derive(Clone)]
pub struct Resolved {
    pub side: Side,
    pub ability: Arc<dyn Ability>,
}

impl fmt::Debug for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolved")
            .field("side", &self.side)
            .field("ability", &self.ability.name())
            .finish()
    }
}

#[derive(Clone, Default)]
pub struct DispatchTable {
    walker_side: HashMap<DispatchKey, Vec<WalkerBinding>>,
    location_side: HashMap<DispatchKey, Vec<LocationBinding>>,
    walkers: HashMap<TypeTag, Properties>,
}

impl DispatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a walker archetype and the default values of its fields.
    ///
    /// Spawning a declared walker rejects fields the declaration doesn't name.
    pub fn declare_walker(&mut self, walker: impl Into<TypeTag>, defaults: Properties) -> &mut Self {
        self.walkers.insert(walker.into(), defaults);
        self
    }

    pub fn walker_declaration(&self, walker: &TypeTag) -> Option<&Properties> {
        self.walkers.get(walker)
    }

    /// Register a walker-side ability.
    pub fn on_walker(
        &mut self,
        walker: impl Into<TypeTag>,
        pattern: LocationPattern,
        phase: Phase,
        ability: Arc<dyn Ability>,
    ) -> &mut Self {
        self.walker_side
            .entry(DispatchKey::new(walker, phase))
            .or_default()
            .push(WalkerBinding { pattern, ability });
        self
    }

    /// Register a node- or edge-side ability.
    pub fn on_location(
        &mut self,
        location_type: impl Into<TypeTag>,
        visitor: VisitorPattern,
        phase: Phase,
        ability: Arc<dyn Ability>,
    ) -> &mut Self {
        self.location_side
            .entry(DispatchKey::new(location_type, phase))
            .or_default()
            .push(LocationBinding { visitor, ability });
        self
    }

    pub fn resolve(&self, encounter: &Encounter<'_>, order: DispatchOrder) -> Vec<Resolved> {
        let walker_key = DispatchKey::new(encounter.walker_type, encounter.phase);
        let walker_side = self
            .walker_side
            .get(&walker_key)
            .into_iter()
            .flatten()
            .filter(|binding| binding.pattern.matches(encounter))
            .map(|binding| Resolved {
                side: Side::Walker,
                ability: binding.ability.clone(),
            });

        let location_key = DispatchKey::new(encounter.location_type, encounter.phase);
        let location_side = self
            .location_side
            .get(&location_key)
            .into_iter()
            .flatten()
            .filter(|binding| binding.visitor.matches(encounter.walker_type))
            .map(|binding| Resolved {
                side: Side::Location,
                ability: binding.ability.clone(),
            });

        match order {
            DispatchOrder::LocationFirst => location_side.chain(walker_side).collect(),
            DispatchOrder::WalkerFirst => walker_side.chain(location_side).collect(),
        }
    }

    pub fn ability_count(&self) -> usize {
        self.walker_side.values().map(Vec::len).sum::<usize>()
            + self.location_side.values().map(Vec::len).sum::<usize>()
    }
}

impl fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchTable")
            .field("walker_keys", &self.walker_side.keys().collect::<Vec<_>>())
            .field("location_keys", &self.location_side.keys().collect::<Vec<_>>())
            .field("declared_walkers", &self.walkers.keys().collect::<Vec<_>>())
            .finish()
    }
}
