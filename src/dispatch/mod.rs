// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Data-driven ability dispatch for walker/location encounters.

pub mod pattern;
pub mod table;

pub use pattern::{DispatchOrder, Encounter, LocationPattern, Phase, Side, VisitorPattern};
pub use table::{DispatchKey, DispatchTable, Resolved};
