// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod control;
pub mod counters;
pub mod factory;
pub mod reporting;
pub mod traverse;

pub use control::*;
pub use counters::*;
pub use factory::BuiltinAbilityFactory;
pub use reporting::*;
pub use traverse::*;
