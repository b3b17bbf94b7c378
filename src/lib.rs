// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod abilities;  // stock abilities + factory
pub mod config;     // yaml config + runtime builder
pub mod dispatch;   // ability dispatch tables
pub mod engine;     // walker scheduler
pub mod errors;     // error handling
pub mod graph;      // node/edge store and queries
pub mod observability;
pub mod traits;     // unified abstractions
