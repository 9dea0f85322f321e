// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Shared helpers for the integration and abuse tests.
//!
//! Each test binary uses a different subset of the helpers.
#![allow(dead_code)]

pub mod generators;

use rebroadcast_gate::{
    chain::GateChain, config::Config, fixture::FixtureRelationships, state::CacheSet,
};
use std::sync::Arc;

/// Build a gate chain with fresh caches from `config`.
pub fn build_chain(config: Config, lookup: Arc<FixtureRelationships>) -> Arc<GateChain> {
    let caches = CacheSet::from_config(&config.caches, &config.settings)
        .expect("test configuration has non-zero capacities");
    Arc::new(GateChain::new(Arc::new(config), Arc::new(caches), lookup))
}

/// Build a gate chain whose follow lookups always report no relationship.
pub fn default_chain(config: Config) -> Arc<GateChain> {
    build_chain(config, Arc::new(FixtureRelationships::new()))
}
