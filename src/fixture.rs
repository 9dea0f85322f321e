// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Deterministic collaborators.
//!
//! Stand-ins for the remote relationship and muted-list lookups, used by
//! the tests and by the replay binary.

use crate::error::LookupError;
use crate::follow::{Relationship, RelationshipLookup};
use crate::mute::{MutedPage, MutedSource};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// One known relationship, as stored in a fixture file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipEntry {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub source_follows_target: bool,
    #[serde(default)]
    pub target_follows_source: bool,
}

/// Relationship lookup backed by a fixed table.
///
/// Unknown pairs resolve to "nobody follows anybody".
#[derive(Debug, Default)]
pub struct FixtureRelationships {
    table: HashMap<(String, String), Relationship>,
    failure: Option<LookupError>,
    calls: AtomicUsize,
}

impl FixtureRelationships {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from fixture file entries.
    pub fn from_entries(entries: impl IntoIterator<Item = RelationshipEntry>) -> Self {
        entries.into_iter().fold(Self::new(), |fixture, entry| {
            fixture.with(
                &entry.source,
                &entry.target,
                entry.source_follows_target,
                entry.target_follows_source,
            )
        })
    }

    pub fn with(
        mut self,
        source: &str,
        target: &str,
        source_follows_target: bool,
        target_follows_source: bool,
    ) -> Self {
        self.table.insert(
            (source.to_string(), target.to_string()),
            Relationship {
                source_follows_target,
                target_follows_source,
            },
        );
        self
    }

    /// Fail every lookup with `error`.
    pub fn failing(mut self, error: LookupError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Number of lookups issued so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RelationshipLookup for FixtureRelationships {
    async fn relationship(&self, source: &str, target: &str) -> Result<Relationship, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        Ok(self
            .table
            .get(&(source.to_string(), target.to_string()))
            .copied()
            .unwrap_or_default())
    }
}

/// Muted-list source serving pre-built pages keyed by cursor.
#[derive(Debug, Default)]
pub struct FixtureMutedSource {
    pages: HashMap<Option<String>, MutedPage>,
}

impl FixtureMutedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single page holding every id.
    pub fn single(ids: Vec<i64>) -> Self {
        Self::new().page(None, ids, "0")
    }

    /// Serve `ids` at `cursor`, pointing at `next_cursor`.
    pub fn page(mut self, cursor: Option<&str>, ids: Vec<i64>, next_cursor: &str) -> Self {
        self.pages.insert(
            cursor.map(str::to_string),
            MutedPage {
                ids,
                next_cursor: next_cursor.to_string(),
            },
        );
        self
    }
}

#[async_trait]
impl MutedSource for FixtureMutedSource {
    async fn muted_page(&self, cursor: Option<&str>) -> Result<MutedPage, LookupError> {
        self.pages
            .get(&cursor.map(str::to_string))
            .cloned()
            .ok_or_else(|| LookupError::Unavailable(format!("no page at cursor {:?}", cursor)))
    }
}
