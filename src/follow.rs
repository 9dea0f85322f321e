// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Follow-relationship resolver.
//!
//! Decides whether an author satisfies the follow requirement, consulting
//! the follow-status cache before issuing a live lookup. Live lookups are
//! rate limited remotely, which is why decisions are cached per author.
//!
//! A cached decision outlives a change of follow mode until the entry is
//! evicted.

use crate::cache::BoundedCache;
use crate::error::LookupError;
use crate::event::fold_eq;
use crate::gate::{GateOutcome, RejectReason};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Directional follow facts between two handles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub source_follows_target: bool,
    pub target_follows_source: bool,
}

/// Live relationship query.
#[async_trait]
pub trait RelationshipLookup: Send + Sync {
    /// Look up the relationship between `source` and `target`.
    async fn relationship(&self, source: &str, target: &str) -> Result<Relationship, LookupError>;
}

/// Resolved follow decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FollowStatus {
    Follows,
    DoesNotFollow,
}

impl FollowStatus {
    fn from_bool(follows: bool) -> Self {
        if follows {
            Self::Follows
        } else {
            Self::DoesNotFollow
        }
    }
}

/// Resolves the follow requirement for post authors.
pub struct FollowResolver {
    lookup: Arc<dyn RelationshipLookup>,
    target: String,
    mutual: bool,
}

impl FollowResolver {
    /// `target` is the handle authors must follow; empty disables the requirement.
    pub fn new(lookup: Arc<dyn RelationshipLookup>, target: impl Into<String>, mutual: bool) -> Self {
        Self {
            lookup,
            target: target.into(),
            mutual,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Resolve whether `source` satisfies the follow requirement.
    pub async fn resolve(
        &self,
        source: &str,
        cache: &BoundedCache<String, FollowStatus>,
    ) -> FollowStatus {
        if fold_eq(source, &self.target) {
            debug!(source, "Post originated from the follow target");
            return FollowStatus::Follows;
        }

        if self.target.is_empty() {
            return FollowStatus::Follows;
        }

        if let Some(status) = cache.get(source) {
            debug!(source, ?status, "Follow status cache hit");
            return status;
        }

        debug!(source, target = %self.target, mutual = self.mutual, "Performing live follow check");
        let relationship = match self.lookup.relationship(source, &self.target).await {
            Ok(relationship) => relationship,
            Err(err) => {
                warn!(source, target = %self.target, error = %err, "Relationship lookup failed");
                return FollowStatus::DoesNotFollow;
            }
        };

        let follows = if self.mutual {
            relationship.source_follows_target && relationship.target_follows_source
        } else {
            relationship.source_follows_target
        };
        let status = FollowStatus::from_bool(follows);

        info!(
            source,
            target = %self.target,
            source_follows = relationship.source_follows_target,
            target_follows = relationship.target_follows_source,
            mutual = self.mutual,
            ?status,
            "Follow status resolved"
        );
        cache.add(source.to_string(), status);
        status
    }

    /// Follow-requirement gate.
    pub async fn check(
        &self,
        source: &str,
        cache: &BoundedCache<String, FollowStatus>,
    ) -> GateOutcome {
        let follows = self.resolve(source, cache).await == FollowStatus::Follows;
        GateOutcome::check(follows, RejectReason::NotFollowing)
    }
}
