// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Process-wide anti-abuse state.
//!
//! Built once at startup and shared by every concurrent gate evaluation.
//! Nothing here survives a restart.

use crate::cache::BoundedCache;
use crate::config::{CacheCapacities, GateSettings};
use crate::error::ConfigError;
use crate::follow::FollowStatus;
use crate::memberset::MemberSet;
use chrono::{DateTime, Utc};
use std::num::NonZeroUsize;
use tracing::{info, warn};

/// Key of the per-author, per-content-class delta cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentDeltaKey {
    pub author: i64,
    pub content_class: String,
}

impl ContentDeltaKey {
    pub fn new(author: i64, content_class: impl Into<String>) -> Self {
        Self {
            author,
            content_class: content_class.into(),
        }
    }
}

/// Every cache and membership set the gates share.
#[derive(Debug)]
pub struct CacheSet {
    /// Media URLs already re-broadcast
    pub content_url: BoundedCache<String, ()>,
    /// Last admitted post time per author
    pub post_delta: BoundedCache<i64, DateTime<Utc>>,
    /// Last admitted post time per author and content class
    pub content_delta: BoundedCache<ContentDeltaKey, DateTime<Utc>>,
    /// Recently seen post texts
    pub post_text: BoundedCache<String, ()>,
    /// Resolved follow status per author handle
    pub follow_status: BoundedCache<String, FollowStatus>,
    /// Muted author ids
    pub muted_ids: MemberSet,
    /// Lower-cased handles that must not be mentioned
    pub prohibited_mentions: MemberSet,
    /// Lower-cased words that must not appear
    pub prohibited_words: MemberSet,
}

impl CacheSet {
    /// Empty caches with the given capacities and empty membership sets.
    pub fn new(capacities: &CacheCapacities) -> Result<Self, ConfigError> {
        Ok(Self {
            content_url: BoundedCache::new(capacity("content_url", capacities.content_url)?),
            post_delta: BoundedCache::new(capacity("post_delta", capacities.post_delta)?),
            content_delta: BoundedCache::new(capacity(
                "content_delta",
                capacities.content_delta,
            )?),
            post_text: BoundedCache::new(capacity("post_text", capacities.post_text)?),
            follow_status: BoundedCache::new(capacity(
                "follow_status",
                capacities.follow_status,
            )?),
            muted_ids: MemberSet::new(),
            prohibited_mentions: MemberSet::new(),
            prohibited_words: MemberSet::new(),
        })
    }

    /// Build the caches and load the configured deny lists.
    pub fn from_config(
        capacities: &CacheCapacities,
        settings: &GateSettings,
    ) -> Result<Self, ConfigError> {
        let caches = Self::new(capacities)?;

        for mention in &settings.prohibited_mentions {
            caches.prohibited_mentions.add(mention.to_lowercase());
        }

        for word in &settings.prohibited_words {
            if word.trim().is_empty() {
                warn!(entry = ?word, "Ignoring blank prohibited word; it can never match a token");
                continue;
            }
            caches.prohibited_words.add(word.to_lowercase());
        }

        info!(
            prohibited_mentions = caches.prohibited_mentions.len(),
            prohibited_words = caches.prohibited_words.len(),
            "Anti-abuse caches initialized"
        );
        Ok(caches)
    }
}

fn capacity(name: &'static str, value: usize) -> Result<NonZeroUsize, ConfigError> {
    NonZeroUsize::new(value).ok_or(ConfigError::ZeroCapacity(name))
}
