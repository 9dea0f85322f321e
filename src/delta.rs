// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Time-based gates: account age and posting deltas.
//!
//! The delta gates measure time using the event's own creation timestamp,
//! never the wall clock, so replayed or delayed events are judged by when
//! they were posted. Only admitted posts refresh the recorded time.

use crate::cache::BoundedCache;
use crate::config::GateSettings;
use crate::error::Result;
use crate::event::PostEvent;
use crate::gate::{ContentClass, GateOutcome, RejectReason};
use crate::state::ContentDeltaKey;
use crate::time::{account_age, elapsed_since, event_time};
use chrono::{DateTime, Duration, Utc};
use std::hash::Hash;
use tracing::{debug, info};

/// Reject authors whose account is not older than `min_age` at `now`.
pub fn check_account_age(
    event: &PostEvent,
    min_age: Duration,
    now: DateTime<Utc>,
) -> Result<GateOutcome> {
    if min_age <= Duration::zero() {
        return Ok(GateOutcome::Pass);
    }

    let age = account_age(&event.user.created_at, now)?;
    debug!(
        author = %event.user.screen_name,
        account_age_hours = age.num_hours(),
        min_age_hours = min_age.num_hours(),
        "Checking account age"
    );

    if age > min_age {
        return Ok(GateOutcome::Pass);
    }
    info!(author = %event.user.screen_name, "Account is not older than required");
    Ok(GateOutcome::Reject(RejectReason::TooYoung))
}

/// Rate limit one content class per author.
pub fn check_content_delta(
    event: &PostEvent,
    class: ContentClass,
    settings: &GateSettings,
    cache: &BoundedCache<ContentDeltaKey, DateTime<Utc>>,
) -> Result<GateOutcome> {
    if !settings.is_delta_gated(class.label()) {
        return Ok(GateOutcome::Pass);
    }

    let posted_at = event_time(&event.created_at)?;
    let key = ContentDeltaKey::new(event.user.id, class.label());
    let admitted = admit_after_delta(cache, key, posted_at, settings.content_delta());
    debug!(
        author = %event.user.screen_name,
        class = %class,
        admitted,
        "Content delta"
    );
    Ok(GateOutcome::check(admitted, RejectReason::ContentDelta))
}

/// Rate limit all posts per author.
pub fn check_post_delta(
    event: &PostEvent,
    settings: &GateSettings,
    cache: &BoundedCache<i64, DateTime<Utc>>,
) -> Result<GateOutcome> {
    let posted_at = event_time(&event.created_at)?;
    let admitted = admit_after_delta(cache, event.user.id, posted_at, settings.post_delta());
    debug!(author = %event.user.screen_name, admitted, "Post delta");
    Ok(GateOutcome::check(admitted, RejectReason::PostDelta))
}

/// Admit and record `posted_at` on a miss, or when at least `delta` has
/// passed since the recorded time. Otherwise leave the record untouched.
fn admit_after_delta<K: Hash + Eq>(
    cache: &BoundedCache<K, DateTime<Utc>>,
    key: K,
    posted_at: DateTime<Utc>,
    delta: Duration,
) -> bool {
    cache.add_if(key, posted_at, |last| elapsed_since(*last, posted_at) >= delta)
}
