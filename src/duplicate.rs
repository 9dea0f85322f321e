// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Duplicate suppression for post text and re-broadcast media URLs.

use crate::cache::BoundedCache;
use crate::gate::{GateOutcome, RejectReason};
use tracing::info;

/// Reject text seen recently; remember unseen text.
pub fn check_duplicate_text(text: &str, recent: &BoundedCache<String, ()>) -> GateOutcome {
    if recent.add_if_absent(text.to_string(), ()) {
        return GateOutcome::Pass;
    }
    info!(text, "Post text seen recently");
    GateOutcome::Reject(RejectReason::DuplicateText)
}

/// Reject media URLs already re-broadcast; remember new ones.
pub fn check_duplicate_url(url: &str, recent: &BoundedCache<String, ()>) -> GateOutcome {
    if recent.add_if_absent(url.to_string(), ()) {
        return GateOutcome::Pass;
    }
    info!(url, "Media URL already re-broadcast");
    GateOutcome::Reject(RejectReason::DuplicateUrl)
}
