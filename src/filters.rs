// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Deny-list gates: prohibited mentions, prohibited words and muted authors.
//!
//! Text matching is exact after lower-casing. Deny lists are lower-cased
//! when they are loaded (see [`crate::state::CacheSet::from_config`]).

use crate::event::PostEvent;
use crate::gate::{GateOutcome, RejectReason};
use crate::memberset::MemberSet;
use tracing::{debug, info};

/// Reject if any mentioned handle is on the deny list.
pub fn check_prohibited_mentions(event: &PostEvent, prohibited: &MemberSet) -> GateOutcome {
    if prohibited.is_empty() {
        return GateOutcome::Pass;
    }

    for mention in event.mentions() {
        if prohibited.get(mention.screen_name.to_lowercase()) {
            info!(id = event.id, mention = %mention.screen_name, "Prohibited mention");
            return GateOutcome::Reject(RejectReason::ProhibitedMention);
        }
    }
    GateOutcome::Pass
}

/// Reject if any whitespace-separated word is on the deny list.
///
/// Runs of whitespace never produce empty tokens, so a blank deny-list
/// entry cannot match.
pub fn check_prohibited_words(event: &PostEvent, prohibited: &MemberSet) -> GateOutcome {
    if prohibited.is_empty() {
        return GateOutcome::Pass;
    }

    for word in event.text.split_whitespace() {
        if prohibited.get(word.to_lowercase()) {
            info!(id = event.id, word, "Prohibited word");
            return GateOutcome::Reject(RejectReason::ProhibitedWord);
        }
    }
    GateOutcome::Pass
}

/// Reject if the author is muted.
pub fn check_muted(event: &PostEvent, muted_ids: &MemberSet) -> GateOutcome {
    // Membership means muted, which fails the gate.
    if muted_ids.get(event.user.id) {
        info!(id = event.id, author = event.user.id, "Author is muted");
        return GateOutcome::Reject(RejectReason::Muted);
    }
    debug!(author = event.user.id, "Author is not muted");
    GateOutcome::Pass
}
