// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! The ordered admission gate chain.
//!
//! Gates run strictly in [`Gate::ORDER`] and the chain stops at the first
//! rejection, reporting only that reason. Evaluations of different events
//! may run concurrently; all shared state lives in [`CacheSet`].

use crate::config::Config;
use crate::content::{check_original, check_sensitivity, match_media};
use crate::delta::{check_account_age, check_content_delta, check_post_delta};
use crate::duplicate::{check_duplicate_text, check_duplicate_url};
use crate::error::Result;
use crate::event::PostEvent;
use crate::filters::{check_muted, check_prohibited_mentions, check_prohibited_words};
use crate::follow::{FollowResolver, RelationshipLookup};
use crate::gate::{Gate, GateOutcome, MediaMatch, RejectReason};
use crate::state::CacheSet;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};

/// Progress of one event through the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainState {
    Pending,
    Admitted(MediaMatch),
    Rejected(RejectReason),
}

impl ChainState {
    /// Apply one gate outcome. Only a pending chain moves.
    fn advance(self, outcome: GateOutcome) -> Self {
        match (self, outcome) {
            (ChainState::Pending, GateOutcome::Reject(reason)) => ChainState::Rejected(reason),
            (state, _) => state,
        }
    }

    /// Conclude after the gate list. A chain still pending passed every
    /// gate, so it is admitted with the matched media.
    fn conclude(self, matched: std::result::Result<MediaMatch, RejectReason>) -> Verdict {
        match (self, matched) {
            (ChainState::Admitted(found), _) | (ChainState::Pending, Ok(found)) => {
                Verdict::Admit(found)
            }
            (ChainState::Rejected(reason), _) | (ChainState::Pending, Err(reason)) => {
                Verdict::Reject(reason)
            }
        }
    }
}

/// Final decision for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Every gate passed; the discovered media is reported back.
    Admit(MediaMatch),
    Reject(RejectReason),
}

impl Verdict {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Verdict::Admit(_))
    }

    pub fn reason(&self) -> Option<RejectReason> {
        match self {
            Verdict::Admit(_) => None,
            Verdict::Reject(reason) => Some(*reason),
        }
    }
}

/// Shared admission pipeline.
pub struct GateChain {
    config: Arc<Config>,
    caches: Arc<CacheSet>,
    follow: FollowResolver,
}

impl GateChain {
    pub fn new(
        config: Arc<Config>,
        caches: Arc<CacheSet>,
        lookup: Arc<dyn RelationshipLookup>,
    ) -> Self {
        let follow = FollowResolver::new(
            lookup,
            config.settings.must_follow.clone(),
            config.settings.mutual_follow,
        );
        Self {
            config,
            caches,
            follow,
        }
    }

    pub fn caches(&self) -> &Arc<CacheSet> {
        &self.caches
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Evaluate an event against the wall clock.
    pub async fn evaluate(&self, event: &PostEvent) -> Result<Verdict> {
        self.evaluate_at(event, Utc::now()).await
    }

    /// Evaluate an event, using `now` for the account-age gate.
    ///
    /// Errors are systemic (an unparseable origin timestamp) and must halt
    /// processing; an ordinary rejection is a `Verdict::Reject`.
    pub async fn evaluate_at(&self, event: &PostEvent, now: DateTime<Utc>) -> Result<Verdict> {
        // Pure lookup; its verdict is reported at the media gate's position.
        let matched = match_media(event);
        let mut state = ChainState::Pending;

        for gate in Gate::ORDER {
            let outcome = self.run_gate(gate, event, &matched, now).await?;
            debug!(id = event.id, gate = gate.name(), pass = outcome.is_pass(), "Gate evaluated");

            state = state.advance(outcome);
            if state != ChainState::Pending {
                break;
            }
        }

        let verdict = state.conclude(matched);
        match &verdict {
            Verdict::Admit(found) => {
                info!(id = event.id, class = %found.class, url = %found.url, "Event admitted");
            }
            Verdict::Reject(reason) => {
                info!(id = event.id, author = %event.user.screen_name, reason = reason.code(), "Event rejected");
            }
        }
        Ok(verdict)
    }

    /// Run one gate. `matched` is the media lookup for this event; the
    /// media-dependent gates report its reason when nothing matched.
    async fn run_gate(
        &self,
        gate: Gate,
        event: &PostEvent,
        matched: &std::result::Result<MediaMatch, RejectReason>,
        now: DateTime<Utc>,
    ) -> Result<GateOutcome> {
        let settings = &self.config.settings;
        let caches = &self.caches;

        let outcome = match gate {
            Gate::Original => check_original(event, settings),
            Gate::Sensitivity => check_sensitivity(event, settings),
            Gate::MediaMatch => match matched {
                Ok(_) => GateOutcome::Pass,
                Err(reason) => GateOutcome::Reject(*reason),
            },
            Gate::ProhibitedMention => {
                check_prohibited_mentions(event, &caches.prohibited_mentions)
            }
            Gate::ProhibitedWord => check_prohibited_words(event, &caches.prohibited_words),
            Gate::AccountAge => check_account_age(event, settings.min_account_age(), now)?,
            Gate::Mute => check_muted(event, &caches.muted_ids),
            Gate::ContentDelta => match matched {
                Ok(found) => {
                    check_content_delta(event, found.class, settings, &caches.content_delta)?
                }
                Err(reason) => GateOutcome::Reject(*reason),
            },
            Gate::PostDelta => check_post_delta(event, settings, &caches.post_delta)?,
            Gate::DuplicateText => check_duplicate_text(&event.text, &caches.post_text),
            Gate::FollowRequirement => {
                self.follow
                    .check(&event.user.screen_name, &caches.follow_status)
                    .await
            }
        };
        Ok(outcome)
    }

    /// Duplicate-URL gate for the re-broadcast target of an admitted event.
    pub fn claim_url(&self, media: &MediaMatch) -> GateOutcome {
        check_duplicate_url(&media.url, &self.caches.content_url)
    }
}
