// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Per-event dispatch.
//!
//! Every incoming event is evaluated on its own task so a slow relationship
//! lookup never holds up ingestion. Admitted events go through the
//! duplicate-URL gate before the re-broadcast action runs.

use crate::chain::{GateChain, Verdict};
use crate::error::{GateError, RebroadcastError, Result};
use crate::event::PostEvent;
use crate::gate::{GateOutcome, MediaMatch, RejectReason};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tracing::{error, info, info_span, warn, Instrument};

/// Re-broadcast action for admitted events.
#[async_trait]
pub trait Rebroadcaster: Send + Sync {
    async fn rebroadcast(
        &self,
        event: &PostEvent,
        media: &MediaMatch,
    ) -> std::result::Result<(), RebroadcastError>;
}

/// What happened to one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Re-broadcast (or already re-broadcast remotely).
    Rebroadcast(MediaMatch),
    /// Admitted, but test mode skipped the action.
    Skipped(MediaMatch),
    Rejected(RejectReason),
}

/// Tally of a dispatcher run.
#[derive(Debug, Clone, Default)]
pub struct DispatchSummary {
    pub seen: usize,
    pub rebroadcast: usize,
    pub skipped: usize,
    pub rejected: HashMap<RejectReason, usize>,
}

impl DispatchSummary {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Rebroadcast(_) => self.rebroadcast += 1,
            Outcome::Skipped(_) => self.skipped += 1,
            Outcome::Rejected(reason) => *self.rejected.entry(*reason).or_default() += 1,
        }
    }

    /// Rejections with the given reason.
    pub fn rejected_for(&self, reason: RejectReason) -> usize {
        self.rejected.get(&reason).copied().unwrap_or(0)
    }

    /// Events admitted by the chain and the duplicate-URL gate.
    pub fn admitted(&self) -> usize {
        self.rebroadcast + self.skipped
    }
}

/// Evaluate one event and, if admitted, re-broadcast it.
pub async fn process_event(
    chain: &GateChain,
    rebroadcaster: &dyn Rebroadcaster,
    event: &PostEvent,
) -> Result<Outcome> {
    let media = match chain.evaluate(event).await? {
        Verdict::Admit(media) => media,
        Verdict::Reject(reason) => return Ok(Outcome::Rejected(reason)),
    };

    if let GateOutcome::Reject(reason) = chain.claim_url(&media) {
        return Ok(Outcome::Rejected(reason));
    }

    if chain.config().test_mode {
        warn!(id = event.id, url = %media.url, "Test mode; event was not re-broadcast");
        return Ok(Outcome::Skipped(media));
    }

    match rebroadcaster.rebroadcast(event, &media).await {
        Ok(()) => {
            info!(id = event.id, class = %media.class, "Re-broadcast");
            Ok(Outcome::Rebroadcast(media))
        }
        Err(err) if err.is_recoverable() => {
            warn!(id = event.id, error = %err, "Recovered from re-broadcast error");
            Ok(Outcome::Rebroadcast(media))
        }
        Err(err) => Err(GateError::Rebroadcast(err)),
    }
}

/// Fans incoming events out to one task each.
pub struct Dispatcher {
    chain: Arc<GateChain>,
    rebroadcaster: Arc<dyn Rebroadcaster>,
}

impl Dispatcher {
    pub fn new(chain: Arc<GateChain>, rebroadcaster: Arc<dyn Rebroadcaster>) -> Self {
        Self {
            chain,
            rebroadcaster,
        }
    }

    /// Dispatch events until the channel closes and every task finished.
    ///
    /// Returns early on the first fatal error or failed task; in-flight
    /// tasks are aborted.
    pub async fn run(&self, mut events: mpsc::Receiver<PostEvent>) -> Result<DispatchSummary> {
        let mut tasks = JoinSet::new();
        let mut summary = DispatchSummary::default();

        loop {
            tokio::select! {
                received = events.recv() => match received {
                    Some(event) => {
                        summary.seen += 1;
                        self.spawn(&mut tasks, event);
                    }
                    None => break,
                },
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    Self::collect(joined, &mut summary)?;
                }
            }
        }

        while let Some(joined) = tasks.join_next().await {
            Self::collect(joined, &mut summary)?;
        }

        info!(
            seen = summary.seen,
            rebroadcast = summary.rebroadcast,
            skipped = summary.skipped,
            "Event stream finished"
        );
        Ok(summary)
    }

    fn spawn(&self, tasks: &mut JoinSet<Result<Outcome>>, event: PostEvent) {
        let chain = Arc::clone(&self.chain);
        let rebroadcaster = Arc::clone(&self.rebroadcaster);
        let span = info_span!("event", id = event.id, author = %event.user.screen_name);

        tasks.spawn(
            async move { process_event(&chain, rebroadcaster.as_ref(), &event).await }
                .instrument(span),
        );
    }

    fn collect(
        joined: std::result::Result<Result<Outcome>, JoinError>,
        summary: &mut DispatchSummary,
    ) -> Result<()> {
        match joined {
            Ok(Ok(outcome)) => {
                summary.record(&outcome);
                Ok(())
            }
            Ok(Err(err)) => {
                error!(error = %err, "Fatal error while processing event");
                Err(err)
            }
            Err(join_err) => {
                error!(error = %join_err, "Event task failed");
                Err(GateError::Task(join_err))
            }
        }
    }
}
