// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Re-broadcast Gate
//!
//! This crate decides which incoming social media posts are eligible for
//! automated re-broadcast. Each post runs through an ordered chain of
//! anti-abuse gates and is rejected at the first one that fails:
//!
//! - Original content only (no replies, reposts, or ignored authors)
//! - Optional sensitive-content denial
//! - Animated GIF or video attachment required
//! - Prohibited mentions and words
//! - Minimum author account age
//! - Muted authors
//! - Per-author and per-content-class posting deltas
//! - Duplicate text and media URL suppression
//! - Optional follow requirement (one-way or mutual)
//!
//! All cross-event state lives in bounded LRU caches and membership sets
//! owned by a [`CacheSet`], shared by concurrently evaluated events.

pub mod cache;
pub mod chain;
pub mod config;
pub mod content;
pub mod delta;
pub mod dispatch;
pub mod duplicate;
pub mod error;
pub mod event;
pub mod filters;
pub mod fixture;
pub mod follow;
pub mod gate;
pub mod memberset;
pub mod mute;
pub mod state;
pub mod time;

pub use cache::BoundedCache;
pub use chain::{GateChain, Verdict};
pub use config::Config;
pub use dispatch::{DispatchSummary, Dispatcher, Outcome, Rebroadcaster};
pub use error::{GateError, Result};
pub use event::PostEvent;
pub use gate::{ContentClass, GateOutcome, MediaMatch, RejectReason};
pub use memberset::{MemberKey, MemberSet};
pub use state::CacheSet;
