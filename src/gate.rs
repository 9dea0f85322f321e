// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Shared vocabulary of the admission gates.

use crate::event::fold_eq;
use serde::Serialize;

/// The admission gates, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Original,
    Sensitivity,
    MediaMatch,
    ProhibitedMention,
    ProhibitedWord,
    AccountAge,
    Mute,
    ContentDelta,
    PostDelta,
    DuplicateText,
    FollowRequirement,
}

impl Gate {
    /// Fixed evaluation order of the chain.
    pub const ORDER: [Gate; 11] = [
        Gate::Original,
        Gate::Sensitivity,
        Gate::MediaMatch,
        Gate::ProhibitedMention,
        Gate::ProhibitedWord,
        Gate::AccountAge,
        Gate::Mute,
        Gate::ContentDelta,
        Gate::PostDelta,
        Gate::DuplicateText,
        Gate::FollowRequirement,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Sensitivity => "sensitivity",
            Self::MediaMatch => "media_match",
            Self::ProhibitedMention => "prohibited_mention",
            Self::ProhibitedWord => "prohibited_word",
            Self::AccountAge => "account_age",
            Self::Mute => "mute",
            Self::ContentDelta => "content_delta",
            Self::PostDelta => "post_delta",
            Self::DuplicateText => "duplicate_text",
            Self::FollowRequirement => "follow_requirement",
        }
    }
}

/// Why an event was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RejectReason {
    NonOriginal,
    Sensitive,
    NoMatch,
    ProhibitedMention,
    ProhibitedWord,
    TooYoung,
    Muted,
    ContentDelta,
    PostDelta,
    DuplicateText,
    NotFollowing,
    DuplicateUrl,
}

impl RejectReason {
    /// Stable reason code for logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NonOriginal => "non-original",
            Self::Sensitive => "sensitive",
            Self::NoMatch => "no_match",
            Self::ProhibitedMention => "prohibited_mention",
            Self::ProhibitedWord => "prohibited_word",
            Self::TooYoung => "too_young",
            Self::Muted => "muted",
            Self::ContentDelta => "content_delta",
            Self::PostDelta => "post_delta",
            Self::DuplicateText => "duplicate_text",
            Self::NotFollowing => "not_following",
            Self::DuplicateUrl => "duplicate_url",
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Result of a single gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    Pass,
    Reject(RejectReason),
}

impl GateOutcome {
    /// Pass when `ok`, otherwise reject with `reason`.
    pub fn check(ok: bool, reason: RejectReason) -> Self {
        if ok {
            Self::Pass
        } else {
            Self::Reject(reason)
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// Attachment kinds the pipeline re-broadcasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ContentClass {
    /// Looping animated image
    AnimatedGif,
    Video,
}

impl ContentClass {
    /// Recognize an attachment type, ignoring case.
    pub fn from_media_type(kind: &str) -> Option<Self> {
        if fold_eq(kind, "animated_gif") {
            Some(Self::AnimatedGif)
        } else if fold_eq(kind, "video") {
            Some(Self::Video)
        } else {
            None
        }
    }

    /// Content-class label used in cache keys and reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AnimatedGif => "gif",
            Self::Video => "video",
        }
    }
}

impl std::fmt::Display for ContentClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The first recognized attachment of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaMatch {
    pub class: ContentClass,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_codes() {
        assert_eq!(RejectReason::NonOriginal.to_string(), "non-original");
        assert_eq!(RejectReason::NoMatch.code(), "no_match");
        assert_eq!(RejectReason::TooYoung.code(), "too_young");
        assert_eq!(RejectReason::NotFollowing.code(), "not_following");
    }

    #[test]
    fn test_content_class_recognition() {
        assert_eq!(
            ContentClass::from_media_type("ANIMATED_GIF"),
            Some(ContentClass::AnimatedGif)
        );
        assert_eq!(ContentClass::from_media_type("video"), Some(ContentClass::Video));
        assert_eq!(ContentClass::from_media_type("photo"), None);
        assert_eq!(ContentClass::AnimatedGif.label(), "gif");
    }

    #[test]
    fn test_order_starts_with_original_and_ends_with_follow() {
        assert_eq!(Gate::ORDER[0], Gate::Original);
        assert_eq!(Gate::ORDER[2], Gate::MediaMatch);
        assert_eq!(Gate::ORDER[10], Gate::FollowRequirement);
    }
}
