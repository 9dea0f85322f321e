// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Content gates: originality, sensitivity and media matching.
//!
//! These run first because they are cheap and need no shared state.
//! Attachments are recognized by their declared type only; the media
//! itself is never inspected.

use crate::config::GateSettings;
use crate::event::{fold_eq, MediaEntity, PostEvent};
use crate::gate::{ContentClass, GateOutcome, MediaMatch, RejectReason};
use tracing::debug;

/// Prefix of a manual repost.
pub const REPOST_MARKER: &str = "RT ";

/// Reject replies, reposts and posts from the ignored identity.
pub fn check_original(event: &PostEvent, settings: &GateSettings) -> GateOutcome {
    let ignored = !settings.ignore_from.is_empty()
        && fold_eq(&event.user.screen_name, &settings.ignore_from);

    if event.is_reply() || event.is_repost() || event.text.starts_with(REPOST_MARKER) || ignored {
        debug!(
            id = event.id,
            reply = event.is_reply(),
            repost = event.is_repost(),
            ignored,
            "Not an original post"
        );
        return GateOutcome::Reject(RejectReason::NonOriginal);
    }
    GateOutcome::Pass
}

/// Reject possibly sensitive posts when configured to.
pub fn check_sensitivity(event: &PostEvent, settings: &GateSettings) -> GateOutcome {
    if settings.deny_sensitive_content && event.possibly_sensitive {
        debug!(id = event.id, "Sensitive content detected");
        return GateOutcome::Reject(RejectReason::Sensitive);
    }
    GateOutcome::Pass
}

/// Find the first recognized attachment across all media locations.
pub fn match_media(event: &PostEvent) -> Result<MediaMatch, RejectReason> {
    event
        .media_locations()
        .into_iter()
        .find_map(|media| first_recognized(event, media))
        .ok_or_else(|| {
            debug!(id = event.id, "No media content found");
            RejectReason::NoMatch
        })
}

fn first_recognized(event: &PostEvent, media: &[MediaEntity]) -> Option<MediaMatch> {
    media.iter().find_map(|entity| {
        let class = ContentClass::from_media_type(&entity.kind)?;
        for variant in &entity.video_info.variants {
            debug!(content_type = %variant.content_type, url = %variant.url, "Media variant");
        }
        debug!(
            id = event.id,
            author = %event.user.screen_name,
            class = %class,
            url = %entity.media_url_https,
            "Media match"
        );
        Some(MediaMatch {
            class,
            url: entity.media_url_https.clone(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Author, PostEvent};

    fn settings() -> GateSettings {
        GateSettings {
            ignore_from: "chim".to_string(),
            deny_sensitive_content: true,
            ..Default::default()
        }
    }

    fn media(kind: &str, url: &str) -> MediaEntity {
        MediaEntity {
            kind: kind.to_string(),
            media_url_https: url.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_reply_rejected() {
        let event = PostEvent {
            in_reply_to_screen_name: Some("yes".to_string()),
            ..Default::default()
        };
        assert_eq!(
            check_original(&event, &settings()),
            GateOutcome::Reject(RejectReason::NonOriginal)
        );
    }

    #[test]
    fn test_repost_rejected() {
        let event = PostEvent {
            retweeted_status: Some(Box::default()),
            ..Default::default()
        };
        assert!(!check_original(&event, &settings()).is_pass());
    }

    #[test]
    fn test_repost_marker_rejected() {
        let event = PostEvent {
            text: "RT Learn his one secret!".to_string(),
            ..Default::default()
        };
        assert!(!check_original(&event, &settings()).is_pass());

        let event = PostEvent {
            text: "RTFM before posting".to_string(),
            ..Default::default()
        };
        assert!(check_original(&event, &settings()).is_pass());
    }

    #[test]
    fn test_ignored_author_rejected_case_insensitive() {
        let event = PostEvent {
            user: Author {
                screen_name: "CHIM".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(!check_original(&event, &settings()).is_pass());
    }

    #[test]
    fn test_ignored_author_matches_non_ascii_case() {
        let settings = GateSettings {
            ignore_from: "Ødegaard".to_string(),
            ..Default::default()
        };
        let event = PostEvent {
            user: Author {
                screen_name: "ØDEGAARD".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(!check_original(&event, &settings).is_pass());
    }

    #[test]
    fn test_empty_ignore_setting_ignores_nobody() {
        let event = PostEvent::default();
        assert!(check_original(&event, &GateSettings::default()).is_pass());
    }

    #[test]
    fn test_sensitivity() {
        let event = PostEvent {
            possibly_sensitive: true,
            ..Default::default()
        };
        assert_eq!(
            check_sensitivity(&event, &settings()),
            GateOutcome::Reject(RejectReason::Sensitive)
        );
        assert!(check_sensitivity(&event, &GateSettings::default()).is_pass());
        assert!(check_sensitivity(&PostEvent::default(), &settings()).is_pass());
    }

    #[test]
    fn test_media_in_lowest_priority_location() {
        let mut event = PostEvent::default();
        event
            .extended_tweet
            .extended_entities
            .media
            .push(media("video", "https://video.example.com/a.jpg"));

        let found = match_media(&event).unwrap();
        assert_eq!(found.class, ContentClass::Video);
        assert_eq!(found.url, "https://video.example.com/a.jpg");
    }

    #[test]
    fn test_media_priority_order() {
        let mut event = PostEvent::default();
        event
            .extended_tweet
            .entities
            .media
            .push(media("video", "https://example.com/low.jpg"));
        event
            .extended_entities
            .media
            .push(media("animated_gif", "https://example.com/high.jpg"));

        let found = match_media(&event).unwrap();
        assert_eq!(found.class, ContentClass::AnimatedGif);
        assert_eq!(found.url, "https://example.com/high.jpg");
    }

    #[test]
    fn test_first_recognized_attachment_within_location() {
        let mut event = PostEvent::default();
        event.entities.media.push(media("photo", "https://example.com/p.jpg"));
        event.entities.media.push(media("video", "https://example.com/v.jpg"));
        event.entities.media.push(media("animated_gif", "https://example.com/g.jpg"));

        let found = match_media(&event).unwrap();
        assert_eq!(found.url, "https://example.com/v.jpg");
    }

    #[test]
    fn test_no_media_rejected() {
        let mut event = PostEvent::default();
        event.entities.media.push(media("photo", "https://example.com/p.jpg"));
        assert_eq!(match_media(&event), Err(RejectReason::NoMatch));
    }
}
