// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Incoming post events.
//!
//! Field names follow the origin's JSON so events can be deserialized
//! straight off the wire. Media and mentions appear in several redundant
//! places depending on whether the origin used its legacy or extended
//! representation.

use serde::{Deserialize, Serialize};

/// One candidate post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostEvent {
    pub id: u64,
    #[serde(default)]
    pub text: String,
    /// Origin-format creation timestamp
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub user: Author,
    /// Handle being replied to; set on replies
    #[serde(default)]
    pub in_reply_to_screen_name: Option<String>,
    /// The reposted item, when this event is itself a repost
    #[serde(default)]
    pub retweeted_status: Option<Box<PostEvent>>,
    #[serde(default)]
    pub possibly_sensitive: bool,
    #[serde(default)]
    pub entities: Entities,
    #[serde(default)]
    pub extended_entities: Entities,
    #[serde(default)]
    pub extended_tweet: ExtendedPost,
}

/// Author of a post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    #[serde(default)]
    pub screen_name: String,
    /// Origin-format account creation timestamp
    #[serde(default)]
    pub created_at: String,
}

/// Extended representation of a long post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtendedPost {
    #[serde(default)]
    pub full_text: String,
    #[serde(default)]
    pub entities: Entities,
    #[serde(default)]
    pub extended_entities: Entities,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Entities {
    #[serde(default)]
    pub media: Vec<MediaEntity>,
    #[serde(default)]
    pub user_mentions: Vec<UserMention>,
}

/// One media attachment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaEntity {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub media_url_https: String,
    #[serde(default)]
    pub video_info: VideoInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoInfo {
    #[serde(default)]
    pub variants: Vec<VideoVariant>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoVariant {
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserMention {
    #[serde(default)]
    pub screen_name: String,
}

impl PostEvent {
    /// The four media lists, highest priority first.
    pub fn media_locations(&self) -> [&[MediaEntity]; 4] {
        [
            self.entities.media.as_slice(),
            self.extended_entities.media.as_slice(),
            self.extended_tweet.entities.media.as_slice(),
            self.extended_tweet.extended_entities.media.as_slice(),
        ]
    }

    /// Mentions from the extended representation, then the legacy one.
    pub fn mentions(&self) -> impl Iterator<Item = &UserMention> {
        self.extended_tweet
            .extended_entities
            .user_mentions
            .iter()
            .chain(self.extended_tweet.entities.user_mentions.iter())
            .chain(self.entities.user_mentions.iter())
    }

    pub fn is_reply(&self) -> bool {
        self.in_reply_to_screen_name
            .as_deref()
            .is_some_and(|name| !name.is_empty())
    }

    pub fn is_repost(&self) -> bool {
        self.retweeted_status.is_some()
    }
}

/// Case-insensitive comparison of handles and labels.
///
/// Uses full Unicode lower-casing, the same folding the deny lists are
/// stored with.
pub fn fold_eq(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_origin_event() {
        let event: PostEvent = serde_json::from_str(
            r#"{
                "id": 850006245121695744,
                "text": "clip of the day",
                "created_at": "Wed Aug 27 13:08:45 +0000 2008",
                "user": {"id": 6253282, "screen_name": "fluffy", "created_at": "Wed May 23 06:01:13 +0000 2007"},
                "in_reply_to_screen_name": null,
                "possibly_sensitive": false,
                "extended_tweet": {
                    "full_text": "clip of the day",
                    "extended_entities": {
                        "media": [{"type": "video", "media_url_https": "https://pbs.example.com/v.jpg",
                                   "video_info": {"variants": [{"content_type": "video/mp4", "url": "https://video.example.com/v.mp4"}]}}],
                        "user_mentions": [{"screen_name": "Cake"}]
                    }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(event.user.screen_name, "fluffy");
        assert!(!event.is_reply());
        assert!(!event.is_repost());
        let locations = event.media_locations();
        assert!(locations[0].is_empty());
        assert_eq!(locations[3][0].kind, "video");
        assert_eq!(locations[3][0].video_info.variants.len(), 1);
        assert_eq!(event.mentions().count(), 1);
    }

    #[test]
    fn test_empty_reply_name_is_not_a_reply() {
        let event = PostEvent {
            in_reply_to_screen_name: Some(String::new()),
            ..Default::default()
        };
        assert!(!event.is_reply());
    }

    #[test]
    fn test_fold_eq_is_unicode_aware() {
        assert!(fold_eq("Fluffy", "fLUFFY"));
        assert!(fold_eq("ÉMILE", "émile"));
        assert!(fold_eq("ΣΟΦΙΑ", "σοφια"));
        assert!(!fold_eq("emile", "émile"));
    }

    #[test]
    fn test_mentions_cover_every_list() {
        let mention = |name: &str| UserMention {
            screen_name: name.to_string(),
        };
        let mut event = PostEvent::default();
        event.entities.user_mentions.push(mention("legacy"));
        event.extended_tweet.entities.user_mentions.push(mention("extended"));
        event
            .extended_tweet
            .extended_entities
            .user_mentions
            .push(mention("extended_entities"));

        let names: Vec<_> = event.mentions().map(|m| m.screen_name.as_str()).collect();
        assert_eq!(names, vec!["extended_entities", "extended", "legacy"]);
    }
}
