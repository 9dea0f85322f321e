// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Post event generators.

use chrono::{DateTime, Duration, Utc};
use rebroadcast_gate::event::{Author, MediaEntity, PostEvent, UserMention};
use rebroadcast_gate::time::format_origin_timestamp;

/// Where an attachment is placed on the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaLocation {
    Entities,
    ExtendedEntities,
    ExtendedPostEntities,
    ExtendedPostExtendedEntities,
}

/// Fluent builder for realistic post events.
///
/// Defaults to an original, non-sensitive post made now by an account
/// created 400 days ago, with no attachments.
pub struct PostBuilder {
    event: PostEvent,
}

impl PostBuilder {
    pub fn new(id: u64, author: i64) -> Self {
        let now = Utc::now();
        Self {
            event: PostEvent {
                id,
                text: format!("post number {}", id),
                created_at: format_origin_timestamp(now),
                user: Author {
                    id: author,
                    screen_name: format!("author{}", author),
                    created_at: format_origin_timestamp(now - Duration::days(400)),
                },
                ..Default::default()
            },
        }
    }

    pub fn text(mut self, text: &str) -> Self {
        self.event.text = text.to_string();
        self
    }

    pub fn screen_name(mut self, handle: &str) -> Self {
        self.event.user.screen_name = handle.to_string();
        self
    }

    pub fn posted_at(mut self, at: DateTime<Utc>) -> Self {
        self.event.created_at = format_origin_timestamp(at);
        self
    }

    pub fn account_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.event.user.created_at = format_origin_timestamp(at);
        self
    }

    pub fn reply_to(mut self, handle: &str) -> Self {
        self.event.in_reply_to_screen_name = Some(handle.to_string());
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.event.possibly_sensitive = true;
        self
    }

    pub fn mention(mut self, handle: &str) -> Self {
        self.event.entities.user_mentions.push(UserMention {
            screen_name: handle.to_string(),
        });
        self
    }

    pub fn media(mut self, location: MediaLocation, kind: &str, url: &str) -> Self {
        let entity = MediaEntity {
            kind: kind.to_string(),
            media_url_https: url.to_string(),
            ..Default::default()
        };
        let list = match location {
            MediaLocation::Entities => &mut self.event.entities.media,
            MediaLocation::ExtendedEntities => &mut self.event.extended_entities.media,
            MediaLocation::ExtendedPostEntities => &mut self.event.extended_tweet.entities.media,
            MediaLocation::ExtendedPostExtendedEntities => {
                &mut self.event.extended_tweet.extended_entities.media
            }
        };
        list.push(entity);
        self
    }

    pub fn video(self, url: &str) -> Self {
        self.media(MediaLocation::Entities, "video", url)
    }

    pub fn gif(self, url: &str) -> Self {
        self.media(MediaLocation::Entities, "animated_gif", url)
    }

    pub fn build(self) -> PostEvent {
        self.event
    }
}

/// A clean video post with unique text and URL.
pub fn video_post(id: u64, author: i64) -> PostEvent {
    PostBuilder::new(id, author)
        .video(&format!("https://media.example.com/video/{}.jpg", id))
        .build()
}

/// `count` distinct clean posts from one author, all stamped `at`.
pub fn flood_from_author(author: i64, count: u64, at: DateTime<Utc>) -> Vec<PostEvent> {
    (0..count)
        .map(|i| {
            PostBuilder::new(i, author)
                .text(&format!("flood {} from {}", i, author))
                .posted_at(at)
                .gif(&format!("https://media.example.com/flood/{}/{}.jpg", author, i))
                .build()
        })
        .collect()
}

/// One clean post from each of `count` authors, all sharing `text`.
pub fn same_text_from_many(count: i64, text: &str) -> Vec<PostEvent> {
    (0..count)
        .map(|author| {
            PostBuilder::new(author as u64, author)
                .text(text)
                .video(&format!("https://media.example.com/copy/{}.jpg", author))
                .build()
        })
        .collect()
}

/// One clean post from each of `count` authors, all attaching `url`.
pub fn same_url_from_many(count: i64, url: &str) -> Vec<PostEvent> {
    (0..count)
        .map(|author| {
            PostBuilder::new(author as u64, author)
                .text(&format!("reupload {}", author))
                .video(url)
                .build()
        })
        .collect()
}
