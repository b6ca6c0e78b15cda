//! Content type model
//!
//! Shared vocabulary identifying any engageable entity by
//! `(content type, content id)`. Every reward trigger and feed row routes
//! through these discriminants; both sets are closed, so adding a content
//! type or action forces every consumer match to be updated.

pub mod post;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use post::{FollowEdge, Post, PostQuery};

/// Domain table an engagement row references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// Marketplace music track
    Track,
    /// Marketplace video
    Video,
    /// Long-form article
    Article,
    /// Short-form feed post
    MogPost,
}

impl ContentType {
    pub const ALL: [ContentType; 4] = [
        ContentType::Track,
        ContentType::Video,
        ContentType::Article,
        ContentType::MogPost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Track => "track",
            ContentType::Video => "video",
            ContentType::Article => "article",
            ContentType::MogPost => "mog_post",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "track" => Ok(ContentType::Track),
            "video" => Ok(ContentType::Video),
            "article" => Ok(ContentType::Article),
            "mog_post" => Ok(ContentType::MogPost),
            other => Err(format!("unknown content type: {other}")),
        }
    }
}

/// Engagement action kind. Each maps to exactly one reward-rate entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    View,
    Like,
    Comment,
    Share,
    Bookmark,
}

impl ActionKind {
    pub const ALL: [ActionKind; 5] = [
        ActionKind::View,
        ActionKind::Like,
        ActionKind::Comment,
        ActionKind::Share,
        ActionKind::Bookmark,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::View => "view",
            ActionKind::Like => "like",
            ActionKind::Comment => "comment",
            ActionKind::Share => "share",
            ActionKind::Bookmark => "bookmark",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable identity of the thing being engaged with.
///
/// Equality is structural; two targets are the same engagement subject
/// exactly when both fields match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EngagementTarget {
    pub content_type: ContentType,
    pub content_id: String,
}

impl EngagementTarget {
    pub fn new(content_type: ContentType, content_id: impl Into<String>) -> Self {
        Self {
            content_type,
            content_id: content_id.into(),
        }
    }

    /// A target with an empty id cannot be rewarded; observing it is a
    /// silent no-op.
    pub fn is_valid(&self) -> bool {
        !self.content_id.is_empty()
    }
}

impl fmt::Display for EngagementTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.content_type, self.content_id)
    }
}
