//! Feed post and follow-graph models
//!
//! Denormalized view of posts as the content query service returns them,
//! plus the builder-style query used to window feed pages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A published feed post.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Post ID
    pub id: String,

    /// Wallet address of the creator
    pub creator_wallet: String,

    /// Creation timestamp (feed sort key, descending)
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Primary media reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,

    /// Thumbnail reference (palette extraction source)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,

    /// Caption text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,

    /// Engagement counts
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub comment_count: u64,
    #[serde(default)]
    pub share_count: u64,
    #[serde(default)]
    pub view_count: u64,

    /// Published flag; the feed only ever requests published posts
    pub published: bool,
}

/// Directed follow edge in the social graph, as the content query service
/// returns it. Only the `following_wallet` side feeds the feed filter set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowEdge {
    pub follower_wallet: String,
    pub following_wallet: String,
}

/// Query parameters for a feed page request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    /// Only published posts
    pub published_only: bool,

    /// Restrict to posts by these creator wallets (follow-graph filter).
    /// `None` means no creator filter; an empty set must never reach the
    /// content query service - callers short-circuit it.
    pub creator_in: Option<Vec<String>>,

    /// Window start
    pub offset: usize,

    /// Window size
    pub limit: usize,
}

impl PostQuery {
    /// Published posts, newest first, for one pagination window.
    pub fn page(offset: usize, limit: usize) -> Self {
        Self {
            published_only: true,
            creator_in: None,
            offset,
            limit,
        }
    }

    /// Restrict to creators in the viewer's following set.
    pub fn with_creators(mut self, creators: Vec<String>) -> Self {
        self.creator_in = Some(creators);
        self
    }

    /// Encode as HTTP query parameters for the content query service.
    pub fn to_query_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("published".to_string(), self.published_only.to_string()),
            ("offset".to_string(), self.offset.to_string()),
            ("limit".to_string(), self.limit.to_string()),
            ("order".to_string(), "createdAt.desc".to_string()),
        ];

        if let Some(ref creators) = self.creator_in {
            params.push(("creators".to_string(), creators.join(",")));
        }

        params
    }
}
