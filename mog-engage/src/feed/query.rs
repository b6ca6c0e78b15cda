//! Content query service client
//!
//! Read access to the content query service: the viewer's following set and
//! windowed post listings. The service owns ordering and filtering; this
//! client only encodes the query and decodes the page.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::content::{FollowEdge, Post, PostQuery};
use crate::types::{EngageError, Result};

/// Read access to the content query service.
#[async_trait]
pub trait ContentQuery: Send + Sync {
    /// Wallets the given wallet follows. Set semantics: no duplicates.
    async fn list_following(&self, wallet: &str) -> Result<Vec<String>>;

    /// Posts matching the query, newest first, at most `query.limit`.
    async fn list_posts(&self, query: &PostQuery) -> Result<Vec<Post>>;
}

/// Configuration for the HTTP content query client
#[derive(Debug, Clone)]
pub struct ContentQueryConfig {
    /// Base URL of the content query service
    pub base_url: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for ContentQueryConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8788".to_string(),
            timeout_ms: 10_000,
        }
    }
}

impl ContentQueryConfig {
    pub fn from_args(args: &crate::config::Args) -> Self {
        Self {
            base_url: args.content_url.clone(),
            timeout_ms: args.request_timeout_ms,
        }
    }
}

/// Wire shape of the following-set response: the viewer's outgoing
/// follow edges.
#[derive(Debug, Deserialize)]
struct FollowingResponse {
    #[serde(default)]
    follows: Vec<FollowEdge>,
}

/// Wire shape of the post listing response.
#[derive(Debug, Deserialize)]
struct PostsResponse {
    #[serde(default)]
    posts: Vec<Post>,
}

/// Reduce follow edges to the creator filter set.
///
/// Only the following side of each edge matters, with set semantics; a
/// misbehaving service must not double-weight a creator in the filter.
fn filter_set(follows: Vec<FollowEdge>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    follows
        .into_iter()
        .map(|edge| edge.following_wallet)
        .filter(|w| seen.insert(w.clone()))
        .collect()
}

/// Reqwest-backed content query client.
pub struct HttpContentQuery {
    http: reqwest::Client,
    config: ContentQueryConfig,
}

impl HttpContentQuery {
    pub fn new(config: ContentQueryConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| EngageError::Config(format!("content client build failed: {e}")))?;

        Ok(Self { http, config })
    }

    fn base(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn following_endpoint(&self, wallet: &str) -> String {
        format!("{}/follows/{}/following", self.base(), wallet)
    }

    fn posts_endpoint(&self) -> String {
        format!("{}/posts", self.base())
    }
}

#[async_trait]
impl ContentQuery for HttpContentQuery {
    async fn list_following(&self, wallet: &str) -> Result<Vec<String>> {
        let response = self
            .http
            .get(self.following_endpoint(wallet))
            .send()
            .await
            .map_err(|e| EngageError::ContentQuery(format!("follow graph unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngageError::ContentQuery(format!(
                "follow graph returned HTTP {status}"
            )));
        }

        let body: FollowingResponse = response
            .json()
            .await
            .map_err(|e| EngageError::ContentQuery(format!("malformed following response: {e}")))?;

        let following = filter_set(body.follows);

        debug!(wallet = %wallet, count = following.len(), "Resolved following set");
        Ok(following)
    }

    async fn list_posts(&self, query: &PostQuery) -> Result<Vec<Post>> {
        let response = self
            .http
            .get(self.posts_endpoint())
            .query(&query.to_query_params())
            .send()
            .await
            .map_err(|e| EngageError::ContentQuery(format!("content service unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngageError::ContentQuery(format!(
                "content service returned HTTP {status}"
            )));
        }

        let body: PostsResponse = response
            .json()
            .await
            .map_err(|e| EngageError::ContentQuery(format!("malformed posts response: {e}")))?;

        let mut posts = body.posts;
        posts.truncate(query.limit);

        debug!(
            offset = query.offset,
            limit = query.limit,
            count = posts.len(),
            "Fetched feed page"
        );
        Ok(posts)
    }
}
