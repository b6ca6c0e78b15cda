//! Feed pagination integration tests
//!
//! Exercises feed sessions against fake content query services:
//! - exhaustive pagination covers the pool in non-overlapping windows
//! - empty following sets short-circuit without issuing post queries
//! - exhausted sessions stay off the network
//! - overlapping page requests do not stack
//! - refresh discards in-flight responses instead of advancing the cursor

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use mog_engage::content::{Post, PostQuery};
use mog_engage::feed::{ContentQuery, FeedService, FeedType, FEED_PAGE_SIZE};
use mog_engage::Result;

fn make_posts(count: usize) -> Vec<Post> {
    (0..count)
        .map(|i| Post {
            id: format!("post-{i}"),
            creator_wallet: "0xcreator".to_string(),
            created_at: Utc::now(),
            updated_at: None,
            media_url: None,
            thumbnail_url: None,
            caption: None,
            like_count: 0,
            comment_count: 0,
            share_count: 0,
            view_count: 0,
            published: true,
        })
        .collect()
}

/// Fake query over a fixed post pool.
struct PoolQuery {
    pool: Vec<Post>,
    following: Vec<String>,
    post_calls: AtomicUsize,
    follow_calls: AtomicUsize,
}

impl PoolQuery {
    fn new(pool: Vec<Post>, following: Vec<String>) -> Arc<Self> {
        Arc::new(Self {
            pool,
            following,
            post_calls: AtomicUsize::new(0),
            follow_calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl ContentQuery for PoolQuery {
    async fn list_following(&self, _wallet: &str) -> Result<Vec<String>> {
        self.follow_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.following.clone())
    }

    async fn list_posts(&self, query: &PostQuery) -> Result<Vec<Post>> {
        self.post_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .pool
            .iter()
            .skip(query.offset)
            .take(query.limit)
            .cloned()
            .collect())
    }
}

/// Fake query whose post listing blocks until released.
struct GatedQuery {
    pool: Vec<Post>,
    release: tokio::sync::Semaphore,
    post_calls: AtomicUsize,
}

impl GatedQuery {
    fn new(pool: Vec<Post>) -> Arc<Self> {
        Arc::new(Self {
            pool,
            release: tokio::sync::Semaphore::new(0),
            post_calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl ContentQuery for GatedQuery {
    async fn list_following(&self, _wallet: &str) -> Result<Vec<String>> {
        Ok(vec!["0xcreator".to_string()])
    }

    async fn list_posts(&self, query: &PostQuery) -> Result<Vec<Post>> {
        self.post_calls.fetch_add(1, Ordering::SeqCst);
        let _permit = self.release.acquire().await.expect("gate closed");
        Ok(self
            .pool
            .iter()
            .skip(query.offset)
            .take(query.limit)
            .cloned()
            .collect())
    }
}

#[tokio::test]
async fn test_exhaustive_pagination_covers_pool_without_overlap() {
    let query = PoolQuery::new(make_posts(50), Vec::new());
    let service = FeedService::new(query.clone());
    let session = service.session(FeedType::Global, None);

    let mut seen = Vec::new();
    loop {
        let page = session.next_page().await;
        seen.extend(page.posts.iter().map(|p| p.id.clone()));
        if page.exhausted {
            break;
        }
        assert_eq!(page.posts.len(), FEED_PAGE_SIZE);
    }

    // Every post exactly once, in pool order.
    assert_eq!(seen.len(), 50);
    assert_eq!(seen.iter().collect::<HashSet<_>>().len(), 50);
    assert_eq!(seen[0], "post-0");
    assert_eq!(seen[49], "post-49");
    // 20 + 20 + 10: three windows.
    assert_eq!(query.post_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_remount_within_ttl_reuses_fetched_results() {
    let query = PoolQuery::new(make_posts(50), Vec::new());
    let service = FeedService::new(query.clone());

    let session = service.session(FeedType::Global, Some("0xviewer"));
    let page = session.next_page().await;
    assert_eq!(page.posts.len(), FEED_PAGE_SIZE);
    assert_eq!(query.post_calls.load(Ordering::SeqCst), 1);
    drop(session);

    // Returning to the feed within the staleness window renders every
    // already-fetched post with no new query.
    let resumed = service.session(FeedType::Global, Some("0xviewer"));
    let visible = resumed.posts();
    assert_eq!(query.post_calls.load(Ordering::SeqCst), 1);
    assert_eq!(visible.len(), FEED_PAGE_SIZE);
    assert_eq!(visible[0].id, "post-0");

    // Scrolling continues from where the first mount stopped.
    let next = resumed.next_page().await;
    assert_eq!(next.posts[0].id, "post-20");
    assert_eq!(resumed.posts().len(), 2 * FEED_PAGE_SIZE);
}

#[tokio::test]
async fn test_empty_following_set_short_circuits() {
    let query = PoolQuery::new(make_posts(10), Vec::new());
    let service = FeedService::new(query.clone());
    let session = service.session(FeedType::Following, Some("0xviewer"));

    let page = session.next_page().await;
    assert!(page.posts.is_empty());
    assert!(page.exhausted);
    assert_eq!(query.follow_calls.load(Ordering::SeqCst), 1);
    // The post query service is never consulted for a feed that cannot
    // produce items.
    assert_eq!(query.post_calls.load(Ordering::SeqCst), 0);

    // Exhaustion is permanent: no further lookups of any kind.
    session.next_page().await;
    assert_eq!(query.follow_calls.load(Ordering::SeqCst), 1);
    assert_eq!(query.post_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_exhausted_session_stays_off_the_network() {
    let query = PoolQuery::new(make_posts(5), Vec::new());
    let service = FeedService::new(query.clone());
    let session = service.session(FeedType::Global, None);

    let page = session.next_page().await;
    assert!(page.exhausted);

    for _ in 0..3 {
        let empty = session.next_page().await;
        assert!(empty.posts.is_empty());
        assert!(empty.exhausted);
    }
    assert_eq!(query.post_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_overlapping_page_requests_do_not_stack() {
    let query = GatedQuery::new(make_posts(40));
    let service = FeedService::new(query.clone());
    let session = Arc::new(service.session(FeedType::Global, None));

    let first = {
        let session = session.clone();
        tokio::spawn(async move { session.next_page().await })
    };
    // Let the first request reach the gate.
    tokio::time::sleep(Duration::from_millis(20)).await;

    // The overlapping call returns immediately, empty and non-advancing.
    let overlap = session.next_page().await;
    assert!(overlap.posts.is_empty());
    assert!(!overlap.exhausted);
    assert_eq!(session.cursor().offset, 0);
    assert_eq!(query.post_calls.load(Ordering::SeqCst), 1);

    query.release.add_permits(1);
    let page = first.await.unwrap();
    assert_eq!(page.posts.len(), FEED_PAGE_SIZE);
    assert_eq!(session.cursor().offset, FEED_PAGE_SIZE);
}

#[tokio::test]
async fn test_refresh_discards_in_flight_response() {
    let query = GatedQuery::new(make_posts(40));
    let service = FeedService::new(query.clone());
    let session = Arc::new(service.session(FeedType::Global, None));

    let in_flight = {
        let session = session.clone();
        tokio::spawn(async move { session.next_page().await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;

    // Refresh while the response is still pending.
    session.refresh();
    query.release.add_permits(1);

    let stale = in_flight.await.unwrap();
    assert!(stale.posts.is_empty());
    // The stale response never advanced the fresh cursor.
    assert_eq!(session.cursor().offset, 0);

    query.release.add_permits(1);
    let page = session.next_page().await;
    assert_eq!(page.posts[0].id, "post-0");
}
