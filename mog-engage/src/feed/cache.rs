//! Feed result cache
//!
//! Retains the posts each (feed, viewer) pair has already fetched, keyed
//! with the pagination cursor, so a component that remounts within the
//! staleness window renders what it had and resumes its scroll position
//! without re-issuing network calls. Entries older than the TTL are
//! dropped on read; a manual refresh invalidates explicitly.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::debug;

use super::{FeedCursor, FeedType};
use crate::content::Post;

/// Default staleness window for cached feed results.
pub const FEED_CACHE_TTL: Duration = Duration::from_secs(30);

/// Hit/miss counters, point-in-time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedCacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Everything a remounted feed needs to pick up where it left off.
#[derive(Debug, Clone)]
pub struct CachedFeed {
    /// Pagination position after the last fetched page
    pub cursor: FeedCursor,
    /// All posts fetched so far, in feed order
    pub posts: Vec<Post>,
}

struct CacheEntry {
    feed: CachedFeed,
    stored_at: Instant,
}

/// TTL cache of fetched feed results keyed by (feed type, viewer wallet).
///
/// Anonymous viewers share the empty-wallet key per feed type.
pub struct FeedCache {
    entries: DashMap<(FeedType, String), CacheEntry>,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Default for FeedCache {
    fn default() -> Self {
        Self::new(FEED_CACHE_TTL)
    }
}

impl FeedCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Fresh results for the key, dropping the entry if it went stale.
    pub fn get(&self, feed_type: FeedType, wallet: &str) -> Option<CachedFeed> {
        let key = (feed_type, wallet.to_string());

        if let Some(entry) = self.entries.get(&key) {
            if entry.stored_at.elapsed() <= self.ttl {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.feed.clone());
            }
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        // Stale: drop outside the read guard to avoid deadlocking the shard.
        self.entries.remove(&key);
        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(feed = ?feed_type, wallet = %wallet, "Feed cache entry expired");
        None
    }

    /// Record the latest results for the key, resetting its TTL.
    pub fn store(&self, feed_type: FeedType, wallet: &str, feed: CachedFeed) {
        self.entries.insert(
            (feed_type, wallet.to_string()),
            CacheEntry {
                feed,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop the results for the key (manual refresh).
    pub fn invalidate(&self, feed_type: FeedType, wallet: &str) {
        self.entries.remove(&(feed_type, wallet.to_string()));
    }

    pub fn stats(&self) -> FeedCacheStats {
        FeedCacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
