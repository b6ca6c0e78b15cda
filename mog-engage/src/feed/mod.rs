//! Feed retrieval and pagination
//!
//! Cursor-paginated, newest-first post feeds. Two feed types share one
//! engine: the global feed (all published posts) and the following feed
//! (published posts by creators the viewer follows). Sessions accumulate
//! the posts they fetch, mark themselves exhausted on a short page, and
//! resume from a process-wide result cache when remounted within the
//! staleness window - rendering an already-fetched feed costs no network
//! calls.

pub mod cache;
pub mod query;

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::content::{Post, PostQuery};

pub use cache::{CachedFeed, FeedCache, FeedCacheStats, FEED_CACHE_TTL};
pub use query::{ContentQuery, ContentQueryConfig, HttpContentQuery};

/// Posts per feed page.
pub const FEED_PAGE_SIZE: usize = 20;

/// Which feed a session serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedType {
    /// All published posts
    Global,
    /// Published posts by creators the viewer follows
    Following,
}

/// Pagination position within a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedCursor {
    /// Index of the next unfetched post
    pub offset: usize,
    /// No further pages exist until refresh
    pub exhausted: bool,
}

impl FeedCursor {
    pub fn start() -> Self {
        Self {
            offset: 0,
            exhausted: false,
        }
    }

    /// Cursor after consuming one full window.
    pub fn advanced(self, page_size: usize) -> Self {
        Self {
            offset: self.offset + page_size,
            exhausted: self.exhausted,
        }
    }
}

/// One page of feed results.
#[derive(Debug, Clone, Default)]
pub struct FeedPage {
    pub posts: Vec<Post>,
    /// True when the feed has no further pages until refresh
    pub exhausted: bool,
}

impl FeedPage {
    fn empty(exhausted: bool) -> Self {
        Self {
            posts: Vec::new(),
            exhausted,
        }
    }
}

/// Entry point for feed retrieval.
///
/// Owns the content query handle and the process-wide result cache; hands
/// out one [`FeedSession`] per mounted feed component.
pub struct FeedService {
    query: Arc<dyn ContentQuery>,
    cache: Arc<FeedCache>,
    page_size: usize,
}

impl FeedService {
    pub fn new(query: Arc<dyn ContentQuery>) -> Self {
        Self {
            query,
            cache: Arc::new(FeedCache::default()),
            page_size: FEED_PAGE_SIZE,
        }
    }

    /// Share a result cache across services.
    pub fn with_cache(mut self, cache: Arc<FeedCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Override the page size (tests use small windows).
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Open a session, resuming fetched results from the cache when a
    /// fresh entry exists.
    pub fn session(&self, feed_type: FeedType, wallet: Option<&str>) -> FeedSession {
        let key = wallet.unwrap_or_default();
        let resumed = self.cache.get(feed_type, key).unwrap_or_else(|| CachedFeed {
            cursor: FeedCursor::start(),
            posts: Vec::new(),
        });
        if !resumed.posts.is_empty() || resumed.cursor.exhausted {
            debug!(
                feed = ?feed_type,
                offset = resumed.cursor.offset,
                posts = resumed.posts.len(),
                "Resuming feed session from cache"
            );
        }
        self.build_session(feed_type, wallet, resumed)
    }

    /// Open a session from the top, dropping any cached results.
    pub fn refresh_session(&self, feed_type: FeedType, wallet: Option<&str>) -> FeedSession {
        self.cache.invalidate(feed_type, wallet.unwrap_or_default());
        self.build_session(
            feed_type,
            wallet,
            CachedFeed {
                cursor: FeedCursor::start(),
                posts: Vec::new(),
            },
        )
    }

    pub fn cache_stats(&self) -> FeedCacheStats {
        self.cache.stats()
    }

    fn build_session(
        &self,
        feed_type: FeedType,
        wallet: Option<&str>,
        resumed: CachedFeed,
    ) -> FeedSession {
        FeedSession {
            query: Arc::clone(&self.query),
            cache: Arc::clone(&self.cache),
            feed_type,
            wallet: wallet.map(str::to_string),
            page_size: self.page_size,
            state: Mutex::new(resumed),
            in_flight: AtomicBool::new(false),
            generation: AtomicU64::new(0),
        }
    }
}

/// Resets the in-flight flag on every exit path.
struct InFlightReset<'a>(&'a AtomicBool);

impl Drop for InFlightReset<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// One mounted feed's pagination state: cursor plus every post fetched so
/// far, in feed order.
pub struct FeedSession {
    query: Arc<dyn ContentQuery>,
    cache: Arc<FeedCache>,
    feed_type: FeedType,
    wallet: Option<String>,
    page_size: usize,
    state: Mutex<CachedFeed>,
    in_flight: AtomicBool,
    generation: AtomicU64,
}

impl FeedSession {
    /// Fetch the next page.
    ///
    /// Overlapping calls do not stack: while a fetch is in flight, further
    /// calls return an empty, non-advancing page. An exhausted session
    /// returns an empty page without touching the network. Query failures
    /// leave the cursor unchanged so the caller can retry.
    pub async fn next_page(&self) -> FeedPage {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            debug!(feed = ?self.feed_type, "Page request already in flight");
            return FeedPage::default();
        }
        let _reset = InFlightReset(&self.in_flight);

        let generation = self.generation.load(Ordering::SeqCst);
        let cursor = self.lock_state().cursor;
        if cursor.exhausted {
            return FeedPage::empty(true);
        }

        let mut query = PostQuery::page(cursor.offset, self.page_size);

        if self.feed_type == FeedType::Following {
            // An empty following set can never produce a page, so it never
            // reaches the post query.
            let Some(wallet) = self.wallet.as_deref().filter(|w| !w.is_empty()) else {
                return self.settle_exhausted();
            };

            let following = match self.query.list_following(wallet).await {
                Ok(following) => following,
                Err(e) => {
                    warn!(feed = ?self.feed_type, "Following-set lookup failed: {e}");
                    return FeedPage::default();
                }
            };

            if self.generation.load(Ordering::SeqCst) != generation {
                debug!(feed = ?self.feed_type, "Stale following response discarded");
                return FeedPage::default();
            }

            if following.is_empty() {
                return self.settle_exhausted();
            }
            query = query.with_creators(following);
        }

        let posts = match self.query.list_posts(&query).await {
            Ok(posts) => posts,
            Err(e) => {
                warn!(feed = ?self.feed_type, offset = cursor.offset, "Feed page fetch failed: {e}");
                return FeedPage::default();
            }
        };

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(feed = ?self.feed_type, "Stale page response discarded");
            return FeedPage::default();
        }

        let exhausted = posts.len() < self.page_size;
        {
            let mut state = self.lock_state();
            state.cursor = FeedCursor {
                exhausted,
                ..cursor.advanced(self.page_size)
            };
            state.posts.extend(posts.iter().cloned());
            self.cache
                .store(self.feed_type, self.wallet_key(), (*state).clone());
        }

        FeedPage { posts, exhausted }
    }

    /// Restart the session from the top.
    ///
    /// Bumps the generation so any in-flight response is discarded rather
    /// than polluting the fresh state.
    pub fn refresh(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        {
            let mut state = self.lock_state();
            state.cursor = FeedCursor::start();
            state.posts.clear();
        }
        self.cache.invalidate(self.feed_type, self.wallet_key());
        debug!(feed = ?self.feed_type, "Feed session refreshed");
    }

    /// Every post fetched so far, in feed order. Rendering these after a
    /// remount costs no network call.
    pub fn posts(&self) -> Vec<Post> {
        self.lock_state().posts.clone()
    }

    /// Current pagination position.
    pub fn cursor(&self) -> FeedCursor {
        self.lock_state().cursor
    }

    pub fn feed_type(&self) -> FeedType {
        self.feed_type
    }

    fn wallet_key(&self) -> &str {
        self.wallet.as_deref().unwrap_or_default()
    }

    fn lock_state(&self) -> MutexGuard<'_, CachedFeed> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Mark the session exhausted without issuing a post query.
    fn settle_exhausted(&self) -> FeedPage {
        let mut state = self.lock_state();
        state.cursor.exhausted = true;
        self.cache
            .store(self.feed_type, self.wallet_key(), (*state).clone());
        FeedPage::empty(true)
    }
}
