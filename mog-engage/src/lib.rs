//! Mog Engage - engagement reward and feed retrieval core
//!
//! The invariant-bearing core of the Mog content platform: converts user
//! interactions (view, like, comment, share, bookmark) across heterogeneous
//! content types into token-reward triggers against the reward ledger
//! service, and serves the personalized, paginated activity feed backed by
//! the content query service.
//!
//! ## Subsystems
//!
//! - **Rewards**: rate table, dwell-time view tracker (exactly one view
//!   reward per session), fire-and-forget action dispatcher
//! - **Feed**: cursor pagination with follow-graph filtering and a short
//!   staleness cache
//! - **Palette**: ambient theming colors from content thumbnails
//!
//! Reward and feed failures never propagate into the caller's UI path:
//! every boundary catches, logs, and degrades to a no-op.

pub mod config;
pub mod content;
pub mod feed;
pub mod logging;
pub mod palette;
pub mod rewards;
pub mod types;

pub use config::Args;
pub use types::{EngageError, Result};
