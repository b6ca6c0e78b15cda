//! Logging infrastructure for the engagement core
//!
//! Tracing subscriber setup for embedders plus the JSONL reward audit log.

pub mod audit;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use audit::{RewardAuditLog, RewardEvent, RewardEventOutcome};

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the given level applies to this
/// crate and `info` to everything else. Embedding processes that install
/// their own subscriber skip this.
pub fn init(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("mog_engage={log_level},info").into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
