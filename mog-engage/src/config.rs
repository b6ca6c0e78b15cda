//! Configuration for the engagement core
//!
//! CLI arguments and environment variable handling using clap. Injected at
//! startup by the embedding process; nothing in this crate reads ambient
//! globals.

use clap::Parser;
use std::path::PathBuf;

/// Mog Engage - engagement reward and feed retrieval core
#[derive(Parser, Debug, Clone)]
#[command(name = "mog-engage")]
#[command(about = "Engagement reward and feed retrieval core for the Mog platform")]
pub struct Args {
    /// Base URL of the reward ledger service
    #[arg(long, env = "LEDGER_URL", default_value = "http://localhost:8787")]
    pub ledger_url: String,

    /// Base URL of the content query service
    #[arg(long, env = "CONTENT_URL", default_value = "http://localhost:8788")]
    pub content_url: String,

    /// Force simulation mode: reward calls are recorded, no token transfer
    /// executes. Simulation is also implied while no payout key is set.
    #[arg(long, env = "SIMULATION_MODE", default_value = "false")]
    pub simulation_mode: bool,

    /// Payout signing credential for real token transfers.
    /// Until this is configured the core runs in simulation mode.
    #[arg(long, env = "PAYOUT_KEY")]
    pub payout_key: Option<String>,

    /// Request timeout in milliseconds for ledger and content-query calls
    #[arg(long, env = "REQUEST_TIMEOUT_MS", default_value = "10000")]
    pub request_timeout_ms: u64,

    /// Staleness window for cached feed pages, in milliseconds
    #[arg(long, env = "FEED_CACHE_TTL_MS", default_value = "30000")]
    pub feed_cache_ttl_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Path of the JSONL reward audit log (disabled when unset)
    #[arg(long, env = "REWARD_AUDIT_LOG")]
    pub reward_audit_log: Option<PathBuf>,
}

impl Args {
    /// Feed cursor staleness window.
    pub fn feed_cache_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.feed_cache_ttl_ms)
    }

    /// Whether reward calls run in simulation mode.
    ///
    /// True when explicitly requested or while no payout credential is
    /// configured - there is no anonymous path to a real transfer.
    pub fn simulation_mode(&self) -> bool {
        self.simulation_mode || self.payout_key.is_none()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.ledger_url.is_empty() {
            return Err("LEDGER_URL must not be empty".to_string());
        }

        if self.content_url.is_empty() {
            return Err("CONTENT_URL must not be empty".to_string());
        }

        if self.request_timeout_ms == 0 {
            return Err("REQUEST_TIMEOUT_MS must be greater than zero".to_string());
        }

        Ok(())
    }
}
