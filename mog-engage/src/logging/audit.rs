//! Reward audit logging
//!
//! Appends one JSONL line per reward outcome. In simulation mode this file
//! is the durable record of what would have been paid; in live mode it is
//! the diagnostic trail for payouts the user never sees fail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::content::{ActionKind, ContentType, EngagementTarget};
use crate::rewards::ledger::RewardReceipt;

/// How a reward trigger resolved.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RewardEventOutcome {
    /// Ledger recorded (and unless simulated, executed) the reward
    Rewarded,
    /// Business-level decline: duplicate, self-engagement
    Skipped,
    /// Transport or backend failure
    Failed,
}

/// One reward trigger outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardEvent {
    /// Event timestamp
    pub timestamp: DateTime<Utc>,
    /// Outcome classification
    pub outcome: RewardEventOutcome,
    /// Action that triggered the reward
    pub action: ActionKind,
    /// Engaged content
    pub content_type: ContentType,
    pub content_id: String,
    /// Lowercased wallet of the engaging user
    pub payer_wallet: String,
    /// Whole-token amount (rewarded outcomes only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,
    /// Whether the ledger ran in simulation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simulation: Option<bool>,
    /// Settlement reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    /// Skip/failure reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl RewardEvent {
    fn new(
        outcome: RewardEventOutcome,
        target: &EngagementTarget,
        action: ActionKind,
        payer_wallet: &str,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            outcome,
            action,
            content_type: target.content_type,
            content_id: target.content_id.clone(),
            payer_wallet: payer_wallet.to_string(),
            amount: None,
            simulation: None,
            tx_hash: None,
            reason: None,
        }
    }

    /// A recorded reward.
    pub fn rewarded(target: &EngagementTarget, wallet: &str, receipt: &RewardReceipt) -> Self {
        let mut event = Self::new(RewardEventOutcome::Rewarded, target, receipt.action, wallet);
        event.amount = Some(receipt.amount);
        event.simulation = Some(receipt.simulation);
        event.tx_hash = receipt.tx_hash.clone();
        event
    }

    /// A business-level skip.
    pub fn skipped(
        target: &EngagementTarget,
        action: ActionKind,
        wallet: &str,
        reason: &str,
    ) -> Self {
        let mut event = Self::new(RewardEventOutcome::Skipped, target, action, wallet);
        event.reason = Some(reason.to_string());
        event
    }

    /// A transport or backend failure.
    pub fn failed(
        target: &EngagementTarget,
        action: ActionKind,
        wallet: &str,
        reason: &str,
    ) -> Self {
        let mut event = Self::new(RewardEventOutcome::Failed, target, action, wallet);
        event.reason = Some(reason.to_string());
        event
    }

    /// Convert to JSONL line
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Audit logger that appends reward events to a JSONL file.
///
/// Disabled (no writer) until [`RewardAuditLog::init_file`] is called;
/// logging to a disabled logger is a no-op, so callers never branch.
#[derive(Clone, Default)]
pub struct RewardAuditLog {
    inner: Arc<Mutex<AuditInner>>,
}

#[derive(Default)]
struct AuditInner {
    writer: Option<BufWriter<File>>,
    path: Option<PathBuf>,
}

impl RewardAuditLog {
    /// Create a disabled audit log
    pub fn new() -> Self {
        Self::default()
    }

    /// Initialize file logging to the specified path
    pub async fn init_file(&self, path: PathBuf) -> std::io::Result<()> {
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let writer = BufWriter::new(file);

        let mut inner = self.inner.lock().await;
        inner.writer = Some(writer);
        inner.path = Some(path.clone());

        info!("Reward audit logging initialized to {}", path.display());
        Ok(())
    }

    /// Log a reward event
    pub async fn log(&self, event: RewardEvent) {
        let jsonl = match event.to_jsonl() {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to serialize reward event: {}", e);
                return;
            }
        };

        let mut inner = self.inner.lock().await;

        if let Some(ref mut writer) = inner.writer {
            if let Err(e) = writeln!(writer, "{}", jsonl) {
                error!("Failed to write reward event: {}", e);
            }
            // Flush per event; reward volume is low and the file is the
            // payout record in simulation mode.
            if let Err(e) = writer.flush() {
                error!("Failed to flush reward audit log: {}", e);
            }
        }
    }
}
