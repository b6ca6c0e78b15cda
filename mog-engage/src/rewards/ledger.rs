//! Reward ledger client
//!
//! Single RPC-style call against the reward ledger service. The ledger owns
//! payout execution and dedup (one reward per user per content per action);
//! this client only shapes the request and classifies the response.
//!
//! Business-level declines (self-engagement, already rewarded) come back as
//! [`RewardOutcome::Skipped`] so callers can treat them as quiet no-ops
//! while keeping them distinguishable from transport failures in logs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::content::{ActionKind, ContentType};
use crate::types::{EngageError, Result};

/// One engagement reward trigger, as the ledger service expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardRequest {
    pub content_type: ContentType,
    pub content_id: String,
    pub action_type: ActionKind,
    /// Lowercased wallet address of the engaging user
    pub payer_wallet: String,
    /// Record the transaction without executing a transfer
    pub simulate: bool,
}

/// Successful payout (or simulated payout) details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardReceipt {
    pub action: ActionKind,
    /// Whole-token amount credited
    pub amount: u64,
    /// True when the ledger recorded the reward without a transfer
    pub simulation: bool,
    /// Settlement reference, absent in simulation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
}

/// Ledger response classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewardOutcome {
    /// Reward recorded (and executed unless simulated)
    Rewarded(RewardReceipt),
    /// Business-level decline: duplicate, self-engagement, etc.
    Skipped { reason: String },
}

/// Write access to the reward ledger service.
#[async_trait]
pub trait RewardLedger: Send + Sync {
    async fn record_engagement(&self, request: &RewardRequest) -> Result<RewardOutcome>;
}

// ============================================================================
// HTTP implementation
// ============================================================================

/// Configuration for the HTTP ledger client
#[derive(Debug, Clone)]
pub struct LedgerClientConfig {
    /// Base URL of the reward ledger service
    pub base_url: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// Simulation flag forwarded on every request
    pub simulate: bool,
}

impl Default for LedgerClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8787".to_string(),
            timeout_ms: 10_000,
            simulate: true,
        }
    }
}

impl LedgerClientConfig {
    pub fn from_args(args: &crate::config::Args) -> Self {
        Self {
            base_url: args.ledger_url.clone(),
            timeout_ms: args.request_timeout_ms,
            simulate: args.simulation_mode(),
        }
    }
}

/// Wire shape of the ledger response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LedgerResponse {
    success: bool,
    #[serde(default)]
    amount: Option<u64>,
    #[serde(default)]
    simulation: Option<bool>,
    #[serde(default)]
    tx_hash: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    skipped: Option<bool>,
}

/// Reqwest-backed ledger client.
pub struct HttpRewardLedger {
    http: reqwest::Client,
    config: LedgerClientConfig,
}

impl HttpRewardLedger {
    pub fn new(config: LedgerClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| EngageError::Config(format!("ledger client build failed: {e}")))?;

        Ok(Self { http, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/rewards/engagement", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl RewardLedger for HttpRewardLedger {
    async fn record_engagement(&self, request: &RewardRequest) -> Result<RewardOutcome> {
        let mut request = request.clone();
        request.simulate = request.simulate || self.config.simulate;

        debug!(
            target_id = %request.content_id,
            action = %request.action_type,
            simulate = request.simulate,
            "Sending reward trigger"
        );

        let response = self
            .http
            .post(self.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| EngageError::Ledger(format!("ledger unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngageError::Ledger(format!(
                "ledger returned HTTP {status}"
            )));
        }

        let body: LedgerResponse = response
            .json()
            .await
            .map_err(|e| EngageError::Ledger(format!("malformed ledger response: {e}")))?;

        if body.success {
            return Ok(RewardOutcome::Rewarded(RewardReceipt {
                action: request.action_type,
                amount: body.amount.unwrap_or(0),
                simulation: body.simulation.unwrap_or(request.simulate),
                tx_hash: body.tx_hash,
            }));
        }

        let reason = body.error.unwrap_or_else(|| "unspecified".to_string());
        if body.skipped.unwrap_or(false) {
            Ok(RewardOutcome::Skipped { reason })
        } else {
            warn!(reason = %reason, "Ledger rejected reward trigger");
            Err(EngageError::Ledger(reason))
        }
    }
}
