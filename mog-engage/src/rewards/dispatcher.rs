//! Engagement action dispatcher
//!
//! Fire-and-forget reward triggers for discrete actions (like, comment,
//! share, bookmark). The contract is "never blocks, never throws": from the
//! caller's viewpoint every trigger succeeds, with failure detail going to
//! logs and the audit trail only. The caller's UI updates its counts
//! optimistically and reconciles on the next fetch - nothing here mutates
//! local state.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::content::{ActionKind, EngagementTarget};
use crate::logging::{RewardAuditLog, RewardEvent};
use crate::rewards::ledger::{RewardLedger, RewardOutcome, RewardReceipt, RewardRequest};

/// Dispatches discrete engagement actions to the reward ledger.
#[derive(Clone)]
pub struct EngagementDispatcher {
    ledger: Arc<dyn RewardLedger>,
    audit: RewardAuditLog,
}

impl EngagementDispatcher {
    pub fn new(ledger: Arc<dyn RewardLedger>) -> Self {
        Self {
            ledger,
            audit: RewardAuditLog::new(),
        }
    }

    /// Attach a reward audit log.
    pub fn with_audit(mut self, audit: RewardAuditLog) -> Self {
        self.audit = audit;
        self
    }

    /// Trigger a reward for a discrete action.
    ///
    /// Returns the ledger receipt on success and `None` for everything
    /// else: missing wallet or empty content id (normal no-op, no network
    /// call), business-level skips, and transport failures. Never returns
    /// an error and never panics.
    pub async fn trigger(
        &self,
        target: &EngagementTarget,
        action: ActionKind,
        wallet: Option<&str>,
    ) -> Option<RewardReceipt> {
        record_reward(self.ledger.as_ref(), &self.audit, target, action, wallet).await
    }

    /// Trigger a reward without awaiting the outcome.
    ///
    /// The call is spawned onto the runtime; its result is logged and
    /// audited but never surfaces to the caller.
    pub fn trigger_detached(
        &self,
        target: EngagementTarget,
        action: ActionKind,
        wallet: Option<String>,
    ) {
        let dispatcher = self.clone();
        tokio::spawn(async move {
            let receipt = dispatcher
                .trigger(&target, action, wallet.as_deref())
                .await;
            debug!(
                target = %target,
                action = %action,
                rewarded = receipt.is_some(),
                "Detached reward trigger resolved"
            );
        });
    }
}

/// Shared reward path for the dispatcher and the view tracker.
///
/// Checks preconditions, lowercases the wallet, classifies the outcome,
/// and feeds the audit log. All failure modes collapse to `None`.
pub(crate) async fn record_reward(
    ledger: &dyn RewardLedger,
    audit: &RewardAuditLog,
    target: &EngagementTarget,
    action: ActionKind,
    wallet: Option<&str>,
) -> Option<RewardReceipt> {
    // Normal no-op: user not connected or content not yet resolved.
    let wallet = wallet.filter(|w| !w.is_empty())?;
    if !target.is_valid() {
        return None;
    }

    let payer_wallet = wallet.to_lowercase();
    let request = RewardRequest {
        content_type: target.content_type,
        content_id: target.content_id.clone(),
        action_type: action,
        payer_wallet: payer_wallet.clone(),
        simulate: false,
    };

    match ledger.record_engagement(&request).await {
        Ok(RewardOutcome::Rewarded(receipt)) => {
            debug!(
                target = %target,
                action = %action,
                amount = receipt.amount,
                simulation = receipt.simulation,
                "Engagement rewarded"
            );
            audit
                .log(RewardEvent::rewarded(target, &payer_wallet, &receipt))
                .await;
            Some(receipt)
        }
        Ok(RewardOutcome::Skipped { reason }) => {
            debug!(target = %target, action = %action, reason = %reason, "Reward skipped");
            audit
                .log(RewardEvent::skipped(target, action, &payer_wallet, &reason))
                .await;
            None
        }
        Err(e) => {
            // Best-effort by design: payout failure must never degrade the
            // engagement action itself.
            warn!(target = %target, action = %action, "Reward trigger failed: {e}");
            audit
                .log(RewardEvent::failed(
                    target,
                    action,
                    &payer_wallet,
                    &e.to_string(),
                ))
                .await;
            None
        }
    }
}
