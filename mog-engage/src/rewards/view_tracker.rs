//! Dwell-time view tracker
//!
//! Rewards exactly one "view" per qualifying dwell, per (target, session).
//! A session begins when a content instance becomes the tracked target and
//! ends when the target changes or the tracker is cancelled/dropped. The
//! session's `tracked` flag flips true at most once, checked with a
//! compare-exchange immediately before dispatch - a timer firing
//! concurrently with a late duplicate schedule cannot double-reward.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

use crate::content::{ActionKind, EngagementTarget};
use crate::logging::RewardAuditLog;
use crate::rewards::dispatcher::record_reward;
use crate::rewards::ledger::RewardLedger;
use crate::rewards::DWELL_THRESHOLD;

/// Per-target view session state.
struct ViewSession {
    target: EngagementTarget,
    session_id: Uuid,
    /// Flips true at most once; the single allowed transition.
    tracked: Arc<AtomicBool>,
    timer: JoinHandle<()>,
}

/// Tracks the currently-viewed content instance for one UI component.
///
/// Owned exclusively by that component; never shared across components.
pub struct ViewTracker {
    ledger: Arc<dyn RewardLedger>,
    audit: RewardAuditLog,
    dwell: Duration,
    session: Mutex<Option<ViewSession>>,
}

impl ViewTracker {
    pub fn new(ledger: Arc<dyn RewardLedger>) -> Self {
        Self::with_dwell(ledger, DWELL_THRESHOLD)
    }

    /// Tracker with a custom dwell threshold (tests use short ones).
    pub fn with_dwell(ledger: Arc<dyn RewardLedger>, dwell: Duration) -> Self {
        Self {
            ledger,
            audit: RewardAuditLog::new(),
            dwell,
            session: Mutex::new(None),
        }
    }

    /// Attach a reward audit log.
    pub fn with_audit(mut self, audit: RewardAuditLog) -> Self {
        self.audit = audit;
        self
    }

    /// Observe the active content target.
    ///
    /// Starts the dwell timer for a new target; repeated observes of the
    /// same still-active target are idempotent. A target change cancels
    /// the pending timer and begins a fresh session. Missing wallet or
    /// empty content id is a silent no-op.
    pub fn observe(&self, target: &EngagementTarget, wallet: Option<&str>) {
        let Some(wallet) = wallet.filter(|w| !w.is_empty()) else {
            return;
        };
        if !target.is_valid() {
            return;
        }

        let mut session = match self.session.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(ref current) = *session {
            if current.target == *target {
                // Same still-active target: the pending timer (or the
                // already-tracked flag) covers this observe.
                return;
            }
            current.timer.abort();
            debug!(
                session_id = %current.session_id,
                old = %current.target,
                new = %target,
                "View session superseded before dwell threshold"
            );
        }

        let session_id = Uuid::new_v4();
        let tracked = Arc::new(AtomicBool::new(false));

        let ledger = Arc::clone(&self.ledger);
        let audit = self.audit.clone();
        let dwell = self.dwell;
        let timer_target = target.clone();
        let timer_tracked = Arc::clone(&tracked);
        let timer_wallet = wallet.to_string();

        let timer = tokio::spawn(async move {
            tokio::time::sleep(dwell).await;

            // Monotonic guard, checked at fire time rather than schedule
            // time: only one winner per session, ever.
            if timer_tracked
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                .is_err()
            {
                return;
            }

            debug!(session_id = %session_id, target = %timer_target, "Dwell threshold reached");
            let _ = record_reward(
                ledger.as_ref(),
                &audit,
                &timer_target,
                ActionKind::View,
                Some(&timer_wallet),
            )
            .await;
        });

        *session = Some(ViewSession {
            target: target.clone(),
            session_id,
            tracked,
            timer,
        });
    }

    /// Whether the current session already dispatched its view reward.
    pub fn is_tracked(&self, target: &EngagementTarget) -> bool {
        let session = match self.session.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        session
            .as_ref()
            .map(|s| s.target == *target && s.tracked.load(Ordering::SeqCst))
            .unwrap_or(false)
    }

    /// End the current session, cancelling any pending dwell timer.
    pub fn cancel(&self) {
        let mut session = match self.session.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(s) = session.take() {
            s.timer.abort();
            debug!(session_id = %s.session_id, target = %s.target, "View session cancelled");
        }
    }
}

impl Drop for ViewTracker {
    fn drop(&mut self) {
        self.cancel();
    }
}
