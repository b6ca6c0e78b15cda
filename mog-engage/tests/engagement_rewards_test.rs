//! Engagement reward integration tests
//!
//! Exercises the view tracker and action dispatcher against fake ledgers:
//! - exactly one view reward per (target, session), under racing observes
//! - target changes cancel the pending dwell timer
//! - precondition misses and ledger failures never surface to callers
//! - reward outcomes land in the JSONL audit trail

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use mog_engage::content::{ActionKind, ContentType, EngagementTarget};
use mog_engage::logging::RewardAuditLog;
use mog_engage::rewards::{
    EngagementDispatcher, RewardLedger, RewardOutcome, RewardReceipt, RewardRequest, ViewTracker,
};
use mog_engage::Result;

/// Ledger fake that counts calls and records the requests it saw.
#[derive(Default)]
struct RecordingLedger {
    calls: AtomicUsize,
    requests: std::sync::Mutex<Vec<RewardRequest>>,
    fail: bool,
}

impl RecordingLedger {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl RewardLedger for RecordingLedger {
    async fn record_engagement(&self, request: &RewardRequest) -> Result<RewardOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(mog_engage::EngageError::Ledger("down".to_string()));
        }
        Ok(RewardOutcome::Rewarded(RewardReceipt {
            action: request.action_type,
            amount: 1,
            simulation: true,
            tx_hash: None,
        }))
    }
}

fn video(id: &str) -> EngagementTarget {
    EngagementTarget::new(ContentType::Video, id)
}

#[tokio::test]
async fn test_racing_observes_reward_exactly_once() {
    let ledger = Arc::new(RecordingLedger::default());
    let tracker = Arc::new(ViewTracker::with_dwell(
        ledger.clone(),
        Duration::from_millis(20),
    ));

    // Concurrent observers of the same target, straddling the threshold.
    let mut handles = Vec::new();
    for _ in 0..8 {
        let tracker = tracker.clone();
        handles.push(tokio::spawn(async move {
            for _ in 0..10 {
                tracker.observe(&video("v-1"), Some("0xabc"));
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }
    tokio::time::sleep(Duration::from_millis(80)).await;

    assert_eq!(ledger.calls.load(Ordering::SeqCst), 1);
    let requests = ledger.requests.lock().unwrap();
    assert_eq!(requests[0].action_type, ActionKind::View);
    assert_eq!(requests[0].content_id, "v-1");
}

#[tokio::test]
async fn test_target_change_before_threshold_cancels_reward() {
    let ledger = Arc::new(RecordingLedger::default());
    let tracker = ViewTracker::with_dwell(ledger.clone(), Duration::from_millis(50));

    tracker.observe(&video("v-1"), Some("0xabc"));
    tokio::time::sleep(Duration::from_millis(10)).await;
    tracker.observe(&video("v-2"), Some("0xabc"));
    tokio::time::sleep(Duration::from_millis(150)).await;

    // Only the surviving target was rewarded.
    assert_eq!(ledger.calls.load(Ordering::SeqCst), 1);
    assert_eq!(ledger.requests.lock().unwrap()[0].content_id, "v-2");
}

#[tokio::test]
async fn test_missing_wallet_never_reaches_ledger() {
    let ledger = Arc::new(RecordingLedger::default());

    let tracker = ViewTracker::with_dwell(ledger.clone(), Duration::from_millis(10));
    tracker.observe(&video("v-1"), None);
    tracker.observe(&video("v-1"), Some(""));

    let dispatcher = EngagementDispatcher::new(ledger.clone());
    assert!(dispatcher
        .trigger(&video("v-1"), ActionKind::Like, None)
        .await
        .is_none());

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(ledger.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_ledger_failure_is_swallowed_everywhere() {
    let ledger = Arc::new(RecordingLedger::failing());

    let dispatcher = EngagementDispatcher::new(ledger.clone());
    let receipt = dispatcher
        .trigger(&video("v-1"), ActionKind::Comment, Some("0xabc"))
        .await;
    assert!(receipt.is_none());

    let tracker = ViewTracker::with_dwell(ledger.clone(), Duration::from_millis(10));
    tracker.observe(&video("v-2"), Some("0xabc"));
    tokio::time::sleep(Duration::from_millis(60)).await;

    // Both paths called through and neither panicked or propagated.
    assert_eq!(ledger.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_wallet_normalized_before_dispatch() {
    let ledger = Arc::new(RecordingLedger::default());
    let dispatcher = EngagementDispatcher::new(ledger.clone());

    dispatcher
        .trigger(&video("v-1"), ActionKind::Share, Some("0xAbCdEf"))
        .await;

    assert_eq!(ledger.requests.lock().unwrap()[0].payer_wallet, "0xabcdef");
}

#[tokio::test]
async fn test_outcomes_append_to_audit_trail() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rewards.jsonl");

    let audit = RewardAuditLog::new();
    audit.init_file(path.clone()).await.unwrap();

    let rewarded = Arc::new(RecordingLedger::default());
    EngagementDispatcher::new(rewarded)
        .with_audit(audit.clone())
        .trigger(&video("v-1"), ActionKind::Like, Some("0xabc"))
        .await;

    let failing = Arc::new(RecordingLedger::failing());
    EngagementDispatcher::new(failing)
        .with_audit(audit)
        .trigger(&video("v-1"), ActionKind::Share, Some("0xabc"))
        .await;

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("\"rewarded\""));
    assert!(lines[1].contains("\"failed\""));
}
