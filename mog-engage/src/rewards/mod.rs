//! Engagement rewards
//!
//! Converts user interactions into token-reward triggers against the
//! reward ledger service. The rate table is fixed in this core; the ledger
//! response is authoritative for what was actually paid.

pub mod dispatcher;
pub mod ledger;
pub mod view_tracker;

use std::time::Duration;

use crate::content::ActionKind;

pub use dispatcher::EngagementDispatcher;
pub use ledger::{HttpRewardLedger, RewardLedger, RewardOutcome, RewardReceipt, RewardRequest};
pub use view_tracker::ViewTracker;

// ============================================================================
// Reward Rate Table
// ============================================================================

/// Minimum continuous view duration before a view is reward-worthy.
pub const DWELL_THRESHOLD: Duration = Duration::from_millis(5000);

/// Whole-token reward for one action, in $TOKEN.
///
/// Total over the closed [`ActionKind`] set; adding an action without a
/// rate is a compile error.
pub fn rate_for(action: ActionKind) -> u64 {
    match action {
        ActionKind::View => 1,
        ActionKind::Like => 5,
        ActionKind::Comment => 10,
        ActionKind::Share => 3,
        ActionKind::Bookmark => 2,
    }
}
