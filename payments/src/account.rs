//! Per-democracy subscription state.

use serde::{Deserialize, Serialize};
use svote_types::Timestamp;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionAccount {
    pub is_premium: bool,
    pub last_paid: Timestamp,
    pub paid_until: Timestamp,
    pub deny_premium: bool,
    /// Last upgrade to premium, if any.
    pub last_upgrade: Option<Timestamp>,
    pub free_extension: bool,
}

impl SubscriptionAccount {
    pub fn seconds_remaining(&self, now: Timestamp) -> u64 {
        self.paid_until.secs_until(now)
    }

    /// Paid time remains.
    pub fn in_good_standing(&self, now: Timestamp) -> bool {
        self.paid_until > now
    }

    /// `(is_premium, last_paid, paid_until, deny_premium)`
    pub fn summary(&self) -> (bool, Timestamp, Timestamp, bool) {
        (self.is_premium, self.last_paid, self.paid_until, self.deny_premium)
    }
}
