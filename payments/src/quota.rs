//! Rolling 30-day quota of free official ballots.

use serde::{Deserialize, Serialize};
use svote_types::{Timestamp, Wei, THIRTY_DAYS_SECS};

/// What the next counted ballot costs a democracy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BallotQuote {
    /// Premium accounts are not metered.
    Exempt,
    /// Within quota; the ballot will be counted.
    Free,
    /// Quota used up; the ballot needs this fee and is not counted.
    ExtraFee(Wei),
}

/// Creation times of the ballots counted against a democracy's quota.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountedBallots {
    created: Vec<Timestamp>,
}

impl CountedBallots {
    /// The next ballot is free if fewer than `allowed` have been counted, or
    /// if the one `allowed` positions back is more than 30 days old.
    pub fn next_is_free(&self, allowed: u64, now: Timestamp) -> bool {
        let len = self.created.len();
        let allowed = usize::try_from(allowed).unwrap_or(usize::MAX);
        if allowed == 0 {
            return false;
        }
        if len < allowed {
            return true;
        }
        self.created[len - allowed].elapsed_since(now) > THIRTY_DAYS_SECS
    }

    pub fn record(&mut self, now: Timestamp) {
        self.created.push(now);
    }

    pub fn len(&self) -> usize {
        self.created.len()
    }

    pub fn is_empty(&self) -> bool {
        self.created.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Timestamp> {
        self.created.get(index).copied()
    }
}
