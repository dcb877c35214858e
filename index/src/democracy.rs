//! A tenant organization and its ballots.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use svote_types::{BallotId, Principal, Timestamp};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Democracy {
    pub name: String,
    pub owner: Principal,
    /// The owner is always an editor and is not listed here.
    pub editors: BTreeSet<Principal>,
    pub community_ballots_enabled: bool,
    pub ballots: Vec<BallotId>,
    pub created_at: Timestamp,
}

impl Democracy {
    pub fn new(name: String, owner: Principal, now: Timestamp) -> Self {
        Self {
            name,
            owner,
            editors: BTreeSet::new(),
            community_ballots_enabled: true,
            ballots: Vec::new(),
            created_at: now,
        }
    }

    pub fn is_editor(&self, who: &Principal) -> bool {
        self.owner == *who || self.editors.contains(who)
    }
}
