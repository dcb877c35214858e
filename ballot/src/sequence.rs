//! Per-signer replay guard for relayed votes.
//!
//! A relayed vote is accepted only if its sequence number is strictly greater
//! than the last one stored for its signer. A direct vote pins the signer's
//! sequence at [`MAX_SEQUENCE`], so no relayed vote from that signer is ever
//! accepted on the ballot again. A signed vote carries no sequence, so it is
//! accepted only while its signer has nothing stored.

use crate::error::BallotError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use svote_types::Principal;

pub const MAX_SEQUENCE: u32 = u32::MAX;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SequenceGuard {
    last: HashMap<Principal, u32>,
}

impl SequenceGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last stored sequence for `signer`, 0 if none.
    pub fn get(&self, signer: &Principal) -> u32 {
        self.last.get(signer).copied().unwrap_or(0)
    }

    /// Check a relayed sequence without recording it.
    pub fn check(&self, signer: &Principal, offered: u64) -> Result<u32, BallotError> {
        let seq = u32::try_from(offered).map_err(|_| BallotError::SequenceOverflow(offered))?;
        let stored = self.get(signer);
        if seq <= stored {
            return Err(BallotError::StaleSequence { stored, offered });
        }
        Ok(seq)
    }

    /// Check that `signer` has never voted here by any path.
    pub fn check_unused(&self, signer: &Principal) -> Result<(), BallotError> {
        if self.get(signer) != 0 {
            return Err(BallotError::SignedVoteReplayed(signer.clone()));
        }
        Ok(())
    }

    pub fn record(&mut self, signer: &Principal, seq: u32) {
        self.last.insert(signer.clone(), seq);
    }

    pub fn mark_direct(&mut self, signer: &Principal) {
        self.record(signer, MAX_SEQUENCE);
    }
}
