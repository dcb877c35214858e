//! Recorded votes and range query results.

use serde::{Deserialize, Serialize};
use svote_types::{Principal, Timestamp};

/// One recorded vote. Its position in the ballot's vote list is its id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    /// Ballot payload, plaintext or encrypted.
    pub data: Vec<u8>,
    pub voter: Principal,
    /// Encryption public key on encrypted ballots, free-form otherwise.
    pub extra: Vec<u8>,
    pub cast_at: Timestamp,
}

/// Votes cast inside a time window, as parallel columns.
///
/// `extras` is the RLP list encoding of each vote's `extra` (see [`crate::rlp`]).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRange {
    pub ids: Vec<u64>,
    pub data: Vec<Vec<u8>>,
    pub voters: Vec<Principal>,
    pub extras: Vec<u8>,
    pub cast_at: Vec<Timestamp>,
}

impl VoteRange {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
