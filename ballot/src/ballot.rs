//! The ballot record and its lifecycle.
//!
//! ```text
//! Pending --start--> Open --end--> Closed
//!    \                 |              /
//!     +----------> Deprecated <------+
//! ```
//!
//! Time-driven transitions are computed from `now` on every read; only
//! deprecation is stored.

use crate::error::BallotError;
use crate::flags::{AuthMode, SubmissionMode};
use crate::packed::{PackedField, PackedTiming};
use crate::rlp;
use crate::sequence::SequenceGuard;
use crate::sponsor::{SponsorLedger, Sponsorship};
use crate::vote::{Vote, VoteRange};
use serde::{Deserialize, Serialize};
use svote_admin::PermissionStore;
use svote_types::{BallotId, EncSeckey, Principal, SpecHash, Timestamp, Wei};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallotState {
    Pending,
    Open,
    Closed,
    Deprecated,
}

/// Aggregate read of one ballot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotDetails {
    /// Whether the queried voter has a non-zero sequence on this ballot.
    pub has_voted: bool,
    pub deprecated: bool,
    pub n_votes: u64,
    /// Zero until revealed.
    pub enc_seckey: EncSeckey,
    pub submission_bits: u16,
    pub start: Timestamp,
    pub end: Timestamp,
    pub spec_hash: SpecHash,
    pub is_official: bool,
    pub owner: Principal,
    pub extra: Vec<u8>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Ballot {
    id: BallotId,
    spec_hash: SpecHash,
    timing: PackedTiming,
    owner: Principal,
    creator: Principal,
    deprecated: bool,
    enc_seckey: Option<EncSeckey>,
    votes: Vec<Vote>,
    sponsorships: SponsorLedger,
    sequences: SequenceGuard,
    extra: Vec<u8>,
    created_at: Timestamp,
}

impl Ballot {
    /// Build a fresh ballot. Uniqueness of `spec_hash` is the farm's concern.
    pub fn create(
        id: BallotId,
        spec_hash: SpecHash,
        packed: PackedField,
        creator: Principal,
        owner: Option<Principal>,
        extra: Vec<u8>,
        now: Timestamp,
    ) -> Result<Self, BallotError> {
        if spec_hash.is_zero() {
            return Err(BallotError::ZeroSpecHash);
        }
        let timing = PackedTiming::for_new_ballot(packed, now)?;
        Ok(Self {
            id,
            spec_hash,
            timing,
            owner: owner.unwrap_or_else(|| creator.clone()),
            creator,
            deprecated: false,
            enc_seckey: None,
            votes: Vec::new(),
            sponsorships: SponsorLedger::default(),
            sequences: SequenceGuard::new(),
            extra,
            created_at: now,
        })
    }

    pub fn id(&self) -> BallotId {
        self.id
    }

    pub fn spec_hash(&self) -> SpecHash {
        self.spec_hash
    }

    pub fn timing(&self) -> &PackedTiming {
        &self.timing
    }

    pub fn owner(&self) -> &Principal {
        &self.owner
    }

    pub fn creator(&self) -> &Principal {
        &self.creator
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn extra(&self) -> &[u8] {
        &self.extra
    }

    pub fn enc_seckey(&self) -> EncSeckey {
        self.enc_seckey.unwrap_or(EncSeckey::ZERO)
    }

    pub fn state(&self, now: Timestamp) -> BallotState {
        if self.deprecated {
            BallotState::Deprecated
        } else if now >= self.timing.end {
            BallotState::Closed
        } else if now < self.timing.start {
            BallotState::Pending
        } else {
            BallotState::Open
        }
    }

    pub fn n_votes(&self) -> u64 {
        self.votes.len() as u64
    }

    pub fn vote(&self, index: u64) -> Option<&Vote> {
        usize::try_from(index).ok().and_then(|i| self.votes.get(i))
    }

    pub fn sequence_of(&self, signer: &Principal) -> u32 {
        self.sequences.get(signer)
    }

    pub fn has_voted(&self, voter: &Principal) -> bool {
        self.sequences.get(voter) > 0
    }

    pub fn sponsorships(&self) -> &SponsorLedger {
        &self.sponsorships
    }

    pub fn details(&self, voter: Option<&Principal>) -> BallotDetails {
        BallotDetails {
            has_voted: voter.is_some_and(|v| self.has_voted(v)),
            deprecated: self.deprecated,
            n_votes: self.n_votes(),
            enc_seckey: self.enc_seckey(),
            submission_bits: self.timing.flags.bits(),
            start: self.timing.start,
            end: self.timing.end,
            spec_hash: self.spec_hash,
            is_official: self.timing.flags.is_official(),
            owner: self.owner.clone(),
            extra: self.extra.clone(),
        }
    }

    /// Votes cast within `[from, to]` (inclusive), optionally from one voter,
    /// in insertion order.
    pub fn votes_between(
        &self,
        from: Timestamp,
        to: Timestamp,
        voter: Option<&Principal>,
    ) -> VoteRange {
        let mut range = VoteRange::default();
        let mut extras = Vec::new();
        let matching = self.votes.iter().enumerate().filter(|(_, v)| {
            v.cast_at >= from && v.cast_at <= to && voter.map_or(true, |who| v.voter == *who)
        });
        for (i, vote) in matching {
            range.ids.push(i as u64);
            range.data.push(vote.data.clone());
            range.voters.push(vote.voter.clone());
            range.cast_at.push(vote.cast_at);
            extras.push(vote.extra.as_slice());
        }
        range.extras = rlp::encode_list(&extras);
        range
    }

    /// Check that a vote arriving by `path` can be recorded now.
    pub fn check_submission(&self, path: AuthMode, now: Timestamp) -> Result<(), BallotError> {
        let state = self.state(now);
        if state != BallotState::Open {
            return Err(BallotError::BallotClosed(state));
        }
        if self.timing.flags.auth() != path {
            return Err(BallotError::ModeMismatch(SubmissionMode::of(
                path,
                self.timing.flags.enc(),
            )));
        }
        Ok(())
    }

    /// Record a vote from `voter` itself (eth path) or from a signature it
    /// produced (signed path). Pins the voter's proxy sequence at the maximum.
    /// A signed vote is refused once its signer has any sequence stored, so a
    /// relayed signature counts at most once.
    pub fn submit_direct(
        &mut self,
        path: AuthMode,
        voter: &Principal,
        data: Vec<u8>,
        extra: Vec<u8>,
        now: Timestamp,
    ) -> Result<u64, BallotError> {
        self.check_submission(path, now)?;
        if path == AuthMode::Signed {
            self.sequences.check_unused(voter)?;
        }
        self.sequences.mark_direct(voter);
        Ok(self.append_vote(voter, data, extra, now))
    }

    /// Record a vote relayed on behalf of `signer` whose signature has been
    /// verified by the caller.
    pub fn submit_proxy(
        &mut self,
        signer: &Principal,
        sequence: u64,
        data: Vec<u8>,
        extra: Vec<u8>,
        now: Timestamp,
    ) -> Result<u64, BallotError> {
        self.check_submission(AuthMode::Eth, now)?;
        let seq = self.sequences.check(signer, sequence)?;
        self.sequences.record(signer, seq);
        Ok(self.append_vote(signer, data, extra, now))
    }

    fn append_vote(&mut self, voter: &Principal, data: Vec<u8>, extra: Vec<u8>, now: Timestamp) -> u64 {
        let index = self.votes.len() as u64;
        self.votes.push(Vote {
            data,
            voter: voter.clone(),
            extra,
            cast_at: now,
        });
        tracing::debug!(ballot = %self.id, vote = index, voter = %voter, "vote appended");
        index
    }

    /// Check that a sponsorship of `amount` can be recorded.
    pub fn check_sponsorship(&self, amount: Wei) -> Result<(), BallotError> {
        self.sponsorships.total_after(amount).map(|_| ())
    }

    pub fn record_sponsorship(&mut self, sponsor: &Principal, amount: Wei) -> Result<(), BallotError> {
        self.sponsorships.record(sponsor, amount)
    }

    pub fn sponsor_at(&self, index: usize) -> Option<&Sponsorship> {
        self.sponsorships.get(index)
    }

    pub fn set_owner(&mut self, caller: &Principal, new_owner: Principal) -> Result<(), BallotError> {
        if *caller != self.owner {
            return Err(BallotError::Forbidden(caller.clone()));
        }
        self.owner = new_owner;
        Ok(())
    }

    pub fn set_deprecated(&mut self, caller: &Principal, admins: &PermissionStore) -> Result<(), BallotError> {
        self.require_owner_or_admin(caller, admins)?;
        self.deprecated = true;
        Ok(())
    }

    /// Move the end time. Testing ballots only.
    pub fn set_end_time(
        &mut self,
        caller: &Principal,
        admins: &PermissionStore,
        end: Timestamp,
    ) -> Result<(), BallotError> {
        if !self.timing.flags.is_testing() {
            return Err(BallotError::TestingRequired);
        }
        self.require_owner_or_admin(caller, admins)?;
        self.timing.end = end;
        Ok(())
    }

    pub fn reveal_seckey(
        &mut self,
        caller: &Principal,
        admins: &PermissionStore,
        key: EncSeckey,
        now: Timestamp,
    ) -> Result<(), BallotError> {
        self.require_owner_or_admin(caller, admins)?;
        if now < self.timing.end {
            return Err(BallotError::EarlySeckeyReveal);
        }
        if self.enc_seckey.is_some() {
            return Err(BallotError::SeckeyAlreadyRevealed);
        }
        if key.is_zero() {
            return Err(BallotError::ZeroSeckey);
        }
        self.enc_seckey = Some(key);
        Ok(())
    }

    fn require_owner_or_admin(&self, caller: &Principal, admins: &PermissionStore) -> Result<(), BallotError> {
        if *caller == self.owner || admins.is_admin(caller) {
            Ok(())
        } else {
            Err(BallotError::Forbidden(caller.clone()))
        }
    }
}
