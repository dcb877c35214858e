//! The ballot farm.

use crate::error::FarmError;
use crate::events::{EventBus, FarmEvent};
use crate::remote::{VotingNetwork, VotingNetworkDetails};
use crate::requests::{ProxyVoteRequest, SignedBallotInit, SignedVote};
use std::collections::HashSet;
use svote_admin::PermissionStore;
use svote_ballot::{AuthMode, Ballot, BallotDetails, BallotError, PackedField, PackedTiming, Vote, VoteRange};
use svote_crypto::SignatureVerifier;
use svote_types::{
    BallotId, EncSeckey, Namespace, Principal, SpecHash, Timestamp, Transfer, ValueTransfer, Wei,
};

/// Namespace-partitioned arena of ballots.
///
/// Ballot `n` (sequence `n`, starting at 1) lives at `ballots[n - 1]`.
pub struct BallotFarm {
    namespace: Namespace,
    permissions: PermissionStore,
    verifier: Box<dyn SignatureVerifier>,
    pub(crate) ballots: Vec<Ballot>,
    pub(crate) spec_hashes: HashSet<SpecHash>,
    pub(crate) payee: Principal,
    pub(crate) voting: VotingNetwork,
    events: EventBus,
}

impl BallotFarm {
    /// A farm that hosts both metadata and votes. Sponsorships go to the
    /// owner until [`BallotFarm::set_payee`] says otherwise.
    pub fn new(namespace: Namespace, permissions: PermissionStore, verifier: Box<dyn SignatureVerifier>) -> Self {
        let payee = permissions.owner().clone();
        Self {
            namespace,
            permissions,
            verifier,
            ballots: Vec::new(),
            spec_hashes: HashSet::new(),
            payee,
            voting: VotingNetwork::Local,
            events: EventBus::new(),
        }
    }

    /// A metadata-only host whose votes are recorded on another network.
    pub fn remote_host(
        namespace: Namespace,
        permissions: PermissionStore,
        verifier: Box<dyn SignatureVerifier>,
        details: VotingNetworkDetails,
    ) -> Self {
        let mut farm = Self::new(namespace, permissions, verifier);
        farm.voting = VotingNetwork::Remote(details);
        farm
    }

    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    pub fn version(&self) -> u16 {
        crate::FARM_VERSION
    }

    pub fn n_ballots(&self) -> u64 {
        self.ballots.len() as u64
    }

    pub fn permissions(&self) -> &PermissionStore {
        &self.permissions
    }

    pub fn permissions_mut(&mut self) -> &mut PermissionStore {
        &mut self.permissions
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&FarmEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    pub fn payee(&self) -> &Principal {
        &self.payee
    }

    pub fn set_payee(&mut self, caller: &Principal, payee: Principal) -> Result<(), FarmError> {
        self.permissions.require_admin(caller)?;
        tracing::info!(namespace = %self.namespace, payee = %payee, "sponsorship payee set");
        self.payee = payee;
        Ok(())
    }

    /// `None` when votes are recorded here.
    pub fn voting_network_details(&self) -> Option<&VotingNetworkDetails> {
        match &self.voting {
            VotingNetwork::Local => None,
            VotingNetwork::Remote(details) => Some(details),
        }
    }

    fn require_local_votes(&self, op: &'static str) -> Result<(), FarmError> {
        match self.voting {
            VotingNetwork::Local => Ok(()),
            VotingNetwork::Remote(_) => Err(FarmError::Unsupported(op)),
        }
    }

    // ── Id resolution ──────────────────────────────────────────────────

    fn slot(&self, id: BallotId) -> Result<usize, FarmError> {
        if id.namespace() != self.namespace {
            return Err(FarmError::WrongNamespace {
                id,
                expected: self.namespace,
                got: id.namespace(),
            });
        }
        let seq = id.sequence();
        if seq == 0 || seq > self.ballots.len() as u128 {
            return Err(FarmError::UnknownBallot(id));
        }
        Ok(seq as usize - 1)
    }

    pub fn ballot(&self, id: BallotId) -> Result<&Ballot, FarmError> {
        let slot = self.slot(id)?;
        Ok(&self.ballots[slot])
    }

    fn ballot_mut(&mut self, id: BallotId) -> Result<&mut Ballot, FarmError> {
        let slot = self.slot(id)?;
        Ok(&mut self.ballots[slot])
    }

    // ── Creation ───────────────────────────────────────────────────────

    /// Run every creation check without creating anything.
    pub fn validate_new_ballot(
        &self,
        spec_hash: SpecHash,
        packed: PackedField,
        now: Timestamp,
    ) -> Result<PackedTiming, FarmError> {
        if spec_hash.is_zero() {
            return Err(BallotError::ZeroSpecHash.into());
        }
        if self.spec_hashes.contains(&spec_hash) {
            return Err(BallotError::DuplicateSpecHash(spec_hash).into());
        }
        Ok(PackedTiming::for_new_ballot(packed, now)?)
    }

    /// Run every check [`BallotFarm::init_ballot`] makes for `caller` without
    /// creating anything.
    pub fn validate_init(
        &self,
        caller: &Principal,
        spec_hash: SpecHash,
        packed: PackedField,
        now: Timestamp,
    ) -> Result<PackedTiming, FarmError> {
        self.permissions.require_permission(caller)?;
        self.next_id()?;
        self.validate_new_ballot(spec_hash, packed, now)
    }

    fn next_id(&self) -> Result<BallotId, FarmError> {
        BallotId::compose(self.namespace, self.ballots.len() as u128 + 1).map_err(|_| FarmError::ArenaFull)
    }

    /// Create a ballot. The caller needs permission on this farm; `owner`
    /// defaults to the caller.
    pub fn init_ballot(
        &mut self,
        caller: &Principal,
        spec_hash: SpecHash,
        packed: PackedField,
        owner: Option<Principal>,
        extra: Vec<u8>,
        now: Timestamp,
    ) -> Result<BallotId, FarmError> {
        self.permissions.require_permission(caller)?;
        self.create(caller.clone(), spec_hash, packed, owner, extra, now)
    }

    /// Create a ballot on behalf of the signer of `req`, who becomes creator
    /// and owner. The relaying caller needs permission.
    pub fn init_ballot_proxy(
        &mut self,
        caller: &Principal,
        req: &SignedBallotInit,
        now: Timestamp,
    ) -> Result<BallotId, FarmError> {
        self.require_local_votes("init_ballot_proxy")?;
        self.permissions.require_permission(caller)?;
        let digest = SignedBallotInit::digest(self.namespace, &req.spec_hash, &req.packed, &req.extra);
        if !self.verifier.verify(&digest, &req.signature, &req.signer) {
            return Err(FarmError::InvalidSignature);
        }
        let owner = req.owner();
        self.create(owner.clone(), req.spec_hash, req.packed, Some(owner), req.extra.clone(), now)
    }

    fn create(
        &mut self,
        creator: Principal,
        spec_hash: SpecHash,
        packed: PackedField,
        owner: Option<Principal>,
        extra: Vec<u8>,
        now: Timestamp,
    ) -> Result<BallotId, FarmError> {
        self.validate_new_ballot(spec_hash, packed, now)?;
        let id = self.next_id()?;
        let ballot = Ballot::create(id, spec_hash, packed, creator, owner, extra, now)?;
        let owner = ballot.owner().clone();

        self.spec_hashes.insert(spec_hash);
        self.ballots.push(ballot);
        tracing::info!(ballot = %id, owner = %owner, spec = %spec_hash, "ballot created");
        self.events.emit(FarmEvent::BallotCreated { id, owner });
        Ok(id)
    }

    // ── Reads ──────────────────────────────────────────────────────────

    pub fn details(&self, id: BallotId, voter: Option<&Principal>) -> Result<BallotDetails, FarmError> {
        Ok(self.ballot(id)?.details(voter))
    }

    pub fn creation_ts(&self, id: BallotId) -> Result<Timestamp, FarmError> {
        Ok(self.ballot(id)?.created_at())
    }

    /// `(data, voter, extra)` of vote `index`.
    pub fn get_vote(&self, id: BallotId, index: u64) -> Result<(&[u8], &Principal, &[u8]), FarmError> {
        let vote = self.get_vote_and_time(id, index)?;
        Ok((vote.data.as_slice(), &vote.voter, vote.extra.as_slice()))
    }

    pub fn get_vote_and_time(&self, id: BallotId, index: u64) -> Result<&Vote, FarmError> {
        self.require_local_votes("get_vote")?;
        self.ballot(id)?
            .vote(index)
            .ok_or(FarmError::UnknownVote { id, index })
    }

    pub fn votes_between(&self, id: BallotId, from: Timestamp, to: Timestamp) -> Result<VoteRange, FarmError> {
        self.require_local_votes("votes_between")?;
        Ok(self.ballot(id)?.votes_between(from, to, None))
    }

    pub fn votes_between_for(
        &self,
        id: BallotId,
        from: Timestamp,
        to: Timestamp,
        voter: &Principal,
    ) -> Result<VoteRange, FarmError> {
        self.require_local_votes("votes_between_for")?;
        Ok(self.ballot(id)?.votes_between(from, to, Some(voter)))
    }

    pub fn get_sequence_number(&self, id: BallotId, voter: &Principal) -> Result<u32, FarmError> {
        self.require_local_votes("get_sequence_number")?;
        Ok(self.ballot(id)?.sequence_of(voter))
    }

    // ── Votes ──────────────────────────────────────────────────────────

    /// Vote as `caller` on a USE_ETH ballot.
    pub fn submit_vote(
        &mut self,
        id: BallotId,
        caller: &Principal,
        data: Vec<u8>,
        extra: Vec<u8>,
        now: Timestamp,
    ) -> Result<u64, FarmError> {
        self.require_local_votes("submit_vote")?;
        let index = self
            .ballot_mut(id)?
            .submit_direct(AuthMode::Eth, caller, data, extra, now)?;
        self.vote_cast(id, index, caller);
        Ok(index)
    }

    /// Submit a signature-authorized vote to a USE_SIGNED ballot.
    pub fn submit_signed_vote(&mut self, id: BallotId, vote: &SignedVote, now: Timestamp) -> Result<u64, FarmError> {
        self.require_local_votes("submit_signed_vote")?;
        self.ballot(id)?.check_submission(AuthMode::Signed, now)?;
        let digest = SignedVote::digest(id, &vote.vote, &vote.extra);
        if !self.verifier.verify(&digest, &vote.signature, &vote.signer) {
            return Err(FarmError::InvalidSignature);
        }
        let voter = vote.voter();
        let index = self.ballot_mut(id)?.submit_direct(
            AuthMode::Signed,
            &voter,
            vote.vote.clone(),
            vote.extra.clone(),
            now,
        )?;
        self.vote_cast(id, index, &voter);
        Ok(index)
    }

    /// Relay a vote signed off-line by `req.signer` to a USE_ETH ballot.
    pub fn submit_proxy_vote(
        &mut self,
        req: &ProxyVoteRequest,
        extra: Vec<u8>,
        now: Timestamp,
    ) -> Result<u64, FarmError> {
        self.require_local_votes("submit_proxy_vote")?;
        let id = req.ballot_id;
        self.ballot(id)?.check_submission(AuthMode::Eth, now)?;
        let digest = ProxyVoteRequest::digest(id, req.sequence, &req.vote);
        if !self.verifier.verify(&digest, &req.signature, &req.signer) {
            return Err(FarmError::InvalidSignature);
        }
        let voter = req.voter();
        let index = self
            .ballot_mut(id)?
            .submit_proxy(&voter, req.sequence, req.vote.clone(), extra, now)?;
        self.vote_cast(id, index, &voter);
        Ok(index)
    }

    fn vote_cast(&self, id: BallotId, index: u64, voter: &Principal) {
        tracing::info!(ballot = %id, vote = index, voter = %voter, "vote cast");
        self.events.emit(FarmEvent::VoteCast {
            id,
            index,
            voter: voter.clone(),
        });
    }

    // ── Sponsorship ────────────────────────────────────────────────────

    /// Record `amount` from `sponsor` and forward it to the payee. A failed
    /// transfer leaves the ledger untouched.
    pub fn sponsor(
        &mut self,
        id: BallotId,
        sponsor: &Principal,
        amount: Wei,
        bank: &mut dyn ValueTransfer,
    ) -> Result<(), FarmError> {
        self.require_local_votes("sponsor")?;
        if amount.is_zero() {
            return Err(FarmError::ZeroSponsorship);
        }
        self.ballot(id)?.check_sponsorship(amount)?;
        if let Err(e) = bank.settle(&[Transfer::new(sponsor, &self.payee, amount)]) {
            tracing::warn!(ballot = %id, sponsor = %sponsor, %amount, error = %e, "sponsorship forward failed");
            return Err(e.into());
        }
        self.ballot_mut(id)?.record_sponsorship(sponsor, amount)?;
        tracing::info!(ballot = %id, sponsor = %sponsor, %amount, "ballot sponsored");
        self.events.emit(FarmEvent::Sponsored {
            id,
            sponsor: sponsor.clone(),
            amount,
        });
        Ok(())
    }

    pub fn total_sponsorship(&self, id: BallotId) -> Result<Wei, FarmError> {
        self.require_local_votes("total_sponsorship")?;
        Ok(self.ballot(id)?.sponsorships().total())
    }

    pub fn sponsors_n(&self, id: BallotId) -> Result<usize, FarmError> {
        self.require_local_votes("sponsors_n")?;
        Ok(self.ballot(id)?.sponsorships().len())
    }

    pub fn get_sponsor(&self, id: BallotId, index: usize) -> Result<(&Principal, Wei), FarmError> {
        self.require_local_votes("get_sponsor")?;
        self.ballot(id)?
            .sponsor_at(index)
            .map(|s| (&s.sponsor, s.amount))
            .ok_or(FarmError::UnknownSponsor { id, index })
    }

    // ── Ballot administration ──────────────────────────────────────────

    pub fn set_ballot_owner(&mut self, id: BallotId, caller: &Principal, owner: Principal) -> Result<(), FarmError> {
        self.ballot_mut(id)?.set_owner(caller, owner.clone())?;
        tracing::info!(ballot = %id, owner = %owner, "ballot owner changed");
        self.events.emit(FarmEvent::OwnerChanged { id, owner });
        Ok(())
    }

    pub fn set_deprecated(&mut self, id: BallotId, caller: &Principal) -> Result<(), FarmError> {
        let slot = self.slot(id)?;
        self.ballots[slot].set_deprecated(caller, &self.permissions)?;
        tracing::info!(ballot = %id, by = %caller, "ballot deprecated");
        self.events.emit(FarmEvent::Deprecated { id });
        Ok(())
    }

    pub fn set_end_time(&mut self, id: BallotId, caller: &Principal, end: Timestamp) -> Result<(), FarmError> {
        let slot = self.slot(id)?;
        self.ballots[slot].set_end_time(caller, &self.permissions, end)?;
        tracing::info!(ballot = %id, end = %end, "ballot end time changed");
        self.events.emit(FarmEvent::EndTimeChanged { id, end });
        Ok(())
    }

    pub fn reveal_seckey(
        &mut self,
        id: BallotId,
        caller: &Principal,
        key: EncSeckey,
        now: Timestamp,
    ) -> Result<(), FarmError> {
        let slot = self.slot(id)?;
        self.ballots[slot].reveal_seckey(caller, &self.permissions, key, now)?;
        tracing::info!(ballot = %id, "seckey revealed");
        self.events.emit(FarmEvent::SeckeyRevealed { id });
        Ok(())
    }
}
