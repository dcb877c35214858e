//! Farms whose votes live on a different network from the ballot metadata.
//!
//! The host network runs a [`BallotFarm`](crate::BallotFarm) in
//! [`VotingNetwork::Remote`] mode: it keeps specs, timing, owners and seckeys
//! and refuses vote traffic. The voting network runs a [`RemoteVoteFarm`]: it
//! takes votes for any id in its namespace, trusting the host for timing and
//! policy, and refuses every operation that must be authoritative where the
//! metadata lives.

use crate::error::FarmError;
use crate::events::{EventBus, FarmEvent};
use crate::requests::ProxyVoteRequest;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use svote_ballot::{SequenceGuard, Vote};
use svote_crypto::SignatureVerifier;
use svote_types::{BallotId, EncSeckey, Namespace, Principal, SpecHash, Timestamp, Wei};

/// Where a ballot's votes are recorded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingNetworkDetails {
    pub network_id: u64,
    pub chain_id: u32,
    pub remote_farm: Principal,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VotingNetwork {
    #[default]
    Local,
    Remote(VotingNetworkDetails),
}

#[derive(Default)]
struct RemoteTally {
    votes: Vec<Vote>,
    sequences: SequenceGuard,
}

/// Vote store on the voting network.
///
/// Ballot metadata lives on the host, so any non-zero sequence in this
/// namespace is taken as a ballot and gets a tally on first vote. Tallies are
/// never dropped.
pub struct RemoteVoteFarm {
    namespace: Namespace,
    identity: Principal,
    verifier: Box<dyn SignatureVerifier>,
    tallies: HashMap<BallotId, RemoteTally>,
    events: EventBus,
}

impl RemoteVoteFarm {
    pub fn new(namespace: Namespace, identity: Principal, verifier: Box<dyn SignatureVerifier>) -> Self {
        Self {
            namespace,
            identity,
            verifier,
            tallies: HashMap::new(),
            events: EventBus::new(),
        }
    }

    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&FarmEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    /// Votes are here: network and chain are zero.
    pub fn voting_network_details(&self) -> VotingNetworkDetails {
        VotingNetworkDetails {
            network_id: 0,
            chain_id: 0,
            remote_farm: self.identity.clone(),
        }
    }

    fn check_id(&self, id: BallotId) -> Result<(), FarmError> {
        if id.namespace() != self.namespace {
            return Err(FarmError::WrongNamespace {
                id,
                expected: self.namespace,
                got: id.namespace(),
            });
        }
        if id.sequence() == 0 {
            return Err(FarmError::UnknownBallot(id));
        }
        Ok(())
    }

    pub fn submit_vote(
        &mut self,
        id: BallotId,
        caller: &Principal,
        data: Vec<u8>,
        extra: Vec<u8>,
        now: Timestamp,
    ) -> Result<u64, FarmError> {
        self.check_id(id)?;
        let tally = self.tallies.entry(id).or_default();
        tally.sequences.mark_direct(caller);
        Ok(self.append(id, caller, data, extra, now))
    }

    pub fn submit_proxy_vote(
        &mut self,
        req: &ProxyVoteRequest,
        extra: Vec<u8>,
        now: Timestamp,
    ) -> Result<u64, FarmError> {
        let id = req.ballot_id;
        self.check_id(id)?;
        let digest = ProxyVoteRequest::digest(id, req.sequence, &req.vote);
        if !self.verifier.verify(&digest, &req.signature, &req.signer) {
            return Err(FarmError::InvalidSignature);
        }
        let voter = req.voter();
        let tally = self.tallies.entry(id).or_default();
        let seq = tally.sequences.check(&voter, req.sequence)?;
        tally.sequences.record(&voter, seq);
        Ok(self.append(id, &voter, req.vote.clone(), extra, now))
    }

    fn append(&mut self, id: BallotId, voter: &Principal, data: Vec<u8>, extra: Vec<u8>, now: Timestamp) -> u64 {
        let tally = self.tallies.entry(id).or_default();
        let index = tally.votes.len() as u64;
        tally.votes.push(Vote {
            data,
            voter: voter.clone(),
            extra,
            cast_at: now,
        });
        tracing::info!(ballot = %id, vote = index, voter = %voter, "remote vote cast");
        self.events.emit(FarmEvent::VoteCast {
            id,
            index,
            voter: voter.clone(),
        });
        index
    }

    pub fn n_votes(&self, id: BallotId) -> Result<u64, FarmError> {
        self.check_id(id)?;
        Ok(self.tallies.get(&id).map_or(0, |t| t.votes.len() as u64))
    }

    pub fn get_vote_and_time(&self, id: BallotId, index: u64) -> Result<&Vote, FarmError> {
        self.check_id(id)?;
        self.tallies
            .get(&id)
            .and_then(|t| usize::try_from(index).ok().and_then(|i| t.votes.get(i)))
            .ok_or(FarmError::UnknownVote { id, index })
    }

    pub fn get_sequence_number(&self, id: BallotId, voter: &Principal) -> Result<u32, FarmError> {
        self.check_id(id)?;
        Ok(self.tallies.get(&id).map_or(0, |t| t.sequences.get(voter)))
    }

    /// Remote votes are read with their cast time only.
    pub fn get_vote(&self, _id: BallotId, _index: u64) -> Result<&Vote, FarmError> {
        Err(FarmError::Unsupported("get_vote"))
    }

    pub fn init_ballot(&mut self, _caller: &Principal, _spec_hash: SpecHash) -> Result<BallotId, FarmError> {
        Err(FarmError::Unsupported("init_ballot"))
    }

    pub fn set_ballot_owner(&mut self, _id: BallotId, _caller: &Principal, _owner: Principal) -> Result<(), FarmError> {
        Err(FarmError::Unsupported("set_ballot_owner"))
    }

    pub fn set_deprecated(&mut self, _id: BallotId, _caller: &Principal) -> Result<(), FarmError> {
        Err(FarmError::Unsupported("set_deprecated"))
    }

    pub fn set_end_time(&mut self, _id: BallotId, _caller: &Principal, _end: Timestamp) -> Result<(), FarmError> {
        Err(FarmError::Unsupported("set_end_time"))
    }

    pub fn reveal_seckey(&mut self, _id: BallotId, _caller: &Principal, _key: EncSeckey) -> Result<(), FarmError> {
        Err(FarmError::Unsupported("reveal_seckey"))
    }

    pub fn sponsor(&mut self, _id: BallotId, _sponsor: &Principal, _amount: Wei) -> Result<(), FarmError> {
        Err(FarmError::Unsupported("sponsor"))
    }
}
