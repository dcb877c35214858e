//! Signed requests relayed to a farm.
//!
//! Each request type has a domain-separated Blake2b digest; the signature
//! covers that digest. Variable-length fields are length-prefixed so no two
//! field splits hash alike.

use serde::{Deserialize, Serialize};
use svote_ballot::PackedField;
use svote_crypto::{blake2b_256_multi, derive_principal, sign_message};
use svote_types::{BallotId, KeyPair, Namespace, Principal, PublicKey, Signature, SpecHash};

const SIGNED_VOTE_DOMAIN: &[u8] = b"svote/signed-vote/v1";
const PROXY_VOTE_DOMAIN: &[u8] = b"svote/proxy-vote/v1";
const BALLOT_INIT_DOMAIN: &[u8] = b"svote/ballot-init/v1";

fn len_prefix(bytes: &[u8]) -> [u8; 8] {
    (bytes.len() as u64).to_be_bytes()
}

/// A vote for a USE_SIGNED ballot. Anyone may submit it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedVote {
    pub signer: PublicKey,
    pub vote: Vec<u8>,
    pub extra: Vec<u8>,
    pub signature: Signature,
}

impl SignedVote {
    pub fn digest(id: BallotId, vote: &[u8], extra: &[u8]) -> [u8; 32] {
        blake2b_256_multi(&[
            SIGNED_VOTE_DOMAIN,
            &id.to_be_bytes(),
            &len_prefix(vote),
            vote,
            &len_prefix(extra),
            extra,
        ])
    }

    pub fn sign(keys: &KeyPair, id: BallotId, vote: Vec<u8>, extra: Vec<u8>) -> Self {
        let signature = sign_message(&Self::digest(id, &vote, &extra), &keys.private);
        Self {
            signer: keys.public,
            vote,
            extra,
            signature,
        }
    }

    pub fn voter(&self) -> Principal {
        derive_principal(&self.signer)
    }
}

/// A vote signed off-line and relayed by a third party to a USE_ETH ballot.
///
/// `sequence` is carried as `u64` so out-of-domain values reach the replay
/// guard and fail there instead of wrapping.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyVoteRequest {
    pub ballot_id: BallotId,
    pub sequence: u64,
    pub vote: Vec<u8>,
    pub signer: PublicKey,
    pub signature: Signature,
}

impl ProxyVoteRequest {
    pub fn digest(id: BallotId, sequence: u64, vote: &[u8]) -> [u8; 32] {
        blake2b_256_multi(&[
            PROXY_VOTE_DOMAIN,
            &id.to_be_bytes(),
            &sequence.to_be_bytes(),
            vote,
        ])
    }

    pub fn sign(keys: &KeyPair, ballot_id: BallotId, sequence: u64, vote: Vec<u8>) -> Self {
        let signature = sign_message(&Self::digest(ballot_id, sequence, &vote), &keys.private);
        Self {
            ballot_id,
            sequence,
            vote,
            signer: keys.public,
            signature,
        }
    }

    pub fn voter(&self) -> Principal {
        derive_principal(&self.signer)
    }
}

/// A ballot creation signed by its future owner and relayed by a permitted principal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedBallotInit {
    pub spec_hash: SpecHash,
    pub packed: PackedField,
    pub extra: Vec<u8>,
    pub signer: PublicKey,
    pub signature: Signature,
}

impl SignedBallotInit {
    /// Bound to one namespace so a request cannot be replayed on another farm.
    pub fn digest(namespace: Namespace, spec_hash: &SpecHash, packed: &PackedField, extra: &[u8]) -> [u8; 32] {
        blake2b_256_multi(&[
            BALLOT_INIT_DOMAIN,
            &namespace.to_bytes(),
            spec_hash.as_bytes(),
            &packed.to_be_bytes(),
            extra,
        ])
    }

    pub fn sign(
        keys: &KeyPair,
        namespace: Namespace,
        spec_hash: SpecHash,
        packed: PackedField,
        extra: Vec<u8>,
    ) -> Self {
        let digest = Self::digest(namespace, &spec_hash, &packed, &extra);
        Self {
            spec_hash,
            packed,
            extra,
            signer: keys.public,
            signature: sign_message(&digest, &keys.private),
        }
    }

    pub fn owner(&self) -> Principal {
        derive_principal(&self.signer)
    }
}
