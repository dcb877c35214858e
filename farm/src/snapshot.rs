//! Export and import of a farm's ballot arena.
//!
//! A front-end that moves to a new farm instance carries its ballots across
//! as a bincode-encoded [`FarmSnapshot`]. Permissions and the signature
//! verifier are not part of the snapshot; the new instance is given its own.

use crate::error::FarmError;
use crate::farm::BallotFarm;
use crate::remote::VotingNetwork;
use serde::{Deserialize, Serialize};
use svote_admin::PermissionStore;
use svote_ballot::Ballot;
use svote_crypto::SignatureVerifier;
use svote_types::{Namespace, Principal};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FarmSnapshot {
    pub version: u16,
    pub namespace: Namespace,
    pub payee: Principal,
    pub voting: VotingNetwork,
    pub ballots: Vec<Ballot>,
}

impl BallotFarm {
    pub fn snapshot(&self) -> FarmSnapshot {
        FarmSnapshot {
            version: crate::FARM_VERSION,
            namespace: self.namespace(),
            payee: self.payee.clone(),
            voting: self.voting.clone(),
            ballots: self.ballots.clone(),
        }
    }

    pub fn export_state(&self) -> Result<Vec<u8>, FarmError> {
        bincode::serialize(&self.snapshot()).map_err(|e| FarmError::Snapshot(e.to_string()))
    }

    pub fn import_state(
        bytes: &[u8],
        permissions: PermissionStore,
        verifier: Box<dyn SignatureVerifier>,
    ) -> Result<Self, FarmError> {
        let snapshot: FarmSnapshot =
            bincode::deserialize(bytes).map_err(|e| FarmError::Snapshot(e.to_string()))?;
        Self::restore(snapshot, permissions, verifier)
    }

    /// Rebuild a farm, checking that ids are dense, in-namespace and that
    /// spec hashes are unique.
    pub fn restore(
        snapshot: FarmSnapshot,
        permissions: PermissionStore,
        verifier: Box<dyn SignatureVerifier>,
    ) -> Result<Self, FarmError> {
        if snapshot.version > crate::FARM_VERSION {
            return Err(FarmError::Snapshot(format!(
                "snapshot version {} is newer than {}",
                snapshot.version,
                crate::FARM_VERSION
            )));
        }
        let mut farm = BallotFarm::new(snapshot.namespace, permissions, verifier);
        for (i, ballot) in snapshot.ballots.into_iter().enumerate() {
            let id = ballot.id();
            if id.namespace() != snapshot.namespace || id.sequence() != i as u128 + 1 {
                return Err(FarmError::Snapshot(format!("ballot {id} out of place at {i}")));
            }
            if !farm.spec_hashes.insert(ballot.spec_hash()) {
                return Err(FarmError::Snapshot(format!(
                    "duplicate spec hash {}",
                    ballot.spec_hash()
                )));
            }
            farm.ballots.push(ballot);
        }
        farm.payee = snapshot.payee;
        farm.voting = snapshot.voting;
        tracing::info!(
            namespace = %farm.namespace(),
            ballots = farm.ballots.len(),
            "farm state imported"
        );
        Ok(farm)
    }
}
