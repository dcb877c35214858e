//! BBFarm: many ballots behind one surface.
//!
//! Ballot ids combine the farm's fixed [`Namespace`](svote_types::Namespace)
//! with a per-farm sequence starting at 1. Every accessor resolves ids through
//! one validation step that rejects foreign namespaces and unknown sequences.
//!
//! [`BallotFarm`] hosts ballot metadata and, for a local farm, the votes too.
//! When votes live on another network, the host farm runs in
//! [`VotingNetwork::Remote`] mode and a [`RemoteVoteFarm`] on the voting
//! network stores the votes.

pub mod error;
pub mod events;
pub mod farm;
pub mod remote;
pub mod requests;
pub mod snapshot;

pub use error::FarmError;
pub use events::{EventBus, FarmEvent};
pub use farm::BallotFarm;
pub use remote::{RemoteVoteFarm, VotingNetwork, VotingNetworkDetails};
pub use requests::{ProxyVoteRequest, SignedBallotInit, SignedVote};
pub use snapshot::FarmSnapshot;

/// Version of the farm surface.
pub const FARM_VERSION: u16 = 3;
