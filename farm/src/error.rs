use svote_admin::AdminError;
use svote_ballot::BallotError;
use svote_types::{BallotId, Namespace, TransferError};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FarmError {
    #[error("ballot error: {0}")]
    Ballot(#[from] BallotError),

    #[error("forbidden: {0}")]
    Admin(#[from] AdminError),

    #[error("value transfer failed: {0}")]
    Transfer(#[from] TransferError),

    #[error("ballot {0} does not exist")]
    UnknownBallot(BallotId),

    #[error("ballot {id} has no vote {index}")]
    UnknownVote { id: BallotId, index: u64 },

    #[error("ballot {id} has no sponsorship {index}")]
    UnknownSponsor { id: BallotId, index: usize },

    #[error("ballot {id} is in namespace {got}, this farm serves {expected}")]
    WrongNamespace {
        id: BallotId,
        expected: Namespace,
        got: Namespace,
    },

    #[error("signature does not match the claimed signer")]
    InvalidSignature,

    #[error("{0} is not supported by this farm")]
    Unsupported(&'static str),

    #[error("sponsorship must carry value")]
    ZeroSponsorship,

    #[error("ballot sequence space exhausted")]
    ArenaFull,

    #[error("snapshot error: {0}")]
    Snapshot(String),
}
