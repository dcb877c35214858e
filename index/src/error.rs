use svote_admin::AdminError;
use svote_farm::FarmError;
use svote_payments::PaymentError;
use svote_types::{DemocHash, Principal, TransferError, Wei};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("democracy {0} not found")]
    UnknownDemocracy(DemocHash),

    #[error("{caller} does not own democracy {democ}")]
    NotOwner { democ: DemocHash, caller: Principal },

    #[error("{caller} is not an editor of democracy {democ}")]
    NotEditor { democ: DemocHash, caller: Principal },

    #[error("bad payment: offered {offered}, need at least {needed}")]
    BadPayment { offered: Wei, needed: Wei },

    #[error("ballot runs {ballot_secs}s but only {secs_left}s are paid")]
    Unpaid { secs_left: u64, ballot_secs: u64 },

    #[error("community ballots are disabled for democracy {0}")]
    CommunityBallotsDisabled(DemocHash),

    #[error("testing ballots cannot be deployed through the index")]
    TestingBallot,

    #[error(transparent)]
    Admin(#[from] AdminError),

    #[error(transparent)]
    Farm(#[from] FarmError),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error("transfer failed: {0}")]
    Transfer(#[from] TransferError),
}
