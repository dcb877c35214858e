//! The value-transfer capability.
//!
//! Ballot sponsorships, subscription payments and ballot fees all move value
//! from a caller to a payee. The host ledger is abstracted behind
//! [`ValueTransfer`] so engines stay deterministic and testable.

use crate::amount::Wei;
use crate::principal::Principal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One movement of value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: Principal,
    pub to: Principal,
    pub amount: Wei,
}

impl Transfer {
    pub fn new(from: &Principal, to: &Principal, amount: Wei) -> Self {
        Self {
            from: from.clone(),
            to: to.clone(),
            amount,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("insufficient funds: {account} has {available}, needs {needed}")]
    InsufficientFunds {
        account: Principal,
        needed: Wei,
        available: Wei,
    },

    #[error("recipient {0} rejected the transfer")]
    Rejected(Principal),

    #[error("transfer overflow")]
    Overflow,
}

/// Moves value on the host ledger.
pub trait ValueTransfer {
    /// Apply every transfer in `batch`, or none of them.
    ///
    /// An `Err` guarantees that no balance changed.
    fn settle(&mut self, batch: &[Transfer]) -> Result<(), TransferError>;
}
