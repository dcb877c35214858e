//! Append-only sponsorship ledger.

use crate::error::BallotError;
use serde::{Deserialize, Serialize};
use svote_types::{Principal, Wei};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sponsorship {
    pub sponsor: Principal,
    pub amount: Wei,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SponsorLedger {
    entries: Vec<Sponsorship>,
    total: Wei,
}

impl SponsorLedger {
    /// Total after adding `amount`, or `Overflow`. Lets callers check before
    /// moving any value.
    pub fn total_after(&self, amount: Wei) -> Result<Wei, BallotError> {
        self.total.checked_add(amount).ok_or(BallotError::Overflow)
    }

    pub fn record(&mut self, sponsor: &Principal, amount: Wei) -> Result<(), BallotError> {
        self.total = self.total_after(amount)?;
        self.entries.push(Sponsorship {
            sponsor: sponsor.clone(),
            amount,
        });
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&Sponsorship> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> Wei {
        self.total
    }
}
