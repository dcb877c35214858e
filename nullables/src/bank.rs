//! In-memory ledger implementing [`ValueTransfer`].

use std::collections::{HashMap, HashSet};
use svote_types::{Principal, Transfer, TransferError, ValueTransfer, Wei};

/// Balances per principal, with injectable recipient failures.
///
/// A batch is applied to a scratch copy and committed only if every
/// transfer in it succeeds.
#[derive(Debug, Default)]
pub struct NullBank {
    balances: HashMap<Principal, Wei>,
    rejecting: HashSet<Principal>,
    settled: Vec<Transfer>,
}

impl NullBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balance(mut self, who: &Principal, amount: Wei) -> Self {
        self.balances.insert(who.clone(), amount);
        self
    }

    pub fn credit(&mut self, who: &Principal, amount: Wei) {
        let bal = self.balances.entry(who.clone()).or_default();
        *bal = Wei::new(bal.raw().saturating_add(amount.raw()));
    }

    pub fn balance(&self, who: &Principal) -> Wei {
        self.balances.get(who).copied().unwrap_or(Wei::ZERO)
    }

    /// Make every future transfer to `who` fail.
    pub fn reject_transfers_to(&mut self, who: &Principal) {
        self.rejecting.insert(who.clone());
    }

    pub fn accept_transfers_to(&mut self, who: &Principal) {
        self.rejecting.remove(who);
    }

    /// Every transfer committed so far, in order.
    pub fn settled(&self) -> &[Transfer] {
        &self.settled
    }
}

impl ValueTransfer for NullBank {
    fn settle(&mut self, batch: &[Transfer]) -> Result<(), TransferError> {
        let mut next = self.balances.clone();
        for t in batch {
            if self.rejecting.contains(&t.to) {
                return Err(TransferError::Rejected(t.to.clone()));
            }
            let available = next.get(&t.from).copied().unwrap_or(Wei::ZERO);
            let remaining =
                available
                    .checked_sub(t.amount)
                    .ok_or_else(|| TransferError::InsufficientFunds {
                        account: t.from.clone(),
                        needed: t.amount,
                        available,
                    })?;
            next.insert(t.from.clone(), remaining);
            let to = next.entry(t.to.clone()).or_default();
            *to = to.checked_add(t.amount).ok_or(TransferError::Overflow)?;
        }
        self.balances = next;
        self.settled.extend_from_slice(batch);
        Ok(())
    }
}
