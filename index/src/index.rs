//! The ballot index.

use crate::democracy::Democracy;
use crate::error::IndexError;
use std::collections::HashMap;
use svote_admin::PermissionStore;
use svote_ballot::{PackedField, PackedTiming, SubmissionFlags};
use svote_crypto::blake2b_256_multi;
use svote_farm::BallotFarm;
use svote_payments::{BallotQuote, PaymentEngine};
use svote_types::{BallotId, DemocHash, Principal, SpecHash, Timestamp, Transfer, ValueTransfer, Wei};

const DEMOC_DOMAIN: &[u8] = b"svote/democ/v1";

/// How a deployment is paid for, decided before anything is committed.
struct Charge {
    fee: Option<Wei>,
    counted: bool,
}

/// Registry of democracies in front of one farm and one payment engine.
///
/// The index calls the farm and the payment engine as `principal`, which
/// must hold permission on both.
pub struct BallotIndex {
    principal: Principal,
    permissions: PermissionStore,
    farm: BallotFarm,
    payments: PaymentEngine,
    democs: HashMap<DemocHash, Democracy>,
    democ_list: Vec<DemocHash>,
    min_wei_for_democ_init: Wei,
}

impl BallotIndex {
    pub fn new(
        principal: Principal,
        permissions: PermissionStore,
        farm: BallotFarm,
        payments: PaymentEngine,
        min_wei_for_democ_init: Wei,
    ) -> Self {
        Self {
            principal,
            permissions,
            farm,
            payments,
            democs: HashMap::new(),
            democ_list: Vec::new(),
            min_wei_for_democ_init,
        }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn permissions(&self) -> &PermissionStore {
        &self.permissions
    }

    pub fn farm(&self) -> &BallotFarm {
        &self.farm
    }

    pub fn farm_mut(&mut self) -> &mut BallotFarm {
        &mut self.farm
    }

    pub fn payments(&self) -> &PaymentEngine {
        &self.payments
    }

    pub fn payments_mut(&mut self) -> &mut PaymentEngine {
        &mut self.payments
    }

    pub fn min_wei_for_democ_init(&self) -> Wei {
        self.min_wei_for_democ_init
    }

    pub fn set_min_wei_for_democ_init(&mut self, caller: &Principal, wei: Wei) -> Result<(), IndexError> {
        self.permissions.require_admin(caller)?;
        self.min_wei_for_democ_init = wei;
        Ok(())
    }

    // ── Democracies ────────────────────────────────────────────────────

    /// Register a democracy owned by `caller`. A non-zero `value` is paid
    /// into its subscription.
    pub fn init_democracy(
        &mut self,
        caller: &Principal,
        name: &str,
        value: Wei,
        bank: &mut dyn ValueTransfer,
        now: Timestamp,
    ) -> Result<DemocHash, IndexError> {
        if value < self.min_wei_for_democ_init {
            return Err(IndexError::BadPayment {
                offered: value,
                needed: self.min_wei_for_democ_init,
            });
        }
        let nonce = (self.democ_list.len() as u64).to_be_bytes();
        let democ = DemocHash::new(blake2b_256_multi(&[
            DEMOC_DOMAIN,
            caller.as_str().as_bytes(),
            name.as_bytes(),
            &nonce,
        ]));
        if !value.is_zero() {
            self.payments.pay_for_democracy(democ, caller, value, bank, now)?;
        }
        self.democs
            .insert(democ, Democracy::new(name.to_string(), caller.clone(), now));
        self.democ_list.push(democ);
        tracing::info!(democ = %democ, owner = %caller, name, "democracy created");
        Ok(democ)
    }

    pub fn democ(&self, democ: &DemocHash) -> Result<&Democracy, IndexError> {
        self.democs.get(democ).ok_or(IndexError::UnknownDemocracy(*democ))
    }

    pub fn n_democs(&self) -> usize {
        self.democ_list.len()
    }

    pub fn democ_at(&self, index: usize) -> Option<&DemocHash> {
        self.democ_list.get(index)
    }

    pub fn n_ballots(&self, democ: &DemocHash) -> Result<usize, IndexError> {
        Ok(self.democ(democ)?.ballots.len())
    }

    pub fn ballot_at(&self, democ: &DemocHash, index: usize) -> Result<Option<BallotId>, IndexError> {
        Ok(self.democ(democ)?.ballots.get(index).copied())
    }

    fn owned_mut(&mut self, caller: &Principal, democ: &DemocHash) -> Result<&mut Democracy, IndexError> {
        let d = self
            .democs
            .get_mut(democ)
            .ok_or(IndexError::UnknownDemocracy(*democ))?;
        if d.owner != *caller {
            return Err(IndexError::NotOwner {
                democ: *democ,
                caller: caller.clone(),
            });
        }
        Ok(d)
    }

    pub fn set_democ_owner(&mut self, caller: &Principal, democ: DemocHash, owner: Principal) -> Result<(), IndexError> {
        self.owned_mut(caller, &democ)?.owner = owner.clone();
        tracing::info!(democ = %democ, owner = %owner, "democracy owner changed");
        Ok(())
    }

    pub fn set_editor(
        &mut self,
        caller: &Principal,
        democ: DemocHash,
        editor: &Principal,
        enabled: bool,
    ) -> Result<(), IndexError> {
        let d = self.owned_mut(caller, &democ)?;
        if enabled {
            d.editors.insert(editor.clone());
        } else {
            d.editors.remove(editor);
        }
        tracing::info!(democ = %democ, editor = %editor, enabled, "editor set");
        Ok(())
    }

    pub fn set_community_ballots_enabled(
        &mut self,
        caller: &Principal,
        democ: DemocHash,
        enabled: bool,
    ) -> Result<(), IndexError> {
        self.owned_mut(caller, &democ)?.community_ballots_enabled = enabled;
        tracing::info!(democ = %democ, enabled, "community ballots set");
        Ok(())
    }

    // ── Subscription ───────────────────────────────────────────────────

    pub fn pay_for_democracy(
        &mut self,
        democ: DemocHash,
        payer: &Principal,
        value: Wei,
        bank: &mut dyn ValueTransfer,
        now: Timestamp,
    ) -> Result<u64, IndexError> {
        self.democ(&democ)?;
        Ok(self.payments.pay_for_democracy(democ, payer, value, bank, now)?)
    }

    pub fn upgrade_to_premium(&mut self, caller: &Principal, democ: DemocHash, now: Timestamp) -> Result<(), IndexError> {
        self.owned_mut(caller, &democ)?;
        Ok(self.payments.upgrade_to_premium(&self.principal, democ, now)?)
    }

    pub fn downgrade_to_basic(&mut self, caller: &Principal, democ: DemocHash, now: Timestamp) -> Result<(), IndexError> {
        self.owned_mut(caller, &democ)?;
        Ok(self.payments.downgrade_to_basic(&self.principal, democ, now)?)
    }

    // ── Ballot deployment ──────────────────────────────────────────────

    /// Deploy a ballot as an editor of `democ`.
    ///
    /// A community-qualifying ballot is charged the flat community price
    /// while community ballots are enabled. Every other ballot is metered by
    /// the basic quota unless the democracy is premium. Only the price is
    /// taken from `offered`.
    #[allow(clippy::too_many_arguments)]
    pub fn deploy_ballot(
        &mut self,
        caller: &Principal,
        democ: DemocHash,
        spec_hash: SpecHash,
        packed: PackedField,
        offered: Wei,
        bank: &mut dyn ValueTransfer,
        now: Timestamp,
    ) -> Result<BallotId, IndexError> {
        let d = self.democ(&democ)?;
        if !d.is_editor(caller) {
            return Err(IndexError::NotEditor {
                democ,
                caller: caller.clone(),
            });
        }
        let community_enabled = d.community_ballots_enabled;
        let timing = self.validate(spec_hash, packed, now)?;

        let charge = if timing.flags.qualifies_as_community() && community_enabled {
            Charge {
                fee: Some(self.community_price(offered)?),
                counted: false,
            }
        } else {
            match self.payments.check_ballot_payment(&democ, offered, now)? {
                BallotQuote::Exempt => Charge { fee: None, counted: false },
                BallotQuote::ExtraFee(fee) => Charge { fee: Some(fee), counted: false },
                BallotQuote::Free => {
                    self.require_paid_through(&democ, &timing, now)?;
                    Charge { fee: None, counted: true }
                }
            }
        };

        self.deploy(caller, democ, spec_hash, packed, charge, bank, now)
    }

    /// Deploy an Eth/no-enc community ballot for `democ`. Open to anyone
    /// while community ballots are enabled or the democracy has no paid time.
    #[allow(clippy::too_many_arguments)]
    pub fn deploy_community_ballot(
        &mut self,
        caller: &Principal,
        democ: DemocHash,
        spec_hash: SpecHash,
        start: Timestamp,
        end: Timestamp,
        offered: Wei,
        bank: &mut dyn ValueTransfer,
        now: Timestamp,
    ) -> Result<BallotId, IndexError> {
        let d = self.democ(&democ)?;
        if !d.community_ballots_enabled && self.payments.is_in_good_standing(&democ, now) {
            return Err(IndexError::CommunityBallotsDisabled(democ));
        }
        let packed = PackedField::encode(start.as_secs(), end.as_secs(), SubmissionFlags::COMMUNITY as u128);
        self.validate(spec_hash, packed, now)?;
        let charge = Charge {
            fee: Some(self.community_price(offered)?),
            counted: false,
        };
        self.deploy(caller, democ, spec_hash, packed, charge, bank, now)
    }

    fn validate(&self, spec_hash: SpecHash, packed: PackedField, now: Timestamp) -> Result<PackedTiming, IndexError> {
        let timing = self.farm.validate_init(&self.principal, spec_hash, packed, now)?;
        if timing.flags.is_testing() {
            return Err(IndexError::TestingBallot);
        }
        Ok(timing)
    }

    fn community_price(&self, offered: Wei) -> Result<Wei, IndexError> {
        let price = self.payments.community_ballot_wei_price()?;
        if offered < price {
            return Err(IndexError::BadPayment { offered, needed: price });
        }
        Ok(price)
    }

    /// A counted ballot may not outlast twice the paid time left.
    fn require_paid_through(&self, democ: &DemocHash, timing: &PackedTiming, now: Timestamp) -> Result<(), IndexError> {
        let secs_left = self.payments.seconds_remaining(democ, now);
        let ballot_secs = timing.end.secs_until(now);
        if secs_left.saturating_mul(2) <= ballot_secs {
            return Err(IndexError::Unpaid { secs_left, ballot_secs });
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn deploy(
        &mut self,
        caller: &Principal,
        democ: DemocHash,
        spec_hash: SpecHash,
        packed: PackedField,
        charge: Charge,
        bank: &mut dyn ValueTransfer,
        now: Timestamp,
    ) -> Result<BallotId, IndexError> {
        // Nothing below the transfer may fail: the farm checks already ran in
        // `validate`, and counting only needs payments permission.
        if charge.counted {
            self.payments.permissions().require_permission(&self.principal)?;
        }
        if let Some(fee) = charge.fee {
            if let Err(e) = bank.settle(&[Transfer::new(caller, self.payments.payout(), fee)]) {
                tracing::warn!(democ = %democ, payer = %caller, %fee, error = %e, "ballot fee transfer failed");
                return Err(e.into());
            }
        }
        let id = self.farm.init_ballot(
            &self.principal,
            spec_hash,
            packed,
            Some(caller.clone()),
            Vec::new(),
            now,
        )?;
        if charge.counted {
            self.payments.record_counted_ballot(&self.principal, democ, now)?;
        }
        if let Some(d) = self.democs.get_mut(&democ) {
            d.ballots.push(id);
        }
        tracing::info!(
            democ = %democ,
            ballot = %id,
            fee = %charge.fee.unwrap_or(Wei::ZERO),
            counted = charge.counted,
            "ballot deployed"
        );
        Ok(id)
    }
}
