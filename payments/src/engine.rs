//! The payment engine.

use crate::account::SubscriptionAccount;
use crate::error::{PaymentError, QuotaReason};
use crate::log::PaymentLogEntry;
use crate::params::PaymentParams;
use crate::quota::{BallotQuote, CountedBallots};
use crate::{DOWNGRADE_COOLDOWN_SECS, FREE_EXTENSION_SECS};
use std::collections::HashMap;
use svote_admin::PermissionStore;
use svote_types::{DemocHash, Principal, Timestamp, Transfer, ValueTransfer, Wei, THIRTY_DAYS_SECS};

const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

/// Subscription accounts, pricing and the basic-ballot quota for every
/// democracy on the platform.
pub struct PaymentEngine {
    permissions: PermissionStore,
    params: PaymentParams,
    payout: Principal,
    /// May adjust the exchange rate and grant time, nothing else.
    minor_edits: Option<Principal>,
    accounts: HashMap<DemocHash, SubscriptionAccount>,
    counted: HashMap<DemocHash, CountedBallots>,
    log: Vec<PaymentLogEntry>,
}

impl PaymentEngine {
    pub fn new(permissions: PermissionStore, params: PaymentParams, payout: Principal) -> Result<Self, PaymentError> {
        params.validate()?;
        Ok(Self {
            permissions,
            params,
            payout,
            minor_edits: None,
            accounts: HashMap::new(),
            counted: HashMap::new(),
            log: Vec::new(),
        })
    }

    pub fn permissions(&self) -> &PermissionStore {
        &self.permissions
    }

    pub fn permissions_mut(&mut self) -> &mut PermissionStore {
        &mut self.permissions
    }

    pub fn params(&self) -> &PaymentParams {
        &self.params
    }

    pub fn payout(&self) -> &Principal {
        &self.payout
    }

    pub fn minor_edits(&self) -> Option<&Principal> {
        self.minor_edits.as_ref()
    }

    // ── Conversion ─────────────────────────────────────────────────────

    /// Rounds down.
    pub fn wei_to_cents(&self, wei: Wei) -> u128 {
        wei.raw() / self.params.wei_per_cent as u128
    }

    pub fn cents_to_wei(&self, cents: u128) -> Result<Wei, PaymentError> {
        cents
            .checked_mul(self.params.wei_per_cent as u128)
            .map(Wei::new)
            .ok_or(PaymentError::Overflow)
    }

    /// Basic-tier seconds bought by `wei`.
    pub fn wei_buys_how_many_seconds(&self, wei: Wei) -> u64 {
        let secs = self
            .wei_to_cents(wei)
            .saturating_mul(THIRTY_DAYS_SECS as u128)
            / self.params.basic_cents_price_per_30_days as u128;
        u64::try_from(secs).unwrap_or(u64::MAX)
    }

    /// Cents per ether.
    pub fn usd_eth_exchange_rate(&self) -> u128 {
        WEI_PER_ETHER / self.params.wei_per_cent as u128
    }

    pub fn premium_cents_price_per_30_days(&self) -> u128 {
        self.params.basic_cents_price_per_30_days as u128 * self.params.premium_multiplier as u128
    }

    pub fn basic_extra_ballot_fee_wei(&self) -> Result<Wei, PaymentError> {
        self.cents_to_wei((self.params.basic_cents_price_per_30_days / self.params.basic_ballots_per_30_days) as u128)
    }

    pub fn community_ballot_wei_price(&self) -> Result<Wei, PaymentError> {
        self.cents_to_wei(self.params.community_ballot_cents_price as u128)
    }

    // ── Accounts ───────────────────────────────────────────────────────

    /// A democracy that never paid has the default (empty basic) account.
    pub fn account(&self, democ: &DemocHash) -> SubscriptionAccount {
        self.accounts.get(democ).cloned().unwrap_or_default()
    }

    pub fn seconds_remaining(&self, democ: &DemocHash, now: Timestamp) -> u64 {
        self.accounts
            .get(democ)
            .map_or(0, |a| a.seconds_remaining(now))
    }

    pub fn is_in_good_standing(&self, democ: &DemocHash, now: Timestamp) -> bool {
        self.accounts
            .get(democ)
            .is_some_and(|a| a.in_good_standing(now))
    }

    pub fn is_premium(&self, democ: &DemocHash) -> bool {
        self.accounts.get(democ).is_some_and(|a| a.is_premium)
    }

    // ── Payments and grants ────────────────────────────────────────────

    /// Buy time for `democ` with `value` from `payer`. The whole value goes
    /// to the payout principal. Returns the seconds added.
    pub fn pay_for_democracy(
        &mut self,
        democ: DemocHash,
        payer: &Principal,
        value: Wei,
        bank: &mut dyn ValueTransfer,
        now: Timestamp,
    ) -> Result<u64, PaymentError> {
        if value.is_zero() {
            return Err(PaymentError::BadPayment {
                offered: value,
                needed: Wei::new(1),
            });
        }
        let account = self.account(&democ);
        let mut secs = self.wei_buys_how_many_seconds(value);
        if account.is_premium {
            secs /= self.params.premium_multiplier;
        }
        let paid_until = account
            .paid_until
            .max(now)
            .checked_add(secs)
            .ok_or(PaymentError::Overflow)?;

        if let Err(e) = bank.settle(&[Transfer::new(payer, &self.payout, value)]) {
            tracing::warn!(democ = %democ, payer = %payer, %value, error = %e, "subscription payment failed");
            return Err(e.into());
        }

        let account = self.accounts.entry(democ).or_default();
        account.paid_until = paid_until;
        account.last_paid = now;
        self.log.push(PaymentLogEntry {
            democ,
            is_free_grant: false,
            seconds: secs,
            amount: value,
            at: now,
            reference: Vec::new(),
        });
        tracing::info!(democ = %democ, %value, secs, paid_until = %paid_until, "payment received");
        Ok(secs)
    }

    /// Grant `secs` of paid time without payment. Admin or minor-edits only.
    pub fn give_time_to_democ(
        &mut self,
        caller: &Principal,
        democ: DemocHash,
        secs: u64,
        reference: Vec<u8>,
        now: Timestamp,
    ) -> Result<(), PaymentError> {
        self.require_admin_or_minor_edits(caller)?;
        let account = self.account(&democ);
        let paid_until = account
            .paid_until
            .max(now)
            .checked_add(secs)
            .ok_or(PaymentError::Overflow)?;
        self.accounts.entry(democ).or_default().paid_until = paid_until;
        self.log.push(PaymentLogEntry {
            democ,
            is_free_grant: true,
            seconds: secs,
            amount: Wei::ZERO,
            at: now,
            reference,
        });
        tracing::info!(democ = %democ, secs, by = %caller, "time granted");
        Ok(())
    }

    /// Top `democ` up so that at least 60 days remain. Anyone may trigger it
    /// once the admin has enabled it for the democracy. Returns the seconds added.
    pub fn do_free_extension(&mut self, democ: DemocHash, now: Timestamp) -> Result<u64, PaymentError> {
        let account = self.account(&democ);
        if !account.free_extension {
            return Err(PaymentError::FreeExtensionDisabled);
        }
        let target = now.checked_add(FREE_EXTENSION_SECS).ok_or(PaymentError::Overflow)?;
        let added = target.secs_until(account.paid_until.max(now));
        if added > 0 {
            self.accounts.entry(democ).or_default().paid_until = target;
        }
        self.log.push(PaymentLogEntry {
            democ,
            is_free_grant: true,
            seconds: added,
            amount: Wei::ZERO,
            at: now,
            reference: Vec::new(),
        });
        tracing::info!(democ = %democ, secs = added, "free extension");
        Ok(added)
    }

    pub fn set_free_extension(&mut self, caller: &Principal, democ: DemocHash, enabled: bool) -> Result<(), PaymentError> {
        self.permissions.require_admin(caller)?;
        self.accounts.entry(democ).or_default().free_extension = enabled;
        tracing::info!(democ = %democ, enabled, "free extension set");
        Ok(())
    }

    // ── Premium ────────────────────────────────────────────────────────

    /// Switch to premium, dividing the remaining time by the multiplier.
    pub fn upgrade_to_premium(&mut self, caller: &Principal, democ: DemocHash, now: Timestamp) -> Result<(), PaymentError> {
        self.permissions.require_permission(caller)?;
        let account = self.account(&democ);
        if account.is_premium {
            return Err(PaymentError::QuotaExceeded(QuotaReason::AlreadyPremium));
        }
        if account.deny_premium {
            return Err(PaymentError::QuotaExceeded(QuotaReason::PremiumDenied));
        }
        let remaining = account.seconds_remaining(now) / self.params.premium_multiplier;

        let account = self.accounts.entry(democ).or_default();
        if account.paid_until > now {
            account.paid_until = now.saturating_add(remaining);
        }
        account.is_premium = true;
        account.last_upgrade = Some(now);
        tracing::info!(democ = %democ, remaining, "upgraded to premium");
        Ok(())
    }

    /// Switch back to basic, multiplying the remaining time. Refused within
    /// 24h of the upgrade while paid time remains.
    pub fn downgrade_to_basic(&mut self, caller: &Principal, democ: DemocHash, now: Timestamp) -> Result<(), PaymentError> {
        self.permissions.require_permission(caller)?;
        let account = self.account(&democ);
        if !account.is_premium {
            return Err(PaymentError::QuotaExceeded(QuotaReason::NotPremium));
        }
        let remaining = account.seconds_remaining(now);
        let cooling = account
            .last_upgrade
            .is_some_and(|t| !t.has_expired(DOWNGRADE_COOLDOWN_SECS, now));
        if remaining > 0 && cooling {
            return Err(PaymentError::QuotaExceeded(QuotaReason::DowngradeTooSoon));
        }
        let remaining = remaining
            .checked_mul(self.params.premium_multiplier)
            .ok_or(PaymentError::Overflow)?;
        let paid_until = now.checked_add(remaining).ok_or(PaymentError::Overflow)?;

        let account = self.accounts.entry(democ).or_default();
        if account.paid_until > now {
            account.paid_until = paid_until;
        }
        account.is_premium = false;
        tracing::info!(democ = %democ, remaining, "downgraded to basic");
        Ok(())
    }

    pub fn set_deny_premium(&mut self, caller: &Principal, democ: DemocHash, deny: bool) -> Result<(), PaymentError> {
        self.permissions.require_admin(caller)?;
        self.accounts.entry(democ).or_default().deny_premium = deny;
        tracing::info!(democ = %democ, deny, "deny premium set");
        Ok(())
    }

    // ── Basic-ballot quota ─────────────────────────────────────────────

    /// Price of the next counted ballot for `democ`.
    pub fn quote_ballot(&self, democ: &DemocHash, now: Timestamp) -> Result<BallotQuote, PaymentError> {
        if self.is_premium(democ) {
            return Ok(BallotQuote::Exempt);
        }
        let free = self
            .counted
            .get(democ)
            .map_or(true, |c| c.next_is_free(self.params.basic_ballots_per_30_days, now));
        if free {
            Ok(BallotQuote::Free)
        } else {
            Ok(BallotQuote::ExtraFee(self.basic_extra_ballot_fee_wei()?))
        }
    }

    /// Quote the next counted ballot and check that `offered` covers it.
    pub fn check_ballot_payment(
        &self,
        democ: &DemocHash,
        offered: Wei,
        now: Timestamp,
    ) -> Result<BallotQuote, PaymentError> {
        let quote = self.quote_ballot(democ, now)?;
        if let BallotQuote::ExtraFee(fee) = quote {
            if offered < fee {
                tracing::debug!(democ = %democ, %offered, %fee, "basic ballot quota exhausted");
                return Err(PaymentError::QuotaExceeded(QuotaReason::BasicBallotsExhausted));
            }
        }
        Ok(quote)
    }

    /// Count a free ballot against the quota of `democ`.
    pub fn record_counted_ballot(&mut self, caller: &Principal, democ: DemocHash, now: Timestamp) -> Result<(), PaymentError> {
        self.permissions.require_permission(caller)?;
        let counted = self.counted.entry(democ).or_default();
        counted.record(now);
        tracing::debug!(democ = %democ, counted = counted.len(), "basic ballot counted");
        Ok(())
    }

    pub fn counted_ballots(&self, democ: &DemocHash) -> usize {
        self.counted.get(democ).map_or(0, CountedBallots::len)
    }

    pub fn counted_ballot_at(&self, democ: &DemocHash, index: usize) -> Option<Timestamp> {
        self.counted.get(democ).and_then(|c| c.get(index))
    }

    // ── Payment log ────────────────────────────────────────────────────

    pub fn payment_log(&self, index: usize) -> Option<&PaymentLogEntry> {
        self.log.get(index)
    }

    pub fn payment_log_len(&self) -> usize {
        self.log.len()
    }

    // ── Administration ─────────────────────────────────────────────────

    pub fn set_wei_per_cent(&mut self, caller: &Principal, wei_per_cent: u64) -> Result<(), PaymentError> {
        self.require_admin_or_minor_edits(caller)?;
        self.update_params(|p| p.wei_per_cent = wei_per_cent)?;
        tracing::info!(wei_per_cent, by = %caller, "exchange rate set");
        Ok(())
    }

    pub fn set_basic_cents_price_per_30_days(&mut self, caller: &Principal, cents: u64) -> Result<(), PaymentError> {
        self.permissions.require_admin(caller)?;
        self.update_params(|p| p.basic_cents_price_per_30_days = cents)
    }

    pub fn set_basic_ballots_per_30_days(&mut self, caller: &Principal, n: u64) -> Result<(), PaymentError> {
        self.permissions.require_admin(caller)?;
        self.update_params(|p| p.basic_ballots_per_30_days = n)
    }

    pub fn set_premium_multiplier(&mut self, caller: &Principal, multiplier: u64) -> Result<(), PaymentError> {
        self.permissions.require_admin(caller)?;
        self.update_params(|p| p.premium_multiplier = multiplier)
    }

    pub fn set_community_ballot_cents_price(&mut self, caller: &Principal, cents: u64) -> Result<(), PaymentError> {
        self.permissions.require_admin(caller)?;
        self.update_params(|p| p.community_ballot_cents_price = cents)
    }

    pub fn set_payout(&mut self, caller: &Principal, payout: Principal) -> Result<(), PaymentError> {
        self.permissions.require_admin(caller)?;
        tracing::info!(payout = %payout, "payout set");
        self.payout = payout;
        Ok(())
    }

    pub fn set_minor_edits(&mut self, caller: &Principal, who: Option<Principal>) -> Result<(), PaymentError> {
        self.permissions.require_admin(caller)?;
        self.minor_edits = who;
        Ok(())
    }

    pub fn emergency_set_owner(&mut self, caller: &Principal, new_owner: Principal) -> Result<(), PaymentError> {
        Ok(self.permissions.emergency_set_owner(caller, new_owner)?)
    }

    fn update_params(&mut self, edit: impl FnOnce(&mut PaymentParams)) -> Result<(), PaymentError> {
        let mut next = self.params.clone();
        edit(&mut next);
        next.validate()?;
        tracing::debug!(?next, "payment params updated");
        self.params = next;
        Ok(())
    }

    fn require_admin_or_minor_edits(&self, caller: &Principal) -> Result<(), PaymentError> {
        if self.permissions.is_admin(caller) || self.minor_edits.as_ref() == Some(caller) {
            Ok(())
        } else {
            Err(PaymentError::Forbidden(caller.clone()))
        }
    }
}
