//! Wires the farm, the payment engine and the index together from config.

use svote_admin::PermissionStore;
use svote_crypto::SignatureVerifier;
use svote_farm::BallotFarm;
use svote_index::BallotIndex;
use svote_payments::PaymentEngine;
use svote_types::{Namespace, Principal, Wei};

use crate::config::PlatformConfig;
use crate::NodeError;

/// One running svote platform.
pub struct Platform {
    operator: Principal,
    index: BallotIndex,
}

impl Platform {
    /// Build every component from `config`. The operator owns all three;
    /// the index principal receives permission on the farm and the payment
    /// engine.
    pub fn from_config(config: &PlatformConfig, verifier: Box<dyn SignatureVerifier>) -> Result<Self, NodeError> {
        config.validate()?;
        let operator = &config.operator;
        let store = || match &config.emergency_admin {
            Some(rescue) => PermissionStore::with_emergency_admin(operator.clone(), rescue.clone()),
            None => PermissionStore::new(operator.clone()),
        };

        let mut farm_perms = store();
        farm_perms.set_permission(operator, &config.index_principal, true)?;
        let mut farm = BallotFarm::new(Namespace(config.namespace), farm_perms, verifier);
        farm.set_payee(operator, config.payout.clone())?;

        let mut payment_perms = store();
        payment_perms.set_permission(operator, &config.index_principal, true)?;
        let payments = PaymentEngine::new(payment_perms, config.payments.clone(), config.payout.clone())?;

        let index = BallotIndex::new(
            config.index_principal.clone(),
            store(),
            farm,
            payments,
            Wei::new(config.min_wei_for_democ_init as u128),
        );
        tracing::info!(
            namespace = %Namespace(config.namespace),
            operator = %operator,
            index = %config.index_principal,
            payout = %config.payout,
            "platform ready"
        );
        Ok(Self {
            operator: operator.clone(),
            index,
        })
    }

    pub fn operator(&self) -> &Principal {
        &self.operator
    }

    pub fn index(&self) -> &BallotIndex {
        &self.index
    }

    pub fn index_mut(&mut self) -> &mut BallotIndex {
        &mut self.index
    }

    pub fn farm(&self) -> &BallotFarm {
        self.index.farm()
    }

    pub fn farm_mut(&mut self) -> &mut BallotFarm {
        self.index.farm_mut()
    }

    pub fn payments(&self) -> &PaymentEngine {
        self.index.payments()
    }

    pub fn payments_mut(&mut self) -> &mut PaymentEngine {
        self.index.payments_mut()
    }

    /// Redirect fees and sponsorships. The caller must be admin of both the
    /// farm and the payment engine.
    pub fn set_payout(&mut self, caller: &Principal, payout: Principal) -> Result<(), NodeError> {
        self.farm().permissions().require_admin(caller)?;
        self.payments().permissions().require_admin(caller)?;
        self.index.farm_mut().set_payee(caller, payout.clone())?;
        self.index.payments_mut().set_payout(caller, payout)?;
        Ok(())
    }

    /// Freeze permission changes on the farm and the payment engine.
    pub fn lockdown(&mut self, caller: &Principal) -> Result<(), NodeError> {
        self.farm().permissions().require_owner(caller)?;
        self.payments().permissions().require_owner(caller)?;
        self.index.farm_mut().permissions_mut().lockdown(caller)?;
        self.index.payments_mut().permissions_mut().lockdown(caller)?;
        Ok(())
    }
}
