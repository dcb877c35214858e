//! Global pricing parameters.

use crate::error::PaymentError;
use serde::{Deserialize, Serialize};

/// Prices are in US cents. Fields are 64-bit so they fit a TOML integer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentParams {
    /// Exchange rate. The default is roughly $603 per ether.
    #[serde(default = "default_wei_per_cent")]
    pub wei_per_cent: u64,

    #[serde(default = "default_basic_cents_price_per_30_days")]
    pub basic_cents_price_per_30_days: u64,

    /// Official ballots a basic account may create free per 30 days.
    #[serde(default = "default_basic_ballots_per_30_days")]
    pub basic_ballots_per_30_days: u64,

    #[serde(default = "default_premium_multiplier")]
    pub premium_multiplier: u64,

    #[serde(default = "default_community_ballot_cents_price")]
    pub community_ballot_cents_price: u64,
}

fn default_wei_per_cent() -> u64 {
    16_583_747_000_000
}
fn default_basic_cents_price_per_30_days() -> u64 {
    125_000
}
fn default_basic_ballots_per_30_days() -> u64 {
    10
}
fn default_premium_multiplier() -> u64 {
    5
}
fn default_community_ballot_cents_price() -> u64 {
    100
}

impl Default for PaymentParams {
    fn default() -> Self {
        Self {
            wei_per_cent: default_wei_per_cent(),
            basic_cents_price_per_30_days: default_basic_cents_price_per_30_days(),
            basic_ballots_per_30_days: default_basic_ballots_per_30_days(),
            premium_multiplier: default_premium_multiplier(),
            community_ballot_cents_price: default_community_ballot_cents_price(),
        }
    }
}

impl PaymentParams {
    /// Reject values that would divide by zero.
    pub fn validate(&self) -> Result<(), PaymentError> {
        if self.wei_per_cent == 0 {
            return Err(PaymentError::InvalidParam("wei_per_cent"));
        }
        if self.basic_cents_price_per_30_days == 0 {
            return Err(PaymentError::InvalidParam("basic_cents_price_per_30_days"));
        }
        if self.basic_ballots_per_30_days == 0 {
            return Err(PaymentError::InvalidParam("basic_ballots_per_30_days"));
        }
        if self.premium_multiplier == 0 {
            return Err(PaymentError::InvalidParam("premium_multiplier"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(PaymentParams::default().validate().is_ok());
    }

    #[test]
    fn zero_multiplier_rejected() {
        let params = PaymentParams {
            premium_multiplier: 0,
            ..PaymentParams::default()
        };
        assert_eq!(
            params.validate(),
            Err(PaymentError::InvalidParam("premium_multiplier"))
        );
    }
}
