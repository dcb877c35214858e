//! Platform configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;

use svote_payments::PaymentParams;
use svote_types::Principal;

use crate::logging::LogFormat;
use crate::NodeError;

/// Configuration for one svote platform instance.
///
/// Can be loaded from a TOML file via [`PlatformConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Namespace of the ballot farm; every ballot id carries it.
    #[serde(default = "default_namespace")]
    pub namespace: u32,

    /// Owner of the farm, the payment engine and the index.
    #[serde(default = "default_operator")]
    pub operator: Principal,

    /// Identity the index uses when it calls the farm and the payment engine.
    #[serde(default = "default_index_principal")]
    pub index_principal: Principal,

    /// Receives subscription payments, ballot fees and sponsorships.
    #[serde(default = "default_payout")]
    pub payout: Principal,

    /// May replace the operator as owner of the payment engine.
    #[serde(default)]
    pub emergency_admin: Option<Principal>,

    #[serde(default)]
    pub min_wei_for_democ_init: u64,

    #[serde(default)]
    pub payments: PaymentParams,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_namespace() -> u32 {
    1
}

fn default_operator() -> Principal {
    Principal::new("sv_operator")
}

fn default_index_principal() -> Principal {
    Principal::new("sv_index")
}

fn default_payout() -> Principal {
    Principal::new("sv_payout")
}

// ── Impl ───────────────────────────────────────────────────────────────

impl PlatformConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        let config: Self = toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    pub fn log_format(&self) -> Result<LogFormat, NodeError> {
        self.log_format.parse()
    }

    /// Check fields the type system cannot.
    pub fn validate(&self) -> Result<(), NodeError> {
        self.log_format()?;
        if self.namespace == 0 {
            return Err(NodeError::Config("namespace must be non-zero".to_string()));
        }
        if self.index_principal == self.operator {
            return Err(NodeError::Config(
                "index_principal must differ from operator".to_string(),
            ));
        }
        self.payments
            .validate()
            .map_err(|e| NodeError::Config(e.to_string()))
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            log_format: default_log_format(),
            log_level: default_log_level(),
            namespace: default_namespace(),
            operator: default_operator(),
            index_principal: default_index_principal(),
            payout: default_payout(),
            emergency_admin: None,
            min_wei_for_democ_init: 0,
            payments: PaymentParams::default(),
        }
    }
}
