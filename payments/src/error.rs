use std::fmt;
use svote_admin::AdminError;
use svote_types::{Principal, TransferError, Wei};
use thiserror::Error;

/// Why a premium- or quota-gated operation was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuotaReason {
    AlreadyPremium,
    PremiumDenied,
    NotPremium,
    DowngradeTooSoon,
    BasicBallotsExhausted,
}

impl fmt::Display for QuotaReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::AlreadyPremium => "account is already premium",
            Self::PremiumDenied => "premium is denied for this account",
            Self::NotPremium => "account is not premium",
            Self::DowngradeTooSoon => "downgrade within 24h of upgrade",
            Self::BasicBallotsExhausted => "basic ballot quota exhausted",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PaymentError {
    #[error(transparent)]
    Admin(#[from] AdminError),

    #[error("{0} may not edit payment settings")]
    Forbidden(Principal),

    #[error("bad payment: offered {offered}, need at least {needed}")]
    BadPayment { offered: Wei, needed: Wei },

    #[error("quota exceeded: {0}")]
    QuotaExceeded(QuotaReason),

    #[error("free extension is not enabled for this democracy")]
    FreeExtensionDisabled,

    #[error("invalid payment parameter: {0}")]
    InvalidParam(&'static str),

    #[error("payment transfer failed: {0}")]
    Transfer(#[from] TransferError),

    #[error("arithmetic overflow")]
    Overflow,
}
