//! Payment and metering for democracies.
//!
//! A democracy buys subscription time in wei; the price is set in US cents
//! and converted through an owner-controlled `wei_per_cent` rate. Premium
//! accounts pay `premium_multiplier` times as much per second and are exempt
//! from the basic-ballot quota. Every grant of time is appended to a public
//! payment log.

pub mod account;
pub mod engine;
pub mod error;
pub mod log;
pub mod params;
pub mod quota;

pub use account::SubscriptionAccount;
pub use engine::PaymentEngine;
pub use error::{PaymentError, QuotaReason};
pub use log::PaymentLogEntry;
pub use params::PaymentParams;
pub use quota::{BallotQuote, CountedBallots};

/// Length of a free extension.
pub const FREE_EXTENSION_SECS: u64 = 60 * svote_types::DAY_SECS;

/// How long after an upgrade a downgrade is refused.
pub const DOWNGRADE_COOLDOWN_SECS: u64 = svote_types::DAY_SECS;
