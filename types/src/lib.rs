//! Fundamental types for the svote ballot platform.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! principals, timestamps, wei amounts, 32-byte hashes, ballot identifiers,
//! signing keys and the value-transfer capability.

pub mod amount;
pub mod error;
pub mod hash;
pub mod id;
pub mod keys;
pub mod principal;
pub mod time;
pub mod transfer;

pub use amount::Wei;
pub use error::TypesError;
pub use hash::{DemocHash, EncSeckey, SpecHash};
pub use id::{BallotId, Namespace};
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use principal::Principal;
pub use time::{Timestamp, DAY_SECS, THIRTY_DAYS_SECS};
pub use transfer::{Transfer, TransferError, ValueTransfer};
