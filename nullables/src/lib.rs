//! Nullable infrastructure for deterministic testing.
//!
//! The engines take time, value movement and signature checks from the
//! outside. This crate provides test implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch a real ledger
//!
//! Usage: swap real implementations for nullables in tests.

pub mod bank;
pub mod clock;
pub mod verifier;

pub use bank::NullBank;
pub use clock::NullClock;
pub use verifier::NullVerifier;
