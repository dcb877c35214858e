//! Cryptographic primitives for svote.
//!
//! - **Ed25519** for signed votes and proxy-relayed vote requests
//! - **Blake2b** for message digests and democracy identifiers
//! - Principal derivation with the `sv_` prefix

pub mod hash;
pub mod keys;
pub mod principal;
pub mod sign;

pub use hash::{blake2b_256, blake2b_256_multi};
pub use keys::{generate_keypair, keypair_from_private, keypair_from_seed, public_from_private};
pub use principal::derive_principal;
pub use sign::{sign_message, verify_signature, Ed25519Verifier, SignatureVerifier};
