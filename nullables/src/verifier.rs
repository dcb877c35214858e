//! Nullable signature verifier.

use svote_crypto::SignatureVerifier;
use svote_types::{PublicKey, Signature};

/// Answers every verification with a fixed verdict.
#[derive(Clone, Copy, Debug)]
pub struct NullVerifier {
    accept: bool,
}

impl NullVerifier {
    pub fn accepting() -> Self {
        Self { accept: true }
    }

    pub fn rejecting() -> Self {
        Self { accept: false }
    }
}

impl SignatureVerifier for NullVerifier {
    fn verify(&self, _message: &[u8], _signature: &Signature, _signer: &PublicKey) -> bool {
        self.accept
    }
}
