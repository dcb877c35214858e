//! Principal derivation from signing keys.

use crate::hash::blake2b_256;
use svote_types::{Principal, PublicKey};

/// Derive the principal controlled by `public_key`.
///
/// `sv_` followed by the hex of the last 20 bytes of `blake2b_256(public_key)`.
pub fn derive_principal(public_key: &PublicKey) -> Principal {
    let digest = blake2b_256(public_key.as_bytes());
    Principal::new(format!("{}{}", Principal::PREFIX, hex::encode(&digest[12..])))
}
