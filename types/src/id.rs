//! Composite ballot identifiers.
//!
//! A [`BallotId`] is a u128 laid out as:
//!
//! | bits     | field                                   |
//! |----------|-----------------------------------------|
//! | 96..128  | namespace of the farm that issued it    |
//! | 0..96    | per-namespace sequence, starting at 1   |

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;

const SEQUENCE_BITS: u32 = 96;
const SEQUENCE_MASK: u128 = (1u128 << SEQUENCE_BITS) - 1;

/// A 4-byte farm namespace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Namespace(pub u32);

impl Namespace {
    pub fn to_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// Identifier of a ballot: namespace × sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BallotId(u128);

impl BallotId {
    /// Compose an id. The sequence must be non-zero and fit in 96 bits.
    pub fn compose(namespace: Namespace, sequence: u128) -> Result<Self, TypesError> {
        if sequence == 0 {
            return Err(TypesError::ZeroSequence);
        }
        if sequence > SEQUENCE_MASK {
            return Err(TypesError::SequenceOverflow(sequence));
        }
        Ok(Self(((namespace.0 as u128) << SEQUENCE_BITS) | sequence))
    }

    /// Wrap a raw id without validation (ids arrive from callers as raw numbers).
    pub const fn from_raw(raw: u128) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn namespace(&self) -> Namespace {
        Namespace((self.0 >> SEQUENCE_BITS) as u32)
    }

    pub fn sequence(&self) -> u128 {
        self.0 & SEQUENCE_MASK
    }

    pub fn to_be_bytes(&self) -> [u8; 16] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for BallotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#034x}", self.0)
    }
}
