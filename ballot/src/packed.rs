//! The packed timing word.
//!
//! A ballot's start, end and submission flags travel as one 256-bit value
//! held as four big-endian `u64` limbs:
//!
//! | limb | bits     | field                          |
//! |------|----------|--------------------------------|
//! | 0    | 192..256 | flags, high half (must be 0)   |
//! | 1    | 128..192 | flags, low half                |
//! | 2    | 64..128  | start time (Unix seconds)      |
//! | 3    | 0..64    | end time (Unix seconds)        |

use crate::error::BallotError;
use crate::flags::SubmissionFlags;
use serde::{Deserialize, Serialize};
use svote_types::Timestamp;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackedField([u64; 4]);

impl PackedField {
    pub const fn from_limbs(limbs: [u64; 4]) -> Self {
        Self(limbs)
    }

    pub fn limbs(&self) -> [u64; 4] {
        self.0
    }

    /// Pack without validation.
    pub fn encode(start: u64, end: u64, flags: u128) -> Self {
        Self([(flags >> 64) as u64, flags as u64, start, end])
    }

    /// Inverse of [`PackedField::encode`]: `(start, end, flags)`.
    pub fn decode(&self) -> (u64, u64, u128) {
        let flags = ((self.0[0] as u128) << 64) | self.0[1] as u128;
        (self.0[2], self.0[3], flags)
    }

    pub fn to_be_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        for (chunk, limb) in out.chunks_exact_mut(8).zip(self.0) {
            chunk.copy_from_slice(&limb.to_be_bytes());
        }
        out
    }

    pub fn from_be_bytes(bytes: &[u8; 32]) -> Self {
        let mut limbs = [0u64; 4];
        for (limb, chunk) in limbs.iter_mut().zip(bytes.chunks_exact(8)) {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(chunk);
            *limb = u64::from_be_bytes(buf);
        }
        Self(limbs)
    }
}

/// Decoded and validated timing of a ballot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedTiming {
    pub start: Timestamp,
    pub end: Timestamp,
    pub flags: SubmissionFlags,
}

impl PackedTiming {
    /// Decode for a new ballot: flags must be legal, `end` must lie after
    /// both `start` and `now`.
    pub fn for_new_ballot(packed: PackedField, now: Timestamp) -> Result<Self, BallotError> {
        let (start, end, raw_flags) = packed.decode();
        let flags = SubmissionFlags::validate(raw_flags)?;
        if end <= start || end <= now.as_secs() {
            return Err(BallotError::InvalidTiming {
                start,
                end,
                now: now.as_secs(),
            });
        }
        Ok(Self {
            start: Timestamp::new(start),
            end: Timestamp::new(end),
            flags,
        })
    }

    pub fn to_packed(&self) -> PackedField {
        PackedField::encode(
            self.start.as_secs(),
            self.end.as_secs(),
            self.flags.bits() as u128,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STD: u128 = (SubmissionFlags::USE_ETH | SubmissionFlags::USE_NO_ENC) as u128;

    #[test]
    fn layout_matches_shifted_integer() {
        let packed = PackedField::encode(0x1111, 0x2222, 0x8005);
        let bytes = packed.to_be_bytes();
        assert_eq!(&bytes[..8], &[0u8; 8]);
        assert_eq!(&bytes[8..16], &0x8005u64.to_be_bytes());
        assert_eq!(&bytes[16..24], &0x1111u64.to_be_bytes());
        assert_eq!(&bytes[24..], &0x2222u64.to_be_bytes());
        assert_eq!(PackedField::from_be_bytes(&bytes), packed);
    }

    #[test]
    fn high_flag_bits_survive_decode() {
        let packed = PackedField::encode(1, 2, 1u128 << 100);
        assert_eq!(packed.decode(), (1, 2, 1u128 << 100));
    }

    #[test]
    fn end_not_after_start_rejected() {
        let now = Timestamp::new(100);
        let same = PackedField::encode(500, 500, STD);
        assert!(matches!(
            PackedTiming::for_new_ballot(same, now),
            Err(BallotError::InvalidTiming { .. })
        ));
    }

    #[test]
    fn end_in_past_rejected() {
        let packed = PackedField::encode(10, 50, STD);
        assert!(PackedTiming::for_new_ballot(packed, Timestamp::new(50)).is_err());
        assert!(PackedTiming::for_new_ballot(packed, Timestamp::new(49)).is_ok());
    }

    #[test]
    fn bad_flags_reported_before_timing() {
        let packed = PackedField::encode(10, 5, 3);
        assert_eq!(
            PackedTiming::for_new_ballot(packed, Timestamp::new(0)),
            Err(BallotError::InvalidFlags(3))
        );
    }
}
