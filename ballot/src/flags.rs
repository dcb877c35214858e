//! Submission flags.
//!
//! | bit | flag        | group                    |
//! |-----|-------------|--------------------------|
//! | 0   | USE_ETH     | auth, exactly one of 0/1 |
//! | 1   | USE_SIGNED  | auth                     |
//! | 2   | USE_NO_ENC  | enc, exactly one of 2/3  |
//! | 3   | USE_ENC     | enc                      |
//! | 13  | IS_BINDING  | modifier                 |
//! | 14  | IS_OFFICIAL | modifier                 |
//! | 15  | USE_TESTING | modifier                 |

use crate::error::BallotError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthMode {
    /// Votes are authorized by the sending principal.
    Eth,
    /// Votes carry a signature that anyone may relay.
    Signed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EncMode {
    NoEnc,
    Enc,
}

/// An auth × enc pair; names the four mode-mismatch error kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubmissionMode {
    EthNoEnc,
    EthWithEnc,
    SignedNoEnc,
    SignedWithEnc,
}

impl SubmissionMode {
    pub fn of(auth: AuthMode, enc: EncMode) -> Self {
        match (auth, enc) {
            (AuthMode::Eth, EncMode::NoEnc) => Self::EthNoEnc,
            (AuthMode::Eth, EncMode::Enc) => Self::EthWithEnc,
            (AuthMode::Signed, EncMode::NoEnc) => Self::SignedNoEnc,
            (AuthMode::Signed, EncMode::Enc) => Self::SignedWithEnc,
        }
    }
}

impl fmt::Display for SubmissionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::EthNoEnc => "eth/no-enc",
            Self::EthWithEnc => "eth/enc",
            Self::SignedNoEnc => "signed/no-enc",
            Self::SignedWithEnc => "signed/enc",
        };
        f.write_str(s)
    }
}

/// Validated submission flags.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionFlags(u16);

impl SubmissionFlags {
    pub const USE_ETH: u16 = 1 << 0;
    pub const USE_SIGNED: u16 = 1 << 1;
    pub const USE_NO_ENC: u16 = 1 << 2;
    pub const USE_ENC: u16 = 1 << 3;
    pub const IS_BINDING: u16 = 1 << 13;
    pub const IS_OFFICIAL: u16 = 1 << 14;
    pub const USE_TESTING: u16 = 1 << 15;

    pub const KNOWN_BITS: u16 = Self::USE_ETH
        | Self::USE_SIGNED
        | Self::USE_NO_ENC
        | Self::USE_ENC
        | Self::IS_BINDING
        | Self::IS_OFFICIAL
        | Self::USE_TESTING;

    /// The only flag word that qualifies as a community ballot.
    pub const COMMUNITY: u16 = Self::USE_ETH | Self::USE_NO_ENC;

    /// Check a raw flag segment: exactly one auth bit, exactly one enc bit,
    /// nothing outside [`Self::KNOWN_BITS`].
    pub fn validate(raw: u128) -> Result<Self, BallotError> {
        if raw > u16::MAX as u128 {
            return Err(BallotError::InvalidFlags(raw));
        }
        let bits = raw as u16;
        let one_auth = (bits & Self::USE_ETH != 0) != (bits & Self::USE_SIGNED != 0);
        let one_enc = (bits & Self::USE_NO_ENC != 0) != (bits & Self::USE_ENC != 0);
        if !one_auth || !one_enc || bits & !Self::KNOWN_BITS != 0 {
            return Err(BallotError::InvalidFlags(raw));
        }
        Ok(Self(bits))
    }

    pub fn bits(&self) -> u16 {
        self.0
    }

    pub fn auth(&self) -> AuthMode {
        if self.0 & Self::USE_SIGNED != 0 {
            AuthMode::Signed
        } else {
            AuthMode::Eth
        }
    }

    pub fn enc(&self) -> EncMode {
        if self.0 & Self::USE_ENC != 0 {
            EncMode::Enc
        } else {
            EncMode::NoEnc
        }
    }

    pub fn is_binding(&self) -> bool {
        self.0 & Self::IS_BINDING != 0
    }

    pub fn is_official(&self) -> bool {
        self.0 & Self::IS_OFFICIAL != 0
    }

    pub fn is_testing(&self) -> bool {
        self.0 & Self::USE_TESTING != 0
    }

    /// Plain eth-authenticated, unencrypted, non-binding, non-official, nothing else.
    pub fn qualifies_as_community(&self) -> bool {
        self.0 == Self::COMMUNITY
    }
}

impl fmt::Debug for SubmissionFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubmissionFlags({:#06x})", self.0)
    }
}
