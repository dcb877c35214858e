use crate::ballot::BallotState;
use crate::flags::SubmissionMode;
use svote_types::{Principal, SpecHash};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BallotError {
    #[error("{0} is not the ballot owner or an admin")]
    Forbidden(Principal),

    #[error("invalid submission flags {0:#x}")]
    InvalidFlags(u128),

    #[error("invalid timing: start {start}, end {end}, now {now}")]
    InvalidTiming { start: u64, end: u64, now: u64 },

    #[error("spec hash {0} already used in this namespace")]
    DuplicateSpecHash(SpecHash),

    #[error("spec hash must be non-zero")]
    ZeroSpecHash,

    #[error("ballot is not accepting votes ({0:?})")]
    BallotClosed(BallotState),

    #[error("{0} submission does not match the ballot's flags")]
    ModeMismatch(SubmissionMode),

    #[error("secret key cannot be revealed before the ballot closes")]
    EarlySeckeyReveal,

    #[error("secret key already revealed")]
    SeckeyAlreadyRevealed,

    #[error("secret key must be non-zero")]
    ZeroSeckey,

    #[error("operation requires a testing ballot")]
    TestingRequired,

    #[error("stale proxy sequence: offered {offered}, stored {stored}")]
    StaleSequence { stored: u32, offered: u64 },

    #[error("{0} already has a signed vote on this ballot")]
    SignedVoteReplayed(Principal),

    #[error("proxy sequence {0} exceeds the 32-bit domain")]
    SequenceOverflow(u64),

    #[error("arithmetic overflow in ballot accounting")]
    Overflow,
}

/// Failures decoding an RLP byte-string list.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("input ended early")]
    UnexpectedEnd,

    #[error("{0} trailing bytes after list")]
    TrailingBytes(usize),

    #[error("expected a list")]
    ExpectedList,

    #[error("nested lists are not supported")]
    NestedList,

    #[error("non-canonical encoding")]
    NonCanonical,

    #[error("length does not fit in memory")]
    LengthOverflow,
}
