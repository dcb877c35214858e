//! The ballot box.
//!
//! A [`Ballot`] carries a time window and a submission policy packed into a
//! single 256-bit word ([`PackedField`]), an append-only list of votes, an
//! append-only sponsorship ledger and a per-signer sequence guard that stops
//! relayed (proxy) votes from being replayed.

pub mod ballot;
pub mod error;
pub mod flags;
pub mod packed;
pub mod rlp;
pub mod sequence;
pub mod sponsor;
pub mod vote;

pub use ballot::{Ballot, BallotDetails, BallotState};
pub use error::{BallotError, DecodeError};
pub use flags::{AuthMode, EncMode, SubmissionFlags, SubmissionMode};
pub use packed::{PackedField, PackedTiming};
pub use sequence::{SequenceGuard, MAX_SEQUENCE};
pub use sponsor::{SponsorLedger, Sponsorship};
pub use vote::{Vote, VoteRange};

/// Version of the ballot library logic.
pub const BALLOT_LIB_VERSION: u16 = 7;
