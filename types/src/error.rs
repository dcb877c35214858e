//! Errors raised while constructing shared types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid principal: {0:?}")]
    InvalidPrincipal(String),

    #[error("ballot sequence must be non-zero")]
    ZeroSequence,

    #[error("ballot sequence {0} does not fit in 96 bits")]
    SequenceOverflow(u128),
}
