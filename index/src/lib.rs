//! Democracy registry.
//!
//! The index is the metered front door to a farm: democracies are created
//! here, their editors deploy ballots here, and every deployment is priced
//! through the payment engine before the farm sees it.

pub mod democracy;
pub mod error;
pub mod index;

pub use democracy::Democracy;
pub use error::IndexError;
pub use index::BallotIndex;
