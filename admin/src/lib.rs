//! Permission substrate shared by the farm, the payments engine and the index.
//!
//! Every component receives its own [`PermissionStore`] at construction
//! rather than consulting a global registry.

pub mod error;
pub mod store;

pub use error::AdminError;
pub use store::PermissionStore;
