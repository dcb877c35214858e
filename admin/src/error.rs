use svote_types::Principal;
use thiserror::Error;

/// Every variant is a "forbidden" outcome: the caller lacks the required role.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdminError {
    #[error("{0} is not the owner")]
    NotOwner(Principal),

    #[error("{0} is not an admin")]
    NotAdmin(Principal),

    #[error("{0} does not hold permission")]
    NoPermission(Principal),

    #[error("{0} is not the emergency admin")]
    NotEmergencyAdmin(Principal),

    #[error("permissions are locked down")]
    LockedDown,
}
