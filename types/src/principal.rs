//! Principal identifiers with the `sv_` prefix.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An account that can own ballots, cast votes, hold permissions or receive value.
///
/// Key-derived principals are `sv_` followed by 40 hex characters (see
/// `svote_crypto::derive_principal`); operators may also configure named
/// principals such as `sv_index`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Principal(String);

impl Principal {
    /// The standard prefix for all principals.
    pub const PREFIX: &'static str = "sv_";

    /// Create a principal from a raw string.
    ///
    /// # Panics
    /// Panics if the string is not a well-formed principal. Use [`Principal::parse`]
    /// for untrusted input.
    pub fn new(raw: impl Into<String>) -> Self {
        match Self::parse(raw) {
            Ok(p) => p,
            Err(e) => panic!("{e}"),
        }
    }

    /// Parse a principal, rejecting a missing prefix, an empty body or
    /// characters outside `[A-Za-z0-9_]`.
    pub fn parse(raw: impl Into<String>) -> Result<Self, TypesError> {
        let s = raw.into();
        let body = s
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| TypesError::InvalidPrincipal(s.clone()))?;
        if body.is_empty() || !body.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(TypesError::InvalidPrincipal(s));
        }
        Ok(Self(s))
    }

    /// Return the raw principal string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Principal {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<Principal> for String {
    fn from(p: Principal) -> Self {
        p.0
    }
}
