//! Member identity.
//!
//! Members are identified by an opaque account address supplied by the
//! calling layer (wallet, service frontend). The engine never interprets
//! the address; it only compares, orders, and displays it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Account-address equivalent identifying a member.
///
/// Ordered and hashable so it can key the vote ledger and the member set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemberId(pub String);

impl MemberId {
    /// Create a member id from any address-like string.
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Returns the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MemberId {
    fn from(address: &str) -> Self {
        Self(address.to_string())
    }
}
