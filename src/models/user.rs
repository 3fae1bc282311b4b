//! Defines the owner identity reference attached to remote transactions.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The identity that owns transactions in the remote store.
///
/// Identity resolution is delegated to the hosted auth provider; this crate
/// only carries the opaque reference and tags writes with it. The remote
/// provider receives the caller's resolved identity explicitly at
/// construction time instead of consulting ambient session state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Create a user ID from an opaque identity string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
