//! Account Identity
//!
//! Account and credential lookup live in the host; the core only carries an
//! opaque identifier that the host resolves back to real credentials when a
//! listing or upload request crosses the bridge.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier for a remote storage account.
///
/// Typically the account name handed over by the host scheduler
/// (e.g. `"alice@cloud.example.org"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Create an account identifier from the host-supplied account name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the account name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AccountId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for AccountId {
    fn from(name: String) -> Self {
        Self(name)
    }
}
