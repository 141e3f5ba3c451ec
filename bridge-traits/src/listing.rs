//! Remote Directory Listing
//!
//! Contract for the network operation that lists the contents of one remote
//! directory. The transport (HTTP requests, authentication, retries at the
//! connection level) is owned by the host; the core only consumes the
//! structured outcome defined here.
//!
//! # Outcomes
//!
//! A listing request resolves to exactly one of:
//! - `Ok(entries)` - the remote directory exists; `entries` may be empty.
//! - `Err(ListingError::NotFound)` - the remote directory has not been
//!   created yet. Callers treat this as an empty listing, not a failure.
//! - `Err(ListingError::Other)` - any other failure (network, auth, server).
//!   Callers absorb this per directory; retrying is the host's concern.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::account::AccountId;

/// One entry of a remote directory listing.
///
/// Only `name` participates in reconciliation; size and modification time
/// are carried through for logging and future use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFileEntry {
    /// File name within the remote directory.
    pub name: String,
    /// Full remote path of the entry.
    pub remote_path: String,
    /// Size in bytes, when the server reports one.
    pub size: Option<u64>,
    /// Modification time as Unix epoch seconds, when reported.
    pub modified_at: Option<i64>,
}

impl RemoteFileEntry {
    /// Create an entry with only the matching-relevant fields set.
    pub fn new(name: impl Into<String>, remote_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            remote_path: remote_path.into(),
            size: None,
            modified_at: None,
        }
    }
}

/// Structured failure of a listing request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListingError {
    /// The remote directory does not exist yet.
    #[error("remote directory not found")]
    NotFound,

    /// Any other failure: connectivity, authentication, server error.
    #[error("remote listing failed: {0}")]
    Other(String),
}

/// Client for listing the contents of a remote directory.
///
/// Implemented by the host transport layer. One call lists a single
/// directory level; the core never asks for recursion.
#[async_trait]
pub trait RemoteListingClient: Send + Sync {
    /// List the files directly under `remote_path` for `account`.
    async fn list_folder(
        &self,
        account: &AccountId,
        remote_path: &str,
    ) -> std::result::Result<Vec<RemoteFileEntry>, ListingError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_file_entry_new() {
        let entry = RemoteFileEntry::new("IMG_0001.jpg", "/Photos/IMG_0001.jpg");
        assert_eq!(entry.name, "IMG_0001.jpg");
        assert_eq!(entry.remote_path, "/Photos/IMG_0001.jpg");
        assert!(entry.size.is_none());
        assert!(entry.modified_at.is_none());
    }

    #[test]
    fn test_listing_error_display() {
        assert_eq!(
            ListingError::NotFound.to_string(),
            "remote directory not found"
        );
        assert_eq!(
            ListingError::Other("timeout".to_string()).to_string(),
            "remote listing failed: timeout"
        );
    }
}
