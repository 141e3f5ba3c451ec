//! Errors crossing the host bridge.
//!
//! Listing requests carry their own structured outcome
//! ([`ListingError`](crate::listing::ListingError)); everything else the
//! host can fail at while serving the core surfaces here.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    /// The host does not provide this capability on the current platform.
    #[error("bridge capability not available: {0}")]
    NotAvailable(String),

    /// The host denied access, typically a missing storage permission.
    #[error("access denied: {0}")]
    PermissionDenied(String),

    /// The operation was attempted and failed.
    #[error("bridge operation failed: {0}")]
    OperationFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
