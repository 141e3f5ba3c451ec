//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host.
//!
//! ## Overview
//!
//! This crate defines the contract between the camera-sync core and its
//! host. Each trait represents a capability the core requires but that the
//! host owns: the remote-listing transport, the upload queue, and local
//! file system access. The core depends only on these seams; it never
//! performs network I/O or transfer work itself.
//!
//! ## Traits
//!
//! - [`RemoteListingClient`](listing::RemoteListingClient) - Lists one remote directory
//! - [`UploadDispatcher`](transfer::UploadDispatcher) - Accepts fire-and-forget upload requests
//! - [`FileSystemAccess`](storage::FileSystemAccess) - Reads the local camera-roll snapshot
//!
//! ## Error Handling
//!
//! File system operations use [`BridgeError`](error::BridgeError). Listing
//! requests have their own structured outcome,
//! [`ListingError`](listing::ListingError), because the core reacts
//! differently to "directory not found" than to every other failure.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds to support safe concurrent
//! usage across async tasks. Implementations must ensure thread safety.

pub mod account;
pub mod error;
pub mod listing;
pub mod storage;
pub mod transfer;

pub use error::BridgeError;

// Re-export commonly used types
pub use account::AccountId;
pub use listing::{ListingError, RemoteFileEntry, RemoteListingClient};
pub use storage::{FileMetadata, FileSystemAccess};
pub use transfer::{PostUploadAction, UploadDispatcher, UploadOrigin, UploadRequest};
