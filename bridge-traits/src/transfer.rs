//! Upload Dispatch
//!
//! Contract for handing a file off to the host upload subsystem. Dispatch is
//! fire-and-forget from the core's point of view: the host queue performs
//! the actual transfer, retries it, and notifies its own listeners. Nothing
//! about the transfer's fate flows back through this trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::account::AccountId;

/// What the host should do with the local copy once the upload finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostUploadAction {
    /// Keep the local file where it is.
    Copy,
    /// Move the local file into the host-managed storage area.
    Move,
    /// Forget the local file entirely after upload.
    Forget,
}

/// Which half of the camera-roll sync produced an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadOrigin {
    /// Queued by the instant-picture reconciliation.
    InstantPicture,
    /// Queued by the instant-video reconciliation.
    InstantVideo,
}

/// One upload handed to the host queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRequest {
    /// Account the upload belongs to.
    pub account: AccountId,
    /// Absolute local path of the source file.
    pub local_path: PathBuf,
    /// Destination path on the remote storage.
    pub remote_path: String,
    /// Local-copy policy after a successful upload.
    pub post_action: PostUploadAction,
    /// MIME type inferred from the file name.
    pub mime_type: String,
    /// Create missing remote parent directories before uploading.
    pub create_parent_folders: bool,
    /// Which sync half queued the upload.
    pub origin: UploadOrigin,
}

/// Sink for upload requests.
///
/// Implemented by the host transfer queue. `enqueue` returns once the
/// request has been accepted; the transfer itself happens later on the
/// host's schedule.
#[async_trait]
pub trait UploadDispatcher: Send + Sync {
    /// Queue one upload. One-way: no result is observed by the caller.
    async fn enqueue(&self, request: UploadRequest);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_request_roundtrip() {
        let request = UploadRequest {
            account: AccountId::new("alice@cloud.example.org"),
            local_path: PathBuf::from("/sdcard/DCIM/IMG_0001.jpg"),
            remote_path: "/Photos/IMG_0001.jpg".to_string(),
            post_action: PostUploadAction::Forget,
            mime_type: "image/jpeg".to_string(),
            create_parent_folders: true,
            origin: UploadOrigin::InstantPicture,
        };

        let json = serde_json::to_string(&request).unwrap();
        let back: UploadRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, request);
    }
}
