//! # Run Parameters & Sync Targets
//!
//! The host scheduler hands every run a parameter bag: which account to
//! reconcile, where the local camera roll lives, and where pictures and
//! videos go on the remote side. A remote path left unset disables that
//! half of the sync entirely - the corresponding remote directory is never
//! listed and files of that kind are never uploaded.

use bridge_traits::account::AccountId;
use bridge_traits::transfer::PostUploadAction;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::media::MediaKind;

/// Parameter bag supplied by the host scheduler for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncParameters {
    /// Account the camera roll is mirrored to.
    pub account: AccountId,
    /// Local camera-roll directory (single level, not recursive).
    pub local_camera_path: PathBuf,
    /// Remote directory for pictures; `None` disables picture sync.
    pub pictures_remote_path: Option<String>,
    /// Remote directory for videos; `None` disables video sync.
    pub videos_remote_path: Option<String>,
    /// What the host does with local files after a successful upload.
    pub post_action: PostUploadAction,
}

impl SyncParameters {
    /// Remote root configured for a media kind, if that kind is enabled.
    pub fn remote_root_for(&self, kind: MediaKind) -> Option<&str> {
        match kind {
            MediaKind::Picture => self.pictures_remote_path.as_deref(),
            MediaKind::Video => self.videos_remote_path.as_deref(),
        }
    }

    /// Whether uploads of the given kind are enabled for this run.
    pub fn is_enabled(&self, kind: MediaKind) -> bool {
        self.remote_root_for(kind).is_some()
    }

    /// Materialize the enabled sync targets for this run.
    ///
    /// Zero, one, or two targets depending on which remote paths are set.
    /// Disabled kinds produce no target and are therefore never queried.
    pub fn targets(&self) -> Vec<SyncTarget> {
        [MediaKind::Picture, MediaKind::Video]
            .into_iter()
            .filter_map(|kind| {
                self.remote_root_for(kind).map(|remote_root| SyncTarget {
                    kind,
                    local_root: self.local_camera_path.clone(),
                    remote_root: remote_root.to_string(),
                })
            })
            .collect()
    }
}

/// One enabled half of the reconciliation: a media kind, the local root to
/// scan, and the remote root to compare against and upload into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncTarget {
    /// Media kind this target covers.
    pub kind: MediaKind,
    /// Local directory scanned for candidates.
    pub local_root: PathBuf,
    /// Remote directory listed and uploaded into.
    pub remote_root: String,
}

impl SyncTarget {
    /// Destination remote path for a file name under this target.
    ///
    /// Normalizes to exactly one separator between root and name, whether
    /// or not the configured root carries a trailing slash.
    pub fn destination_for(&self, file_name: &str) -> String {
        format!("{}/{}", self.remote_root.trim_end_matches('/'), file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pictures: Option<&str>, videos: Option<&str>) -> SyncParameters {
        SyncParameters {
            account: AccountId::new("alice@cloud.example.org"),
            local_camera_path: PathBuf::from("/sdcard/DCIM/Camera"),
            pictures_remote_path: pictures.map(str::to_string),
            videos_remote_path: videos.map(str::to_string),
            post_action: PostUploadAction::Forget,
        }
    }

    #[test]
    fn test_targets_both_enabled() {
        let targets = params(Some("/Photos"), Some("/Videos")).targets();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].kind, MediaKind::Picture);
        assert_eq!(targets[0].remote_root, "/Photos");
        assert_eq!(targets[1].kind, MediaKind::Video);
        assert_eq!(targets[1].remote_root, "/Videos");
    }

    #[test]
    fn test_targets_pictures_only() {
        let p = params(Some("/Photos"), None);
        let targets = p.targets();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].kind, MediaKind::Picture);
        assert!(p.is_enabled(MediaKind::Picture));
        assert!(!p.is_enabled(MediaKind::Video));
    }

    #[test]
    fn test_targets_none_enabled() {
        assert!(params(None, None).targets().is_empty());
    }

    #[test]
    fn test_destination_join_normalizes_separator() {
        let target = SyncTarget {
            kind: MediaKind::Picture,
            local_root: PathBuf::from("/sdcard/DCIM/Camera"),
            remote_root: "/Photos/".to_string(),
        };
        assert_eq!(target.destination_for("IMG_0001.jpg"), "/Photos/IMG_0001.jpg");

        let bare = SyncTarget {
            remote_root: "/Photos".to_string(),
            ..target
        };
        assert_eq!(bare.destination_for("IMG_0001.jpg"), "/Photos/IMG_0001.jpg");
    }
}
