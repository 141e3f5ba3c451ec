//! # Sync Configuration

use serde::{Deserialize, Serialize};

use crate::recent_uploads::DEFAULT_RECENT_UPLOADS_CAPACITY;

/// When a run signals finish to the host scheduler.
///
/// The predecessor of this core signalled finish as soon as the *first*
/// remote listing resolved, abandoning whatever the second target was still
/// doing; the code that waited for both targets existed but was disabled.
/// Both behaviors are kept available here so hosts relying on the early
/// finish can opt back into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishPolicy {
    /// Finish only after every enabled target's listing has been resolved
    /// and reconciled. The correct behavior, and the default.
    WaitForAllTargets,
    /// Finish after the first listing result, abandoning outstanding
    /// requests. Compatibility mode: with both targets enabled, whichever
    /// listing resolves second is dropped, so its files wait for the next
    /// scheduled run.
    FirstResult,
}

/// Configuration for the sync coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// When a run is considered finished.
    pub finish_policy: FinishPolicy,

    /// Capacity of the recent-uploads dedup cache.
    pub recent_uploads_capacity: usize,

    /// Ask the host to create missing remote parent directories on upload.
    pub create_parent_folders: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            finish_policy: FinishPolicy::WaitForAllTargets,
            recent_uploads_capacity: DEFAULT_RECENT_UPLOADS_CAPACITY,
            create_parent_folders: true,
        }
    }
}
