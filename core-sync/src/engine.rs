//! # Reconciliation Engine
//!
//! Compares a snapshot of the local camera roll against one remote
//! directory listing and dispatches uploads for files that exist locally
//! but not remotely. The comparison key is the exact, case-sensitive file
//! name; sizes and timestamps never participate.
//!
//! The check-dispatch-record sequence for each candidate runs under the
//! shared recent-uploads mutex, so two overlapping runs observing the same
//! new file cannot both dispatch it.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use bridge_traits::listing::{ListingError, RemoteFileEntry};
use bridge_traits::storage::FileSystemAccess;
use bridge_traits::transfer::{UploadDispatcher, UploadRequest};
use core_runtime::events::{CoreEvent, EventBus, UploadEvent};

use crate::job::{JobId, RunStats};
use crate::media::{self, MediaKind};
use crate::params::{SyncParameters, SyncTarget};
use crate::recent_uploads::RecentUploadCache;

// ============================================================================
// Local Snapshot
// ============================================================================

/// A local camera-roll file that classified as a sync candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalCandidate {
    /// File name, the reconciliation key.
    pub name: String,
    /// Absolute local path.
    pub path: PathBuf,
    /// Media kind the file classified as.
    pub kind: MediaKind,
    /// MIME type inferred from the extension.
    pub mime_type: &'static str,
}

/// One read of the local camera-roll directory, taken at run start and
/// shared by every target of the run.
#[derive(Debug, Clone, Default)]
pub struct LocalSnapshot {
    /// Candidates in file-name order.
    pub candidates: Vec<LocalCandidate>,
    /// Regular files that classified as neither picture nor video.
    pub unclassified: u64,
}

impl LocalSnapshot {
    /// Candidates of one media kind, in name order.
    pub fn candidates_of(&self, kind: MediaKind) -> impl Iterator<Item = &LocalCandidate> {
        self.candidates.iter().filter(move |c| c.kind == kind)
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Per-run reconciliation engine.
///
/// Holds the bridge handles and the process-wide recent-uploads cache. One
/// engine serves all targets of a run; the snapshot is taken once and the
/// targets reconcile against it independently.
pub struct ReconciliationEngine {
    file_system: Arc<dyn FileSystemAccess>,
    dispatcher: Arc<dyn UploadDispatcher>,
    recent_uploads: Arc<Mutex<RecentUploadCache>>,
    event_bus: EventBus,
    create_parent_folders: bool,
}

impl ReconciliationEngine {
    pub fn new(
        file_system: Arc<dyn FileSystemAccess>,
        dispatcher: Arc<dyn UploadDispatcher>,
        recent_uploads: Arc<Mutex<RecentUploadCache>>,
        event_bus: EventBus,
        create_parent_folders: bool,
    ) -> Self {
        Self {
            file_system,
            dispatcher,
            recent_uploads,
            event_bus,
            create_parent_folders,
        }
    }

    /// Take a single-level snapshot of the local camera-roll directory.
    ///
    /// Subdirectories and unclassifiable files are not candidates. A
    /// missing or unreadable directory degrades to an empty snapshot with
    /// a warning; the run then completes having dispatched nothing.
    pub async fn snapshot(&self, local_root: &Path) -> LocalSnapshot {
        let entries = match self.file_system.list_directory(local_root).await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(
                    path = %local_root.display(),
                    error = %err,
                    "failed to read local camera folder, treating as empty"
                );
                return LocalSnapshot::default();
            }
        };

        let mut snapshot = LocalSnapshot::default();
        for path in entries {
            match self.file_system.metadata(&path).await {
                Ok(meta) if meta.is_directory => continue,
                Ok(_) => {}
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable entry");
                    continue;
                }
            }

            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                debug!(path = %path.display(), "skipping entry with non-UTF-8 name");
                continue;
            };

            match media::classify(name) {
                Some((kind, mime_type)) => snapshot.candidates.push(LocalCandidate {
                    name: name.to_string(),
                    path: path.clone(),
                    kind,
                    mime_type,
                }),
                None => snapshot.unclassified += 1,
            }
        }

        snapshot.candidates.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(
            candidates = snapshot.candidates.len(),
            unclassified = snapshot.unclassified,
            path = %local_root.display(),
            "local snapshot taken"
        );
        snapshot
    }

    /// Reconcile one target against its listing outcome.
    ///
    /// A `NotFound` listing means the remote directory does not exist yet;
    /// every candidate of the target's kind is then new. Any other listing
    /// failure is absorbed: the target is reported failed in the counters
    /// and nothing is dispatched for it, but the run continues.
    pub async fn reconcile_target(
        &self,
        job_id: &JobId,
        params: &SyncParameters,
        target: &SyncTarget,
        outcome: std::result::Result<Vec<RemoteFileEntry>, ListingError>,
        snapshot: &LocalSnapshot,
        cancel: &CancellationToken,
    ) -> RunStats {
        let mut stats = RunStats::default();

        let remote = match outcome {
            Ok(entries) => {
                debug!(
                    job_id = %job_id,
                    kind = %target.kind,
                    remote_root = %target.remote_root,
                    remote_files = entries.len(),
                    "remote listing resolved"
                );
                entries
            }
            Err(ListingError::NotFound) => {
                debug!(
                    job_id = %job_id,
                    kind = %target.kind,
                    remote_root = %target.remote_root,
                    "remote directory does not exist yet, treating as empty"
                );
                Vec::new()
            }
            Err(err) => {
                warn!(
                    job_id = %job_id,
                    kind = %target.kind,
                    remote_root = %target.remote_root,
                    error = %err,
                    "remote listing failed, skipping target for this run"
                );
                stats.targets_failed += 1;
                return stats;
            }
        };
        stats.targets_listed += 1;

        for candidate in snapshot.candidates_of(target.kind) {
            if cancel.is_cancelled() {
                break;
            }

            // Exact, case-sensitive name match against the listing
            if remote.iter().any(|entry| entry.name == candidate.name) {
                stats.files_already_remote += 1;
                continue;
            }

            if self.dispatch(job_id, params, target, candidate).await {
                stats.files_dispatched += 1;
            } else {
                stats.files_skipped_duplicate += 1;
            }
        }

        stats
    }

    /// Dispatch one candidate unless the recent-uploads cache suppresses it.
    ///
    /// The cache lock is held across the enqueue so a concurrent run cannot
    /// slip the same path in between the check and the record.
    async fn dispatch(
        &self,
        job_id: &JobId,
        params: &SyncParameters,
        target: &SyncTarget,
        candidate: &LocalCandidate,
    ) -> bool {
        let mut recent = self.recent_uploads.lock().await;
        if recent.contains(&candidate.path) {
            debug!(
                job_id = %job_id,
                path = %candidate.path.display(),
                "recently dispatched, skipping"
            );
            return false;
        }

        let remote_path = target.destination_for(&candidate.name);
        let request = UploadRequest {
            account: params.account.clone(),
            local_path: candidate.path.clone(),
            remote_path: remote_path.clone(),
            post_action: params.post_action,
            mime_type: candidate.mime_type.to_string(),
            create_parent_folders: self.create_parent_folders,
            origin: target.kind.upload_origin(),
        };

        self.dispatcher.enqueue(request).await;
        recent.record(candidate.path.clone());
        drop(recent);

        info!(
            job_id = %job_id,
            local_path = %candidate.path.display(),
            remote_path = %remote_path,
            mime_type = candidate.mime_type,
            "requested upload"
        );
        self.event_bus
            .emit(CoreEvent::Upload(UploadEvent::Queued {
                job_id: job_id.to_string(),
                local_path: candidate.path.display().to_string(),
                remote_path,
                mime_type: candidate.mime_type.to_string(),
            }))
            .ok();

        true
    }
}
