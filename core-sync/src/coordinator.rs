//! # Sync Coordinator
//!
//! Entry point for reconciliation runs. `start` validates the run
//! parameters, spawns the run on the tokio runtime, and returns a
//! [`JobHandle`] immediately; the caller observes completion through the
//! handle or through the event bus.
//!
//! ## Run shape
//!
//! One run takes a single local snapshot, fires the enabled targets'
//! listing requests concurrently, and reconciles each target as its
//! listing resolves. The [`FinishPolicy`](crate::config::FinishPolicy)
//! decides whether the run drains every target or stops after the first
//! resolved listing.

use std::sync::Arc;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use bridge_traits::listing::RemoteListingClient;
use bridge_traits::storage::FileSystemAccess;
use bridge_traits::transfer::UploadDispatcher;
use core_runtime::events::{CoreEvent, EventBus, SyncEvent};

use crate::config::{FinishPolicy, SyncConfig};
use crate::engine::ReconciliationEngine;
use crate::error::{Result, SyncError};
use crate::job::{JobId, RunStats, SyncJob};
use crate::media::MediaKind;
use crate::params::SyncParameters;
use crate::recent_uploads::RecentUploadCache;

// ============================================================================
// Job Handle
// ============================================================================

/// Caller-side handle to a running reconciliation job.
///
/// Dropping the handle neither cancels nor detaches the run; the spawned
/// task always drives the job to a terminal state.
#[derive(Debug)]
pub struct JobHandle {
    job_id: JobId,
    token: CancellationToken,
    receiver: oneshot::Receiver<SyncJob>,
}

impl JobHandle {
    /// Identifier of the underlying job.
    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    /// Request cancellation. Already-dispatched uploads are not recalled.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait for the run to reach a terminal state and return the finished
    /// job with its counters.
    pub async fn finished(self) -> Result<SyncJob> {
        self.receiver.await.map_err(|_| SyncError::FinishSignalLost)
    }
}

// ============================================================================
// Coordinator
// ============================================================================

/// Long-lived coordinator owning the bridge handles and the process-wide
/// recent-uploads cache.
///
/// Constructed once at startup and shared (behind an `Arc` if needed)
/// between however many scheduler triggers the host wires up. Runs started
/// from the same coordinator share the dedup cache.
pub struct SyncCoordinator {
    config: SyncConfig,
    listing_client: Arc<dyn RemoteListingClient>,
    dispatcher: Arc<dyn UploadDispatcher>,
    file_system: Arc<dyn FileSystemAccess>,
    recent_uploads: Arc<Mutex<RecentUploadCache>>,
    event_bus: EventBus,
}

impl SyncCoordinator {
    pub fn new(
        config: SyncConfig,
        listing_client: Arc<dyn RemoteListingClient>,
        dispatcher: Arc<dyn UploadDispatcher>,
        file_system: Arc<dyn FileSystemAccess>,
        event_bus: EventBus,
    ) -> Self {
        let recent_uploads = Arc::new(Mutex::new(RecentUploadCache::new(
            config.recent_uploads_capacity,
        )));
        Self {
            config,
            listing_client,
            dispatcher,
            file_system,
            recent_uploads,
            event_bus,
        }
    }

    /// Event bus the coordinator publishes run and upload events on.
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Start a reconciliation run and return without waiting for it.
    ///
    /// A run with neither remote path configured still goes through the
    /// full lifecycle and completes immediately with empty counters.
    pub fn start(&self, params: SyncParameters) -> Result<JobHandle> {
        let job = SyncJob::new(params.clone()).start()?;
        let job_id = job.id().clone();
        let token = CancellationToken::new();
        let (sender, receiver) = oneshot::channel();

        info!(
            job_id = %job_id,
            account = %params.account,
            pictures_enabled = params.is_enabled(MediaKind::Picture),
            videos_enabled = params.is_enabled(MediaKind::Video),
            "starting camera sync run"
        );
        self.event_bus
            .emit(CoreEvent::Sync(SyncEvent::Started {
                job_id: job_id.to_string(),
                account: params.account.to_string(),
                pictures_enabled: params.is_enabled(MediaKind::Picture),
                videos_enabled: params.is_enabled(MediaKind::Video),
            }))
            .ok();

        let engine = ReconciliationEngine::new(
            self.file_system.clone(),
            self.dispatcher.clone(),
            self.recent_uploads.clone(),
            self.event_bus.clone(),
            self.config.create_parent_folders,
        );
        let run = RunTask {
            job,
            params,
            engine,
            listing_client: self.listing_client.clone(),
            event_bus: self.event_bus.clone(),
            finish_policy: self.config.finish_policy,
            token: token.clone(),
        };
        tokio::spawn(run.execute(sender));

        Ok(JobHandle {
            job_id,
            token,
            receiver,
        })
    }
}

// ============================================================================
// Run Task
// ============================================================================

/// State moved into the spawned task driving one run.
struct RunTask {
    job: SyncJob,
    params: SyncParameters,
    engine: ReconciliationEngine,
    listing_client: Arc<dyn RemoteListingClient>,
    event_bus: EventBus,
    finish_policy: FinishPolicy,
    token: CancellationToken,
}

impl RunTask {
    async fn execute(self, sender: oneshot::Sender<SyncJob>) {
        let RunTask {
            job,
            params,
            engine,
            listing_client,
            event_bus,
            finish_policy,
            token,
        } = self;

        let snapshot = engine.snapshot(&params.local_camera_path).await;
        let mut stats = RunStats {
            files_skipped_unclassified: snapshot.unclassified,
            ..Default::default()
        };

        let mut listings = JoinSet::new();
        for target in params.targets() {
            let client = listing_client.clone();
            let account = params.account.clone();
            listings.spawn(async move {
                let outcome = client.list_folder(&account, &target.remote_root).await;
                (target, outcome)
            });
        }

        let mut cancelled = false;
        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    cancelled = true;
                    listings.abort_all();
                    break;
                }
                next = listings.join_next() => {
                    let Some(next) = next else { break };
                    match next {
                        Ok((target, outcome)) => {
                            if token.is_cancelled() {
                                cancelled = true;
                                listings.abort_all();
                                break;
                            }
                            let target_stats = engine
                                .reconcile_target(
                                    job.id(),
                                    &params,
                                    &target,
                                    outcome,
                                    &snapshot,
                                    &token,
                                )
                                .await;
                            stats.merge(&target_stats);
                            if finish_policy == FinishPolicy::FirstResult {
                                debug!(
                                    job_id = %job.id(),
                                    "first listing resolved, abandoning the rest"
                                );
                                listings.abort_all();
                                break;
                            }
                        }
                        Err(join_err) if join_err.is_cancelled() => continue,
                        Err(join_err) => {
                            warn!(job_id = %job.id(), error = %join_err, "listing task panicked");
                            stats.targets_failed += 1;
                        }
                    }
                }
            }
        }

        // A cancel observed mid-reconcile still finishes as Cancelled
        let cancelled = cancelled || token.is_cancelled();
        let finished = if cancelled {
            info!(
                job_id = %job.id(),
                files_dispatched = stats.files_dispatched,
                "camera sync run cancelled"
            );
            job.cancel(stats)
        } else {
            job.complete(stats)
        };

        match finished {
            Ok(job) => {
                let event = if cancelled {
                    SyncEvent::Cancelled {
                        job_id: job.id().to_string(),
                        files_dispatched: stats.files_dispatched,
                    }
                } else {
                    let duration_secs = job.duration_secs().unwrap_or(0.0).round() as u64;
                    info!(
                        job_id = %job.id(),
                        files_dispatched = stats.files_dispatched,
                        files_skipped = stats.files_skipped(),
                        targets_listed = stats.targets_listed,
                        targets_failed = stats.targets_failed,
                        duration_secs,
                        "camera sync run completed"
                    );
                    SyncEvent::Completed {
                        job_id: job.id().to_string(),
                        files_dispatched: stats.files_dispatched,
                        files_skipped: stats.files_skipped(),
                        targets_listed: stats.targets_listed,
                        targets_failed: stats.targets_failed,
                        duration_secs,
                    }
                };
                event_bus.emit(CoreEvent::Sync(event)).ok();
                let _ = sender.send(job);
            }
            Err(err) => {
                // Only reachable through a state-machine bug
                error!(error = %err, "failed to finalize sync job");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::account::AccountId;
    use bridge_traits::listing::{ListingError, RemoteFileEntry};
    use bridge_traits::storage::FileMetadata;
    use bridge_traits::transfer::{PostUploadAction, UploadRequest};
    use crate::job::JobStatus;
    use mockall::mock;
    use std::path::{Path, PathBuf};

    mock! {
        ListingClient {}

        #[async_trait]
        impl RemoteListingClient for ListingClient {
            async fn list_folder(
                &self,
                account: &AccountId,
                remote_path: &str,
            ) -> std::result::Result<Vec<RemoteFileEntry>, ListingError>;
        }
    }

    mock! {
        Dispatcher {}

        #[async_trait]
        impl UploadDispatcher for Dispatcher {
            async fn enqueue(&self, request: UploadRequest);
        }
    }

    mock! {
        FileSystem {}

        #[async_trait]
        impl FileSystemAccess for FileSystem {
            async fn exists(&self, path: &Path) -> bridge_traits::error::Result<bool>;
            async fn metadata(&self, path: &Path) -> bridge_traits::error::Result<FileMetadata>;
            async fn list_directory(&self, path: &Path) -> bridge_traits::error::Result<Vec<PathBuf>>;
        }
    }

    fn params() -> SyncParameters {
        SyncParameters {
            account: AccountId::new("alice@cloud.example.org"),
            local_camera_path: PathBuf::from("/sdcard/DCIM/Camera"),
            pictures_remote_path: Some("/Photos".to_string()),
            videos_remote_path: None,
            post_action: PostUploadAction::Copy,
        }
    }

    fn file_metadata() -> FileMetadata {
        FileMetadata {
            size: 4096,
            modified_at: Some(1_700_000_000),
            is_directory: false,
        }
    }

    #[tokio::test]
    async fn test_run_dispatches_new_local_file() {
        let mut listing = MockListingClient::new();
        listing
            .expect_list_folder()
            .times(1)
            .returning(|_, _| Ok(vec![]));

        let mut dispatcher = MockDispatcher::new();
        dispatcher
            .expect_enqueue()
            .withf(|request| request.remote_path == "/Photos/IMG_0001.jpg")
            .times(1)
            .returning(|_| ());

        let mut fs = MockFileSystem::new();
        fs.expect_list_directory()
            .returning(|_| Ok(vec![PathBuf::from("/sdcard/DCIM/Camera/IMG_0001.jpg")]));
        fs.expect_metadata().returning(|_| Ok(file_metadata()));

        let coordinator = SyncCoordinator::new(
            SyncConfig::default(),
            Arc::new(listing),
            Arc::new(dispatcher),
            Arc::new(fs),
            EventBus::new(16),
        );

        let job = coordinator
            .start(params())
            .expect("start")
            .finished()
            .await
            .expect("finish");
        assert_eq!(job.status(), JobStatus::Completed);
        assert_eq!(job.stats().files_dispatched, 1);
    }

    #[tokio::test]
    async fn test_file_already_remote_is_not_dispatched() {
        let mut listing = MockListingClient::new();
        listing.expect_list_folder().returning(|_, _| {
            Ok(vec![RemoteFileEntry::new(
                "IMG_0001.jpg",
                "/Photos/IMG_0001.jpg",
            )])
        });

        let mut dispatcher = MockDispatcher::new();
        dispatcher.expect_enqueue().times(0);

        let mut fs = MockFileSystem::new();
        fs.expect_list_directory()
            .returning(|_| Ok(vec![PathBuf::from("/sdcard/DCIM/Camera/IMG_0001.jpg")]));
        fs.expect_metadata().returning(|_| Ok(file_metadata()));

        let coordinator = SyncCoordinator::new(
            SyncConfig::default(),
            Arc::new(listing),
            Arc::new(dispatcher),
            Arc::new(fs),
            EventBus::new(16),
        );

        let job = coordinator
            .start(params())
            .expect("start")
            .finished()
            .await
            .expect("finish");
        assert_eq!(job.stats().files_dispatched, 0);
        assert_eq!(job.stats().files_already_remote, 1);
    }

    #[tokio::test]
    async fn test_listing_failure_is_absorbed() {
        let mut listing = MockListingClient::new();
        listing
            .expect_list_folder()
            .returning(|_, _| Err(ListingError::Other("connection reset".to_string())));

        let mut dispatcher = MockDispatcher::new();
        dispatcher.expect_enqueue().times(0);

        let mut fs = MockFileSystem::new();
        fs.expect_list_directory()
            .returning(|_| Ok(vec![PathBuf::from("/sdcard/DCIM/Camera/IMG_0001.jpg")]));
        fs.expect_metadata().returning(|_| Ok(file_metadata()));

        let coordinator = SyncCoordinator::new(
            SyncConfig::default(),
            Arc::new(listing),
            Arc::new(dispatcher),
            Arc::new(fs),
            EventBus::new(16),
        );

        let job = coordinator
            .start(params())
            .expect("start")
            .finished()
            .await
            .expect("finish");
        assert_eq!(job.status(), JobStatus::Completed);
        assert_eq!(job.stats().targets_failed, 1);
        assert_eq!(job.stats().files_dispatched, 0);
    }
}
