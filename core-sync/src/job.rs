//! # Sync Job Entity
//!
//! A single reconciliation run modelled as a small state machine.
//!
//! ## State machine
//!
//! ```text
//! Pending -> Running -> Completed
//!    |          |
//!    +----------+-----> Cancelled
//! ```
//!
//! `Completed` and `Cancelled` are terminal. Transition methods consume the
//! job and return the advanced value, so an already-terminal job cannot be
//! restarted by construction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Result, SyncError};
use crate::params::SyncParameters;

// ============================================================================
// Job Identifier
// ============================================================================

/// Unique identifier for a reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(String);

impl JobId {
    /// Generate a new random job id.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Parse an id from its string form.
    pub fn from_string(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        Uuid::parse_str(&s).map_err(|_| SyncError::InvalidJobId(s.clone()))?;
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Job Status
// ============================================================================

/// Lifecycle state of a reconciliation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Created, not yet running.
    Pending,
    /// Listing remote folders and dispatching uploads.
    Running,
    /// Finished normally.
    Completed,
    /// Stopped on request before finishing.
    Cancelled,
}

impl JobStatus {
    /// Whether the job can make no further progress.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Cancelled)
    }

    /// Whether the job is still doing work.
    pub fn is_active(&self) -> bool {
        matches!(self, JobStatus::Pending | JobStatus::Running)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(JobStatus::Pending),
            "running" => Ok(JobStatus::Running),
            "completed" => Ok(JobStatus::Completed),
            "cancelled" => Ok(JobStatus::Cancelled),
            other => Err(SyncError::InvalidStatus(other.to_string())),
        }
    }
}

// ============================================================================
// Run Statistics
// ============================================================================

/// Counters accumulated while reconciling one or more targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Files handed to the upload dispatcher.
    pub files_dispatched: u64,
    /// Files whose name already appeared in the remote listing.
    pub files_already_remote: u64,
    /// Local files whose extension matched neither media kind.
    pub files_skipped_unclassified: u64,
    /// Files suppressed by the recent-uploads cache.
    pub files_skipped_duplicate: u64,
    /// Remote targets whose listing succeeded (including not-found).
    pub targets_listed: u64,
    /// Remote targets whose listing failed.
    pub targets_failed: u64,
}

impl RunStats {
    /// Sum of all skipped-file counters.
    pub fn files_skipped(&self) -> u64 {
        self.files_already_remote + self.files_skipped_unclassified + self.files_skipped_duplicate
    }

    /// Fold another target's counters into this one.
    pub fn merge(&mut self, other: &RunStats) {
        self.files_dispatched += other.files_dispatched;
        self.files_already_remote += other.files_already_remote;
        self.files_skipped_unclassified += other.files_skipped_unclassified;
        self.files_skipped_duplicate += other.files_skipped_duplicate;
        self.targets_listed += other.targets_listed;
        self.targets_failed += other.targets_failed;
    }
}

// ============================================================================
// Sync Job
// ============================================================================

/// A reconciliation run and its lifecycle timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncJob {
    id: JobId,
    params: SyncParameters,
    status: JobStatus,
    stats: RunStats,
    created_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
}

impl SyncJob {
    /// Create a new pending job for the given parameters.
    pub fn new(params: SyncParameters) -> Self {
        Self {
            id: JobId::new(),
            params,
            status: JobStatus::Pending,
            stats: RunStats::default(),
            created_at: Utc::now(),
            started_at: None,
            finished_at: None,
        }
    }

    pub fn id(&self) -> &JobId {
        &self.id
    }

    pub fn params(&self) -> &SyncParameters {
        &self.params
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Wall-clock duration of the run, once finished.
    pub fn duration_secs(&self) -> Option<f64> {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => {
                Some((end - start).num_milliseconds() as f64 / 1000.0)
            }
            _ => None,
        }
    }

    fn validate_transition(&self, to: JobStatus) -> Result<()> {
        let allowed = match (self.status, to) {
            (JobStatus::Pending, JobStatus::Running) => true,
            (JobStatus::Pending, JobStatus::Cancelled) => true,
            (JobStatus::Running, JobStatus::Completed) => true,
            (JobStatus::Running, JobStatus::Cancelled) => true,
            _ => false,
        };

        if allowed {
            Ok(())
        } else {
            Err(SyncError::InvalidStateTransition {
                from: self.status.as_str().to_string(),
                to: to.as_str().to_string(),
                reason: format!("job {} cannot make this transition", self.id),
            })
        }
    }

    /// Mark the job running.
    pub fn start(mut self) -> Result<Self> {
        self.validate_transition(JobStatus::Running)?;
        self.status = JobStatus::Running;
        self.started_at = Some(Utc::now());
        Ok(self)
    }

    /// Mark the job completed with its final counters.
    pub fn complete(mut self, stats: RunStats) -> Result<Self> {
        self.validate_transition(JobStatus::Completed)?;
        self.status = JobStatus::Completed;
        self.stats = stats;
        self.finished_at = Some(Utc::now());
        Ok(self)
    }

    /// Mark the job cancelled, keeping whatever counters accrued so far.
    pub fn cancel(mut self, stats: RunStats) -> Result<Self> {
        self.validate_transition(JobStatus::Cancelled)?;
        self.status = JobStatus::Cancelled;
        self.stats = stats;
        self.finished_at = Some(Utc::now());
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::account::AccountId;
    use bridge_traits::transfer::PostUploadAction;
    use std::path::PathBuf;

    fn params() -> SyncParameters {
        SyncParameters {
            account: AccountId::new("user@example.com"),
            local_camera_path: PathBuf::from("/sdcard/DCIM/Camera"),
            pictures_remote_path: Some("/CameraUpload/Pictures".to_string()),
            videos_remote_path: None,
            post_action: PostUploadAction::Forget,
        }
    }

    #[test]
    fn test_job_id_roundtrip() {
        let id = JobId::new();
        let parsed = JobId::from_string(id.as_str()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_job_id_rejects_garbage() {
        assert!(matches!(
            JobId::from_string("not-a-uuid"),
            Err(SyncError::InvalidJobId(_))
        ));
    }

    #[test]
    fn test_status_parse_roundtrip() {
        for status in [
            JobStatus::Pending,
            JobStatus::Running,
            JobStatus::Completed,
            JobStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<JobStatus>().unwrap(), status);
        }
        assert!("paused".parse::<JobStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&JobStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&JobStatus::Cancelled).unwrap(),
            "\"cancelled\""
        );
    }

    #[test]
    fn test_happy_path_transitions() {
        let job = SyncJob::new(params());
        assert_eq!(job.status(), JobStatus::Pending);
        assert!(job.started_at().is_none());

        let job = job.start().unwrap();
        assert_eq!(job.status(), JobStatus::Running);
        assert!(job.started_at().is_some());

        let stats = RunStats {
            files_dispatched: 3,
            ..Default::default()
        };
        let job = job.complete(stats).unwrap();
        assert_eq!(job.status(), JobStatus::Completed);
        assert_eq!(job.stats().files_dispatched, 3);
        assert!(job.finished_at().is_some());
        assert!(job.duration_secs().is_some());
    }

    #[test]
    fn test_cancel_from_pending_and_running() {
        let job = SyncJob::new(params());
        let job = job.cancel(RunStats::default()).unwrap();
        assert_eq!(job.status(), JobStatus::Cancelled);

        let job = SyncJob::new(params()).start().unwrap();
        let job = job.cancel(RunStats::default()).unwrap();
        assert_eq!(job.status(), JobStatus::Cancelled);
    }

    #[test]
    fn test_terminal_jobs_reject_transitions() {
        let job = SyncJob::new(params())
            .start()
            .unwrap()
            .complete(RunStats::default())
            .unwrap();
        let err = job.clone().cancel(RunStats::default()).unwrap_err();
        assert!(matches!(err, SyncError::InvalidStateTransition { .. }));

        // Pending cannot complete without running first
        let err = SyncJob::new(params())
            .complete(RunStats::default())
            .unwrap_err();
        assert!(matches!(err, SyncError::InvalidStateTransition { .. }));
    }

    #[test]
    fn test_stats_merge_and_skipped_total() {
        let mut a = RunStats {
            files_dispatched: 1,
            files_already_remote: 2,
            files_skipped_unclassified: 1,
            files_skipped_duplicate: 0,
            targets_listed: 1,
            targets_failed: 0,
        };
        let b = RunStats {
            files_dispatched: 2,
            files_already_remote: 0,
            files_skipped_unclassified: 0,
            files_skipped_duplicate: 3,
            targets_listed: 1,
            targets_failed: 1,
        };
        a.merge(&b);
        assert_eq!(a.files_dispatched, 3);
        assert_eq!(a.files_skipped(), 6);
        assert_eq!(a.targets_listed, 2);
        assert_eq!(a.targets_failed, 1);
    }
}
