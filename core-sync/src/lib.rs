//! # Camera-Roll Sync Core
//!
//! Platform-independent reconciliation core for instant camera uploads.
//! Given one local camera-roll directory and up to two remote directories
//! (pictures and videos), a run lists the remote side, compares file names
//! exactly, and hands every locally-present, remotely-absent file to the
//! host upload queue.
//!
//! ## Overview
//!
//! - [`coordinator::SyncCoordinator`] starts runs and owns the shared
//!   recent-uploads cache.
//! - [`engine::ReconciliationEngine`] performs the per-target comparison
//!   and dispatch.
//! - [`job::SyncJob`] tracks one run's lifecycle and counters.
//! - [`media`] classifies camera-roll files by extension.
//!
//! The host supplies the bridge implementations (`RemoteListingClient`,
//! `UploadDispatcher`, `FileSystemAccess` from `bridge-traits`) and
//! observes progress on the `core-runtime` event bus.

pub mod config;
pub mod coordinator;
pub mod engine;
pub mod error;
pub mod job;
pub mod media;
pub mod params;
pub mod recent_uploads;

pub use config::{FinishPolicy, SyncConfig};
pub use coordinator::{JobHandle, SyncCoordinator};
pub use engine::{LocalCandidate, LocalSnapshot, ReconciliationEngine};
pub use error::{Result, SyncError};
pub use job::{JobId, JobStatus, RunStats, SyncJob};
pub use media::{classify, MediaKind};
pub use params::{SyncParameters, SyncTarget};
pub use recent_uploads::{RecentUploadCache, DEFAULT_RECENT_UPLOADS_CAPACITY};
