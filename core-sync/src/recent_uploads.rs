//! # Recent-Uploads Dedup Cache
//!
//! A bounded, insertion-ordered set of local paths recently handed to the
//! upload dispatcher. The host scheduler can trigger reconciliation runs in
//! quick succession (or let them overlap); without this cache, a file still
//! absent from the remote listing would be queued again by every run that
//! sees it. The cache lives for the whole process, shared across runs
//! behind one mutex, and is intentionally never persisted: a process
//! restart starting from a clean slate is acceptable because the remote
//! listing catches up once the first uploads complete.
//!
//! Capacity is fixed; when full, the oldest recorded path is evicted before
//! the newest is added.

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

/// Default number of paths remembered across runs.
pub const DEFAULT_RECENT_UPLOADS_CAPACITY: usize = 30;

/// Bounded FIFO set of recently dispatched local paths.
///
/// Not synchronized itself; the coordinator wraps it in
/// `Arc<tokio::sync::Mutex<_>>` and performs the check-dispatch-record
/// sequence as one critical section.
#[derive(Debug)]
pub struct RecentUploadCache {
    capacity: usize,
    order: VecDeque<PathBuf>,
    members: HashSet<PathBuf>,
}

impl RecentUploadCache {
    /// Create a cache holding at most `capacity` paths. Capacity is
    /// clamped to at least 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            order: VecDeque::with_capacity(capacity),
            members: HashSet::with_capacity(capacity),
        }
    }

    /// Whether `path` was recently recorded.
    pub fn contains(&self, path: &Path) -> bool {
        self.members.contains(path)
    }

    /// Record a dispatched path, evicting the oldest entry first when the
    /// cache is full.
    ///
    /// Returns `false` without reordering anything if the path is already
    /// present.
    pub fn record(&mut self, path: PathBuf) -> bool {
        if self.members.contains(&path) {
            return false;
        }

        if self.order.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.members.remove(&oldest);
            }
        }

        self.members.insert(path.clone());
        self.order.push_back(path);
        true
    }

    /// Number of paths currently remembered.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Maximum number of paths remembered.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for RecentUploadCache {
    fn default() -> Self {
        Self::new(DEFAULT_RECENT_UPLOADS_CAPACITY)
    }
}
