//! Local File System Access
//!
//! Platform-agnostic seam for reading the local camera-roll directory. The
//! reconciliation core never touches `std::fs` directly; it reads a
//! single-level snapshot through this trait so hosts can route through
//! sandboxed storage APIs and tests can inject file sets.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// File metadata information
#[derive(Debug, Clone)]
pub struct FileMetadata {
    pub size: u64,
    pub modified_at: Option<i64>,
    pub is_directory: bool,
}

/// File system access trait
///
/// Abstracts the few read operations the core needs:
/// - Desktop: direct filesystem access
/// - iOS/Android: sandboxed app directories, media store
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::FileSystemAccess;
///
/// async fn count_files(fs: &dyn FileSystemAccess, dir: &std::path::Path) -> Result<usize> {
///     let mut files = 0;
///     for entry in fs.list_directory(dir).await? {
///         if !fs.metadata(&entry).await?.is_directory {
///             files += 1;
///         }
///     }
///     Ok(files)
/// }
/// ```
#[async_trait]
pub trait FileSystemAccess: Send + Sync {
    /// Check if a file or directory exists
    async fn exists(&self, path: &Path) -> Result<bool>;

    /// Get metadata for a file or directory
    async fn metadata(&self, path: &Path) -> Result<FileMetadata>;

    /// List all entries directly under a directory (non-recursive)
    async fn list_directory(&self, path: &Path) -> Result<Vec<PathBuf>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_metadata() {
        let metadata = FileMetadata {
            size: 1024,
            modified_at: Some(1234567900),
            is_directory: false,
        };

        assert_eq!(metadata.size, 1024);
        assert!(!metadata.is_directory);
    }
}
