//! Permanent file deletion.
//!
//! # Overview
//!
//! Duplicates are removed with [`std::fs::remove_file`]; there is no trash
//! step. Failures are classified into [`DeleteError`] so the caller can log
//! them and move on to the next file.
//!
//! # Example
//!
//! ```no_run
//! use copycure::actions::delete::delete_file;
//! use std::path::Path;
//!
//! match delete_file(Path::new("/path/to/duplicate.txt")) {
//!     Ok(result) => println!("Deleted: {}", result.path.display()),
//!     Err(e) => eprintln!("Failed: {}", e),
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error type for deletion operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0} - try running with elevated privileges")]
    PermissionDenied(PathBuf),

    /// The path is a directory and was left alone.
    #[error("refusing to delete directory: {0}")]
    IsDirectory(PathBuf),

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::IsDirectory(p)
            | Self::Io { path: p, .. } => p,
        }
    }
}

/// Result of a successful deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteResult {
    /// Path that was deleted.
    pub path: PathBuf,
    /// Size of the deleted file in bytes.
    pub size: u64,
}

/// Permanently delete a single file.
///
/// **WARNING**: This operation cannot be undone.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if deletion is not allowed
/// - `IsDirectory` if the path is a directory
/// - `Io` for anything else
pub fn delete_file(path: &Path) -> Result<DeleteResult, DeleteError> {
    let metadata = fs::symlink_metadata(path).map_err(|e| DeleteError::from_io(path, e))?;
    if metadata.is_dir() {
        return Err(DeleteError::IsDirectory(path.to_path_buf()));
    }
    let size = metadata.len();

    fs::remove_file(path).map_err(|e| DeleteError::from_io(path, e))?;

    log::info!("Deleted: {} ({} bytes)", path.display(), size);
    Ok(DeleteResult {
        path: path.to_path_buf(),
        size,
    })
}
