//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Sequential directory walking using walkdir
//! - Content hashing with SHA-256
//! - Path eligibility filtering
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and the counting pre-pass
//! - [`hasher`]: SHA-256 file hashing (streaming)
//! - [`filter`]: Exclusion substrings and the small-file threshold
//!
//! # Example
//!
//! ```no_run
//! use copycure::scanner::{Hasher, PathFilter, Walker};
//! use std::path::Path;
//!
//! let filter = PathFilter::new(vec![".git/"], false);
//! let hasher = Hasher::new();
//!
//! for entry in Walker::new(Path::new(".")).walk() {
//!     let entry = entry.unwrap();
//!     if filter.is_eligible(&entry.path, entry.is_dir, entry.size) {
//!         println!("{}  {}", hasher.hash_file(&entry.path).unwrap(), entry.path.display());
//!     }
//! }
//! ```

pub mod filter;
pub mod hasher;
pub mod walker;

use std::io;
use std::path::{Path, PathBuf};

// Re-export main types
pub use filter::{parse_exclusions, Eligibility, PathFilter, SMALL_FILE_THRESHOLD};
pub use hasher::{Checksum, Hasher};
pub use walker::{count_files, Walker};

/// An entry discovered during the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path to the entry, as produced by the walk
    pub path: PathBuf,
    /// Size in bytes (of the link itself for symlinks)
    pub size: u64,
    /// Whether the entry is a directory
    pub is_dir: bool,
}

impl FileEntry {
    /// Create a new regular-file entry.
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self {
            path,
            size,
            is_dir: false,
        }
    }
}

/// Errors that abort a directory traversal.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Permission was denied when reading a directory entry.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Reading a directory entry failed.
    #[error("Traversal error for {path}: {source}")]
    Traversal {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    /// Convert a walkdir error, falling back to `root` when the error has no path.
    pub(crate) fn from_walkdir(root: &Path, error: walkdir::Error) -> Self {
        let path = error.path().unwrap_or(root).to_path_buf();
        if let Some(ancestor) = error.loop_ancestor() {
            return Self::Traversal {
                source: io::Error::other(format!(
                    "filesystem loop back to {}",
                    ancestor.display()
                )),
                path,
            };
        }
        match error.into_io_error() {
            Some(e) if e.kind() == io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            Some(e) => Self::Traversal { path, source: e },
            None => Self::Traversal {
                path,
                source: io::Error::other("unknown traversal error"),
            },
        }
    }
}

/// Errors that can occur while hashing a single file.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The file disappeared between discovery and hashing.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl HashError {
    pub(crate) fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Path of the file that failed.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) | Self::Io { path: p, .. } => p,
        }
    }
}
