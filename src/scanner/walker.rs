//! Sequential directory walker built on walkdir.
//!
//! # Overview
//!
//! This module provides [`count_files`] for the counting pre-pass and the
//! [`Walker`] struct for the scanning pass. Both traverse the tree in the
//! order the filesystem enumerates it; nothing is sorted, so the order (and
//! with it the choice of which copy is kept) may differ between platforms.
//!
//! Traversal errors are never skipped: the first one is yielded and the
//! caller is expected to stop.
//!
//! # Example
//!
//! ```no_run
//! use copycure::scanner::{count_files, Walker};
//! use std::path::Path;
//!
//! let root = Path::new("/home/user/Downloads");
//! let total = count_files(root).unwrap();
//! for entry in Walker::new(root).walk() {
//!     let entry = entry.unwrap();
//!     println!("{} ({} bytes)", entry.path.display(), entry.size);
//! }
//! println!("{total} entries");
//! ```

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{FileEntry, ScanError};

/// Count every non-directory entry below `root`, before any filtering.
///
/// # Errors
///
/// Returns the first traversal error encountered.
pub fn count_files(root: &Path) -> Result<u64, ScanError> {
    let mut total = 0u64;
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| ScanError::from_walkdir(root, e))?;
        if !entry.file_type().is_dir() {
            total += 1;
        }
    }
    log::debug!("Counted {} entries under {}", total, root.display());
    Ok(total)
}

/// Directory walker yielding every entry with its size.
#[derive(Debug, Clone)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
}

impl Walker {
    /// Create a new walker for the given path.
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            root: path.to_path_buf(),
        }
    }

    /// Root of the walk.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the directory tree.
    ///
    /// Directories are yielded too (with `is_dir` set) so the caller's
    /// filter sees every entry. The root itself is not yielded. Symlinks are
    /// not followed; their size is the size of the link.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileEntry, ScanError>> + '_ {
        WalkDir::new(&self.root)
            .min_depth(1)
            .into_iter()
            .map(move |entry| {
                let entry = entry.map_err(|e| ScanError::from_walkdir(&self.root, e))?;
                let metadata = entry
                    .metadata()
                    .map_err(|e| ScanError::from_walkdir(&self.root, e))?;
                Ok(FileEntry {
                    path: entry.into_path(),
                    size: metadata.len(),
                    is_dir: metadata.is_dir(),
                })
            })
    }
}
