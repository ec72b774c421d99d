//! Duplicate finder: the walk / compare / delete control flow.
//!
//! # Overview
//!
//! A scan runs through a small state machine:
//!
//! ```text
//! NotStarted -> Counting -> Scanning -> Done
//!                   \            \
//!                    `-> Failed   `-> Failed
//! ```
//!
//! 1. **Counting**: every non-directory entry under the root is counted so
//!    progress can be shown as a percentage.
//! 2. **Scanning**: each eligible file is hashed and looked up in the
//!    [`DuplicateIndex`]. Unknown checksums are inserted; known ones are
//!    duplicates and go through the [`DeletionPolicy`].
//!
//! The first file seen for a checksum is the one kept. Traversal order is
//! whatever the filesystem yields, so which copy survives is not
//! deterministic across platforms.
//!
//! # Example
//!
//! ```no_run
//! use copycure::actions::{DeletionMode, DeletionPolicy};
//! use copycure::duplicates::DuplicateFinder;
//! use copycure::index::MemoryIndex;
//! use copycure::scanner::PathFilter;
//! use std::path::Path;
//!
//! let mut index = MemoryIndex::new();
//! let policy = DeletionPolicy::new(DeletionMode::ListOnly);
//! let mut finder = DuplicateFinder::new(Path::new("."), PathFilter::default(), &mut index, policy);
//! let summary = finder.run().unwrap();
//! println!("{} duplicates", summary.duplicates_found);
//! ```

use std::path::{Path, PathBuf};

use crate::actions::{DeletionPolicy, Disposition};
use crate::index::{DuplicateIndex, IndexError, KnownCopy};
use crate::progress::ProgressCallback;
use crate::scanner::{count_files, Eligibility, FileEntry, Hasher, PathFilter, ScanError, Walker};

/// Errors that abort a scan.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The counting pre-pass failed.
    #[error("counting pass failed: {0}")]
    Counting(#[source] ScanError),

    /// Walking the tree failed.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// The index backend failed.
    #[error(transparent)]
    Index(#[from] IndexError),

    /// `run` was called on a finder that already ran.
    #[error("scan already finished")]
    AlreadyRun,
}

/// Lifecycle of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// `run` has not been called.
    NotStarted,
    /// Counting entries for the progress total.
    Counting,
    /// Hashing and comparing files.
    Scanning,
    /// Finished successfully.
    Done,
    /// Aborted by a fatal error.
    Failed,
}

/// One duplicate encountered during the scan.
#[derive(Debug)]
pub struct DuplicateRecord {
    /// The duplicate itself
    pub path: PathBuf,
    /// The canonical copy, when the index recorded it
    pub original: Option<PathBuf>,
    /// What the policy did with it
    pub disposition: Disposition,
}

/// Counters accumulated during a scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Entries found by the counting pass (directories excluded)
    pub total_entries: u64,
    /// Eligible files processed
    pub files_seen: u64,
    /// Duplicates found
    pub duplicates_found: u64,
    /// Duplicates removed
    pub files_deleted: u64,
    /// Duplicates the operator declined to remove
    pub files_skipped: u64,
    /// Files that could not be hashed
    pub checksum_failures: u64,
    /// Every duplicate, in the order found
    pub duplicates: Vec<DuplicateRecord>,
}

impl ScanSummary {
    /// Final report line.
    #[must_use]
    pub fn report(&self) -> String {
        format!(
            "{} duplicates found, {} files were removed.",
            self.duplicates_found, self.files_deleted
        )
    }
}

/// Walks a tree and removes duplicate files.
pub struct DuplicateFinder<'a> {
    root: PathBuf,
    filter: PathFilter,
    index: &'a mut dyn DuplicateIndex,
    policy: DeletionPolicy<'a>,
    hasher: Hasher,
    progress: Option<&'a dyn ProgressCallback>,
    state: ScanState,
}

impl<'a> DuplicateFinder<'a> {
    /// Create a finder. Nothing is touched until [`run`](Self::run).
    #[must_use]
    pub fn new(
        root: &Path,
        filter: PathFilter,
        index: &'a mut dyn DuplicateIndex,
        policy: DeletionPolicy<'a>,
    ) -> Self {
        Self {
            root: root.to_path_buf(),
            filter,
            index,
            policy,
            hasher: Hasher::new(),
            progress: None,
            state: ScanState::NotStarted,
        }
    }

    /// Report progress to `progress`.
    #[must_use]
    pub fn with_progress(mut self, progress: &'a dyn ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Use a custom hasher.
    #[must_use]
    pub fn with_hasher(mut self, hasher: Hasher) -> Self {
        self.hasher = hasher;
        self
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Run the scan to completion.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error: an invalid root, a traversal failure
    /// or an index storage failure. Unreadable files and failed deletions
    /// are logged and counted instead.
    pub fn run(&mut self) -> Result<ScanSummary, FinderError> {
        if self.state != ScanState::NotStarted {
            return Err(FinderError::AlreadyRun);
        }
        let result = self.run_phases();
        self.state = if result.is_ok() {
            ScanState::Done
        } else {
            ScanState::Failed
        };
        result
    }

    fn run_phases(&mut self) -> Result<ScanSummary, FinderError> {
        self.validate_root()?;

        self.transition(ScanState::Counting);
        let total = count_files(&self.root).map_err(FinderError::Counting)?;

        self.transition(ScanState::Scanning);
        let mut summary = ScanSummary {
            total_entries: total,
            ..ScanSummary::default()
        };
        if let Some(progress) = self.progress {
            progress.on_scan_start(total);
        }

        let walker = Walker::new(&self.root);
        log::debug!("Walking {}", walker.root().display());
        for entry in walker.walk() {
            self.process_entry(entry?, &mut summary)?;
        }

        if let Some(progress) = self.progress {
            progress.on_scan_end();
        }
        if summary.checksum_failures > 0 {
            log::warn!("{} files could not be read", summary.checksum_failures);
        }
        log::debug!(
            "Scan complete: {} files, {} duplicates, {} deleted",
            summary.files_seen,
            summary.duplicates_found,
            summary.files_deleted
        );
        Ok(summary)
    }

    fn transition(&mut self, next: ScanState) {
        log::debug!("Scan state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn validate_root(&self) -> Result<(), ScanError> {
        match std::fs::metadata(&self.root) {
            Ok(m) if m.is_dir() => Ok(()),
            Ok(_) => Err(ScanError::NotADirectory(self.root.clone())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ScanError::NotFound(self.root.clone()))
            }
            Err(e) => Err(ScanError::Traversal {
                path: self.root.clone(),
                source: e,
            }),
        }
    }

    fn process_entry(
        &mut self,
        entry: FileEntry,
        summary: &mut ScanSummary,
    ) -> Result<(), FinderError> {
        match self.filter.check(&entry.path, entry.is_dir, entry.size) {
            Eligibility::Eligible => {}
            Eligibility::Directory => return Ok(()),
            reason => {
                log::trace!("Skipping {} ({:?})", entry.path.display(), reason);
                return Ok(());
            }
        }

        summary.files_seen += 1;
        self.check_file(&entry.path, summary)?;

        if let Some(progress) = self.progress {
            progress.on_file_processed(summary.files_seen, summary.files_deleted);
        }
        Ok(())
    }

    fn check_file(&mut self, path: &Path, summary: &mut ScanSummary) -> Result<(), FinderError> {
        let checksum = match self.hasher.hash_file(path) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Failed to compute checksum for file {}: {}", path.display(), e);
                summary.checksum_failures += 1;
                return Ok(());
            }
        };

        let Some(known) = self.index.lookup(&checksum)? else {
            return match self.index.insert(&checksum, path) {
                Ok(()) => Ok(()),
                Err(e) if e.is_recoverable() => {
                    log::warn!("Failed inserting checksum for file {}: {}", path.display(), e);
                    Ok(())
                }
                Err(e) => Err(e.into()),
            };
        };

        summary.duplicates_found += 1;
        let original = match known {
            KnownCopy::Recorded(p) => {
                log::debug!("{} is a duplicate of {}", path.display(), p.display());
                Some(p)
            }
            KnownCopy::Unrecorded => {
                log::debug!("{} is a duplicate", path.display());
                None
            }
        };

        let disposition = self.apply_policy(path);
        if disposition.is_deleted() {
            summary.files_deleted += 1;
        } else if matches!(disposition, Disposition::Skipped) {
            summary.files_skipped += 1;
        }
        summary.duplicates.push(DuplicateRecord {
            path: path.to_path_buf(),
            original,
            disposition,
        });
        Ok(())
    }

    fn apply_policy(&mut self, path: &Path) -> Disposition {
        let policy = &mut self.policy;
        match self.progress {
            Some(progress) => {
                let mut outcome = None;
                progress.suspend(&mut || outcome = Some(policy.apply(path)));
                outcome.unwrap_or(Disposition::Skipped)
            }
            None => policy.apply(path),
        }
    }
}
