//! Seen-checksum index with first-write-wins semantics.
//!
//! This module answers one question for the scanner: "have I seen this
//! checksum before, and where?"
//!
//! # Architecture
//!
//! The index is split into three components:
//!
//! * [`memory`]: A `HashSet` of checksums. Never fails, never records paths.
//! * [`database`]: A single-table SQLite store recreated empty on every run.
//! * [`entry`]: The records stored in the index and lookup answers.
//!
//! # Invariants
//!
//! At most one entry exists per checksum. The first path inserted for a
//! checksum is the canonical copy and is never overwritten or removed, even
//! if that file is later deleted by something else.

pub mod database;
pub mod entry;
pub mod memory;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::scanner::Checksum;

pub use database::{SqliteIndex, DEFAULT_DATABASE_PATH};
pub use entry::{FileRecord, KnownCopy};
pub use memory::MemoryIndex;

/// Errors raised by index backends.
#[derive(thiserror::Error, Debug)]
pub enum IndexError {
    /// An entry for this checksum already exists (first write wins).
    #[error("checksum {checksum} is already indexed (inserting {path})")]
    AlreadyIndexed {
        /// The conflicting checksum
        checksum: String,
        /// The path that could not be inserted
        path: PathBuf,
    },

    /// The backing store could not be created or removed.
    #[error("cannot prepare index store at {path}: {source}")]
    Io {
        /// Store location
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The backing store failed.
    #[error("index storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl IndexError {
    /// Whether the scan can continue after this error.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::AlreadyIndexed { .. })
    }
}

/// Result type alias for index operations.
pub type IndexResult<T> = Result<T, IndexError>;

/// A checksum → canonical copy lookup structure.
///
/// `insert` is only called after `lookup` returned `None`; the sequence is
/// check-then-act and must not be interleaved with another scanner.
pub trait DuplicateIndex {
    /// Find what is known about a checksum.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Storage`] if the backend fails.
    fn lookup(&mut self, checksum: &Checksum) -> IndexResult<Option<KnownCopy>>;

    /// Record `path` as the canonical copy for `checksum`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::AlreadyIndexed`] if the checksum is already
    /// present, or [`IndexError::Storage`] if the backend fails.
    fn insert(&mut self, checksum: &Checksum, path: &Path) -> IndexResult<()>;

    /// Every canonical copy on record, in insertion order.
    ///
    /// Backends that do not retain paths return an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Storage`] if the backend fails.
    fn records(&self) -> IndexResult<Vec<FileRecord>> {
        Ok(Vec::new())
    }

    /// Number of distinct checksums recorded.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Storage`] if the backend fails.
    fn len(&self) -> IndexResult<usize>;

    /// Whether nothing has been recorded yet.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Storage`] if the backend fails.
    fn is_empty(&self) -> IndexResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Short backend name for logs.
    fn name(&self) -> &'static str;
}

/// Index backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexMode {
    /// Durable SQLite store
    #[default]
    Sql,
    /// In-process hash set
    Mem,
}

impl fmt::Display for IndexMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexMode::Sql => write!(f, "sql"),
            IndexMode::Mem => write!(f, "mem"),
        }
    }
}

impl FromStr for IndexMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sql" => Ok(Self::Sql),
            "mem" => Ok(Self::Mem),
            other => Err(format!("Invalid mode '{other}'. Use 'sql' or 'mem'.")),
        }
    }
}

/// Create a fresh, empty index for the selected backend.
///
/// For [`IndexMode::Sql`] any existing store at `database` is deleted first.
///
/// # Errors
///
/// Returns an error if the durable store cannot be created.
pub fn open_index(mode: IndexMode, database: &Path) -> IndexResult<Box<dyn DuplicateIndex>> {
    log::debug!("Opening {} index", mode);
    match mode {
        IndexMode::Sql => Ok(Box::new(SqliteIndex::create(database)?)),
        IndexMode::Mem => Ok(Box::new(MemoryIndex::new())),
    }
}
