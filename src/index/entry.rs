//! Index entry definitions.

use std::path::{Path, PathBuf};

use crate::scanner::Checksum;

/// The first path seen for a given checksum.
///
/// Created once per distinct checksum and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Content checksum
    pub checksum: Checksum,
    /// Canonical copy
    pub path: PathBuf,
}

impl FileRecord {
    /// Create a new record.
    #[must_use]
    pub fn new(checksum: Checksum, path: impl Into<PathBuf>) -> Self {
        Self {
            checksum,
            path: path.into(),
        }
    }
}

/// What an index knows about an already-seen checksum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KnownCopy {
    /// The path of the canonical copy is on record.
    Recorded(PathBuf),
    /// The checksum was seen but its path was not retained.
    Unrecorded,
}

impl KnownCopy {
    /// Path of the canonical copy, if the backend kept it.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Recorded(p) => Some(p),
            Self::Unrecorded => None,
        }
    }
}
