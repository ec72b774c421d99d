//! In-process checksum index.

use std::collections::HashSet;
use std::path::Path;

use super::{DuplicateIndex, IndexError, IndexResult, KnownCopy};
use crate::scanner::Checksum;

/// Presence-only index held in memory.
///
/// Lookups answer [`KnownCopy::Unrecorded`] because paths are not retained.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    seen: HashSet<String>,
}

impl MemoryIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl DuplicateIndex for MemoryIndex {
    fn lookup(&mut self, checksum: &Checksum) -> IndexResult<Option<KnownCopy>> {
        Ok(self
            .seen
            .contains(checksum.as_str())
            .then_some(KnownCopy::Unrecorded))
    }

    fn insert(&mut self, checksum: &Checksum, path: &Path) -> IndexResult<()> {
        if self.seen.insert(checksum.as_str().to_string()) {
            Ok(())
        } else {
            Err(IndexError::AlreadyIndexed {
                checksum: checksum.to_string(),
                path: path.to_path_buf(),
            })
        }
    }

    fn len(&self) -> IndexResult<usize> {
        Ok(self.seen.len())
    }

    fn name(&self) -> &'static str {
        "mem"
    }
}
