//! Eligibility rules for candidate paths.
//!
//! A path takes part in duplicate detection only if it is not a directory,
//! does not contain any exclusion substring, and is larger than the
//! small-file threshold (unless empty files were explicitly included).

use std::path::Path;

/// Files of this many bytes or fewer are ignored unless empty files are included.
pub const SMALL_FILE_THRESHOLD: u64 = 10;

/// Why a path was accepted or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    /// The path should be hashed.
    Eligible,
    /// Directories are never candidates.
    Directory,
    /// The path contains an exclusion substring.
    Excluded,
    /// The file is at or below the size threshold.
    TooSmall,
}

impl Eligibility {
    /// Whether the path should be hashed.
    #[must_use]
    pub fn is_eligible(self) -> bool {
        self == Self::Eligible
    }
}

/// Path filter built from exclusion substrings and the empty-file policy.
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    exclude: Vec<String>,
    include_small: bool,
}

impl PathFilter {
    /// Create a filter.
    ///
    /// Empty exclusion entries are dropped; they would otherwise match every path.
    #[must_use]
    pub fn new<I, S>(exclude: I, include_small: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            exclude: exclude
                .into_iter()
                .map(Into::into)
                .filter(|s| !s.is_empty())
                .collect(),
            include_small,
        }
    }

    /// Exclusion substrings in effect.
    #[must_use]
    pub fn exclusions(&self) -> &[String] {
        &self.exclude
    }

    /// Size threshold, `None` when small files are included.
    #[must_use]
    pub fn size_threshold(&self) -> Option<u64> {
        if self.include_small {
            None
        } else {
            Some(SMALL_FILE_THRESHOLD)
        }
    }

    /// Whether the path string contains an exclusion substring (case-sensitive).
    #[must_use]
    pub fn is_excluded(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.exclude.iter().any(|s| path_str.contains(s.as_str()))
    }

    /// Classify a path.
    #[must_use]
    pub fn check(&self, path: &Path, is_dir: bool, size: u64) -> Eligibility {
        if is_dir {
            return Eligibility::Directory;
        }
        if self.is_excluded(path) {
            return Eligibility::Excluded;
        }
        match self.size_threshold() {
            Some(threshold) if size <= threshold => Eligibility::TooSmall,
            _ => Eligibility::Eligible,
        }
    }

    /// Shorthand for `check(..).is_eligible()`.
    #[must_use]
    pub fn is_eligible(&self, path: &Path, is_dir: bool, size: u64) -> bool {
        self.check(path, is_dir, size).is_eligible()
    }
}

/// Split a comma-separated exclusion argument, keeping empty entries out.
#[must_use]
pub fn parse_exclusions(csv: &str) -> Vec<String> {
    csv.split(',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
