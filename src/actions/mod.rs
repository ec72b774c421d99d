//! File actions module.
//!
//! This module decides what happens to each duplicate the scanner finds:
//! - List-only: print the path, touch nothing
//! - No-confirm: delete immediately
//! - Interactive: ask first, delete only on `y`
//!
//! # Example
//!
//! ```no_run
//! use copycure::actions::{DeletionMode, DeletionPolicy, FixedAnswer};
//! use std::path::Path;
//!
//! let mut policy = DeletionPolicy::new(DeletionMode::Interactive)
//!     .with_confirm(FixedAnswer(false));
//! let outcome = policy.apply(Path::new("/tmp/copy.txt"));
//! println!("{outcome:?}");
//! ```

pub mod confirm;
pub mod delete;

use std::io::{self, Write};
use std::path::Path;

// Re-export commonly used types
pub use confirm::{is_affirmative, Confirm, FixedAnswer, PromptConfirm, StdinConfirm};
pub use delete::{delete_file, DeleteError, DeleteResult};

/// How duplicates are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionMode {
    /// Report the path, never delete.
    ListOnly,
    /// Delete without asking.
    NoConfirm,
    /// Ask the operator for each duplicate.
    Interactive,
}

impl DeletionMode {
    /// Pick the mode from the CLI flags. List-only wins over no-confirm.
    #[must_use]
    pub fn from_flags(list_only: bool, no_confirm: bool) -> Self {
        if list_only {
            Self::ListOnly
        } else if no_confirm {
            Self::NoConfirm
        } else {
            Self::Interactive
        }
    }

    /// Whether this mode can remove files.
    #[must_use]
    pub fn is_destructive(self) -> bool {
        self != Self::ListOnly
    }
}

/// What was done with one duplicate.
#[derive(Debug)]
pub enum Disposition {
    /// Printed in list-only mode.
    Listed,
    /// Removed from disk.
    Deleted,
    /// The operator declined.
    Skipped,
    /// Removal was attempted and failed; the file is still there.
    Failed(DeleteError),
}

impl Disposition {
    /// Whether the file was removed.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted)
    }
}

/// Applies a [`DeletionMode`] to duplicates.
pub struct DeletionPolicy<'a> {
    mode: DeletionMode,
    confirm: Box<dyn Confirm + 'a>,
    listing: Box<dyn Write + 'a>,
}

impl std::fmt::Debug for DeletionPolicy<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeletionPolicy")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl<'a> DeletionPolicy<'a> {
    /// Policy with a terminal prompt and listing on stdout.
    #[must_use]
    pub fn new(mode: DeletionMode) -> Self {
        Self {
            mode,
            confirm: Box::new(StdinConfirm),
            listing: Box::new(io::stdout()),
        }
    }

    /// Replace the decision function used in interactive mode.
    #[must_use]
    pub fn with_confirm(mut self, confirm: impl Confirm + 'a) -> Self {
        self.confirm = Box::new(confirm);
        self
    }

    /// Replace the sink list-only paths are written to.
    #[must_use]
    pub fn with_listing(mut self, listing: impl Write + 'a) -> Self {
        self.listing = Box::new(listing);
        self
    }

    /// The configured mode.
    #[must_use]
    pub fn mode(&self) -> DeletionMode {
        self.mode
    }

    /// Handle one duplicate.
    ///
    /// Never fails: deletion errors are logged and returned as
    /// [`Disposition::Failed`].
    pub fn apply(&mut self, path: &Path) -> Disposition {
        match self.mode {
            DeletionMode::ListOnly => {
                if let Err(e) = writeln!(self.listing, "{}", path.display()) {
                    log::warn!("Could not list {}: {}", path.display(), e);
                }
                Disposition::Listed
            }
            DeletionMode::NoConfirm => Self::remove(path),
            DeletionMode::Interactive => {
                if self.confirm.confirm(path) {
                    Self::remove(path)
                } else {
                    log::warn!("Skipped {}", path.display());
                    Disposition::Skipped
                }
            }
        }
    }

    fn remove(path: &Path) -> Disposition {
        match delete_file(path) {
            Ok(_) => Disposition::Deleted,
            Err(e) => {
                log::warn!("Failed to remove duplicate file {}: {}", path.display(), e);
                Disposition::Failed(e)
            }
        }
    }
}
