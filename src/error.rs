//! Top-level errors and process exit codes.

use crate::config::ConfigError;
use crate::duplicates::FinderError;
use crate::index::IndexError;

/// Exit codes for the CopyCure application.
///
/// - 0: Success (scan completed, whether or not duplicates were found)
/// - 1: General error (bad arguments, index, counting or scan failure)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success: the scan completed.
    Success = 0,
    /// General error: nothing or only part of the tree was processed.
    GeneralError = 1,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "CC000",
            Self::GeneralError => "CC001",
        }
    }
}

/// Fatal errors, tagged with the phase that failed.
#[derive(thiserror::Error, Debug)]
pub enum CopyCureError {
    /// Bad or missing input.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The index backend could not be opened.
    #[error("Error initializing database: {0}")]
    IndexInit(#[source] IndexError),

    /// The counting pre-pass failed.
    #[error("Error counting files: {0}")]
    Counting(#[source] FinderError),

    /// The scanning pass failed.
    #[error("Error removing duplicates: {0}")]
    Scan(#[source] FinderError),
}

impl From<FinderError> for CopyCureError {
    fn from(err: FinderError) -> Self {
        match err {
            FinderError::Counting(_) => Self::Counting(err),
            other => Self::Scan(other),
        }
    }
}

impl CopyCureError {
    /// Exit code reported for this error.
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::GeneralError
    }
}
