//! Command-line interface definitions for CopyCure.
//!
//! This module defines all CLI arguments using the clap derive API. The flags
//! are deliberately short and single-letter to stay compatible with the
//! classic `copycure -i <dir>` invocation.
//!
//! # Example
//!
//! ```bash
//! # Ask before deleting each duplicate, tracking checksums in SQLite
//! copycure -i ~/Pictures
//!
//! # Delete without asking, keep checksums in memory
//! copycure -i ~/Pictures -m mem -y
//!
//! # Only list duplicates, ignoring VCS and virtualenv folders
//! copycure -i ~/src -l -x .git/,.venv/
//! ```

use clap::{ArgAction, CommandFactory, Parser};
use std::path::PathBuf;

use crate::index::IndexMode;

/// Find files with identical content and remove the redundant copies.
///
/// Every file is checksummed with SHA-256. The first file seen with a given
/// checksum is kept; later ones are duplicates.
#[derive(Debug, Parser)]
#[command(name = "copycure")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to scan for duplicates
    #[arg(short = 'i', value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Method to store known checksums: sql (temporary SQLite database) or mem (RAM)
    #[arg(short = 'm', value_name = "sql|mem")]
    pub mode: Option<IndexMode>,

    /// Remove files without asking
    #[arg(short = 'y')]
    pub no_confirm: bool,

    /// Include empty files (10 bytes or fewer). Empty files all look the same,
    /// so they are ignored by default
    #[arg(short = 'e')]
    pub delete_empty: bool,

    /// Only list the full path of each duplicate without deleting anything
    #[arg(short = 'l')]
    pub list_only: bool,

    /// Comma separated list of substrings; any path containing one is excluded
    /// (e.g. -x .venv/,.git/)
    #[arg(short = 'x', value_name = "LIST")]
    pub exclude: Option<String>,

    /// Location of the temporary checksum database used by -m sql
    #[arg(long = "db", value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Hide the banner and progress line (warnings are still shown)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Banner printed before a scan and above the usage text.
#[must_use]
pub fn banner() -> String {
    format!("CopyCure {}", env!("CARGO_PKG_VERSION"))
}

/// Usage text shown when no directory is given.
#[must_use]
pub fn usage() -> String {
    Cli::command().render_help().to_string()
}
