//! CopyCure - Duplicate File Remover
//!
//! Walks a directory tree, checksums every file with SHA-256 and removes the
//! copies whose content was already seen. Known checksums live either in a
//! throwaway SQLite database or in memory.

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod index;
pub mod logging;
pub mod progress;
pub mod scanner;

use anyhow::Result;

use crate::actions::DeletionPolicy;
use crate::cli::Cli;
use crate::config::{Config, ConfigError, ScanOptions};
use crate::duplicates::{DuplicateFinder, ScanSummary};
use crate::error::{CopyCureError, ExitCode};
use crate::index::open_index;
use crate::progress::{Progress, ProgressCallback};

/// Run one scan with already-resolved options.
///
/// Opens the configured index (recreating the durable store), then walks,
/// compares and applies `policy` to every duplicate.
///
/// # Errors
///
/// Returns [`CopyCureError::IndexInit`], [`CopyCureError::Counting`] or
/// [`CopyCureError::Scan`] for the phase that failed.
pub fn scan(
    options: &ScanOptions,
    policy: DeletionPolicy<'_>,
    progress: Option<&dyn ProgressCallback>,
) -> Result<ScanSummary, CopyCureError> {
    let mut index = open_index(options.mode, &options.database).map_err(CopyCureError::IndexInit)?;
    log::debug!("Using {} index", index.name());

    let summary = {
        let mut finder =
            DuplicateFinder::new(&options.root, options.filter(), index.as_mut(), policy);
        if let Some(progress) = progress {
            finder = finder.with_progress(progress);
        }
        finder.run()?
    };

    if log::log_enabled!(log::Level::Trace) {
        match index.records() {
            Ok(records) => {
                for record in records {
                    log::trace!("Kept {} {}", record.checksum, record.path.display());
                }
            }
            Err(e) => log::warn!("Could not list index records: {}", e),
        }
    }
    Ok(summary)
}

/// Run the application logic.
///
/// # Errors
///
/// Returns an error for invalid configuration or a failed scan.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    if !cli.list_only && !cli.quiet {
        println!("{}", cli::banner());
    }

    let config = Config::load().map_err(CopyCureError::from)?;
    let options = match ScanOptions::resolve(&cli, config) {
        Ok(options) => options,
        Err(ConfigError::MissingDirectory) => {
            if cli.list_only || cli.quiet {
                println!("{}", cli::banner());
            }
            println!("{}", cli::usage());
            return Ok(ExitCode::GeneralError);
        }
        Err(e) => return Err(CopyCureError::from(e).into()),
    };
    log::debug!("Scan options: {:?}", options);

    let mode = options.deletion_mode();
    let progress = Progress::new(!mode.is_destructive() || cli.quiet);
    let policy = DeletionPolicy::new(mode);
    let summary = scan(&options, policy, Some(&progress))?;

    if !options.list_only {
        println!("{}", summary.report());
    }
    Ok(ExitCode::Success)
}
