//! Logging infrastructure for CopyCure.
//!
//! This module provides structured logging using the `log` facade and `env_logger` backend.
//! Log levels are determined by (in priority order):
//!
//! 1. `RUST_LOG` environment variable (if set)
//! 2. CLI flags: `--verbose` (debug/trace)
//! 3. Default: warn level
//!
//! The default is warn rather than info because the tool's normal output is
//! its own progress line and summary; warnings carry the per-file failures.
//! `--quiet` only hides the banner and progress line, so those warnings are
//! never suppressed by a CLI flag.
//!
//! # Example
//!
//! ```rust,no_run
//! use copycure::logging::init_logging;
//!
//! // Warnings and errors only
//! init_logging(0, false);
//! ```

use env_logger::Builder;
use log::LevelFilter;
use std::env;
use std::io::Write;

/// Initialize the logging subsystem based on CLI verbosity flags.
///
/// Call once, before any logging. Later calls are ignored.
///
/// # Arguments
///
/// * `verbose` - Verbosity count from CLI (0=warn, 1=debug, 2+=trace)
/// * `quiet` - Keeps the level at warn even if `verbose` is set
pub fn init_logging(verbose: u8, quiet: bool) {
    let use_env = env::var("RUST_LOG").is_ok();

    let mut builder = Builder::new();
    if use_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }

    configure_format(&mut builder, verbose);

    if builder.try_init().is_err() {
        return;
    }
    log::debug!("Logging initialized at level: {:?}", log::max_level());
}

/// Determine the log level from CLI flags.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Warn
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Warnings look like the tool's own messages by default; `-v` adds the
/// timestamp and module path.
fn configure_format(builder: &mut Builder, verbose: u8) {
    builder.format(move |buf, record| {
        let level = record.level();
        let level_style = buf.default_level_style(level);
        if verbose >= 1 {
            writeln!(
                buf,
                "{} {level_style}{:<5}{level_style:#} [{}] {}",
                buf.timestamp_seconds(),
                level,
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        } else {
            writeln!(
                buf,
                "{level_style}{:<5}{level_style:#} {}",
                level,
                record.args()
            )
        }
    });
}
