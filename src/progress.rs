//! Progress reporting utilities using indicatif.
//!
//! This module provides the [`Progress`] struct which implements
//! [`ProgressCallback`] to keep a single status line updated in place:
//!
//! ```text
//! 412/1280 (32%) - 17 files deleted ...
//! ```
//!
//! The line is only redrawn when the integer percentage changes, which keeps
//! terminal output small on trees with millions of files.

use std::sync::atomic::{AtomicU64, Ordering};

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Progress callback for the scanning phase.
///
/// Implement this trait to receive progress updates from the
/// duplicate finder.
pub trait ProgressCallback {
    /// Called once before the first file is processed.
    ///
    /// # Arguments
    ///
    /// * `total` - Number of entries found by the counting pass
    fn on_scan_start(&self, total: u64);

    /// Called after each eligible file has been processed.
    ///
    /// # Arguments
    ///
    /// * `processed` - Eligible files processed so far (1-based)
    /// * `deleted` - Files deleted so far
    fn on_file_processed(&self, processed: u64, deleted: u64);

    /// Called once when scanning completes.
    fn on_scan_end(&self);

    /// Run `f` with any on-screen progress temporarily cleared.
    ///
    /// Used around interactive prompts.
    fn suspend(&self, f: &mut dyn FnMut()) {
        f();
    }
}

/// Integer percentage of `processed` over `total`, 0 when `total` is 0.
#[must_use]
pub fn percent(processed: u64, total: u64) -> u64 {
    if total == 0 {
        0
    } else {
        processed.saturating_mul(100) / total
    }
}

/// Render the status line.
#[must_use]
pub fn status_line(processed: u64, total: u64, deleted: u64) -> String {
    format!(
        "{}/{} ({}%) - {} files deleted ...",
        processed,
        total,
        percent(processed, total),
        deleted
    )
}

/// Progress reporter using indicatif.
pub struct Progress {
    bar: ProgressBar,
    total: AtomicU64,
    last_percent: AtomicU64,
    redraws: AtomicU64,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, nothing is drawn.
    ///
    /// # Examples
    ///
    /// ```
    /// use copycure::progress::Progress;
    ///
    /// let progress = Progress::new(false);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::with_draw_target(None, ProgressDrawTarget::stdout())
        };
        bar.set_style(
            ProgressStyle::with_template("{msg}").unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Self {
            bar,
            total: AtomicU64::new(0),
            last_percent: AtomicU64::new(0),
            redraws: AtomicU64::new(0),
        }
    }

    /// Number of times the status line was redrawn.
    #[must_use]
    pub fn redraws(&self) -> u64 {
        self.redraws.load(Ordering::Relaxed)
    }

    fn draw(&self, processed: u64, deleted: u64) {
        let total = self.total.load(Ordering::Relaxed);
        self.bar.set_position(processed);
        self.bar.set_message(status_line(processed, total, deleted));
        self.redraws.fetch_add(1, Ordering::Relaxed);
    }
}

impl ProgressCallback for Progress {
    fn on_scan_start(&self, total: u64) {
        self.total.store(total, Ordering::Relaxed);
        self.last_percent.store(0, Ordering::Relaxed);
        self.bar.set_length(total);
        self.draw(0, 0);
    }

    fn on_file_processed(&self, processed: u64, deleted: u64) {
        let pct = percent(processed, self.total.load(Ordering::Relaxed));
        if pct > self.last_percent.load(Ordering::Relaxed) {
            self.last_percent.store(pct, Ordering::Relaxed);
            self.draw(processed, deleted);
        }
    }

    fn on_scan_end(&self) {
        // Leaves the last status line on screen and moves past it
        self.bar.finish();
    }

    fn suspend(&self, f: &mut dyn FnMut()) {
        self.bar.suspend(f);
    }
}
