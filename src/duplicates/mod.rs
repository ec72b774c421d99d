//! Duplicate detection module.
//!
//! This module provides the scan control flow:
//! - Counting pass for progress totals
//! - Hash, look up, insert-or-flag for every eligible file
//! - Deletion policy applied to each duplicate

pub mod finder;

pub use finder::{DuplicateFinder, DuplicateRecord, FinderError, ScanState, ScanSummary};
