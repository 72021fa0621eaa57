//! Output module for run reports
//!
//! This module aggregates per-task results into a [`RunReport`] and prints
//! the end-of-run summary.

pub mod stats;

pub use stats::{print_report, RunReport, TableCounts, TaskFailure};
