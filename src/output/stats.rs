//! Run statistics aggregated from task reports

use crate::archive::{ArchiveOutcome, PdfStatus};
use crate::crawler::TaskReport;
use crate::SalsaError;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::time::Duration;

/// Per-table outcome counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub archived: u64,
    pub skipped: u64,
    pub failed: u64,
}

/// A task that did not archive
#[derive(Debug, Clone)]
pub struct TaskFailure {
    /// Task label, `table/key`
    pub task: String,

    /// Worker that ran it
    pub worker: String,

    /// Error text
    pub message: String,
}

/// Aggregated result of one run
#[derive(Debug)]
pub struct RunReport {
    /// When aggregation started
    pub started_at: DateTime<Utc>,

    /// Tasks enqueued
    pub total_tasks: usize,

    /// Pages written
    pub archived: u64,

    /// Pages skipped because their output already existed
    pub skipped: u64,

    /// Archived pages whose PDF could not be rendered
    pub pdf_failures: u64,

    /// Tasks that returned an error
    pub failures: Vec<TaskFailure>,

    /// Counts by table
    pub by_table: BTreeMap<String, TableCounts>,

    /// First error that aborted the run
    pub fatal: Option<SalsaError>,

    /// Workers that ended through a panic
    pub worker_panics: usize,

    /// Wall time of the fan-out phase
    pub elapsed: Duration,
}

impl RunReport {
    pub fn new(total_tasks: usize) -> Self {
        Self {
            started_at: Utc::now(),
            total_tasks,
            archived: 0,
            skipped: 0,
            pdf_failures: 0,
            failures: Vec::new(),
            by_table: BTreeMap::new(),
            fatal: None,
            worker_panics: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Folds one task report into the totals
    pub fn record(&mut self, report: TaskReport) {
        let counts = self
            .by_table
            .entry(report.task.spec.table().to_string())
            .or_default();

        match report.result {
            Ok(ArchiveOutcome::Archived { pdf, .. }) => {
                self.archived += 1;
                counts.archived += 1;
                if matches!(pdf, PdfStatus::Failed(_)) {
                    self.pdf_failures += 1;
                }
            }
            Ok(ArchiveOutcome::Skipped { .. }) => {
                self.skipped += 1;
                counts.skipped += 1;
            }
            Err(e) => {
                counts.failed += 1;
                self.failures.push(TaskFailure {
                    task: report.task.to_string(),
                    worker: report.worker,
                    message: e.to_string(),
                });
                if e.is_fatal() && self.fatal.is_none() {
                    self.fatal = Some(e);
                }
            }
        }
    }

    /// Tasks that reached a handler
    pub fn processed(&self) -> usize {
        self.archived as usize + self.skipped as usize + self.failures.len()
    }

    /// Tasks left in the queue (non-zero only after cancellation or panics)
    pub fn not_processed(&self) -> usize {
        self.total_tasks.saturating_sub(self.processed())
    }

    /// True when no fatal error occurred
    pub fn is_success(&self) -> bool {
        self.fatal.is_none()
    }
}

/// Prints the report to stdout in a formatted manner
pub fn print_report(report: &RunReport) {
    println!("=== Archive Summary ===\n");

    println!("Overview:");
    println!("  Started: {}", report.started_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("  Elapsed: {:.1}s", report.elapsed.as_secs_f64());
    println!("  Tasks queued: {}", report.total_tasks);
    println!("  Archived: {}", report.archived);
    println!("  Skipped (already on disk): {}", report.skipped);
    println!("  Failed: {}", report.failures.len());
    if report.pdf_failures > 0 {
        println!("  PDF render failures: {}", report.pdf_failures);
    }
    if report.not_processed() > 0 {
        println!("  Not processed: {}", report.not_processed());
    }
    println!();

    if !report.by_table.is_empty() {
        println!("By Table:");
        for (table, counts) in &report.by_table {
            println!(
                "  {}: {} archived, {} skipped, {} failed",
                table, counts.archived, counts.skipped, counts.failed
            );
        }
        println!();
    }

    if !report.failures.is_empty() {
        println!("Failures ({}):", report.failures.len());
        for failure in &report.failures {
            println!("  - {} [{}]: {}", failure.task, failure.worker, failure.message);
        }
        println!();
    }
}
