//! Run orchestration: task building and pool supervision

use crate::api::{KeyFilter, Session};
use crate::crawler::worker::{TaskQueue, Worker};
use crate::crawler::TaskHandler;
use crate::output::RunReport;
use crate::page::{PageSpec, Task};
use crate::Result;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Lists keys for every spec, in order, and builds one task per key
///
/// Any listing error aborts before a single task exists.
pub async fn build_tasks(
    session: &Session,
    specs: &[Arc<PageSpec>],
    filter: KeyFilter,
) -> Result<Vec<Task>> {
    let mut tasks = Vec::new();

    for spec in specs {
        let keys = session.list_keys(spec, filter).await?;
        match filter {
            KeyFilter::CompletedOnly => {
                tracing::info!("Found {} completed {} records.", keys.len(), spec.table())
            }
            KeyFilter::All => tracing::info!("Found {} {} records.", keys.len(), spec.table()),
        }
        tasks.extend(keys.into_iter().map(|key| Task::new(Arc::clone(spec), key)));
    }

    Ok(tasks)
}

/// Supervises a fixed pool of workers over one shared queue
pub struct Orchestrator {
    handler: Arc<dyn TaskHandler>,
    workers: usize,
    cancel: CancellationToken,
}

impl Orchestrator {
    /// Creates an orchestrator with `workers` workers (at least one)
    pub fn new(handler: Arc<dyn TaskHandler>, workers: usize) -> Self {
        Self {
            handler,
            workers: workers.max(1),
            cancel: CancellationToken::new(),
        }
    }

    /// Uses an externally owned token, e.g. one cancelled on Ctrl-C
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that stops the workers between tasks when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn worker_count(&self) -> usize {
        self.workers
    }

    /// Processes every task and returns the aggregated report
    ///
    /// # Protocol
    ///
    /// 1. All tasks are enqueued before any worker starts, then the queue's
    ///    sender is dropped; a drained queue is the shutdown signal
    /// 2. Workers pop under the queue guard and process outside it
    /// 3. Each result is reported over a channel
    /// 4. A fatal task error cancels the run; workers stop before their next task
    /// 5. All workers are joined before the report is returned
    pub async fn run(&self, tasks: Vec<Task>) -> RunReport {
        let started = Instant::now();
        let mut report = RunReport::new(tasks.len());

        let (task_tx, task_rx) = mpsc::unbounded_channel();
        for task in tasks {
            // The receiver is alive in this scope, so sending cannot fail
            let _ = task_tx.send(task);
        }
        drop(task_tx);

        let queue: TaskQueue = Arc::new(Mutex::new(task_rx));
        let (report_tx, mut report_rx) = mpsc::unbounded_channel();

        tracing::info!(
            "Starting {} workers for {} tasks",
            self.workers,
            report.total_tasks
        );

        let mut workers = JoinSet::new();
        for i in 0..self.workers {
            let worker = Worker::new(
                format!("Task-{:02}", i + 1),
                Arc::clone(&queue),
                Arc::clone(&self.handler),
                report_tx.clone(),
                self.cancel.clone(),
            );
            workers.spawn(worker.run());
        }
        drop(report_tx);

        // Ends once every worker has dropped its sender
        while let Some(task_report) = report_rx.recv().await {
            report.record(task_report);
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Worker ended abnormally: {}", e);
                report.worker_panics += 1;
            }
        }

        if self.cancel.is_cancelled() {
            tracing::warn!(
                "Run cancelled with {} tasks left in the queue",
                report.not_processed()
            );
        }

        report.elapsed = started.elapsed();
        tracing::info!("Done! {} tasks in {:?}", report.processed(), report.elapsed);
        report
    }
}
