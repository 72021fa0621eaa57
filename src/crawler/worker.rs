//! One pool worker

use crate::archive::{ArchiveOutcome, PdfStatus};
use crate::crawler::TaskHandler;
use crate::page::Task;
use crate::state::WorkerState;
use crate::Result;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

/// Shared task queue; the sender is gone before workers start
pub(crate) type TaskQueue = Arc<Mutex<mpsc::UnboundedReceiver<Task>>>;

/// Result of one task, sent back to the orchestrator
#[derive(Debug)]
pub struct TaskReport {
    /// Name of the worker that ran the task
    pub worker: String,

    /// The task
    pub task: Task,

    /// What the handler returned
    pub result: Result<ArchiveOutcome>,
}

/// A pool worker draining the shared queue
pub struct Worker {
    name: String,
    state: WorkerState,
    queue: TaskQueue,
    handler: Arc<dyn TaskHandler>,
    reports: mpsc::UnboundedSender<TaskReport>,
    cancel: CancellationToken,
}

impl Worker {
    pub(crate) fn new(
        name: String,
        queue: TaskQueue,
        handler: Arc<dyn TaskHandler>,
        reports: mpsc::UnboundedSender<TaskReport>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            name,
            state: WorkerState::Idle,
            queue,
            handler,
            reports,
            cancel,
        }
    }

    /// Runs until the queue is drained or the run is cancelled
    ///
    /// Cancellation is only observed between tasks. Returns the number of
    /// tasks this worker processed.
    pub async fn run(mut self) -> usize {
        let mut processed = 0;

        if self.cancel.is_cancelled() {
            self.transition(WorkerState::Exiting);
            self.transition(WorkerState::Terminated);
            return processed;
        }

        self.transition(WorkerState::CheckingQueue);

        loop {
            if self.cancel.is_cancelled() {
                tracing::debug!("{} stopping: run cancelled", self.name);
                break;
            }

            let next = {
                let mut queue = self.queue.lock().await;
                queue.recv().await
            };

            let Some(task) = next else {
                break;
            };

            self.transition(WorkerState::Processing);
            let result = self.handler.handle(&task).await;
            processed += 1;

            match &result {
                Ok(ArchiveOutcome::Archived { html, pdf }) => {
                    tracing::info!("{} {}", self.name, html.display());
                    if let PdfStatus::Rendered(path) = pdf {
                        tracing::info!("{} {}", self.name, path.display());
                    }
                }
                Ok(ArchiveOutcome::Skipped { .. }) => {}
                Err(e) if e.is_fatal() => {
                    tracing::error!("{} fatal error on {}: {}", self.name, task, e);
                    self.cancel.cancel();
                }
                Err(e) => {
                    tracing::error!("{} failed {}: {}", self.name, task, e);
                }
            }

            let report = TaskReport {
                worker: self.name.clone(),
                task,
                result,
            };
            if self.reports.send(report).is_err() {
                tracing::warn!("{} has no one to report to", self.name);
            }

            self.transition(WorkerState::CheckingQueue);
        }

        self.transition(WorkerState::Exiting);
        self.transition(WorkerState::Terminated);
        processed
    }

    fn transition(&mut self, next: WorkerState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal worker transition {} -> {}",
            self.state,
            next
        );
        tracing::trace!("{}: {} -> {}", self.name, self.state, next);
        self.state = next;
    }
}
