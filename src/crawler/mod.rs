//! Crawler module: task building and the worker pool
//!
//! This module contains the fan-out half of a run:
//! - Listing keys for each page kind and turning them into tasks
//! - A fixed pool of workers draining one shared queue
//! - Per-task results reported back through a channel

mod coordinator;
mod worker;

pub use coordinator::{build_tasks, Orchestrator};
pub use worker::{TaskReport, Worker};

use crate::archive::ArchiveOutcome;
use crate::page::Task;
use crate::Result;
use async_trait::async_trait;

/// Work performed for each dequeued task
///
/// [`crate::archive::PageArchiver`] is the production handler.
#[async_trait]
pub trait TaskHandler: Send + Sync + 'static {
    async fn handle(&self, task: &Task) -> Result<ArchiveOutcome>;
}
