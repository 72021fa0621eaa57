//! State module for tracking worker progress
//!
//! # Components
//!
//! - `WorkerState`: lifecycle of one pool worker (idle, checking the queue,
//!   processing a task, exiting, terminated)

mod worker_state;

// Re-export main types
pub use worker_state::WorkerState;
