/// Worker state definitions for the archive pool
///
/// A worker cycles between checking the queue and processing tasks until it
/// sees the queue drained or the run cancelled, then exits.
use std::fmt;

/// Represents the current state of a pool worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerState {
    /// Spawned, has not looked at the queue yet
    Idle,

    /// Waiting on the queue guard or the next task
    CheckingQueue,

    /// Archiving a task outside the queue guard
    Processing,

    /// Saw the shutdown signal and is winding down
    Exiting,

    /// Finished; the worker loop has returned
    Terminated,
}

impl WorkerState {
    /// Returns true if `next` is a legal successor of this state
    ///
    /// Idle → CheckingQueue → Processing → CheckingQueue → … → Exiting → Terminated.
    /// Exiting is reached from CheckingQueue (queue drained or cancelled) or
    /// from Idle (cancelled before the first look at the queue).
    pub fn can_transition_to(&self, next: WorkerState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::CheckingQueue)
                | (Self::Idle, Self::Exiting)
                | (Self::CheckingQueue, Self::Processing)
                | (Self::CheckingQueue, Self::Exiting)
                | (Self::Processing, Self::CheckingQueue)
                | (Self::Exiting, Self::Terminated)
        )
    }

    /// Short lowercase label used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::CheckingQueue => "checking_queue",
            Self::Processing => "processing",
            Self::Exiting => "exiting",
            Self::Terminated => "terminated",
        }
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
