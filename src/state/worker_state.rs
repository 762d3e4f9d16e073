/// Worker state definitions for the fetch-and-extract loop
use std::fmt;

/// Represents the current state of a worker in the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerState {
    /// Between items, about to pop the next one
    Idle,

    /// Waiting on the network for the current item
    Fetching,

    /// Extracting fields from a fetched body
    Extracting,

    /// Inserting the finished record into the result store
    Storing,

    /// Task queue was observed empty; the worker has exited its loop
    Done,
}

impl WorkerState {
    /// Returns true once the worker will process no further items
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Checks whether moving from `self` to `next` is a legal step
    ///
    /// Any busy state may fall back to `Idle` when the item fails; `Done` is
    /// only reachable from `Idle` and has no successors.
    pub fn can_transition_to(&self, next: WorkerState) -> bool {
        use WorkerState::*;
        matches!(
            (self, next),
            (Idle, Fetching)
                | (Idle, Done)
                | (Fetching, Extracting)
                | (Fetching, Idle)
                | (Extracting, Storing)
                | (Extracting, Idle)
                | (Storing, Idle)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Extracting => "extracting",
            Self::Storing => "storing",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
