//! Query liveness
//!
//! The streamer polls a [`QueryStatus`] before every pull from the store.
//! Nothing is pushed: once `is_running` returns false, the stream stops at
//! the next record boundary.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub trait QueryStatus: Send + Sync {
    /// Whether the query is still wanted. Must be free of side effects.
    fn is_running(&self) -> bool;
}

impl<F> QueryStatus for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn is_running(&self) -> bool {
        self()
    }
}

/// Shared cancellation switch; clones observe the same state
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl QueryStatus for CancellationFlag {
    fn is_running(&self) -> bool {
        !self.is_cancelled()
    }
}
