//! Progress reporting for batch runs
//!
//! Two complementary views of the same counter:
//! - [`Progress`] snapshots pushed to a fire-and-forget observer as
//!   operations settle
//! - [`ProgressHandle`], a cloneable atomic view a caller can poll from
//!   another task (a UI loop, a status endpoint) while the run is in
//!   flight

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A point-in-time view of one run: settled operations out of the total.
///
/// Failed operations count as settled; the counter tracks work that has
/// reached a terminal state, not work that succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Operations that have settled so far (success or captured failure)
    pub completed: usize,
    /// Fixed size of the input sequence
    pub total: usize,
}

impl Progress {
    pub fn new(completed: usize, total: usize) -> Self {
        Self { completed, total }
    }

    /// Completion ratio in `[0.0, 1.0]`. An empty run counts as done.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.completed as f64 / self.total as f64
    }

    pub fn percentage(&self) -> f64 {
        self.fraction() * 100.0
    }

    pub fn is_done(&self) -> bool {
        self.completed >= self.total
    }
}

impl std::fmt::Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.completed, self.total)
    }
}

/// Observer signature accepted by the runner. Snapshots are pushed, the
/// return value is ignored, and the call must not block the batch loop.
pub type ProgressObserver = dyn Fn(Progress) + Send + Sync;

#[derive(Debug, Default)]
struct HandleState {
    completed: AtomicUsize,
    total: AtomicUsize,
}

/// Cloneable, pollable progress view backed by atomics.
///
/// Feed it to a runner via [`ProgressHandle::observer`] and read it from
/// anywhere else; clones share the same counters.
#[derive(Debug, Clone, Default)]
pub struct ProgressHandle {
    inner: Arc<HandleState>,
}

impl ProgressHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// An observer closure that mirrors runner snapshots into this
    /// handle. Install it with `BatchRunner::with_progress`.
    pub fn observer(&self) -> impl Fn(Progress) + Send + Sync + 'static {
        let state = Arc::clone(&self.inner);
        move |progress: Progress| {
            state.total.store(progress.total, Ordering::SeqCst);
            state.completed.store(progress.completed, Ordering::SeqCst);
        }
    }

    pub fn completed(&self) -> usize {
        self.inner.completed.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        self.inner.total.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Progress {
        Progress::new(self.completed(), self.total())
    }

    /// Percentage of settled operations, `100.0` once nothing is left.
    pub fn percentage_done(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 100.0;
        }
        (self.completed() as f64 / total as f64) * 100.0
    }

    pub fn is_done(&self) -> bool {
        let total = self.total();
        total > 0 && self.completed() >= total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_fraction() {
        assert_eq!(Progress::new(3, 6).fraction(), 0.5);
        assert_eq!(Progress::new(0, 0).fraction(), 1.0);
        assert_eq!(Progress::new(7, 7).percentage(), 100.0);
        assert!(Progress::new(7, 7).is_done());
        assert!(!Progress::new(6, 7).is_done());
    }

    #[test]
    fn test_progress_display() {
        assert_eq!(Progress::new(3, 7).to_string(), "3/7");
    }

    #[test]
    fn test_handle_observer_updates_shared_state() {
        let handle = ProgressHandle::new();
        let observer = handle.observer();

        assert_eq!(handle.completed(), 0);
        assert!(!handle.is_done());

        observer(Progress::new(3, 7));
        assert_eq!(handle.completed(), 3);
        assert_eq!(handle.total(), 7);
        assert!(!handle.is_done());

        observer(Progress::new(7, 7));
        assert!(handle.is_done());
        assert_eq!(handle.percentage_done(), 100.0);
    }

    #[test]
    fn test_handle_clones_share_counters() {
        let handle = ProgressHandle::new();
        let clone = handle.clone();
        let observer = handle.observer();

        observer(Progress::new(2, 4));
        assert_eq!(clone.snapshot(), Progress::new(2, 4));
        assert_eq!(clone.percentage_done(), 50.0);
    }

    #[test]
    fn test_empty_handle_reports_fully_done_percentage() {
        let handle = ProgressHandle::new();
        assert_eq!(handle.percentage_done(), 100.0);
        assert!(!handle.is_done());
    }
}
