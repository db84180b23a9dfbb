//! Per-operation outcomes and the ordered run report
//!
//! A run produces exactly one [`Outcome`] per input operation, aligned
//! by index regardless of completion order, plus a serializable
//! [`RunSummary`] with the run's counters.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::OperationError;

/// Terminal state of one operation.
#[derive(Debug)]
pub enum Outcome<T> {
    /// The operation completed and returned a value
    Succeeded(T),
    /// The operation failed; the error is captured in place
    Failed(OperationError),
    /// The run was cancelled before this operation settled
    Cancelled,
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled)
    }

    /// The success value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    /// The captured failure, if any.
    pub fn error(&self) -> Option<&OperationError> {
        match self {
            Outcome::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Outcome::Succeeded(value) => Some(value),
            _ => None,
        }
    }
}

/// Serializable counters describing one finished run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Identifier tying the report to the run's log events
    pub run_id: Uuid,
    /// Size of the input sequence
    pub total: usize,
    /// Operations that returned a value
    pub succeeded: usize,
    /// Operations whose failure was captured
    pub failed: usize,
    /// Operations left unsettled by cancellation
    pub cancelled: usize,
    /// Configured batch size
    pub batch_size: usize,
    /// Batches actually started (cancellation can cut this short)
    pub batches_dispatched: usize,
    /// Wall-clock start of the run
    pub started_at: DateTime<Utc>,
    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl RunSummary {
    /// True when every operation settled with a value.
    pub fn is_complete_success(&self) -> bool {
        self.succeeded == self.total
    }
}

/// Ordered outcomes of one run plus its summary.
#[derive(Debug)]
pub struct RunReport<T> {
    outcomes: Vec<Outcome<T>>,
    summary: RunSummary,
}

impl<T> RunReport<T> {
    /// Build a report from settled outcomes, deriving the summary
    /// counters by scanning them.
    pub(crate) fn assemble(
        run_id: Uuid,
        batch_size: usize,
        batches_dispatched: usize,
        started_at: DateTime<Utc>,
        elapsed: Duration,
        outcomes: Vec<Outcome<T>>,
    ) -> Self {
        let mut succeeded = 0;
        let mut failed = 0;
        let mut cancelled = 0;
        for outcome in &outcomes {
            match outcome {
                Outcome::Succeeded(_) => succeeded += 1,
                Outcome::Failed(_) => failed += 1,
                Outcome::Cancelled => cancelled += 1,
            }
        }
        let summary = RunSummary {
            run_id,
            total: outcomes.len(),
            succeeded,
            failed,
            cancelled,
            batch_size,
            batches_dispatched,
            started_at,
            elapsed,
        };
        Self { outcomes, summary }
    }

    pub fn run_id(&self) -> Uuid {
        self.summary.run_id
    }

    /// Outcomes in input order, one per submitted operation.
    pub fn outcomes(&self) -> &[Outcome<T>] {
        &self.outcomes
    }

    pub fn into_outcomes(self) -> Vec<Outcome<T>> {
        self.outcomes
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Successful values with their input indices, in input order.
    pub fn successes(&self) -> impl Iterator<Item = (usize, &T)> {
        self.outcomes
            .iter()
            .enumerate()
            .filter_map(|(index, outcome)| outcome.value().map(|value| (index, value)))
    }

    /// Captured failures in input order; each carries its own index.
    pub fn failures(&self) -> impl Iterator<Item = &OperationError> {
        self.outcomes.iter().filter_map(Outcome::error)
    }

    pub fn is_complete_success(&self) -> bool {
        self.summary.is_complete_success()
    }

    pub fn was_cancelled(&self) -> bool {
        self.summary.cancelled > 0
    }
}

impl<T> std::ops::Index<usize> for RunReport<T> {
    type Output = Outcome<T>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.outcomes[index]
    }
}
