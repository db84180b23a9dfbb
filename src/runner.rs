//! The bounded concurrent batch execution engine
//!
//! [`BatchRunner`] partitions an operation sequence into fixed-size
//! batches, polls each batch's operations concurrently on the caller's
//! task, writes every result into the slot matching its input index,
//! reports cumulative progress, and pauses between batches so a
//! downstream dependency sees bursts, not a flood. Batch `k + 1` never
//! starts before every operation of batch `k` has settled.

use std::fmt;
use std::future::Future;

use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::{FailurePolicy, ProgressGranularity, RunnerConfig};
use crate::errors::{BoxError, ConfigResult, OperationError, RunnerError, RunnerResult};
use crate::logging;
use crate::operation::BatchOperation;
use crate::outcome::{Outcome, RunReport};
use crate::progress::{Progress, ProgressObserver};

/// How one batch's concurrent group ended.
enum BatchExit {
    /// Every operation in the batch settled
    Settled,
    /// The cancellation token fired mid-batch
    Cancelled,
    /// Fail-fast policy hit its first failure
    Failed(OperationError),
}

/// Executes independent asynchronous operations in bounded, strictly
/// ordered batches.
///
/// The runner owns no I/O and spawns no tasks; operations are polled
/// concurrently on the caller's task via [`FuturesUnordered`]. A runner
/// is reusable: each [`run`](BatchRunner::run) call is an independent
/// invocation with its own result buffer and progress accumulator.
pub struct BatchRunner {
    config: RunnerConfig,
    observer: Option<Box<ProgressObserver>>,
    cancellation: CancellationToken,
}

impl Default for BatchRunner {
    fn default() -> Self {
        Self {
            config: RunnerConfig::default(),
            observer: None,
            cancellation: CancellationToken::new(),
        }
    }
}

impl fmt::Debug for BatchRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchRunner")
            .field("config", &self.config)
            .field("has_observer", &self.observer.is_some())
            .field("cancelled", &self.cancellation.is_cancelled())
            .finish()
    }
}

impl BatchRunner {
    /// Create a runner with a validated configuration.
    ///
    /// Rejects `batch_size == 0` here, before any operation exists.
    pub fn new(config: RunnerConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            observer: None,
            cancellation: CancellationToken::new(),
        })
    }

    /// Install a fire-and-forget progress observer. Snapshots carry the
    /// cumulative settled count and the fixed total; the return value is
    /// ignored.
    pub fn with_progress(mut self, observer: impl Fn(Progress) + Send + Sync + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Attach an externally owned cancellation token. Without one the
    /// runner holds a private token that only [`cancel`](Self::cancel)
    /// can trip.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Request cancellation: no new batch starts, in-flight operations
    /// of the current batch are dropped, and their slots report
    /// [`Outcome::Cancelled`].
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Execute `operations` in input order, batched.
    ///
    /// Returns one outcome per operation, aligned by index regardless of
    /// completion order inside a batch. Under
    /// [`FailurePolicy::Collect`] every failure is captured in place;
    /// under [`FailurePolicy::FailFast`] the first failure is returned
    /// as an error, in-flight siblings are dropped, and no later batch
    /// starts. An empty input returns an empty report with no delay and
    /// no observer call.
    pub async fn run<F, T, E>(
        &self,
        operations: impl IntoIterator<Item = F>,
    ) -> RunnerResult<RunReport<T>>
    where
        F: Future<Output = Result<T, E>>,
        E: Into<BoxError>,
    {
        let run_id = Uuid::new_v4();
        let ops: Vec<F> = operations.into_iter().collect();
        let span = logging::run_span(&run_id, ops.len(), self.config.batch_size);
        self.run_inner(run_id, ops).instrument(span).await
    }

    /// Execute boxed [`BatchOperation`] units, batched. Convenience for
    /// callers holding heterogeneous prepared work.
    pub async fn run_operations<T>(
        &self,
        operations: Vec<Box<dyn BatchOperation<Output = T>>>,
    ) -> RunnerResult<RunReport<T>>
    where
        T: Send,
    {
        self.run(operations.into_iter().map(|operation| async move {
            tracing::trace!(label = operation.label(), "Executing operation");
            operation.execute().await
        }))
        .await
    }

    async fn run_inner<F, T, E>(&self, run_id: Uuid, ops: Vec<F>) -> RunnerResult<RunReport<T>>
    where
        F: Future<Output = Result<T, E>>,
        E: Into<BoxError>,
    {
        let started_at = Utc::now();
        let timer = std::time::Instant::now();
        let total = ops.len();
        let batch_size = self.config.batch_size;

        if total == 0 {
            tracing::debug!(run_id = %run_id, "Empty input, nothing to dispatch");
            return Ok(RunReport::assemble(
                run_id,
                batch_size,
                0,
                started_at,
                timer.elapsed(),
                Vec::new(),
            ));
        }

        // Slots start out Cancelled and are overwritten as operations
        // settle, so a cut-short run already reports the right markers.
        let mut outcomes: Vec<Outcome<T>> = Vec::new();
        outcomes.resize_with(total, || Outcome::Cancelled);

        let mut completed = 0usize;
        let mut batches_dispatched = 0usize;
        let mut pending = ops.into_iter().enumerate();

        loop {
            let batch: Vec<(usize, F)> = pending.by_ref().take(batch_size).collect();
            if batch.is_empty() {
                break;
            }
            let batch_index = batches_dispatched;

            if self.cancellation.is_cancelled() {
                tracing::debug!(run_id = %run_id, batch_index, "Cancellation observed, not dispatching");
                break;
            }
            if batch_index > 0 && !self.pause_between_batches().await {
                tracing::debug!(run_id = %run_id, batch_index, "Cancelled during inter-batch delay");
                break;
            }

            batches_dispatched += 1;
            let size = batch.len();
            tracing::debug!(run_id = %run_id, batch_index, size, "Dispatching batch");

            let mut in_flight: FuturesUnordered<_> = batch
                .into_iter()
                .map(|(index, operation)| async move { (index, operation.await) })
                .collect();

            let exit = async {
                loop {
                    tokio::select! {
                        biased;
                        _ = self.cancellation.cancelled() => {
                            return BatchExit::Cancelled;
                        }
                        settled = in_flight.next() => {
                            let Some((index, result)) = settled else {
                                return BatchExit::Settled;
                            };
                            match result {
                                Ok(value) => {
                                    outcomes[index] = Outcome::Succeeded(value);
                                }
                                Err(error) => {
                                    let failure = OperationError::new(index, error);
                                    if self.config.failure_policy == FailurePolicy::FailFast {
                                        return BatchExit::Failed(failure);
                                    }
                                    tracing::warn!(
                                        run_id = %run_id,
                                        index,
                                        error = %failure.source,
                                        "Operation failed, outcome captured"
                                    );
                                    outcomes[index] = Outcome::Failed(failure);
                                }
                            }
                            completed += 1;
                            if self.config.progress_granularity == ProgressGranularity::PerOperation {
                                self.notify(Progress::new(completed, total));
                            }
                        }
                    }
                }
            }
            .instrument(logging::batch_span(&run_id, batch_index, size))
            .await;

            match exit {
                BatchExit::Settled => {
                    if self.config.progress_granularity == ProgressGranularity::PerBatch {
                        self.notify(Progress::new(completed, total));
                    }
                    tracing::debug!(run_id = %run_id, batch_index, completed, total, "Batch settled");
                }
                BatchExit::Cancelled => {
                    tracing::debug!(run_id = %run_id, batch_index, completed, "Cancelled mid-batch");
                    break;
                }
                BatchExit::Failed(failure) => {
                    tracing::warn!(
                        run_id = %run_id,
                        index = failure.index,
                        error = %failure.source,
                        "Operation failed, aborting run"
                    );
                    return Err(RunnerError::Operation(failure));
                }
            }
        }

        let elapsed = timer.elapsed();
        let report = RunReport::assemble(
            run_id,
            batch_size,
            batches_dispatched,
            started_at,
            elapsed,
            outcomes,
        );
        let summary = report.summary();

        let span = tracing::Span::current();
        span.record("succeeded", summary.succeeded);
        span.record("failed", summary.failed);
        span.record("cancelled", summary.cancelled);
        span.record("elapsed_ms", elapsed.as_millis() as u64);

        if report.was_cancelled() {
            tracing::info!(
                run_id = %run_id,
                completed,
                cancelled = summary.cancelled,
                total,
                "Run cancelled"
            );
        } else {
            tracing::info!(
                run_id = %run_id,
                succeeded = summary.succeeded,
                failed = summary.failed,
                total,
                batches = summary.batches_dispatched,
                "Run completed"
            );
        }
        Ok(report)
    }

    /// Sleep the configured inter-batch delay. Returns false when the
    /// cancellation token fired instead of the timer.
    async fn pause_between_batches(&self) -> bool {
        let delay = self.config.inter_batch_delay;
        if delay.is_zero() {
            return true;
        }
        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => false,
            _ = tokio::time::sleep(delay) => true,
        }
    }

    fn notify(&self, progress: Progress) {
        if let Some(observer) = &self.observer {
            observer(progress);
        }
    }
}

/// One-shot convenience: build a runner from `config` and execute
/// `operations`, with no observer and no cancellation token.
pub async fn run_batched<F, T, E>(
    operations: impl IntoIterator<Item = F>,
    config: RunnerConfig,
) -> RunnerResult<RunReport<T>>
where
    F: Future<Output = Result<T, E>>,
    E: Into<BoxError>,
{
    BatchRunner::new(config)?.run(operations).await
}
