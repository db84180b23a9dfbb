//! # Volley
//!
//! Bounded concurrent batch execution for large fans of independent
//! asynchronous operations, such as bulk calls against a hosted LLM API.
//! Operations are grouped into fixed-size batches that run concurrently
//! internally and strictly in order externally:
//!
//! - **Bounded concurrency**: at most `batch_size` operations are in
//!   flight at once; batch `k + 1` never starts before batch `k` settles
//! - **Order preservation**: one outcome per operation, aligned to the
//!   input index no matter how completions interleave inside a batch
//! - **Progress reporting**: cumulative settled counts pushed to a
//!   fire-and-forget observer or polled through an atomic handle
//! - **Inter-batch backpressure**: a configurable pause between batches
//!   keeps a downstream dependency breathing instead of flooded
//! - **Failure policy**: capture failures per index (default) or fail
//!   fast on the first error; cancellation cuts a run short cleanly
//!
//! ## Architecture
//!
//! - [`runner`]: the batch loop itself, [`BatchRunner`] and
//!   [`run_batched`]
//! - [`outcome`]: per-index [`Outcome`]s, the ordered [`RunReport`], and
//!   the serializable [`RunSummary`]
//! - [`progress`]: observer snapshots and the pollable
//!   [`ProgressHandle`]
//! - [`config`]: [`RunnerConfig`] with validation and env overrides
//! - [`operation`]: the [`BatchOperation`] trait seam for boxed work
//! - [`errors`] and [`logging`]: the error taxonomy and tracing setup
//!
//! ## Usage
//!
//! ```rust
//! use std::time::Duration;
//! use volley::{run_batched, RunnerConfig};
//!
//! #[tokio::main]
//! async fn main() -> eyre::Result<()> {
//!     let requests = (0..10).map(|i| async move {
//!         // issue the real API call here
//!         Ok::<_, std::io::Error>(i * i)
//!     });
//!
//!     let config = RunnerConfig::new(4, Duration::from_millis(50));
//!     let report = run_batched(requests, config).await?;
//!
//!     assert!(report.is_complete_success());
//!     assert_eq!(report.outcomes().len(), 10);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod errors;
pub mod logging;
pub mod operation;
pub mod outcome;
pub mod progress;
pub mod runner;

// Re-export commonly used types and functions
pub use config::{FailurePolicy, ProgressGranularity, RunnerConfig};
pub use errors::{
    BoxError, ConfigError, ConfigResult, OperationError, RunnerError, RunnerResult,
};
pub use operation::BatchOperation;
pub use outcome::{Outcome, RunReport, RunSummary};
pub use progress::{Progress, ProgressHandle};
pub use runner::{run_batched, BatchRunner};
pub use tokio_util::sync::CancellationToken;

// Version and build information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const BUILD_TIMESTAMP: &str = env!("BUILD_TIMESTAMP");
pub const BUILD_PROFILE: &str = env!("BUILD_PROFILE");

// Re-export key dependencies for convenience
pub use eyre;
pub use tokio;
pub use tracing;
