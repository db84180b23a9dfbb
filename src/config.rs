//! Configuration for the batch runner
//!
//! This module provides the runner's tuning knobs:
//! - Batch size and inter-batch delay
//! - Failure policy (collect per index vs. fail fast)
//! - Progress reporting granularity
//! - Environment variable support and validation

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, ConfigResult};

/// How the runner reacts to a failing operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Capture each failure at its index and keep going. The default:
    /// one bad item must not cost the caller the rest of the results.
    #[default]
    Collect,
    /// Return on the first failure, dropping the failing batch's
    /// in-flight siblings and skipping all later batches.
    FailFast,
}

impl FromStr for FailurePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "collect" => Ok(Self::Collect),
            "fail-fast" | "fail_fast" | "failfast" => Ok(Self::FailFast),
            other => Err(ConfigError::InvalidValue {
                key: "failure_policy".to_string(),
                value: other.to_string(),
                reason: "expected \"collect\" or \"fail-fast\"".to_string(),
            }),
        }
    }
}

/// How often progress snapshots are delivered to the observer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressGranularity {
    /// One snapshot after each batch settles.
    #[default]
    PerBatch,
    /// A snapshot after every settled operation. The final snapshot of
    /// each batch doubles as the boundary snapshot.
    PerOperation,
}

impl FromStr for ProgressGranularity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "batch" | "per-batch" | "per_batch" => Ok(Self::PerBatch),
            "operation" | "per-operation" | "per_operation" => Ok(Self::PerOperation),
            other => Err(ConfigError::InvalidValue {
                key: "progress_granularity".to_string(),
                value: other.to_string(),
                reason: "expected \"batch\" or \"operation\"".to_string(),
            }),
        }
    }
}

/// Runner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Number of operations started concurrently per batch
    pub batch_size: usize,
    /// Pause inserted between consecutive batches (never after the last)
    pub inter_batch_delay: Duration,
    /// Reaction to a failing operation
    pub failure_policy: FailurePolicy,
    /// Progress snapshot frequency
    pub progress_granularity: ProgressGranularity,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            inter_batch_delay: Duration::ZERO,
            failure_policy: FailurePolicy::default(),
            progress_granularity: ProgressGranularity::default(),
        }
    }
}

/// Default batch size derived from the host, kept small because the
/// typical workload is remote API calls, not CPU work.
fn default_batch_size() -> usize {
    num_cpus::get().clamp(2, 8)
}

impl RunnerConfig {
    /// Configuration with an explicit batch size and delay, collect
    /// policy, per-batch progress.
    pub fn new(batch_size: usize, inter_batch_delay: Duration) -> Self {
        Self {
            batch_size,
            inter_batch_delay,
            ..Self::default()
        }
    }

    /// Set the failure policy.
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Set the progress granularity.
    pub fn with_progress_granularity(mut self, granularity: ProgressGranularity) -> Self {
        self.progress_granularity = granularity;
        self
    }

    /// Load from environment variables
    pub fn from_env() -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Ok(size) = std::env::var("VOLLEY_BATCH_SIZE") {
            config.batch_size =
                size.parse()
                    .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
                        key: "VOLLEY_BATCH_SIZE".to_string(),
                        value: size.clone(),
                        reason: e.to_string(),
                    })?;
        }

        if let Ok(delay_ms) = std::env::var("VOLLEY_INTER_BATCH_DELAY_MS") {
            let millis: u64 =
                delay_ms
                    .parse()
                    .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
                        key: "VOLLEY_INTER_BATCH_DELAY_MS".to_string(),
                        value: delay_ms.clone(),
                        reason: e.to_string(),
                    })?;
            config.inter_batch_delay = Duration::from_millis(millis);
        }

        if let Ok(policy) = std::env::var("VOLLEY_FAILURE_POLICY") {
            config.failure_policy = policy.parse()?;
        }

        if let Ok(granularity) = std::env::var("VOLLEY_PROGRESS") {
            config.progress_granularity = granularity.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        Ok(())
    }

    /// Number of batches a run over `total` operations dispatches.
    pub fn batches_for(&self, total: usize) -> usize {
        total.div_ceil(self.batch_size.max(1))
    }
}
