//! Error types and handling for the batch runner
//!
//! Covers the two failure classes the runner distinguishes:
//! - Invalid configuration, rejected before any operation starts
//! - Individual operation failures, captured per index or propagated
//!   under the fail-fast policy

use thiserror::Error;

/// Boxed error type carried by failed operations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for the batch runner
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Operation error: {0}")]
    Operation(#[from] OperationError),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Batch size must be at least 1")]
    ZeroBatchSize,

    #[error("Invalid configuration value: key={key}, value={value}, reason={reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Environment variable error: {var}, error={error}")]
    EnvironmentVariable { var: String, error: String },
}

/// A single operation's captured failure, tagged with its input index
#[derive(Error, Debug)]
#[error("Operation failed: index={index}, error={source}")]
pub struct OperationError {
    pub index: usize,
    #[source]
    pub source: BoxError,
}

impl OperationError {
    pub fn new(index: usize, source: impl Into<BoxError>) -> Self {
        Self {
            index,
            source: source.into(),
        }
    }

    /// Position of the failed operation in the original input sequence.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Result type aliases for convenience
pub type RunnerResult<T> = Result<T, RunnerError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
