//! Logging configuration and utilities for the batch runner
//!
//! Provides structured logging for:
//! - Run lifecycle (start, completion, cancellation)
//! - Batch dispatch and settlement
//! - Captured operation failures

use std::io;

use tracing::Span;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};
use uuid::Uuid;

/// Initialize the logging system for processes embedding the runner
pub fn init_logging() -> eyre::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,volley=debug"));

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::ENTER | FmtSpan::CLOSE)
        .with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!(
        version = crate::VERSION,
        build_profile = crate::BUILD_PROFILE,
        "Batch runner logging initialized"
    );
    Ok(())
}

/// Initialize logging with JSON output for log-collector environments
pub fn init_json_logging() -> eyre::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,volley=debug"));

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::ENTER | FmtSpan::CLOSE)
        .json()
        .with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!(
        version = crate::VERSION,
        build_profile = crate::BUILD_PROFILE,
        "Batch runner logging initialized with JSON format"
    );
    Ok(())
}

/// Create a tracing span covering one runner invocation
pub fn run_span(run_id: &Uuid, total: usize, batch_size: usize) -> Span {
    tracing::info_span!(
        "batch_run",
        run_id = %run_id,
        total = total,
        batch_size = batch_size,
        succeeded = tracing::field::Empty,
        failed = tracing::field::Empty,
        cancelled = tracing::field::Empty,
        elapsed_ms = tracing::field::Empty,
    )
}

/// Create a tracing span covering one batch's concurrent group
pub fn batch_span(run_id: &Uuid, batch_index: usize, size: usize) -> Span {
    tracing::debug_span!(
        "batch",
        run_id = %run_id,
        batch_index = batch_index,
        size = size,
    )
}
