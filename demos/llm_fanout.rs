//! LLM Fan-out Demo - Batched Prompt Completion with Progress Reporting
//!
//! Simulates fanning a prompt list out to a rate-limited model API: at most
//! `batch_size` requests in flight at once, a pause between batches, and a
//! cumulative progress line after each batch settles. One prompt is scripted
//! to fail so the collect policy and the per-index failure report are visible
//! in the output.
//!
//! Run with:
//!     cargo run --example llm_fanout

use std::time::Duration;

use eyre::Result;
use rand::Rng;
use tokio::time::sleep;
use tracing::{info, warn};

use volley::{BatchRunner, BoxError, Outcome, Progress, ProgressHandle, RunnerConfig};

const PROMPTS: [&str; 10] = [
    "Summarize the quarterly report",
    "Draft a release announcement",
    "Translate the onboarding guide to French",
    "Classify these support tickets",
    "!!flaky!! Extract entities from the contract",
    "Rewrite the API docs in active voice",
    "Generate test fixtures for the billing module",
    "Suggest titles for the incident postmortem",
    "Outline a migration plan to the new schema",
    "Review this SQL for injection risks",
];

/// One simulated completion call: jittered latency, scripted failure for
/// prompts tagged `!!flaky!!`.
async fn complete(index: usize, prompt: &'static str) -> Result<String, BoxError> {
    let latency_ms = rand::thread_rng().gen_range(40..160);
    sleep(Duration::from_millis(latency_ms)).await;

    if prompt.contains("!!flaky!!") {
        return Err(format!("upstream rejected request {index}: rate limited").into());
    }

    Ok(format!("[{latency_ms}ms] completion for {prompt:?}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    volley::logging::init_logging()?;

    let config = RunnerConfig::new(3, Duration::from_millis(250));
    info!(
        total = PROMPTS.len(),
        batch_size = config.batch_size,
        delay_ms = config.inter_batch_delay.as_millis() as u64,
        "Fanning out prompts"
    );

    let handle = ProgressHandle::new();
    let progress = handle.observer();
    let runner = BatchRunner::new(config)?.with_progress(move |snapshot: Progress| {
        info!(%snapshot, "Batch boundary");
        progress(snapshot);
    });

    let report = runner
        .run(
            PROMPTS
                .into_iter()
                .enumerate()
                .map(|(index, prompt)| complete(index, prompt)),
        )
        .await?;

    for (index, outcome) in report.outcomes().iter().enumerate() {
        match outcome {
            Outcome::Succeeded(text) => info!(index, %text, "Prompt completed"),
            Outcome::Failed(error) => warn!(index, %error, "Prompt failed"),
            Outcome::Cancelled => warn!(index, "Prompt cancelled"),
        }
    }

    info!(
        percent = handle.percentage_done(),
        done = handle.is_done(),
        "Final progress"
    );
    println!("{}", serde_json::to_string_pretty(report.summary())?);

    Ok(())
}
