//! Trait seam for callers that model work units as types
//!
//! The runner's primary interface takes bare futures. Callers that hold
//! prepared work as heterogeneous values (a queue of API calls built from
//! user requests, say) implement [`BatchOperation`] and submit boxed
//! units through `BatchRunner::run_operations`.

use async_trait::async_trait;

use crate::errors::BoxError;

/// One independently executable unit of asynchronous work.
#[async_trait]
pub trait BatchOperation: Send + Sync {
    type Output: Send;

    /// Execute the unit once. Per-operation timeouts and retries belong
    /// in here; the runner never re-invokes a unit.
    async fn execute(&self) -> Result<Self::Output, BoxError>;

    /// Short name used in log events.
    fn label(&self) -> &str {
        "operation"
    }
}

#[async_trait]
impl<O> BatchOperation for Box<O>
where
    O: BatchOperation + ?Sized,
{
    type Output = O::Output;

    async fn execute(&self) -> Result<Self::Output, BoxError> {
        (**self).execute().await
    }

    fn label(&self) -> &str {
        (**self).label()
    }
}
