//! Best-effort execution of independent operations.

use std::future::Future;
use std::sync::Arc;

use tracing::{info, warn};
use trackvault_common::RetryPolicy;
use trackvault_domain::{OperationKind, Result, TrackVaultError};

use super::policy::StatusAwarePolicy;
use super::retry::RetryExecutor;

/// A single entry of a batch.
pub struct BatchOperation<F> {
    pub kind: OperationKind,
    pub endpoint: String,
    pub operation: F,
}

impl<F> BatchOperation<F> {
    pub fn new(kind: OperationKind, endpoint: impl Into<String>, operation: F) -> Self {
        Self { kind, endpoint: endpoint.into(), operation }
    }
}

/// One failed entry of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    /// Position of the operation in the submitted batch.
    pub index: usize,
    pub endpoint: String,
    pub error: TrackVaultError,
}

impl BatchFailure {
    pub fn message(&self) -> String {
        self.error.to_string()
    }
}

/// Results of the successful entries plus the failures, in submission order.
#[derive(Debug)]
pub struct BatchOutcome<T> {
    pub results: Vec<T>,
    pub errors: Vec<BatchFailure>,
}

impl<T> BatchOutcome<T> {
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn success_count(&self) -> usize {
        self.results.len()
    }

    pub fn failure_count(&self) -> usize {
        self.errors.len()
    }
}

/// Runs each entry through the retry executor with its own id and budget.
pub struct BatchExecutor<P = StatusAwarePolicy> {
    executor: Arc<RetryExecutor<P>>,
}

impl<P> BatchExecutor<P>
where
    P: RetryPolicy<TrackVaultError>,
{
    pub fn new(executor: Arc<RetryExecutor<P>>) -> Self {
        Self { executor }
    }

    /// Never fails: failed entries are collected in [`BatchOutcome::errors`].
    pub async fn run_batch<T, F, Fut>(&self, operations: Vec<BatchOperation<F>>) -> BatchOutcome<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let total = operations.len();
        let mut outcome = BatchOutcome { results: Vec::with_capacity(total), errors: Vec::new() };

        for (index, entry) in operations.into_iter().enumerate() {
            let BatchOperation { kind, endpoint, operation } = entry;
            match self.executor.execute(kind, &endpoint, operation).await {
                Ok(value) => outcome.results.push(value),
                Err(error) => outcome.errors.push(BatchFailure { index, endpoint, error }),
            }
        }

        if outcome.errors.is_empty() {
            info!(total, "batch completed");
        } else {
            let failed: Vec<String> = outcome
                .errors
                .iter()
                .map(|failure| format!("#{} {}: {}", failure.index, failure.endpoint, failure.message()))
                .collect();
            warn!(
                total,
                succeeded = outcome.results.len(),
                failed = outcome.errors.len(),
                errors = ?failed,
                "batch completed with errors"
            );
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use trackvault_common::RetryConfig;

    use super::*;
    use crate::remote::{OperationRegistry, RemoteMetrics};

    type BoxedOp = Box<dyn FnMut() -> BoxFuture<'static, Result<usize>> + Send>;

    fn batch_executor() -> BatchExecutor {
        let executor = RetryExecutor::new(
            RetryConfig::default(),
            Arc::new(OperationRegistry::new()),
            Arc::new(RemoteMetrics::new()),
        );
        BatchExecutor::new(Arc::new(executor))
    }

    fn entry(index: usize, fails: bool) -> BatchOperation<BoxedOp> {
        let op: BoxedOp = Box::new(move || {
            async move {
                if fails {
                    Err(TrackVaultError::http(404, format!("song {index} missing")))
                } else {
                    Ok(index)
                }
            }
            .boxed()
        });
        BatchOperation::new(OperationKind::Delete, format!("DELETE /songs/{index}"), op)
    }

    #[tokio::test]
    async fn failures_are_contained() {
        let batch = batch_executor();
        let operations = (1..=5).map(|index| entry(index, index == 2 || index == 4)).collect();

        let outcome = batch.run_batch(operations).await;

        assert_eq!(outcome.results, vec![1, 3, 5]);
        assert_eq!(outcome.failure_count(), 2);
        assert_eq!(outcome.errors[0].index, 1);
        assert_eq!(outcome.errors[0].endpoint, "DELETE /songs/2");
        assert_eq!(outcome.errors[1].message(), "HTTP 404: song 4 missing");
        assert!(!outcome.is_complete());
    }

    #[tokio::test]
    async fn empty_batch_is_empty() {
        let outcome = batch_executor().run_batch(Vec::<BatchOperation<BoxedOp>>::new()).await;
        assert!(outcome.results.is_empty());
        assert!(outcome.is_complete());
    }
}
