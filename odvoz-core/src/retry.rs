//! Fixed-delay retry executor for whole operations.

use std::error::Error as StdError;
use std::future::Future;

use tracing::warn;

use crate::model::RetryPolicy;

/// Returned once an operation has failed on every attempt.
#[derive(thiserror::Error, Debug)]
#[error("{operation} failed after {attempts} attempts: {last}")]
pub struct RetryError<E>
where
    E: StdError + 'static,
{
    /// Name of the operation that was retried.
    pub operation: &'static str,
    /// Number of attempts that were made.
    pub attempts: u32,
    /// Error returned by the final attempt.
    #[source]
    pub last: E,
}

/// Run `operation` until it succeeds or the policy's attempt budget is spent.
///
/// Attempts run sequentially. Every failure is logged with its attempt number
/// and followed by `policy.delay`, except the final one.
///
/// # Errors
///
/// Returns a [`RetryError`] carrying the last failure when no attempt succeeds.
pub async fn retry<T, E, F, Fut>(
    policy: RetryPolicy,
    operation_name: &'static str,
    mut operation: F,
) -> Result<T, RetryError<E>>
where
    E: StdError + 'static,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let attempts = policy.effective_attempts();
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                warn!(
                    operation = operation_name,
                    attempt,
                    attempts,
                    error = %err,
                    "attempt failed"
                );

                if attempt >= attempts {
                    return Err(RetryError {
                        operation: operation_name,
                        attempts,
                        last: err,
                    });
                }

                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
        }
    }
}
