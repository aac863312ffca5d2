//! Bounded polling for elements that appear asynchronously on a page.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::model::{Locator, PollPolicy, RetryPolicy};
use crate::ports::{PageElement, PageSession, PortError};
use crate::retry::{RetryError, retry};

/// Returned when a polled condition never held within its window.
#[derive(thiserror::Error, Debug)]
pub enum PollError {
    /// Nothing matched the locator before the timeout elapsed.
    #[error("{target} not found within {waited:?}")]
    NotFound {
        /// Description of what was polled for.
        target: String,
        /// Time spent waiting, never less than the policy timeout.
        waited: Duration,
    },
}

/// Probe repeatedly until `probe` succeeds or `policy.timeout` has elapsed.
///
/// At least one probe always runs. Probe failures are swallowed; only the
/// final timeout is reported.
///
/// # Errors
///
/// Returns [`PollError::NotFound`] naming `target` once the window is spent.
pub async fn poll_until<T, E, F, Fut>(
    policy: PollPolicy,
    target: &str,
    mut probe: F,
) -> Result<T, PollError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let started = Instant::now();

    loop {
        if let Ok(value) = probe().await {
            return Ok(value);
        }

        let waited = started.elapsed();
        let Some(remaining) = policy.timeout.checked_sub(waited).filter(|left| !left.is_zero())
        else {
            return Err(PollError::NotFound {
                target: target.to_owned(),
                waited,
            });
        };

        tokio::time::sleep(policy.interval.min(remaining)).await;
    }
}

/// Wait until `locator` resolves on the page held by `session`.
///
/// # Errors
///
/// Returns [`PollError::NotFound`] when the element never appears in time.
pub async fn wait_for(
    session: &dyn PageSession,
    locator: &Locator,
    policy: PollPolicy,
) -> Result<Box<dyn PageElement>, PollError> {
    poll_until(policy, &locator.to_string(), || session.find(locator)).await
}

/// [`wait_for`] wrapped in the retry executor.
///
/// A single timeout only ends one attempt; the whole wait is started again
/// from scratch until the retry budget is spent.
///
/// # Errors
///
/// Returns a [`RetryError`] when every attempt timed out.
pub async fn wait_for_with_retry(
    session: &dyn PageSession,
    locator: &Locator,
    poll: PollPolicy,
    policy: RetryPolicy,
    operation: &'static str,
) -> Result<Box<dyn PageElement>, RetryError<PollError>> {
    retry(policy, operation, || wait_for(session, locator, poll)).await
}
