//! The poll loop: bridges "issued an administrative command" and "cluster
//! state converged", bounded by an attempt count and/or a wall-clock
//! deadline.

use std::fmt::{Debug, Display};
use std::future::Future;
use std::time::Instant;

use tracing::{debug, warn};

use crate::error::PollError;
use crate::outcome::{Attempt, PollStatus};
use crate::policy::RetryPolicy;

/// Polls `operation` until it reports `Ready`, a permanent failure occurs,
/// or the policy's budget runs out.
///
/// The first invocation happens immediately; sleeps only separate failed
/// attempts. The loop never sleeps past the deadline: once the projected
/// wake time would cross it, the budget is declared spent. An attempt that
/// is already running is never interrupted; per-attempt timeouts belong to
/// the operation itself.
///
/// Blocks the calling thread between attempts. Use [`poll_async`] from
/// async contexts.
pub fn poll<T, E, F>(policy: &RetryPolicy, mut operation: F) -> Result<T, PollError<E>>
where
    E: Debug + Display,
    F: FnMut(Attempt) -> PollStatus<T, E>,
{
    let start = Instant::now();
    let deadline = policy.deadline().map(|t| start + t);
    let mut index = 0u32;

    loop {
        let attempt = Attempt {
            index,
            elapsed: start.elapsed(),
        };

        match operation(attempt) {
            PollStatus::Ready(value) => return Ok(value),
            PollStatus::Fail(error) => {
                debug!("attempt {}: permanent failure: {}", index, error);
                return Err(PollError::Fatal { error });
            }
            PollStatus::Retry(error) => {
                match next_delay(policy, deadline, index, &error) {
                    Some(delay) => std::thread::sleep(delay),
                    None => return Err(exhausted(index + 1, start, error)),
                }
            }
        }

        index += 1;
    }
}

/// Async form of [`poll`] with the same contract, sleeping on the runtime
/// instead of the thread. Callers that need external cancellation can race
/// the returned future against a shutdown signal.
pub async fn poll_async<T, E, F, Fut>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, PollError<E>>
where
    E: Debug + Display,
    F: FnMut(Attempt) -> Fut,
    Fut: Future<Output = PollStatus<T, E>>,
{
    let start = Instant::now();
    let deadline = policy.deadline().map(|t| start + t);
    let mut index = 0u32;

    loop {
        let attempt = Attempt {
            index,
            elapsed: start.elapsed(),
        };

        match operation(attempt).await {
            PollStatus::Ready(value) => return Ok(value),
            PollStatus::Fail(error) => {
                debug!("attempt {}: permanent failure: {}", index, error);
                return Err(PollError::Fatal { error });
            }
            PollStatus::Retry(error) => {
                match next_delay(policy, deadline, index, &error) {
                    Some(delay) => tokio::time::sleep(delay).await,
                    None => return Err(exhausted(index + 1, start, error)),
                }
            }
        }

        index += 1;
    }
}

/// Decides whether attempt `index + 1` may run, and if so how long to sleep
/// first. `None` means the budget is spent.
fn next_delay<E>(
    policy: &RetryPolicy,
    deadline: Option<Instant>,
    index: u32,
    error: &E,
) -> Option<std::time::Duration>
where
    E: Debug + Display,
{
    if let Some(max) = policy.max_attempts() {
        if index + 1 >= max {
            return None;
        }
    }

    let delay = policy.delay_for(index);
    if let Some(deadline) = deadline {
        if Instant::now() + delay >= deadline {
            return None;
        }
    }

    debug!("attempt {}: {}; retrying in {:?}", index, error, delay);
    Some(delay)
}

fn exhausted<E>(attempts: u32, start: Instant, last: E) -> PollError<E>
where
    E: Debug + Display,
{
    let elapsed = start.elapsed();
    warn!(
        "giving up after {} attempts in {:?}; last failure: {}",
        attempts, elapsed, last
    );
    PollError::BudgetExhausted {
        attempts,
        elapsed,
        last,
    }
}
