use std::time::Duration;

/// Outcome of a single poll attempt.
///
/// This is the one retry-signaling convention the whole harness uses:
/// wrapped operations report `Ready`, `Retry` or `Fail` explicitly instead
/// of mixing "falsy return means retry" with "exception means retry".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStatus<T, E> {
    /// The condition holds; polling stops and yields the value.
    Ready(T),
    /// Transient failure; poll again while budget remains.
    Retry(E),
    /// Permanent failure; propagate without further attempts.
    Fail(E),
}

impl<T, E> PollStatus<T, E> {
    /// Classify a `Result`-shaped call site. `is_transient` is the set of
    /// error conditions worth waiting out; everything else fails fast.
    pub fn from_result<F>(result: Result<T, E>, is_transient: F) -> Self
    where
        F: FnOnce(&E) -> bool,
    {
        match result {
            Ok(value) => PollStatus::Ready(value),
            Err(e) if is_transient(&e) => PollStatus::Retry(e),
            Err(e) => PollStatus::Fail(e),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, PollStatus::Ready(_))
    }
}

impl<E> PollStatus<(), E> {
    /// Predicate-shaped call site: ready once `cond` turns true, otherwise
    /// keep polling with `err` as the captured cause.
    pub fn ready_when(cond: bool, err: E) -> Self {
        if cond {
            PollStatus::Ready(())
        } else {
            PollStatus::Retry(err)
        }
    }
}

/// Book-keeping for one invocation of a polled operation. Handed to the
/// operation so it can log or vary behavior by try; discarded afterwards.
#[derive(Debug, Clone, Copy)]
pub struct Attempt {
    /// 0-based ordinal of this try.
    pub index: u32,
    /// Time since the poll loop started.
    pub elapsed: Duration,
}
