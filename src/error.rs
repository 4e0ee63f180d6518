use snafu::Snafu;
use std::fmt::{Debug, Display};
use std::time::Duration;

/// Terminal failure of a poll loop.
///
/// Callers can always tell "the cluster never converged" (`BudgetExhausted`)
/// apart from "the request was rejected outright" (`Fatal`).
#[derive(Debug, Snafu)]
pub enum PollError<E>
where
    E: Debug + Display,
{
    /// The retry budget ran out while the failure stayed transient.
    /// Carries the last observed failure for diagnosis.
    #[snafu(display(
        "gave up after {attempts} attempts in {elapsed:?}; last failure: {last}"
    ))]
    BudgetExhausted {
        attempts: u32,
        elapsed: Duration,
        last: E,
    },

    /// A permanent failure seen on some attempt; retrying would not help.
    #[snafu(display("{error}"))]
    Fatal { error: E },
}

impl<E> PollError<E>
where
    E: Debug + Display,
{
    /// The underlying failure, whichever way the loop ended.
    pub fn into_inner(self) -> E {
        match self {
            PollError::BudgetExhausted { last, .. } => last,
            PollError::Fatal { error } => error,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, PollError::BudgetExhausted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_marks_exhaustion() {
        let e: PollError<String> = PollError::BudgetExhausted {
            attempts: 3,
            elapsed: Duration::from_secs(15),
            last: "mds not active".to_string(),
        };
        let msg = e.to_string();
        assert!(msg.contains("gave up after 3 attempts"));
        assert!(msg.contains("mds not active"));
    }

    #[test]
    fn fatal_is_transparent() {
        let e: PollError<String> = PollError::Fatal {
            error: "permission denied".to_string(),
        };
        assert_eq!(e.to_string(), "permission denied");
        assert_eq!(e.into_inner(), "permission denied");
    }
}
