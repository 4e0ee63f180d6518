//! Polling and retry support for cluster test harnesses.
//!
//! Administrative commands against a distributed storage cluster rarely take
//! effect synchronously: a daemon is redeployed, a filesystem rank fails
//! over, an OSD comes back, and the only way to observe completion is to ask
//! again. This crate factors the resulting poll-until-condition loops into
//! one primitive with an explicit budget ([`RetryPolicy`]), one signaling
//! convention ([`PollStatus`]) and one failure taxonomy ([`PollError`]), so
//! call sites stop re-deriving timeout arithmetic by hand.

pub mod command;
pub mod error;
pub mod logger;
pub mod outcome;
pub mod policy;
pub mod poller;
pub mod retry;

pub use command::{
    poll_probe, wait_for_command, CommandError, CommandOutput, CommandRunner, Shell, StatusProbe,
};
pub use error::PollError;
pub use outcome::{Attempt, PollStatus};
pub use policy::RetryPolicy;
pub use poller::BackgroundPoller;
pub use retry::{poll, poll_async};
