//! Narrow execution capabilities the poll loop is composed with.
//!
//! The loop itself knows nothing about how cluster state is observed; call
//! sites hand it an implementation of one of these single-purpose traits.

use snafu::{ResultExt, Snafu};
use std::fmt::{Debug, Display};
use std::process::Command;

use crate::error::PollError;
use crate::outcome::PollStatus;
use crate::policy::RetryPolicy;
use crate::retry::poll;

/// Output of one administrative command run.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

#[derive(Debug, Snafu)]
pub enum CommandError {
    #[snafu(display("failed to spawn '{command}': {source}"))]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[snafu(display("'{command}' exited with {code:?}: {stderr}"))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

/// Executes one administrative command against the system under test.
pub trait CommandRunner {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<CommandOutput, CommandError>;
}

/// Checks one unit of cluster state.
pub trait StatusProbe {
    type Ready;
    type Error: Debug + Display;

    fn probe(&mut self) -> PollStatus<Self::Ready, Self::Error>;
}

/// Polls `probe` under `policy`.
pub fn poll_probe<P>(policy: &RetryPolicy, probe: &mut P) -> Result<P::Ready, PollError<P::Error>>
where
    P: StatusProbe,
{
    poll(policy, |_| probe.probe())
}

/// Runs commands on the test driver itself, for setups where the admin CLI
/// is reachable locally.
#[derive(Debug, Default, Clone, Copy)]
pub struct Shell;

impl CommandRunner for Shell {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<CommandOutput, CommandError> {
        let output = Command::new(cmd)
            .args(args)
            .output()
            .context(SpawnSnafu { command: cmd })?;

        let output = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if output.success() {
            Ok(output)
        } else {
            Err(CommandError::CommandFailed {
                command: cmd.to_string(),
                code: output.code,
                stderr: output.stderr,
            })
        }
    }
}

/// Re-runs an administrative command until it succeeds, under the given
/// budget. A non-zero exit is treated as transient (the daemon may still be
/// converging); failure to spawn at all is permanent.
pub fn wait_for_command<R>(
    runner: &R,
    policy: &RetryPolicy,
    cmd: &str,
    args: &[&str],
) -> Result<CommandOutput, PollError<CommandError>>
where
    R: CommandRunner,
{
    poll(policy, |_| {
        PollStatus::from_result(runner.run(cmd, args), |e| {
            matches!(e, CommandError::CommandFailed { .. })
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::cell::Cell;
    use std::time::Duration;

    /// Succeeds once `failures` runs have been absorbed.
    struct FlakyRunner {
        failures: u32,
        calls: Cell<u32>,
    }

    impl CommandRunner for FlakyRunner {
        fn run(&self, cmd: &str, _args: &[&str]) -> Result<CommandOutput, CommandError> {
            let call = self.calls.get();
            self.calls.set(call + 1);
            if call < self.failures {
                Err(CommandError::CommandFailed {
                    command: cmd.to_string(),
                    code: Some(1),
                    stderr: "daemon not yet restarted".to_string(),
                })
            } else {
                Ok(CommandOutput {
                    code: Some(0),
                    stdout: "HEALTH_OK".to_string(),
                    stderr: String::new(),
                })
            }
        }
    }

    fn quick(n: u32) -> RetryPolicy {
        RetryPolicy::attempts(n).with_delay(Duration::from_millis(0))
    }

    #[test]
    fn shell_captures_stdout() {
        let out = Shell.run("echo", &["-n", "mon up"]).unwrap();
        assert!(out.success());
        assert_eq!(out.stdout, "mon up");
    }

    #[test]
    fn shell_reports_nonzero_exit() {
        let err = Shell.run("false", &[]).unwrap_err();
        assert_matches!(err, CommandError::CommandFailed { code: Some(1), .. });
    }

    #[test]
    fn missing_binary_fails_the_poll_fast() {
        let r = wait_for_command(
            &Shell,
            &quick(10),
            "definitely-not-a-real-binary-xyzzy",
            &[],
        );
        assert_matches!(
            r,
            Err(PollError::Fatal {
                error: CommandError::Spawn { .. }
            })
        );
    }

    #[test]
    fn command_failure_is_retried_until_success() {
        let runner = FlakyRunner {
            failures: 2,
            calls: Cell::new(0),
        };
        let out = wait_for_command(&runner, &quick(5), "ceph", &["status"]).unwrap();
        assert_eq!(out.stdout, "HEALTH_OK");
        assert_eq!(runner.calls.get(), 3);
    }

    #[test]
    fn command_failure_exhausts_the_budget() {
        let runner = FlakyRunner {
            failures: u32::MAX,
            calls: Cell::new(0),
        };
        let r = wait_for_command(&runner, &quick(3), "ceph", &["status"]);
        assert_eq!(runner.calls.get(), 3);
        assert_matches!(r, Err(PollError::BudgetExhausted { attempts: 3, .. }));
    }

    struct MdsActive {
        reports: Vec<&'static str>,
        next: usize,
    }

    impl StatusProbe for MdsActive {
        type Ready = ();
        type Error = String;

        fn probe(&mut self) -> PollStatus<(), String> {
            let state = self.reports[self.next];
            self.next += 1;
            PollStatus::ready_when(state == "active", format!("mds is {}", state))
        }
    }

    #[test]
    fn probe_polls_until_ready() {
        let mut probe = MdsActive {
            reports: vec!["replay", "reconnect", "active"],
            next: 0,
        };
        poll_probe(&quick(5), &mut probe).unwrap();
        assert_eq!(probe.next, 3);
    }
}
