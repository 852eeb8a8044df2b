use std::fmt;
use std::io;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::process::command::ToolCommand;
use crate::process::observer::{ExecObserver, TraceObserver};

/// Timeout applied when the caller does not configure one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Exit code reported when a process could not be launched, waited on, or
/// finished within its deadline.
pub const FAILURE_SENTINEL: i32 = -1;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Outcome of one external tool execution.
///
/// Spawn failures and timeouts are ordinary values, not errors: the runner
/// never propagates them upward as `Err`. [`ExecStatus::code`] collapses all
/// three variants into the single numeric view that callers interested only
/// in pass/fail consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecStatus {
    /// The child ran to completion and exited with this code.
    Exited(i32),
    /// The deadline elapsed; the child was killed and reaped.
    TimedOut,
    /// The command could not be launched or waited on.
    SpawnFailed,
}

impl ExecStatus {
    /// Collapse to the numeric exit-code contract: the child's own code for
    /// a completed run, [`FAILURE_SENTINEL`] otherwise.
    pub fn code(self) -> i32 {
        match self {
            ExecStatus::Exited(code) => code,
            ExecStatus::TimedOut | ExecStatus::SpawnFailed => FAILURE_SENTINEL,
        }
    }

    pub fn success(self) -> bool {
        self.code() == 0
    }
}

impl fmt::Display for ExecStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecStatus::Exited(code) => write!(f, "exited with {code}"),
            ExecStatus::TimedOut => write!(f, "timed out"),
            ExecStatus::SpawnFailed => write!(f, "failed to start"),
        }
    }
}

/// Execution configuration, fixed at construction. `timeout: None` waits
/// indefinitely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecOptions {
    pub timeout: Option<Duration>,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

/// Runs one external command to completion or timeout.
///
/// The child's stdout and stderr are redirected to the null sink; nothing is
/// captured or forwarded. Each call is a single attempt with no retry.
pub struct ProcessRunner {
    options: ExecOptions,
    observer: Box<dyn ExecObserver>,
}

impl ProcessRunner {
    pub fn new(options: ExecOptions) -> Self {
        Self::with_observer(options, Box::new(TraceObserver))
    }

    pub fn with_observer(options: ExecOptions, observer: Box<dyn ExecObserver>) -> Self {
        Self { options, observer }
    }

    pub fn options(&self) -> &ExecOptions {
        &self.options
    }

    /// Execute `cmd`, blocking until it exits or the timeout fires.
    pub fn execute(&self, cmd: &ToolCommand) -> ExecStatus {
        self.observer.before_exec(cmd);
        let status = self.spawn_and_wait(cmd);
        self.observer.after_exec(cmd, &status);
        status
    }

    fn spawn_and_wait(&self, cmd: &ToolCommand) -> ExecStatus {
        let mut child = match Command::new(cmd.program())
            .args(cmd.argv())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => child,
            Err(err) => {
                debug!(program = cmd.program(), %err, "spawn failed");
                return ExecStatus::SpawnFailed;
            }
        };

        let waited = match self.options.timeout {
            Some(timeout) => wait_timeout(&mut child, timeout),
            None => child.wait().map(Some),
        };

        match waited {
            // A child terminated by a signal has no exit code; fold it into
            // the sentinel.
            Ok(Some(status)) => ExecStatus::Exited(status.code().unwrap_or(FAILURE_SENTINEL)),
            Ok(None) => {
                reap(&mut child);
                ExecStatus::TimedOut
            }
            Err(err) => {
                debug!(program = cmd.program(), %err, "wait failed");
                reap(&mut child);
                ExecStatus::SpawnFailed
            }
        }
    }
}

/// Poll the child until it exits or `timeout` elapses. `Ok(None)` means the
/// deadline passed with the child still running.
fn wait_timeout(child: &mut Child, timeout: Duration) -> io::Result<Option<ExitStatus>> {
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if start.elapsed() >= timeout {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_carry_the_twenty_second_timeout() {
        assert_eq!(ExecOptions::default().timeout, Some(DEFAULT_TIMEOUT));
        assert_eq!(DEFAULT_TIMEOUT, Duration::from_secs(20));
    }

    #[test]
    fn code_collapses_failure_kinds_to_the_sentinel() {
        assert_eq!(ExecStatus::Exited(0).code(), 0);
        assert_eq!(ExecStatus::Exited(3).code(), 3);
        assert_eq!(ExecStatus::TimedOut.code(), FAILURE_SENTINEL);
        assert_eq!(ExecStatus::SpawnFailed.code(), FAILURE_SENTINEL);
    }

    #[test]
    fn only_exit_zero_is_success() {
        assert!(ExecStatus::Exited(0).success());
        assert!(!ExecStatus::Exited(1).success());
        assert!(!ExecStatus::TimedOut.success());
        assert!(!ExecStatus::SpawnFailed.success());
    }
}
