use tracing::debug;

use crate::process::command::ToolCommand;
use crate::process::runner::ExecStatus;

/// Hook invoked around every external tool execution. The runner calls
/// `before_exec` immediately before spawning and `after_exec` once a status
/// is known, including spawn failures and timeouts.
pub trait ExecObserver {
    fn before_exec(&self, _cmd: &ToolCommand) {}

    fn after_exec(&self, _cmd: &ToolCommand, _status: &ExecStatus) {}
}

/// Default observer: commands are traced at debug level.
#[derive(Debug, Default)]
pub struct TraceObserver;

impl ExecObserver for TraceObserver {
    fn before_exec(&self, cmd: &ToolCommand) {
        debug!(command = %cmd, "executing");
    }

    fn after_exec(&self, cmd: &ToolCommand, status: &ExecStatus) {
        debug!(command = %cmd.program(), %status, "finished");
    }
}

/// Observer that echoes each command to stderr before running it, in the
/// style of `sh -x`. Selected with `--trace-commands`.
#[derive(Debug, Default)]
pub struct EchoObserver;

impl ExecObserver for EchoObserver {
    fn before_exec(&self, cmd: &ToolCommand) {
        eprintln!("+ {cmd}");
    }

    fn after_exec(&self, cmd: &ToolCommand, status: &ExecStatus) {
        eprintln!("+ {} -> {status}", cmd.program());
    }
}
