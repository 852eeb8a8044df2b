pub mod command;
pub mod observer;
pub mod runner;

pub use command::ToolCommand;
pub use observer::{EchoObserver, ExecObserver, TraceObserver};
pub use runner::{ExecOptions, ExecStatus, ProcessRunner, DEFAULT_TIMEOUT, FAILURE_SENTINEL};
