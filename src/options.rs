use std::time::Duration;

use crate::process::DEFAULT_TIMEOUT;

/// Run-wide configuration for the inference tools, built once from the CLI
/// and read-only thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CnipOptions {
    /// Constraint generator program name or path.
    pub generator: String,
    /// Constraint solver program name or path.
    pub solver: String,
    /// Disable typedef resolution during generation.
    pub no_typedef: bool,
    /// Disable heuristic resolution of ambiguous syntax.
    pub no_heuristic: bool,
    /// Skip standard-library matching in both tools.
    pub no_stdlib: bool,
    /// Host C compiler consulted for predefined macros.
    pub host_cc: String,
    /// Per-tool deadline; `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Echo each tool command to stderr before running it.
    pub trace_commands: bool,
}

impl Default for CnipOptions {
    fn default() -> Self {
        Self {
            generator: "psychecgen".to_string(),
            solver: "psychecsolver-exe".to_string(),
            no_typedef: false,
            no_heuristic: false,
            no_stdlib: false,
            host_cc: "gcc".to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
            trace_commands: false,
        }
    }
}
