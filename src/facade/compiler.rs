use std::process::Command;

use anyhow::{bail, Context, Result};
use tracing::{debug, warn};

/// Macros the inference tools cannot digest; they are undefined on the
/// generator command line whenever the probe succeeds.
const INCOMPATIBLE_MACROS: &[&str] = &["__BLOCKS__"];

/// Compiler-derived inputs to constraint generation: the C dialect plus the
/// host compiler's predefined and undefined macro sets. Plain data; command
/// construction consumes it read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOptions {
    pub c_version: String,
    pub predefined: Vec<String>,
    pub undefined: Vec<String>,
}

impl CompilerOptions {
    /// Options with empty macro sets, used when the host compiler could not
    /// be probed.
    pub fn bare(c_version: impl Into<String>) -> Self {
        Self {
            c_version: c_version.into(),
            predefined: Vec::new(),
            undefined: Vec::new(),
        }
    }
}

/// Render a macro set as repeated `<flag> <macro>` argument pairs.
pub fn macro_flag_pairs<'a>(
    flag: &'a str,
    macros: &'a [String],
) -> impl Iterator<Item = String> + 'a {
    macros
        .iter()
        .flat_map(move |m| [flag.to_string(), m.clone()])
}

/// Facade to the host C compiler. Queries it for the macros it predefines so
/// the constraint generator can mirror the host preprocessing environment.
#[derive(Debug, Clone)]
pub struct CompilerFacade {
    host_cc: String,
}

impl CompilerFacade {
    pub fn new(host_cc: impl Into<String>) -> Self {
        Self {
            host_cc: host_cc.into(),
        }
    }

    /// Probe the host compiler once per run. A failed probe degrades to
    /// empty macro sets rather than aborting: the generator can still run,
    /// only with a weaker preprocessing model.
    pub fn probe(&self, c_version: &str) -> CompilerOptions {
        match self.query_predefined_macros() {
            Ok(predefined) => {
                debug!(count = predefined.len(), cc = %self.host_cc, "predefined macros collected");
                CompilerOptions {
                    c_version: c_version.to_string(),
                    predefined,
                    undefined: INCOMPATIBLE_MACROS.iter().map(|m| m.to_string()).collect(),
                }
            }
            Err(err) => {
                warn!(cc = %self.host_cc, %err, "compiler probe failed, continuing without macros");
                CompilerOptions::bare(c_version)
            }
        }
    }

    // Unlike the tool runner, the probe exists to read the child's stdout,
    // so output is captured here rather than discarded.
    fn query_predefined_macros(&self) -> Result<Vec<String>> {
        let output = Command::new(&self.host_cc)
            .args(["-dM", "-E", "-x", "c", null_device()])
            .output()
            .with_context(|| format!("failed to run {}", self.host_cc))?;

        if !output.status.success() {
            bail!("{} exited with {}", self.host_cc, output.status);
        }

        Ok(parse_define_lines(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Parse `#define NAME VALUE` preprocessor dump lines into `NAME=VALUE`
/// macro definitions; object-like macros without a value stay bare.
fn parse_define_lines(dump: &str) -> Vec<String> {
    dump.lines()
        .filter_map(|line| line.strip_prefix("#define "))
        .map(|rest| match rest.split_once(' ') {
            Some((name, value)) => format!("{name}={value}"),
            None => rest.to_string(),
        })
        .collect()
}

fn null_device() -> &'static str {
    if cfg!(windows) { "NUL" } else { "/dev/null" }
}
