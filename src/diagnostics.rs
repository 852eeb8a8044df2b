use std::fmt;

use colored::Colorize;

/// Catalog of fatal driver diagnostics. Codes are stable; messages carry the
/// offending detail supplied at the report site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticCode {
    ConstraintGenerationFailed = 1,
    ConstraintSolvingFailed = 2,
}

impl DiagnosticCode {
    pub fn code(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:03}", self.code())
    }
}

/// Print a fatal diagnostic to stderr. The caller is expected to abort the
/// run afterwards; reporting itself never terminates the process.
pub fn report_fatal(code: DiagnosticCode, detail: impl fmt::Display) {
    eprintln!(
        "{} {} {}: {}",
        "cnip:".bold(),
        "fatal error".red().bold(),
        code,
        detail
    );
}
