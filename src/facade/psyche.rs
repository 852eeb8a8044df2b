use std::path::PathBuf;

use thiserror::Error;

use crate::diagnostics::DiagnosticCode;
use crate::facade::compiler::{macro_flag_pairs, CompilerOptions};
use crate::options::CnipOptions;
use crate::process::{ExecObserver, ExecOptions, ProcessRunner, ToolCommand};
use crate::unit::CompilationUnit;

/// Standard-library model the generator loads when stdlib matching is on.
const STDLIB_PACKAGE: &str = "libpsychecstd";

/// A tool invocation that did not exit cleanly. Spawn failures, timeouts,
/// and non-zero tool exits all surface as the same variant for the step that
/// ran; the facade escalates uniformly.
#[derive(Debug, Error)]
pub enum FacadeError {
    #[error("constraint generation for {} failed", .unit.display())]
    GenerationFailed { unit: PathBuf },
    #[error("constraint solving for {} failed", .unit.display())]
    SolvingFailed { unit: PathBuf },
}

impl FacadeError {
    pub fn diagnostic_code(&self) -> DiagnosticCode {
        match self {
            FacadeError::GenerationFailed { .. } => DiagnosticCode::ConstraintGenerationFailed,
            FacadeError::SolvingFailed { .. } => DiagnosticCode::ConstraintSolvingFailed,
        }
    }
}

/// Facade to the psyche inference engine: translates "generate constraints
/// for unit U" and "solve constraints for unit U" into external tool
/// invocations and escalates any failure.
pub struct PsycheFacade {
    generator: String,
    solver: String,
    no_typedef: bool,
    no_heuristic: bool,
    no_stdlib: bool,
    host_cc: String,
    runner: ProcessRunner,
}

impl PsycheFacade {
    pub fn new(options: &CnipOptions) -> Self {
        let exec_options = ExecOptions {
            timeout: options.timeout,
        };
        Self::with_runner(options, ProcessRunner::new(exec_options))
    }

    /// Construct with a caller-supplied observer, keeping the timeout from
    /// `options`.
    pub fn with_exec_observer(options: &CnipOptions, observer: Box<dyn ExecObserver>) -> Self {
        let exec_options = ExecOptions {
            timeout: options.timeout,
        };
        Self::with_runner(options, ProcessRunner::with_observer(exec_options, observer))
    }

    pub fn with_runner(options: &CnipOptions, runner: ProcessRunner) -> Self {
        Self {
            generator: options.generator.clone(),
            solver: options.solver.clone(),
            no_typedef: options.no_typedef,
            no_heuristic: options.no_heuristic,
            no_stdlib: options.no_stdlib,
            host_cc: options.host_cc.clone(),
            runner,
        }
    }

    /// Invoke the constraint generator for `unit`.
    ///
    /// On success the constraint file is expected at the unit's `.cstr`
    /// path; that contract belongs to the external tool and is not verified
    /// here.
    pub fn generate(
        &self,
        unit: &CompilationUnit,
        cc_opts: &CompilerOptions,
    ) -> Result<(), FacadeError> {
        let cmd = self.generate_command(unit, cc_opts);
        let status = self.runner.execute(&cmd);
        if !status.success() {
            return Err(FacadeError::GenerationFailed {
                unit: unit.c_file().to_path_buf(),
            });
        }
        Ok(())
    }

    /// Invoke the constraint solver for `unit`.
    pub fn solve(&self, unit: &CompilationUnit) -> Result<(), FacadeError> {
        let cmd = self.solve_command(unit);
        let status = self.runner.execute(&cmd);
        if !status.success() {
            return Err(FacadeError::SolvingFailed {
                unit: unit.c_file().to_path_buf(),
            });
        }
        Ok(())
    }

    pub fn generate_command(
        &self,
        unit: &CompilationUnit,
        cc_opts: &CompilerOptions,
    ) -> ToolCommand {
        let mut cmd = ToolCommand::new(&self.generator);
        cmd.arg(unit.c_file().to_string_lossy());
        cmd.arg("-o");
        cmd.arg(unit.cstr_file().to_string_lossy());

        cmd.args(["--cc", self.host_cc.as_str()]);
        cmd.args(macro_flag_pairs("--cc-D", &cc_opts.predefined));
        cmd.args(macro_flag_pairs("--cc-U", &cc_opts.undefined));
        cmd.args(["--cc-std", cc_opts.c_version.as_str()]);

        if self.no_typedef {
            cmd.arg("--no-typedef");
        }
        if self.no_heuristic {
            cmd.arg("--no-heuristic");
        }
        if !self.no_stdlib {
            cmd.args(["-p", STDLIB_PACKAGE]);
        }
        cmd
    }

    pub fn solve_command(&self, unit: &CompilationUnit) -> ToolCommand {
        let mut cmd = ToolCommand::new(&self.solver);
        cmd.arg("--");
        cmd.arg("-i");
        cmd.arg(unit.cstr_file().to_string_lossy());
        cmd.arg("-o");
        cmd.arg(unit.cnip_file().to_string_lossy());

        if !self.no_stdlib {
            cmd.arg("--match-stdlib=approx");
        }
        cmd
    }
}
