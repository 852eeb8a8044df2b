use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing::info;

use crate::diagnostics;
use crate::facade::{CompilerFacade, CompilerOptions, PsycheFacade};
use crate::options::CnipOptions;
use crate::process::EchoObserver;
use crate::unit::CompilationUnit;
use crate::utils::logger;
use crate::version::VERSION;

#[derive(Parser, Debug)]
#[command(name = "cnip", version = VERSION, about = "Driver for the psychec type-inference tools")]
pub struct CnipCli {
    #[arg(required = true)]
    /// C source files to process, in order.
    files: Vec<PathBuf>,

    #[arg(long)]
    /// Disable typedef resolution during constraint generation.
    no_typedef: bool,

    #[arg(long)]
    /// Disable heuristic resolution of ambiguous syntax.
    no_heuristic: bool,

    #[arg(long)]
    /// Skip standard-library matching in both tools.
    no_stdlib: bool,

    #[arg(long, default_value = "gcc")]
    /// Host C compiler consulted for predefined macros.
    cc: String,

    #[arg(long = "cc-std", default_value = "c99")]
    /// C dialect handed to the constraint generator.
    cc_std: String,

    #[arg(long, default_value_t = 20)]
    /// Per-tool timeout in seconds (0 waits indefinitely).
    timeout: u64,

    #[arg(long, default_value = "psychecgen")]
    /// Constraint generator program to invoke.
    generator: String,

    #[arg(long, default_value = "psychecsolver-exe")]
    /// Constraint solver program to invoke.
    solver: String,

    #[arg(short = 'o', long)]
    /// Directory receiving constraint files and output artifacts.
    output_dir: Option<PathBuf>,

    #[arg(long)]
    /// Echo each tool command to stderr before running it.
    trace_commands: bool,
}

impl CnipCli {
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn output_dir(&self) -> Option<&PathBuf> {
        self.output_dir.as_ref()
    }

    pub fn cc_std(&self) -> &str {
        &self.cc_std
    }

    pub fn to_options(&self) -> CnipOptions {
        CnipOptions {
            generator: self.generator.clone(),
            solver: self.solver.clone(),
            no_typedef: self.no_typedef,
            no_heuristic: self.no_heuristic,
            no_stdlib: self.no_stdlib,
            host_cc: self.cc.clone(),
            timeout: match self.timeout {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
            trace_commands: self.trace_commands,
        }
    }
}

pub fn run() -> Result<()> {
    logger::init_logging();
    let cli = CnipCli::parse();
    let options = cli.to_options();

    if let Some(dir) = cli.output_dir() {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    }

    let cc_opts = CompilerFacade::new(&options.host_cc).probe(cli.cc_std());

    let units: Vec<CompilationUnit> = cli
        .files()
        .iter()
        .map(|file| CompilationUnit::from_source(file, cli.output_dir().map(PathBuf::as_path)))
        .collect();

    process_units(&options, &cc_opts, &units)
}

/// Run the generate-then-solve sequence for each unit, strictly in order.
/// The first failing step aborts the whole run; no later unit is touched,
/// and artifacts already written by earlier units stay on disk.
pub fn process_units(
    options: &CnipOptions,
    cc_opts: &CompilerOptions,
    units: &[CompilationUnit],
) -> Result<()> {
    let facade = if options.trace_commands {
        PsycheFacade::with_exec_observer(options, Box::new(EchoObserver))
    } else {
        PsycheFacade::new(options)
    };

    for unit in units {
        info!(unit = %unit.c_file().display(), "processing");
        println!("{} {}", "inferring".bold(), unit.c_file().display());

        if let Err(err) = facade.generate(unit, cc_opts) {
            diagnostics::report_fatal(err.diagnostic_code(), &err);
            bail!("constraint generation failed");
        }
        if let Err(err) = facade.solve(unit) {
            diagnostics::report_fatal(err.diagnostic_code(), &err);
            bail!("constraint solving failed");
        }
    }

    Ok(())
}
