//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::path::Path;

use crate::batch::{BatchRunner, ConsoleReporter};
use crate::builder;
use crate::config::HarnessConfig;
use crate::interfaces::{FsExistence, HarnessError, SystemExecutor};
use crate::scanner::ScannerHarness;

use super::{CliError, CliResult, ExitCode};

/// Map a harness error to a CLI error, keeping compiler diagnostics verbatim.
fn cli_error(err: HarnessError) -> CliError {
    match err {
        HarnessError::Build { diagnostics } => {
            CliError::failure(format!("Compilation failed:\n{diagnostics}"))
        }
        HarnessError::MissingInput(path) => {
            CliError::failure(format!("No such input file: {}", path.display()))
        }
        other => CliError::failure(other.to_string()),
    }
}

/// Full pipeline: build the toolchain, then batch-drive it over the input
/// directory.
///
/// Exit code 0 only when the build succeeded and every case exited zero.
/// A build failure aborts immediately, before the input or output
/// directories are touched; per-case failures are reported case by case and
/// escalate to exit code 1 once the whole corpus has been processed.
pub fn run_pipeline(config: &HarnessConfig) -> CliResult<ExitCode> {
    let executor = SystemExecutor;
    let checker = FsExistence;

    let spec = config.toolchain_spec();
    println!("Compiling: {}", spec.render());
    let exe = builder::build(&spec, &executor, config.timeout).map_err(cli_error)?;
    println!("Compilation succeeded");

    let runner = BatchRunner::new(config, &executor, &checker);
    let mut reporter = ConsoleReporter::new(config);
    let report = runner.run(&exe, &mut reporter).map_err(cli_error)?;

    if report.all_passed {
        Ok(ExitCode::SUCCESS)
    } else {
        // Summary already printed by the reporter.
        Err(CliError::new("", ExitCode::FAILURE))
    }
}

/// Scanner harness: explicit mode with a file argument, sweep mode without.
pub fn run_scanner(config: &HarnessConfig, file: Option<&Path>) -> CliResult<ExitCode> {
    let executor = SystemExecutor;
    let checker = FsExistence;
    let harness = ScannerHarness::new(config, &executor, &checker);

    match file {
        Some(path) => {
            let code = harness.run_explicit(path).map_err(cli_error)?;
            Ok(ExitCode(code))
        }
        None => {
            let all_passed = harness.run_sweep().map_err(cli_error)?;
            if all_passed {
                Ok(ExitCode::SUCCESS)
            } else {
                Err(CliError::new("", ExitCode::FAILURE))
            }
        }
    }
}
