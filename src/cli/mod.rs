//! CLI module for the harness
//!
//! ## Commands
//!
//! - `run` - Build the full toolchain and drive it over every input program
//! - `scan [FILE]` - Build the reduced scanner and test it in isolation
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::config::HarnessConfig;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Build-and-verify harness for the compiler/interpreter toolchain
#[derive(Parser, Debug)]
#[command(name = "crisol")]
#[command(version = VERSION)]
#[command(about = "Build-and-verify harness for the compiler/interpreter toolchain", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Flags shared by both commands.
#[derive(Args, Debug)]
pub struct CommonOpts {
    /// Directory of input programs
    #[arg(long, value_name = "DIR", default_value = "inputs")]
    pub inputs: PathBuf,

    /// Native compiler used to build the toolchain
    #[arg(long, value_name = "PROG", default_value = "g++")]
    pub compiler: PathBuf,

    /// Directory holding the toolchain sources
    #[arg(long = "source-dir", value_name = "DIR", default_value = ".")]
    pub source_dir: PathBuf,

    /// Per-invocation timeout in seconds for external processes
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the full toolchain and drive it over every input program
    Run {
        #[command(flatten)]
        common: CommonOpts,

        /// Root for assembly artifacts
        #[arg(long, value_name = "DIR", default_value = "outputs")]
        outputs: PathBuf,

        /// Root for interpreter output artifacts
        #[arg(long = "interp-outputs", value_name = "DIR", default_value = "outputs_interprete")]
        interp_outputs: PathBuf,
    },

    /// Build the reduced scanner executable and test it in isolation
    Scan {
        #[command(flatten)]
        common: CommonOpts,

        /// Input file to scan; sweeps input1..14.txt under the input
        /// directory when omitted
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = usage_exit_code(&e);
            let _ = e.print();
            process::exit(code.0);
        }
    };

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Exit code for a failed argument parse: usage and arity errors exit 1,
/// while `--help`/`--version` renderings are not errors and exit 0.
fn usage_exit_code(err: &clap::Error) -> ExitCode {
    if err.use_stderr() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Run {
            common,
            outputs,
            interp_outputs,
        } => {
            let mut config = config_from(&common);
            config.asm_dir = outputs;
            config.interp_dir = interp_outputs;
            commands::run_pipeline(&config)
        }
        Command::Scan { common, file } => {
            let config = config_from(&common);
            commands::run_scanner(&config, file.as_deref())
        }
    }
}

/// Overlay CLI flags onto the default configuration.
fn config_from(common: &CommonOpts) -> HarnessConfig {
    let mut config = HarnessConfig::default();
    config.input_dir = common.inputs.clone();
    config.compiler = common.compiler.clone();
    config.source_dir = common.source_dir.clone();
    config.driver_source = common.source_dir.join("main_scanner.cpp");
    config.timeout = common.timeout.map(Duration::from_secs);
    config
}

// ============================================================================
// Tests
// ============================================================================
