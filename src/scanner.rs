//! Isolated scanner harness.
//!
//! Verifies the scanning subsystem without depending on the full toolchain:
//! a minimal driver is synthesized next to the toolchain sources, a reduced
//! executable is built from {driver, scanner sources}, and that executable
//! is run against one explicit input or a numeric sweep of candidates.
//!
//! The synthesized driver and the reduced executable are owned by a scoped
//! guard whose `Drop` removes them, so cleanup holds on every exit path:
//! success, per-case failure, build failure, or an unexpected error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::builder;
use crate::config::HarnessConfig;
use crate::interfaces::{CommandExecutor, ExistenceChecker, HarnessError};

/// Driver source forwarding exactly one argv into the scanner entry point.
/// Any other argument count exits with a fixed non-success code.
const DRIVER_SOURCE: &str = r#"#include "scanner.h"

int main(int argc, const char* argv[]) {
    if (argc != 2) return 1;
    return solo_scanner(argv[1]);
}
"#;

/// Scoped guard over the synthesized driver source and reduced executable.
struct TempDriver {
    source: PathBuf,
    exe: PathBuf,
}

impl TempDriver {
    fn create(source: PathBuf, exe: PathBuf) -> Result<Self, HarnessError> {
        fs::write(&source, DRIVER_SOURCE)?;
        Ok(Self { source, exe })
    }
}

impl Drop for TempDriver {
    fn drop(&mut self) {
        for path in [&self.source, &self.exe] {
            if let Err(e) = fs::remove_file(path) {
                if e.kind() != io::ErrorKind::NotFound {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "failed to remove synthesized build artifact"
                    );
                }
            }
        }
    }
}

/// Builds and drives the reduced scanner executable.
pub struct ScannerHarness<'a> {
    config: &'a HarnessConfig,
    executor: &'a dyn CommandExecutor,
    checker: &'a dyn ExistenceChecker,
}

impl<'a> ScannerHarness<'a> {
    pub fn new(
        config: &'a HarnessConfig,
        executor: &'a dyn CommandExecutor,
        checker: &'a dyn ExistenceChecker,
    ) -> Self {
        Self {
            config,
            executor,
            checker,
        }
    }

    /// Synthesize the driver and build the reduced executable. The returned
    /// guard must stay alive while the executable is in use.
    fn build_reduced(&self) -> Result<TempDriver, HarnessError> {
        // The scanner writes its token dumps here; create-if-absent, like
        // the batch runner's output roots.
        fs::create_dir_all(&self.config.tokens_dir)?;

        let guard = TempDriver::create(
            self.config.driver_source.clone(),
            self.config.scanner_exe.clone(),
        )?;
        builder::build(&self.config.scanner_spec(), self.executor, self.config.timeout)?;
        Ok(guard)
    }

    /// Explicit mode: run the reduced scanner once against `input` and
    /// return that invocation's exit code.
    ///
    /// A missing input fails fast with [`HarnessError::MissingInput`] before
    /// any external process runs.
    pub fn run_explicit(&self, input: &Path) -> Result<i32, HarnessError> {
        if !self.checker.exists(input) {
            return Err(HarnessError::MissingInput(input.to_path_buf()));
        }

        let _guard = self.build_reduced()?;

        let args = vec![input.to_string_lossy().into_owned()];
        let output = self
            .executor
            .execute(&self.config.scanner_exe, &args, self.config.timeout)?;
        Ok(output.exit_code.unwrap_or(1))
    }

    /// Sweep mode: probe `input<N>.txt` under the input directory across the
    /// configured numeric range, ascending. Absent candidates are silently
    /// skipped; the sweep succeeds iff no invoked candidate failed.
    pub fn run_sweep(&self) -> Result<bool, HarnessError> {
        let _guard = self.build_reduced()?;

        let mut all_passed = true;
        for n in self.config.sweep_range.clone() {
            let candidate = self.config.input_dir.join(format!("input{n}.txt"));
            if !self.checker.exists(&candidate) {
                continue;
            }

            println!("Processing {}", candidate.display());
            let args = vec![candidate.to_string_lossy().into_owned()];
            let output = self
                .executor
                .execute(&self.config.scanner_exe, &args, self.config.timeout)?;
            if !output.success() {
                tracing::warn!(candidate = %candidate.display(), "scanner case failed");
                all_passed = false;
            }
        }
        Ok(all_passed)
    }
}
