//! Batch runner: drive the built toolchain over every input program.
//!
//! ## Reporter Trait
//!
//! Execution is separated from reporting via the [`Reporter`] trait, so the
//! console output can be swapped for other formats without touching the run
//! loop.
//!
//! ## Error policy
//!
//! One bad input must not hide results for the rest of the corpus: a case
//! that exits nonzero is recorded, logged, and skipped over
//! (continue-on-error). That is deliberately the opposite of the build
//! step's abort-on-error policy.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::HarnessConfig;
use crate::interfaces::{CommandExecutor, ExistenceChecker, HarnessError};
use crate::naming::base_name;
use crate::probe::{ArtifactPresence, ArtifactProbe};

/// One discovered input program and its derived base name. Immutable after
/// discovery.
#[derive(Debug, Clone)]
pub struct TestCase {
    pub path: PathBuf,
    pub file_name: String,
    pub base_name: String,
}

/// Outcome of driving the toolchain over a single case. Never mutated after
/// creation.
#[derive(Debug)]
pub struct RunResult {
    pub case: TestCase,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
    /// `None` when the case failed and the probe was skipped.
    pub artifacts: Option<ArtifactPresence>,
}

impl RunResult {
    pub fn passed(&self) -> bool {
        self.exit_code == Some(0) && !self.timed_out
    }
}

/// Aggregate outcome of one batch run.
#[derive(Debug)]
pub struct BatchReport {
    /// Per-case results in processing (lexicographic) order.
    pub results: Vec<RunResult>,
    /// True iff every case exited zero. Artifact presence does not affect
    /// this flag.
    pub all_passed: bool,
}

/// Counts handed to [`Reporter::on_run_complete`].
#[derive(Debug, Clone, Copy)]
pub struct BatchSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

/// Reporting hooks for batch progress.
pub trait Reporter {
    /// Called once discovery and sorting are done.
    fn on_collection_complete(&mut self, _case_count: usize) {}

    /// Called just before a case's invocation.
    fn on_case_start(&mut self, _case: &TestCase) {}

    /// Called with the finished result of a case.
    fn on_case_complete(&mut self, _result: &RunResult) {}

    /// Called after the last case.
    fn on_run_complete(&mut self, _summary: &BatchSummary) {}
}

/// Default console reporter: human-readable progress as the batch advances.
pub struct ConsoleReporter {
    probe: ArtifactProbe,
}

impl ConsoleReporter {
    pub fn new(config: &HarnessConfig) -> Self {
        Self {
            probe: ArtifactProbe::new(config.asm_dir.clone(), config.interp_dir.clone()),
        }
    }
}

impl Reporter for ConsoleReporter {
    fn on_collection_complete(&mut self, case_count: usize) {
        if case_count == 0 {
            eprintln!("No input programs found");
        } else {
            println!("Found {case_count} input program(s)");
        }
    }

    fn on_case_start(&mut self, case: &TestCase) {
        println!("\nProcessing {}", case.file_name);
    }

    fn on_case_complete(&mut self, result: &RunResult) {
        if !result.passed() {
            if result.timed_out {
                eprintln!("Timed out processing {}", result.case.file_name);
            } else {
                eprintln!("Error processing {}:", result.case.file_name);
            }
            if !result.stderr.is_empty() {
                eprintln!("{}", result.stderr);
            }
            return;
        }

        let (asm, interp) = self.probe.expected_paths(&result.case.base_name);
        if let Some(artifacts) = result.artifacts {
            if artifacts.assembly {
                println!("- assembly written to: {}", asm.display());
            }
            if artifacts.interpreter {
                println!("- interpreter output written to: {}", interp.display());
            }
        }
    }

    fn on_run_complete(&mut self, summary: &BatchSummary) {
        println!();
        if summary.failed == 0 {
            println!("{} case(s) passed", summary.passed);
        } else {
            println!(
                "{} case(s) passed, {} failed of {}",
                summary.passed, summary.failed, summary.total
            );
        }
    }
}

/// Drives the built toolchain executable across the input directory.
pub struct BatchRunner<'a> {
    config: &'a HarnessConfig,
    executor: &'a dyn CommandExecutor,
    checker: &'a dyn ExistenceChecker,
    probe: ArtifactProbe,
}

impl<'a> BatchRunner<'a> {
    pub fn new(
        config: &'a HarnessConfig,
        executor: &'a dyn CommandExecutor,
        checker: &'a dyn ExistenceChecker,
    ) -> Self {
        Self {
            config,
            executor,
            checker,
            probe: ArtifactProbe::new(config.asm_dir.clone(), config.interp_dir.clone()),
        }
    }

    /// Discover candidate inputs: names starting with `input` and ending in
    /// `.txt`, sorted lexicographically for a reproducible run order.
    pub fn discover(&self) -> Result<Vec<TestCase>, HarnessError> {
        let input_dir = &self.config.input_dir;
        if !input_dir.is_dir() {
            return Err(HarnessError::Setup(format!(
                "input directory '{}' does not exist",
                input_dir.display()
            )));
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(input_dir)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if name.starts_with("input") && name.ends_with(".txt") {
                names.push(name.to_string());
            }
        }
        names.sort();

        Ok(names
            .into_iter()
            .map(|name| TestCase {
                path: input_dir.join(&name),
                base_name: base_name(&name),
                file_name: name,
            })
            .collect())
    }

    /// Run every discovered case against `exe`, one at a time, reporting as
    /// the run advances.
    ///
    /// The output roots are created idempotently before the first case. A
    /// nonzero case exit is recorded and the loop continues; only setup and
    /// spawn-level I/O failures abort the batch.
    pub fn run(&self, exe: &Path, reporter: &mut dyn Reporter) -> Result<BatchReport, HarnessError> {
        let cases = self.discover()?;

        fs::create_dir_all(&self.config.asm_dir)?;
        fs::create_dir_all(&self.config.interp_dir)?;

        reporter.on_collection_complete(cases.len());

        let mut results = Vec::with_capacity(cases.len());
        for case in cases {
            reporter.on_case_start(&case);

            let args = vec![case.path.to_string_lossy().into_owned()];
            let output = self.executor.execute(exe, &args, self.config.timeout)?;

            let artifacts = if output.success() {
                Some(self.probe.probe(self.checker, &case.base_name))
            } else {
                tracing::warn!(
                    case = %case.file_name,
                    exit_code = ?output.exit_code,
                    timed_out = output.timed_out,
                    "case failed, continuing with remaining inputs"
                );
                None
            };

            let result = RunResult {
                case,
                exit_code: output.exit_code,
                stdout: output.stdout,
                stderr: output.stderr,
                timed_out: output.timed_out,
                artifacts,
            };
            reporter.on_case_complete(&result);
            results.push(result);
        }

        let passed = results.iter().filter(|r| r.passed()).count();
        let summary = BatchSummary {
            total: results.len(),
            passed,
            failed: results.len() - passed,
        };
        reporter.on_run_complete(&summary);

        Ok(BatchReport {
            all_passed: summary.failed == 0,
            results,
        })
    }
}
