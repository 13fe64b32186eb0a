//! Harness I/O boundary interfaces
//!
//! This module defines trait-based abstractions for the two effectful
//! operations every harness step performs:
//! - External process invocation (argument list in, exit code + captured text out)
//! - Filesystem existence checks (artifact and candidate probing)
//!
//! Build, batch, and scanner logic only talk to these traits, so all of them
//! can be exercised in tests without a real compiler or toolchain binary.
//! Default implementations back onto the system.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;

/// Errors that occur during harness operations.
///
/// A failing test case is data, not an error; only conditions that stop a
/// step outright appear here.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The native compiler exited nonzero. Fatal: the whole run aborts and
    /// the captured diagnostics are surfaced verbatim.
    #[error("build failed:\n{diagnostics}")]
    Build { diagnostics: String },

    /// The run could not start (missing input directory, unwritable output
    /// root). Reported before any case executes.
    #[error("setup error: {0}")]
    Setup(String),

    /// A caller-supplied input path does not exist (scanner explicit mode).
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// An expected artifact is absent. Only raised by the strict probe
    /// variant; the reporting path treats absence as a normal `false`.
    #[error("expected artifact missing: {0}")]
    MissingArtifact(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Captured outcome of one external process invocation.
#[derive(Debug, Clone)]
pub struct ExecOutput {
    /// `None` when the process was killed by a signal (including our own
    /// timeout kill).
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    /// True when the invocation hit the configured wall-clock limit and the
    /// child was killed.
    pub timed_out: bool,
}

impl ExecOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0) && !self.timed_out
    }

    /// Stdout and stderr concatenated, for surfacing diagnostics verbatim.
    pub fn combined(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr).trim().to_string()
    }
}

/// Synchronous external-process invocation.
///
/// The harness never runs two invocations concurrently, so implementations
/// may assume strictly sequential calls.
pub trait CommandExecutor {
    fn execute(
        &self,
        program: &Path,
        args: &[String],
        timeout: Option<Duration>,
    ) -> Result<ExecOutput, HarnessError>;
}

/// Filesystem presence checks, injectable so probe and sweep logic can be
/// tested against a fixed set of paths.
pub trait ExistenceChecker {
    fn exists(&self, path: &Path) -> bool;
}

// ============================================================================
// Default Implementations
// ============================================================================

/// How often the timeout path polls the child for completion.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Real process execution via `std::process::Command`, with optional
/// kill-on-timeout.
pub struct SystemExecutor;

impl CommandExecutor for SystemExecutor {
    fn execute(
        &self,
        program: &Path,
        args: &[String],
        timeout: Option<Duration>,
    ) -> Result<ExecOutput, HarnessError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Drain both pipes on their own threads so a chatty child cannot
        // block against a full pipe buffer while we wait on it.
        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();
        let stdout_handle = thread::spawn(move || read_pipe(stdout_pipe));
        let stderr_handle = thread::spawn(move || read_pipe(stderr_pipe));

        let mut timed_out = false;
        let status = match timeout {
            None => child.wait()?,
            Some(limit) => {
                let deadline = Instant::now() + limit;
                loop {
                    if let Some(status) = child.try_wait()? {
                        break status;
                    }
                    if Instant::now() >= deadline {
                        timed_out = true;
                        tracing::warn!(program = %program.display(), "invocation timed out, killing child");
                        let _ = child.kill();
                        break child.wait()?;
                    }
                    thread::sleep(POLL_INTERVAL);
                }
            }
        };

        let stdout = stdout_handle.join().unwrap_or_default();
        let stderr = stderr_handle.join().unwrap_or_default();

        Ok(ExecOutput {
            exit_code: status.code(),
            stdout,
            stderr,
            timed_out,
        })
    }
}

fn read_pipe<R: Read>(pipe: Option<R>) -> String {
    let mut buf = String::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_string(&mut buf);
    }
    buf
}

/// Real filesystem existence checks.
pub struct FsExistence;

impl ExistenceChecker for FsExistence {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

// ============================================================================
// Test doubles (crate-internal)
// ============================================================================

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashSet;

    /// Scripted executor: records every invocation and replays canned
    /// outputs in order. Falls back to a success with empty output when the
    /// script runs dry.
    pub struct MockExecutor {
        pub calls: RefCell<Vec<(PathBuf, Vec<String>)>>,
        pub script: RefCell<Vec<ExecOutput>>,
    }

    impl MockExecutor {
        pub fn new(script: Vec<ExecOutput>) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                script: RefCell::new(script),
            }
        }

        pub fn always_succeeding() -> Self {
            Self::new(Vec::new())
        }

        pub fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    impl CommandExecutor for MockExecutor {
        fn execute(
            &self,
            program: &Path,
            args: &[String],
            _timeout: Option<Duration>,
        ) -> Result<ExecOutput, HarnessError> {
            self.calls
                .borrow_mut()
                .push((program.to_path_buf(), args.to_vec()));
            let mut script = self.script.borrow_mut();
            if script.is_empty() {
                Ok(ok_output())
            } else {
                Ok(script.remove(0))
            }
        }
    }

    /// Existence checker backed by a fixed set of paths.
    pub struct SetChecker {
        pub present: HashSet<PathBuf>,
    }

    impl SetChecker {
        pub fn new<I: IntoIterator<Item = PathBuf>>(paths: I) -> Self {
            Self {
                present: paths.into_iter().collect(),
            }
        }
    }

    impl ExistenceChecker for SetChecker {
        fn exists(&self, path: &Path) -> bool {
            self.present.contains(path)
        }
    }

    pub fn ok_output() -> ExecOutput {
        ExecOutput {
            exit_code: Some(0),
            stdout: String::new(),
            stderr: String::new(),
            timed_out: false,
        }
    }

    pub fn failed_output(code: i32, stderr: &str) -> ExecOutput {
        ExecOutput {
            exit_code: Some(code),
            stdout: String::new(),
            stderr: stderr.to_string(),
            timed_out: false,
        }
    }

    /// Output of a child killed at the wall-clock limit: no exit code.
    pub fn timed_out_output() -> ExecOutput {
        ExecOutput {
            exit_code: None,
            stdout: String::new(),
            stderr: String::new(),
            timed_out: true,
        }
    }
}
