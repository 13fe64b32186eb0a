//! Build orchestration for the toolchain under test.
//!
//! The native compiler is an opaque external collaborator: we hand it an
//! ordered source list, it hands back an exit code, diagnostics, and (on
//! success) an executable on disk. A failed build aborts the entire run; no
//! downstream step may execute against a missing or stale binary.

use std::path::PathBuf;
use std::time::Duration;

use crate::interfaces::{CommandExecutor, HarnessError};

/// One native-compiler invocation: program, flags, ordered translation
/// units, and the target executable path.
///
/// Source order is preserved exactly as given; the harness makes no
/// assumptions about whether the underlying compiler cares.
#[derive(Debug, Clone)]
pub struct CompileSpec {
    pub compiler: PathBuf,
    pub flags: Vec<String>,
    pub sources: Vec<PathBuf>,
    pub output: PathBuf,
}

impl CompileSpec {
    /// Full argument list: flags, `-o <output>`, then the sources unchanged.
    pub fn args(&self) -> Vec<String> {
        let mut args = self.flags.clone();
        args.push("-o".to_string());
        args.push(self.output.to_string_lossy().into_owned());
        args.extend(
            self.sources
                .iter()
                .map(|s| s.to_string_lossy().into_owned()),
        );
        args
    }

    /// Human-readable rendering of the invocation, for progress output.
    pub fn render(&self) -> String {
        let mut parts = vec![self.compiler.to_string_lossy().into_owned()];
        parts.extend(self.args());
        parts.join(" ")
    }
}

/// Compile `spec` into an executable.
///
/// Returns the path of the produced binary on success. A nonzero compiler
/// exit becomes [`HarnessError::Build`] carrying the combined diagnostics
/// verbatim; spawn failures surface as I/O errors. Both are fatal to the
/// caller's pipeline.
pub fn build(
    spec: &CompileSpec,
    executor: &dyn CommandExecutor,
    timeout: Option<Duration>,
) -> Result<PathBuf, HarnessError> {
    tracing::info!(
        compiler = %spec.compiler.display(),
        output = %spec.output.display(),
        sources = spec.sources.len(),
        "compiling"
    );

    let result = executor.execute(&spec.compiler, &spec.args(), timeout)?;

    if result.success() {
        Ok(spec.output.clone())
    } else {
        Err(HarnessError::Build {
            diagnostics: result.combined(),
        })
    }
}
