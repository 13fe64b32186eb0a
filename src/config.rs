//! Harness configuration.
//!
//! Every root path, source list, and external-command setting lives in one
//! explicit value handed to the components that need it. Nothing in the
//! harness assumes fixed directory names or reads the current working
//! directory behind the caller's back.

use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

use crate::builder::CompileSpec;

/// Configuration for one harness run.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Directory holding the `input*.txt` programs.
    pub input_dir: PathBuf,
    /// Root where the toolchain writes `<base>.s` assembly artifacts.
    pub asm_dir: PathBuf,
    /// Root where the toolchain writes `<base>_output.txt` interpreter artifacts.
    pub interp_dir: PathBuf,
    /// Directory holding the toolchain's own source files.
    pub source_dir: PathBuf,
    /// Native compiler used to build the toolchain.
    pub compiler: PathBuf,
    /// Extra flags passed to the compiler ahead of `-o` and the sources.
    pub compiler_flags: Vec<String>,
    /// Translation units of the full toolchain, in the order the compiler
    /// should see them.
    pub toolchain_sources: Vec<String>,
    /// Path of the full toolchain executable.
    pub toolchain_exe: PathBuf,
    /// Translation units the reduced scanner build needs besides the
    /// synthesized driver.
    pub scanner_sources: Vec<String>,
    /// Where the synthesized scanner driver is written. Lives next to the
    /// toolchain sources so its `#include "scanner.h"` resolves.
    pub driver_source: PathBuf,
    /// Path of the reduced scanner executable.
    pub scanner_exe: PathBuf,
    /// Directory the scanner writes its token dumps into; created
    /// idempotently before scanner runs.
    pub tokens_dir: PathBuf,
    /// Inclusive numeric range swept for `input<N>.txt` candidates.
    pub sweep_range: RangeInclusive<u32>,
    /// Optional wall-clock limit per external-process invocation.
    pub timeout: Option<Duration>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("inputs"),
            asm_dir: PathBuf::from("outputs"),
            interp_dir: PathBuf::from("outputs_interprete"),
            source_dir: PathBuf::from("."),
            compiler: PathBuf::from("g++"),
            compiler_flags: Vec::new(),
            toolchain_sources: [
                "main.cpp",
                "scanner.cpp",
                "token.cpp",
                "parser.cpp",
                "ast.cpp",
                "visitor.cpp",
                "TypeChecker.cpp",
                "struct_registry.cpp",
            ]
            .map(String::from)
            .to_vec(),
            toolchain_exe: PathBuf::from("./a.out"),
            scanner_sources: ["scanner.cpp", "token.cpp"].map(String::from).to_vec(),
            driver_source: PathBuf::from("main_scanner.cpp"),
            scanner_exe: PathBuf::from("./scanner_test"),
            tokens_dir: PathBuf::from("tokens"),
            sweep_range: 1..=14,
            timeout: None,
        }
    }
}

impl HarnessConfig {
    /// Compile spec for the full toolchain executable.
    pub fn toolchain_spec(&self) -> CompileSpec {
        CompileSpec {
            compiler: self.compiler.clone(),
            flags: self.compiler_flags.clone(),
            sources: self
                .toolchain_sources
                .iter()
                .map(|s| self.source_dir.join(s))
                .collect(),
            output: self.toolchain_exe.clone(),
        }
    }

    /// Compile spec for the reduced scanner executable: the synthesized
    /// driver first, then the scanner subsystem sources.
    pub fn scanner_spec(&self) -> CompileSpec {
        let mut sources = vec![self.driver_source.clone()];
        sources.extend(self.scanner_sources.iter().map(|s| self.source_dir.join(s)));
        CompileSpec {
            compiler: self.compiler.clone(),
            flags: self.compiler_flags.clone(),
            sources,
            output: self.scanner_exe.clone(),
        }
    }
}
