#![forbid(unsafe_code)]
//! Build-and-verify harness for an external compiler/interpreter toolchain.
//!
//! The toolchain under test is an opaque collaborator invoked by path and
//! argument; its observable contract is "exit code 0/nonzero, optional
//! artifact files on disk, stdout/stderr text". This crate orchestrates:
//!
//! - the build step ([`builder`]),
//! - the naming bridge between inputs and expected outputs ([`naming`]),
//! - artifact presence checks ([`probe`]),
//! - the batch run-and-report loop ([`batch`]),
//! - the isolated scanner harness with guaranteed cleanup ([`scanner`]).
//!
//! Execution is strictly sequential: one compile, then one case at a time,
//! each external invocation synchronous and blocking. Process invocation and
//! filesystem existence checks go through the traits in [`interfaces`], so
//! every step is testable without a real compiler.
//!
//! ## Panic Policy
//!
//! Production code uses `Result` with `?`; `.unwrap()` and `.expect()` are
//! acceptable in tests only. The `cli` module enforces this with
//! `#![deny(clippy::unwrap_used)]`.

pub mod batch;
pub mod builder;
pub mod cli;
pub mod config;
pub mod interfaces;
pub mod naming;
pub mod probe;
pub mod scanner;

pub use batch::{BatchReport, BatchRunner, BatchSummary, ConsoleReporter, Reporter, RunResult, TestCase};
pub use builder::{CompileSpec, build};
pub use config::HarnessConfig;
pub use interfaces::{
    CommandExecutor, ExecOutput, ExistenceChecker, FsExistence, HarnessError, SystemExecutor,
};
pub use naming::base_name;
pub use probe::{ArtifactPresence, ArtifactProbe};
pub use scanner::ScannerHarness;
