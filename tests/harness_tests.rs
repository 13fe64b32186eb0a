//! End-to-end harness tests against a faked toolchain
//!
//! The external compiler and the built executable are replaced by scripted
//! `CommandExecutor` implementations; the filesystem side (input corpus,
//! artifact files, synthesized driver) is real, under `std::env::temp_dir()`.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crisol::{
    BatchRunner, BatchSummary, CommandExecutor, ExecOutput, FsExistence, HarnessConfig,
    HarnessError, Reporter, ScannerHarness, SystemExecutor, TestCase, base_name, build,
};

/// Executor that records calls and runs a per-call closure standing in for
/// the real toolchain (e.g. writing artifact files as a side effect).
struct FakeToolchain<F>
where
    F: Fn(&Path, &[String]) -> ExecOutput,
{
    calls: RefCell<Vec<(PathBuf, Vec<String>)>>,
    behavior: F,
}

impl<F> FakeToolchain<F>
where
    F: Fn(&Path, &[String]) -> ExecOutput,
{
    fn new(behavior: F) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            behavior,
        }
    }
}

impl<F> CommandExecutor for FakeToolchain<F>
where
    F: Fn(&Path, &[String]) -> ExecOutput,
{
    fn execute(
        &self,
        program: &Path,
        args: &[String],
        _timeout: Option<Duration>,
    ) -> Result<ExecOutput, HarnessError> {
        self.calls
            .borrow_mut()
            .push((program.to_path_buf(), args.to_vec()));
        Ok((self.behavior)(program, args))
    }
}

fn exit(code: i32) -> ExecOutput {
    ExecOutput {
        exit_code: Some(code),
        stdout: String::new(),
        stderr: String::new(),
        timed_out: false,
    }
}

/// Reporter that keeps the final summary for assertions.
#[derive(Default)]
struct SummaryReporter {
    summary: Option<BatchSummary>,
    order: Vec<String>,
}

impl Reporter for SummaryReporter {
    fn on_case_start(&mut self, case: &TestCase) {
        self.order.push(case.file_name.clone());
    }

    fn on_run_complete(&mut self, summary: &BatchSummary) {
        self.summary = Some(*summary);
    }
}

fn scratch(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("crisol_e2e_{tag}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn config_in(dir: &Path) -> HarnessConfig {
    HarnessConfig {
        input_dir: dir.join("inputs"),
        asm_dir: dir.join("outputs"),
        interp_dir: dir.join("outputs_interprete"),
        source_dir: dir.to_path_buf(),
        driver_source: dir.join("main_scanner.cpp"),
        scanner_exe: dir.join("scanner_test"),
        tokens_dir: dir.join("tokens"),
        toolchain_exe: dir.join("a.out"),
        ..Default::default()
    }
}

#[test]
fn full_run_reports_artifacts_the_toolchain_wrote() {
    let dir = scratch("artifacts");
    let config = config_in(&dir);
    fs::create_dir_all(&config.input_dir).unwrap();
    fs::write(config.input_dir.join("input5.txt"), "program text").unwrap();

    let asm_dir = config.asm_dir.clone();
    let interp_dir = config.interp_dir.clone();
    let toolchain = FakeToolchain::new(move |_program, args| {
        // The single argument is the case path; behave like the real
        // toolchain and drop both artifacts for it.
        let base = base_name(&args[0]);
        fs::write(asm_dir.join(format!("{base}.s")), ".text").unwrap();
        fs::write(interp_dir.join(format!("{base}_output.txt")), "42").unwrap();
        exit(0)
    });
    let checker = FsExistence;

    let runner = BatchRunner::new(&config, &toolchain, &checker);
    let mut reporter = SummaryReporter::default();
    let report = runner.run(&config.toolchain_exe, &mut reporter).unwrap();

    assert!(report.all_passed);
    let summary = reporter.summary.unwrap();
    assert_eq!((summary.total, summary.passed, summary.failed), (1, 1, 0));
    let artifacts = report.results[0].artifacts.unwrap();
    assert!(artifacts.assembly);
    assert!(artifacts.interpreter);
    assert!(dir.join("outputs/input_5.s").exists());
    assert!(dir.join("outputs_interprete/input_5_output.txt").exists());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn pass_through_names_probe_pass_through_paths() {
    let dir = scratch("passthrough");
    let config = config_in(&dir);
    fs::create_dir_all(&config.input_dir).unwrap();
    fs::write(config.input_dir.join("inputFoo.txt"), "").unwrap();

    let asm_dir = config.asm_dir.clone();
    let toolchain = FakeToolchain::new(move |_program, args| {
        let base = base_name(&args[0]);
        assert_eq!(base, "inputFoo");
        fs::write(asm_dir.join(format!("{base}.s")), "").unwrap();
        exit(0)
    });
    let checker = FsExistence;

    let runner = BatchRunner::new(&config, &toolchain, &checker);
    let mut reporter = SummaryReporter::default();
    let report = runner.run(&config.toolchain_exe, &mut reporter).unwrap();

    let artifacts = report.results[0].artifacts.unwrap();
    assert!(artifacts.assembly);
    assert!(!artifacts.interpreter);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn batch_order_is_lexicographic() {
    let dir = scratch("order");
    let config = config_in(&dir);
    fs::create_dir_all(&config.input_dir).unwrap();
    for name in ["input10.txt", "input2.txt", "input1.txt"] {
        fs::write(config.input_dir.join(name), "").unwrap();
    }

    let toolchain = FakeToolchain::new(|_, _| exit(0));
    let checker = FsExistence;
    let runner = BatchRunner::new(&config, &toolchain, &checker);
    let mut reporter = SummaryReporter::default();
    runner.run(&config.toolchain_exe, &mut reporter).unwrap();

    assert_eq!(reporter.order, ["input1.txt", "input10.txt", "input2.txt"]);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn failed_build_leaves_output_roots_untouched() {
    let dir = scratch("badbuild");
    let config = config_in(&dir);
    fs::create_dir_all(&config.input_dir).unwrap();
    fs::write(config.input_dir.join("input1.txt"), "").unwrap();

    let compiler = FakeToolchain::new(|_, _| ExecOutput {
        exit_code: Some(1),
        stdout: String::new(),
        stderr: "main.cpp:1: error: unknown type".to_string(),
        timed_out: false,
    });

    let err = build(&config.toolchain_spec(), &compiler, None).unwrap_err();
    match err {
        HarnessError::Build { diagnostics } => assert!(diagnostics.contains("unknown type")),
        other => panic!("expected Build error, got {other:?}"),
    }

    // The pipeline aborts here; neither output root may exist.
    assert!(!config.asm_dir.exists());
    assert!(!config.interp_dir.exists());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn sweep_skips_absent_candidates_and_cleans_up() {
    let dir = scratch("sweep");
    let config = config_in(&dir);
    fs::create_dir_all(&config.input_dir).unwrap();
    fs::write(config.input_dir.join("input1.txt"), "").unwrap();
    fs::write(config.input_dir.join("input3.txt"), "").unwrap();

    let toolchain = FakeToolchain::new(|_, _| exit(0));
    let checker = FsExistence;
    let harness = ScannerHarness::new(&config, &toolchain, &checker);

    assert!(harness.run_sweep().unwrap());

    // One build plus exactly the two existing candidates, ascending.
    let calls = toolchain.calls.borrow();
    assert_eq!(calls.len(), 3);
    assert!(calls[1].1[0].ends_with("input1.txt"));
    assert!(calls[2].1[0].ends_with("input3.txt"));
    drop(calls);

    // Synthesized driver and reduced executable are gone.
    assert!(!config.driver_source.exists());
    assert!(!config.scanner_exe.exists());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn system_executor_kills_overrunning_children() {
    let executor = SystemExecutor;
    let out = executor
        .execute(
            Path::new("sleep"),
            &["5".to_string()],
            Some(Duration::from_millis(100)),
        )
        .unwrap();

    assert!(out.timed_out);
    assert!(!out.success());
    // Killed, not exited: no exit code to report.
    assert_eq!(out.exit_code, None);
}

#[test]
fn system_executor_captures_both_streams() {
    let executor = SystemExecutor;
    let out = executor
        .execute(
            Path::new("sh"),
            &["-c".to_string(), "echo out; echo err >&2".to_string()],
            None,
        )
        .unwrap();

    assert!(out.success());
    assert!(!out.timed_out);
    assert_eq!(out.stdout.trim(), "out");
    assert_eq!(out.stderr.trim(), "err");
}

#[test]
fn scanner_cleanup_survives_a_failing_case() {
    let dir = scratch("scanfail");
    let config = config_in(&dir);
    fs::create_dir_all(&config.input_dir).unwrap();
    let input = config.input_dir.join("input2.txt");
    fs::write(&input, "").unwrap();

    let driver = config.driver_source.clone();
    let toolchain = FakeToolchain::new(move |program, _| {
        // The compiler call sees the synthesized driver on disk; the case
        // run then fails.
        if program.file_name().is_some_and(|n| n == "g++") {
            assert!(driver.exists());
            exit(0)
        } else {
            exit(7)
        }
    });
    let checker = FsExistence;
    let harness = ScannerHarness::new(&config, &toolchain, &checker);

    assert_eq!(harness.run_explicit(&input).unwrap(), 7);
    assert!(!config.driver_source.exists());
    assert!(!config.scanner_exe.exists());

    let _ = fs::remove_dir_all(&dir);
}
