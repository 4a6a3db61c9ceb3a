//! Integration tests for argument handling, the catalog listing and dry runs.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// The binary with colors off and a config path that does not exist.
fn cf_java(home: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("cf-java"));
    cmd.env("NO_COLOR", "1")
        .env_remove("CF_TRACE")
        .env_remove("RUST_LOG")
        .env("CF_JAVA_CONFIG", home.path().join("config.yaml"));
    cmd
}

fn home() -> TempDir {
    TempDir::new().expect("tempdir")
}

// --- Help and version tests ---

#[test]
fn test_help_flag_shows_usage() {
    cf_java(&home())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("--app-instance-index"))
        .stdout(predicate::str::contains("Remote diagnostics"));
}

#[test]
fn test_version_flag_shows_version() {
    cf_java(&home())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cf-java"));
}

#[test]
fn test_no_args_shows_help_and_fails() {
    cf_java(&home())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage:"));
}

// --- Catalog listing ---

#[test]
fn test_list_prints_every_operation() {
    cf_java(&home())
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("heap-dump"))
        .stdout(predicate::str::contains("thread-dump"))
        .stdout(predicate::str::contains("jfr-start-gc-details"))
        .stdout(predicate::str::contains("asprof-status"));
}

#[test]
fn test_list_marks_recent_runtime_operations() {
    let marked = |name: &str| {
        predicate::str::is_match(format!(r"(?m)^\s*{name}\s.*\(recent runtime only\)$"))
            .expect("regex")
    };
    cf_java(&home())
        .arg("--list")
        .assert()
        .success()
        .stdout(marked("jfr-start-gc"))
        .stdout(marked("asprof-stop"))
        .stdout(marked("heap-dump").not());
}

// --- NO_COLOR handling ---

#[test]
fn test_no_color_env_accepts_any_value() {
    for value in ["1", "yes", "false", ""] {
        cf_java(&home())
            .env("NO_COLOR", value)
            .args(["heap-dump", "my_app", "--dry-run"])
            .assert()
            .success()
            .stdout(predicate::str::starts_with("cf ssh my_app"));
    }
}

// --- Usage errors ---

#[test]
fn test_unknown_operation_suggests_and_prints_help() {
    cf_java(&home())
        .args(["heap-dumb", "my_app"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Unrecognized command \"heap-dumb\", did you mean: heap-dump",
        ))
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_keep_is_rejected_for_thread_dump() {
    cf_java(&home())
        .args(["thread-dump", "my_app", "--keep"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "The flag \"keep\" is not supported for thread-dump",
        ));
}

#[test]
fn test_negative_instance_index_is_rejected() {
    cf_java(&home())
        .args(["thread-dump", "my_app", "-i", "-1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Invalid application instance index -1, must be >= 0",
        ));
}

#[test]
fn test_self_referencing_args_fail_validation() {
    cf_java(&home())
        .args(["jcmd", "my_app", "--dry-run", "--args", "VM.info @ARGS"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("@ARGS cannot contain itself"))
        .stdout(predicate::str::is_empty());
}

// --- Guards ---

#[test]
fn test_cf_trace_blocks_run() {
    cf_java(&home())
        .env("CF_TRACE", "true")
        .args(["thread-dump", "my_app"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("CF_TRACE is set to true"));
}

#[test]
fn test_unparsable_config_is_reported() {
    let home = home();
    std::fs::write(home.path().join("config.yaml"), "cf: [not, a, map").expect("write");
    cf_java(&home)
        .args(["thread-dump", "my_app", "--dry-run"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot parse"));
}

// --- Dry runs ---

#[test]
fn test_heap_dump_dry_run_prints_cf_ssh_command() {
    cf_java(&home())
        .args(["heap-dump", "my_app", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("cf ssh my_app --command '"))
        .stdout(predicate::str::contains("-dump:format=b,file=/tmp/my_app-heapdump-"))
        .stdout(predicate::str::contains("JVMMON_COMMAND"));
}

#[test]
fn test_dry_run_includes_instance_and_container_dir() {
    cf_java(&home())
        .args([
            "jcmd",
            "my_app",
            "-n",
            "-i",
            "1",
            "-c",
            "/data",
            "-a",
            "GC.heap_dump @FSPATH/heap.hprof",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "cf ssh my_app --app-instance-index 1 --command 'mkdir -p '/data/jcmd';",
        ))
        .stdout(predicate::str::contains("GC.heap_dump /data/jcmd/heap.hprof"));
}

#[test]
fn test_dry_run_with_config_uses_defaults_for_missing_keys() {
    let home = home();
    std::fs::write(home.path().join("config.yaml"), "output:\n  color: false\n")
        .expect("write");
    cf_java(&home)
        .args(["vm-version", "my_app", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("VM.version"));
}
