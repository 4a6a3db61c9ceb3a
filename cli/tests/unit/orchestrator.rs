//! End-to-end runs of the orchestrator against scripted `cf` responses.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use cf_java::application::Orchestrator;
use cf_java::application::services::compose;
use cf_java::domain::catalog::CATALOG;
use cf_java::domain::error::{DiagnosticError, ErrorKind};
use cf_java::domain::invocation::Invocation;

use crate::helpers::{
    GUID, args, empty_env_response, guid_response, lines, ssh_disabled_response,
    ssh_enabled_response,
};
use crate::mocks::{MemoryFs, RecordingReporter, ScriptedExecutor, SequentialTokens};

async fn run(
    executor: &ScriptedExecutor,
    fs: &MemoryFs,
    inv: &Invocation,
) -> Result<String, DiagnosticError> {
    let tokens = SequentialTokens::default();
    let reporter = RecordingReporter::default();
    Orchestrator::new(executor, fs, &tokens, &reporter)
        .run(inv)
        .await
}

/// Prerequisite responses for an app without volume services.
fn reachable_app() -> ScriptedExecutor {
    ScriptedExecutor::new()
        .ok(guid_response())
        .ok(ssh_enabled_response())
        .ok(empty_env_response())
}

// ── Heap dump ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_heap_dump_reports_create_save_delete_in_order() {
    let executor = reachable_app()
        .ok(Vec::new())
        .ok(lines(&["/tmp/my_app-heapdump-tok0.hprof"]))
        .stream(b"JAVA PROFILE 1.0.2")
        .ok(Vec::new());
    let fs = MemoryFs::default();

    let out = run(&executor, &fs, &Invocation::new("heap-dump", "my_app"))
        .await
        .unwrap();

    assert_eq!(
        out,
        "Successfully created heap dump in application container at: /tmp/my_app-heapdump-tok0.hprof\n\
         Heap dump file saved to: ./my_app-heapdump-tok1.hprof\n\
         Heap dump file deleted in application container"
    );
    assert_eq!(
        fs.created.borrow().as_slice(),
        [std::path::PathBuf::from("./my_app-heapdump-tok1.hprof")]
    );
}

#[tokio::test]
async fn test_download_closes_the_progress_step() {
    let executor = reachable_app()
        .ok(Vec::new())
        .ok(lines(&["/tmp/my_app-heapdump-tok0.hprof"]))
        .stream(b"JAVA PROFILE 1.0.2")
        .ok(Vec::new());
    let tokens = SequentialTokens::default();
    let reporter = RecordingReporter::default();

    Orchestrator::new(&executor, &MemoryFs::default(), &tokens, &reporter)
        .run(&Invocation::new("heap-dump", "my_app"))
        .await
        .unwrap();

    assert_eq!(
        reporter.steps.borrow().last().map(String::as_str),
        Some("Downloading heap dump...")
    );
    assert_eq!(reporter.successes.borrow().as_slice(), ["Heap dump downloaded"]);
}

#[tokio::test]
async fn test_no_download_reports_no_success() {
    let executor = reachable_app()
        .ok(Vec::new())
        .ok(lines(&["/tmp/my_app-heapdump-tok0.hprof"]));
    let tokens = SequentialTokens::default();
    let reporter = RecordingReporter::default();
    let inv = Invocation {
        no_download: true,
        ..Invocation::new("heap-dump", "my_app")
    };

    Orchestrator::new(&executor, &MemoryFs::default(), &tokens, &reporter)
        .run(&inv)
        .await
        .unwrap();

    assert!(reporter.successes.borrow().is_empty());
}

#[tokio::test]
async fn test_heap_dump_command_prefers_jmap_over_jvmmon() {
    let executor = reachable_app()
        .ok(Vec::new())
        .ok(lines(&["/tmp/my_app-heapdump-tok0.hprof"]))
        .stream(b"x")
        .ok(Vec::new());
    run(&executor, &MemoryFs::default(), &Invocation::new("heap-dump", "my_app"))
        .await
        .unwrap();

    let remote = executor.remote_commands();
    let dump = &remote[0];
    let jmap = dump.find("if [ -n \"${JMAP_COMMAND}\" ]").unwrap();
    let jvmmon = dump.find("elif [ -n \"${JVMMON_COMMAND}\" ]").unwrap();
    assert!(jmap < jvmmon);
    assert!(dump.contains("file=/tmp/my_app-heapdump-tok0.hprof"));
    assert!(remote[1].starts_with("FOUND=$("), "locate waits for a stable size");
    assert_eq!(remote[2], "cat '/tmp/my_app-heapdump-tok0.hprof'");
    assert_eq!(remote[3], "rm -fr '/tmp/my_app-heapdump-tok0.hprof'");
}

#[tokio::test]
async fn test_heap_dump_with_keep_skips_deletion() {
    let executor = reachable_app()
        .ok(Vec::new())
        .ok(lines(&["/tmp/my_app-heapdump-tok0.hprof"]))
        .stream(b"x");
    let inv = Invocation {
        keep: true,
        ..Invocation::new("heap-dump", "my_app")
    };

    let out = run(&executor, &MemoryFs::default(), &inv).await.unwrap();

    assert_eq!(out.lines().count(), 2);
    assert!(out.starts_with("Successfully created heap dump"));
    assert!(!out.contains("deleted"));
    assert!(!executor.remote_commands().iter().any(|c| c.starts_with("rm ")));
}

#[tokio::test]
async fn test_heap_dump_without_download_leaves_file_in_place() {
    let executor = reachable_app()
        .ok(Vec::new())
        .ok(lines(&["/tmp/my_app-heapdump-tok0.hprof"]));
    let inv = Invocation {
        no_download: true,
        ..Invocation::new("heap-dump", "my_app")
    };

    let out = run(&executor, &MemoryFs::default(), &inv).await.unwrap();

    assert_eq!(
        out,
        "Successfully created heap dump in application container at: /tmp/my_app-heapdump-tok0.hprof\n\
         No download requested, skipping file download"
    );
    assert_eq!(executor.call_count(), 5);
}

#[tokio::test]
async fn test_heap_dump_missing_artifact_is_fatal() {
    let executor = reachable_app().ok(lines(&["dumped"])).ok(Vec::new());

    let err = run(&executor, &MemoryFs::default(), &Invocation::new("heap-dump", "my_app"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ArtifactNotFound);
    assert_eq!(
        err.to_string(),
        "Failed to find heap dump in application container\nOutput: dumped"
    );
}

#[tokio::test]
async fn test_heap_dump_uses_writable_volume() {
    let executor = ScriptedExecutor::new()
        .ok(guid_response())
        .ok(ssh_enabled_response())
        .ok(crate::helpers::volume_env_response("/var/vcap/data/abc"))
        .ok(Vec::new())
        .ok(lines(&["/var/vcap/data/abc/my_app-heapdump-tok0.hprof"]))
        .stream(b"x")
        .ok(Vec::new());

    let out = run(&executor, &MemoryFs::default(), &Invocation::new("heap-dump", "my_app"))
        .await
        .unwrap();

    assert!(out.contains("at: /var/vcap/data/abc/my_app-heapdump-tok0.hprof"));
    assert_eq!(
        executor.calls()[2],
        args(&["curl", &format!("/v3/apps/{GUID}/env")])
    );
}

// ── Usage and validation failures ────────────────────────────────────────────

#[tokio::test]
async fn test_thread_dump_with_keep_is_rejected_before_any_call() {
    let executor = ScriptedExecutor::new();
    let inv = Invocation {
        keep: true,
        ..Invocation::new("thread-dump", "my_app")
    };

    let err = run(&executor, &MemoryFs::default(), &inv).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidUsage);
    assert!(err.wants_help());
    assert_eq!(
        err.to_string(),
        "The flag \"keep\" is not supported for thread-dump"
    );
    assert_eq!(executor.call_count(), 0);
}

#[tokio::test]
async fn test_args_referencing_args_fail_validation_before_any_call() {
    let executor = ScriptedExecutor::new();
    let inv = Invocation {
        args: Some("Thread.print @ARGS".to_string()),
        ..Invocation::new("jcmd", "my_app")
    };

    let err = run(&executor, &MemoryFs::default(), &inv).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ValidationFailure);
    assert_eq!(executor.call_count(), 0);
}

#[tokio::test]
async fn test_unknown_operation_suggests_close_names() {
    let executor = ScriptedExecutor::new();

    let err = run(&executor, &MemoryFs::default(), &Invocation::new("heap-dumb", "my_app"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidUsage);
    let message = err.to_string();
    assert!(message.starts_with("Unrecognized command \"heap-dumb\", did you mean: heap-dump"));
    assert_eq!(executor.call_count(), 0);
}

#[tokio::test]
async fn test_cf_trace_refuses_to_start() {
    let executor = ScriptedExecutor::new();
    let tokens = SequentialTokens::default();
    let reporter = RecordingReporter::default();

    let err = Orchestrator::new(&executor, &MemoryFs::default(), &tokens, &reporter)
        .with_cf_trace(true)
        .run(&Invocation::new("thread-dump", "my_app"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PrerequisiteUnavailable);
    assert!(err.to_string().contains("CF_TRACE"));
    assert_eq!(executor.call_count(), 0);
}

// ── Dry run ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_dry_run_prints_cf_ssh_line_without_calls() {
    let executor = ScriptedExecutor::new();
    let inv = Invocation {
        dry_run: true,
        ..Invocation::new("heap-dump", "my_app")
    };

    let out = run(&executor, &MemoryFs::default(), &inv).await.unwrap();

    let op = CATALOG.lookup("heap-dump").unwrap();
    let plan = compose::compose(&inv, op, "/tmp", "tok0").unwrap();
    assert_eq!(
        out,
        format!("cf ssh my_app --command '{}'", plan.remote_command)
    );
    assert_eq!(executor.call_count(), 0);
}

#[tokio::test]
async fn test_dry_run_honours_container_dir_and_instance() {
    let executor = ScriptedExecutor::new();
    let inv = Invocation {
        dry_run: true,
        instance_index: 2,
        container_dir: Some("/data".to_string()),
        args: Some("GC.class_histogram".to_string()),
        ..Invocation::new("jcmd", "my_app")
    };

    let out = run(&executor, &MemoryFs::default(), &inv).await.unwrap();

    assert!(out.starts_with("cf ssh my_app --app-instance-index 2 --command 'mkdir -p '/data/jcmd';"));
    assert!(out.contains("GC.class_histogram"));
    assert_eq!(executor.call_count(), 0);
}

// ── Prerequisites ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_ssh_disabled_explains_how_to_enable() {
    let executor = ScriptedExecutor::new()
        .ok(guid_response())
        .ok(ssh_disabled_response());

    let err = run(&executor, &MemoryFs::default(), &Invocation::new("thread-dump", "my_app"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PrerequisiteUnavailable);
    assert!(err.to_string().contains("cf enable-ssh my_app\ncf restart my_app"));
}

// ── Non-artifact operations ──────────────────────────────────────────────────

#[tokio::test]
async fn test_thread_dump_returns_remote_output() {
    let executor = ScriptedExecutor::new()
        .ok(guid_response())
        .ok(ssh_enabled_response())
        .ok(lines(&["Full thread dump OpenJDK", "\"main\" #1"]));

    let out = run(&executor, &MemoryFs::default(), &Invocation::new("thread-dump", "my_app"))
        .await
        .unwrap();

    assert_eq!(out, "Full thread dump OpenJDK\n\"main\" #1");
    assert_eq!(executor.call_count(), 3);
}

#[tokio::test]
async fn test_auth_failure_during_command_asks_for_login() {
    let executor = ScriptedExecutor::new()
        .ok(guid_response())
        .ok(ssh_enabled_response())
        .fail(
            "exit status 1",
            lines(&["Error getting one time auth code: token expired"]),
        );

    let err = run(&executor, &MemoryFs::default(), &Invocation::new("vm-info", "my_app"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TransportFailure);
    assert!(err.to_string().contains("cf login"));
}

#[tokio::test]
async fn test_remote_failure_carries_output() {
    let executor = ScriptedExecutor::new()
        .ok(guid_response())
        .ok(ssh_enabled_response())
        .fail("exit status 1", lines(&["jcmd not found"]));

    let err = run(&executor, &MemoryFs::default(), &Invocation::new("vm-info", "my_app"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RemoteCommandFailed);
    assert!(err.to_string().ends_with("Output: jcmd not found"));
}

// ── Arbitrary files ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_jcmd_downloads_folder_then_deletes_it() {
    let executor = reachable_app()
        .ok(lines(&["Heap dump file created"]))
        .ok(lines(&["dump.hprof", "notes.txt"]))
        .stream(b"a")
        .stream(b"b")
        .ok(Vec::new());
    let inv = Invocation {
        args: Some("GC.heap_dump @FSPATH/dump.hprof".to_string()),
        ..Invocation::new("jcmd", "my_app")
    };

    let out = run(&executor, &MemoryFs::default(), &inv).await.unwrap();

    assert_eq!(
        out,
        "Heap dump file created\n\
         File /tmp/jcmd/dump.hprof saved to: ./dump.hprof\n\
         File /tmp/jcmd/notes.txt saved to: ./notes.txt\n\
         File folder deleted in application container"
    );
    let remote = executor.remote_commands();
    assert!(remote[0].contains("GC.heap_dump /tmp/jcmd/dump.hprof"));
    assert_eq!(remote[1], "ls '/tmp/jcmd'");
    assert_eq!(remote.last().unwrap(), "rm -fr '/tmp/jcmd'");
}

#[tokio::test]
async fn test_jcmd_failed_transfer_keeps_remote_folder() {
    let executor = reachable_app()
        .ok(Vec::new())
        .ok(lines(&["a.txt", "b.txt"]))
        .stream(b"a")
        .stream_fail("unexpected EOF");
    let inv = Invocation {
        args: Some("Thread.print".to_string()),
        ..Invocation::new("jcmd", "my_app")
    };

    let err = run(&executor, &MemoryFs::default(), &inv).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TransportFailure);
    assert!(!executor.remote_commands().iter().any(|c| c.starts_with("rm ")));
}

#[tokio::test]
async fn test_asprof_start_never_downloads() {
    let executor = reachable_app().ok(lines(&["Profiling started"]));
    let inv = Invocation {
        args: Some("start -e cpu".to_string()),
        ..Invocation::new("asprof", "my_app")
    };

    let out = run(&executor, &MemoryFs::default(), &inv).await.unwrap();

    assert_eq!(
        out,
        "Profiling started\nNo download requested, skipping file download"
    );
    assert_eq!(executor.call_count(), 4);
}
