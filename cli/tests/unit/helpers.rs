//! Shared test helpers: exit statuses, process outputs and canned `cf` responses.

#![allow(dead_code)]

use std::process::{ExitStatus, Output};

// ── Cross-platform ExitStatus construction ───────────────────────────────────

/// Build an `ExitStatus` from a logical exit code (0 = success, non-zero = failure).
///
/// On Unix the raw wait-status encodes the exit code in bits 8–15, so we shift.
/// On Windows `ExitStatusExt::from_raw` takes the exit code directly.
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

// ── Output constructors ──────────────────────────────────────────────────────

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

// ── Canned cf responses ──────────────────────────────────────────────────────

pub const GUID: &str = "6c1a3a6e-5c1e-4a55-9f7a-0c2b3d4e5f60";

pub fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

pub fn guid_response() -> Vec<String> {
    lines(&[GUID])
}

pub fn ssh_enabled_response() -> Vec<String> {
    lines(&[r#"{"enabled": true, "reason": ""}"#])
}

pub fn ssh_disabled_response() -> Vec<String> {
    lines(&[r#"{"enabled": false, "reason": "Disabled for this app"}"#])
}

/// `cf curl /v3/apps/<guid>/env` for an app without volume services.
pub fn empty_env_response() -> Vec<String> {
    lines(&["{}"])
}

/// `cf curl /v3/apps/<guid>/env` for an app with one writable volume.
pub fn volume_env_response(container_dir: &str) -> Vec<String> {
    vec![format!(
        r#"{{"system_env_json":{{"VCAP_SERVICES":{{"fs-storage":[{{"volume_mounts":[{{"container_dir":"{container_dir}","mode":"rw"}}]}}]}}}}}}"#
    )]
}

pub fn args(items: &[&str]) -> Vec<String> {
    lines(items)
}
