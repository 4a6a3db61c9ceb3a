//! Application service — checks that must pass before the diagnostic runs.
//!
//! Resolves the app, confirms SSH access and settles the remote working
//! directory. Every remote call goes through the `RemoteExecutor` port.

use tracing::{debug, warn};

use crate::application::ports::{ProgressReporter, RemoteExecutor};
use crate::application::services::compose::{remote_fspath, ssh_args, ssh_with};
use crate::application::services::failure::transport_error;
use crate::domain::app_env::{DEFAULT_REMOTE_DIR, app_names, ssh_enabled, writable_volume};
use crate::domain::catalog::{OperationDescriptor, levenshtein};
use crate::domain::error::DiagnosticError;
use crate::domain::invocation::Invocation;
use crate::domain::shell::quote;

const CF_TRACE_MESSAGE: &str = "The environment variable CF_TRACE is set to true. This prevents download of the dump from succeeding";

const DIR_ACCESS_MARKER: &str = "exists and read-writeable";

/// Run all checks and return the remote working directory for `op`.
///
/// # Errors
///
/// Returns `PrerequisiteUnavailable` when the app cannot be reached over SSH
/// or the requested container directory is unusable, and `Transport` when a
/// query fails for another reason.
pub async fn check(
    executor: &impl RemoteExecutor,
    reporter: &impl ProgressReporter,
    inv: &Invocation,
    op: &OperationDescriptor,
    cf_trace: bool,
) -> Result<String, DiagnosticError> {
    if cf_trace {
        return Err(DiagnosticError::PrerequisiteUnavailable(
            CF_TRACE_MESSAGE.to_string(),
        ));
    }

    reporter.step(&format!("Checking access to {}...", inv.app_name));
    let guid = app_guid(executor, &inv.app_name).await?;
    ensure_ssh_enabled(executor, &inv.app_name, &guid).await?;

    if !op.uses_remote_dir() {
        return Ok(DEFAULT_REMOTE_DIR.to_string());
    }

    let base = match &inv.container_dir {
        Some(dir) => {
            ensure_dir_accessible(executor, inv, dir).await?;
            dir.clone()
        }
        None => discover_volume(executor, reporter, &guid).await,
    };
    let fspath = remote_fspath(op, &base);
    debug!(%fspath, "remote working directory");
    Ok(fspath)
}

async fn app_guid(executor: &impl RemoteExecutor, app: &str) -> Result<String, DiagnosticError> {
    let args = ["app".to_string(), app.to_string(), "--guid".to_string()];
    match executor.execute(&args).await {
        Ok(lines) => match lines.iter().map(|l| l.trim()).find(|l| !l.is_empty()) {
            Some(guid) => Ok(guid.to_string()),
            None => Err(access_error(executor, app).await),
        },
        Err(failure) => {
            debug!(error = %failure, "cf app --guid failed");
            Err(access_error(executor, app).await)
        }
    }
}

/// Work out why `cf app` failed, using the `cf apps` listing.
async fn access_error(executor: &impl RemoteExecutor, app: &str) -> DiagnosticError {
    let listing = executor.execute(&["apps".to_string()]).await;
    let reason = match listing.ok().as_deref().and_then(app_names) {
        None => "cf is not logged in, please login and try again".to_string(),
        Some(names) if names.is_empty() => {
            "No apps in your realm, please check if you're logged in and the app exists"
                .to_string()
        }
        Some(names) if names.iter().any(|n| n == app) => {
            format!("Problems accessing the app {app}")
        }
        Some(names) => match names.iter().min_by_key(|n| levenshtein(app, n)) {
            Some(closest) => format!("Could not find {app}. Did you mean {closest}?"),
            None => format!("Could not find {app}"),
        },
    };
    DiagnosticError::PrerequisiteUnavailable(reason)
}

async fn ensure_ssh_enabled(
    executor: &impl RemoteExecutor,
    app: &str,
    guid: &str,
) -> Result<(), DiagnosticError> {
    let args = ["curl".to_string(), format!("/v3/apps/{guid}/ssh_enabled")];
    let body = executor
        .execute(&args)
        .await
        .map_err(|f| transport_error("Checking SSH access failed", &f))?
        .join("\n");
    let (enabled, reason) = ssh_enabled(&body).map_err(|e| {
        DiagnosticError::Transport(format!("Unexpected response while checking SSH access: {e}"))
    })?;
    if enabled {
        return Ok(());
    }
    debug!(%reason, "ssh disabled");
    Err(DiagnosticError::PrerequisiteUnavailable(format!(
        "ssh is not enabled for app: '{app}', please run below 2 shell commands to enable ssh and try again \
         (please note application should be restarted before take effect):\n\
         cf enable-ssh {app}\ncf restart {app}"
    )))
}

async fn ensure_dir_accessible(
    executor: &impl RemoteExecutor,
    inv: &Invocation,
    dir: &str,
) -> Result<(), DiagnosticError> {
    let quoted = quote(dir);
    let probe = format!(
        "[[ -d {quoted} && -r {quoted} && -w {quoted} ]] && echo \"{DIR_ACCESS_MARKER}\""
    );
    let ssh = ssh_args(inv);
    match executor.execute(&ssh_with(&ssh, &probe)).await {
        Ok(lines) if lines.iter().any(|l| l.contains(DIR_ACCESS_MARKER)) => Ok(()),
        Err(failure) if failure.is_auth_failure() => {
            Err(transport_error("Checking the container directory failed", &failure))
        }
        _ => Err(DiagnosticError::PrerequisiteUnavailable(
            "the container path specified doesn't exist or have no read and write access, please check and try again later"
                .to_string(),
        )),
    }
}

/// First writable volume bound to the app, or the default directory.
async fn discover_volume(
    executor: &impl RemoteExecutor,
    reporter: &impl ProgressReporter,
    guid: &str,
) -> String {
    let args = ["curl".to_string(), format!("/v3/apps/{guid}/env")];
    let volume = match executor.execute(&args).await {
        Ok(lines) => writable_volume(&lines.join("\n")).unwrap_or_else(|e| {
            warn!(error = %e, "cannot parse app environment");
            None
        }),
        Err(failure) => {
            debug!(error = %failure, "cannot read app environment");
            reporter.warn(&format!(
                "Could not read the app environment, using {DEFAULT_REMOTE_DIR}"
            ));
            None
        }
    };
    volume.unwrap_or_else(|| DEFAULT_REMOTE_DIR.to_string())
}
