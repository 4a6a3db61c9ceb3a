//! Application service — copy artifacts to the local machine and remove
//! them from the container.
//!
//! Remote state is only removed after every transfer it covers succeeded.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::application::ports::{LocalFs, RemoteExecutor};
use crate::application::services::compose::ssh_with;
use crate::application::services::failure::transport_error;
use crate::domain::artifact::RemoteArtifact;
use crate::domain::error::DiagnosticError;
use crate::domain::shell::quote;

/// Stream `remote` into a new local file at `local`.
///
/// # Errors
///
/// Returns `LocalIo` if the local file cannot be created or written, and
/// `Transport` if reading the remote file fails.
pub async fn transfer(
    executor: &impl RemoteExecutor,
    fs: &impl LocalFs,
    ssh_args: &[String],
    remote: &str,
    local: &Path,
) -> Result<RemoteArtifact, DiagnosticError> {
    let mut file = fs.create(local).await.map_err(|e| {
        debug!(error = %e, path = %local.display(), "cannot create local file");
        DiagnosticError::LocalIo(format!(
            "Error creating local file at {}. Please check that you are allowed to create files at the given local path.",
            local.display()
        ))
    })?;

    let command = format!("cat {}", quote(remote));
    let bytes = executor
        .stream_to(&ssh_with(ssh_args, &command), &mut file)
        .await
        .map_err(|f| transport_error(&format!("Downloading {remote} failed"), &f))?;
    file.flush().await.map_err(|e| {
        DiagnosticError::LocalIo(format!("Error writing local file at {}: {e}", local.display()))
    })?;

    info!(%remote, local = %local.display(), bytes, "artifact transferred");
    Ok(RemoteArtifact {
        remote_path: remote.to_string(),
        local_path: Some(local.to_path_buf()),
    })
}

/// Remove a remote file or directory.
///
/// # Errors
///
/// Returns `Transport` if the removal command fails.
pub async fn cleanup(
    executor: &impl RemoteExecutor,
    ssh_args: &[String],
    remote: &str,
) -> Result<(), DiagnosticError> {
    let command = format!("rm -fr {}", quote(remote));
    executor
        .execute(&ssh_with(ssh_args, &command))
        .await
        .map_err(|f| transport_error(&format!("Deleting {remote} failed"), &f))?;
    debug!(%remote, "remote path removed");
    Ok(())
}

/// Download every entry of `remote_dir` into `local_dir`, then remove the
/// directory unless `retain` is set.
///
/// Transfers are sequential. The first failure aborts the run and leaves
/// the remote directory untouched.
///
/// # Errors
///
/// Returns the first transfer or listing error.
pub async fn transfer_all(
    executor: &impl RemoteExecutor,
    fs: &impl LocalFs,
    ssh_args: &[String],
    remote_dir: &str,
    local_dir: &Path,
    retain: bool,
) -> Result<Vec<RemoteArtifact>, DiagnosticError> {
    let listing = format!("ls {}", quote(remote_dir));
    let entries: Vec<String> = executor
        .execute(&ssh_with(ssh_args, &listing))
        .await
        .map_err(|f| transport_error(&format!("Listing {remote_dir} failed"), &f))?
        .into_iter()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();

    let mut transferred = Vec::with_capacity(entries.len());
    for entry in &entries {
        let remote = format!("{remote_dir}/{entry}");
        let local: PathBuf = local_dir.join(entry);
        transferred.push(transfer(executor, fs, ssh_args, &remote, &local).await?);
    }

    if !retain {
        cleanup(executor, ssh_args, remote_dir).await?;
    }
    Ok(transferred)
}
