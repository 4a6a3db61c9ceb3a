//! Application service — builds the remote command for one invocation.
//!
//! Pure: no port calls. The composed command is
//! `[mkdir -p <fspath>;] <java detection>; <tool probes>; [cd <fspath>;] <template>`.

use crate::domain::catalog::{ArtifactMode, OperationDescriptor};
use crate::domain::error::DiagnosticError;
use crate::domain::invocation::Invocation;
use crate::domain::shell::quote;
use crate::domain::substitution::{Bindings, substitute};
use crate::domain::template::Placeholder;
use crate::domain::token::artifact_file_name;
use crate::domain::tools::{JAVA_DETECTION, resolve_probe};

/// Everything needed to run, print, or follow up on the composed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPlan {
    /// `ssh <app> [--app-instance-index N]`.
    pub ssh_args: Vec<String>,
    pub fspath: String,
    /// Tokenized remote file name, for file-naming operations.
    pub file_name: Option<String>,
    pub remote_command: String,
}

impl CommandPlan {
    /// Arguments for the remote executor.
    #[must_use]
    pub fn command_args(&self) -> Vec<String> {
        ssh_with(&self.ssh_args, &self.remote_command)
    }

    /// The command line a user could paste to run the same thing by hand.
    #[must_use]
    pub fn dry_run_line(&self) -> String {
        format!(
            "cf {} --command '{}'",
            self.ssh_args.join(" "),
            self.remote_command
        )
    }
}

/// `ssh <app> [--app-instance-index N]`; the index is only passed when non-zero.
#[must_use]
pub fn ssh_args(inv: &Invocation) -> Vec<String> {
    let mut args = vec!["ssh".to_string(), inv.app_name.clone()];
    if inv.instance_index > 0 {
        args.push("--app-instance-index".to_string());
        args.push(inv.instance_index.to_string());
    }
    args
}

/// Append `--command <remote>` to a set of ssh arguments.
#[must_use]
pub fn ssh_with(ssh_args: &[String], remote: &str) -> Vec<String> {
    let mut args = ssh_args.to_vec();
    args.push("--command".to_string());
    args.push(remote.to_string());
    args
}

/// Working directory for `op` below the base directory.
#[must_use]
pub fn remote_fspath(op: &OperationDescriptor, base: &str) -> String {
    match op.artifact {
        ArtifactMode::ArbitraryFiles { folder } => format!("{base}/{folder}"),
        ArtifactMode::None | ArtifactMode::SingleFile => base.to_string(),
    }
}

/// Values the CLI user controls directly, checked before anything touches
/// the network.
///
/// # Errors
///
/// Returns `Validation` if any of them breaks the placeholder rules.
pub fn preflight(inv: &Invocation) -> Result<(), DiagnosticError> {
    let mut bindings = Bindings::new()
        .with(Placeholder::AppName, inv.app_name.as_str())
        .with(Placeholder::Args, inv.args_or_empty());
    if let Some(dir) = &inv.container_dir {
        bindings.insert(Placeholder::FsPath, dir.as_str());
    }
    bindings.validate()?;
    Ok(())
}

/// Compose the remote command for `op`.
///
/// # Errors
///
/// Returns `Validation` if the bindings violate the placeholder rules.
pub fn compose(
    inv: &Invocation,
    op: &OperationDescriptor,
    fspath: &str,
    token: &str,
) -> Result<CommandPlan, DiagnosticError> {
    let mut bindings = Bindings::new()
        .with(Placeholder::AppName, inv.app_name.as_str())
        .with(Placeholder::FsPath, fspath)
        .with(Placeholder::Args, inv.args_or_empty());

    let file_name = if op.uses_file_name() {
        let tokenized = artifact_file_name(
            fspath,
            &inv.app_name,
            op.file_name_part,
            Some(token),
            op.file_extension,
        );
        let fixed = artifact_file_name(
            fspath,
            &inv.app_name,
            op.file_name_part,
            None,
            op.file_extension,
        );
        bindings.insert(Placeholder::FileName, tokenized.as_str());
        bindings.insert(Placeholder::StaticFileName, fixed);
        Some(tokenized)
    } else {
        None
    };

    let body = substitute(&op.template, &bindings)?;

    let mut parts = Vec::with_capacity(op.required_tools.len() + 4);
    if op.produces_arbitrary_files() {
        parts.push(format!("mkdir -p {}", quote(fspath)));
    }
    parts.push(JAVA_DETECTION.to_string());
    parts.extend(op.required_tools.iter().map(|tool| resolve_probe(tool)));
    if op.produces_arbitrary_files() {
        parts.push(format!("cd {}", quote(fspath)));
    }
    parts.push(body);

    Ok(CommandPlan {
        ssh_args: ssh_args(inv),
        fspath: fspath.to_string(),
        file_name,
        remote_command: parts.join("; "),
    })
}
