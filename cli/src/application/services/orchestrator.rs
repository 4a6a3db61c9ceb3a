//! Application service — runs one diagnostic invocation end to end.
//!
//! Stages run strictly in order:
//! `Resolving → ToolChecking → Composing → Executing → LocatingArtifact →
//! Transferring → CleaningUp → Done`. Dry runs stop after `Composing` and
//! never touch the executor.

use std::fmt;

use tracing::{debug, info};

use crate::application::ports::{LocalFs, ProgressReporter, RemoteExecutor, TokenGenerator};
use crate::application::services::compose::{self, CommandPlan};
use crate::application::services::failure::command_error;
use crate::application::services::{locate, prerequisites, transfer};
use crate::domain::app_env::DEFAULT_REMOTE_DIR;
use crate::domain::artifact::{ExactThenNewest, LocateOutcome};
use crate::domain::catalog::{ArtifactMode, CATALOG, OperationDescriptor, join_with_or};
use crate::domain::error::DiagnosticError;
use crate::domain::invocation::Invocation;

const SKIP_DOWNLOAD: &str = "No download requested, skipping file download";

/// Progress through one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Resolving,
    ToolChecking,
    Composing,
    Executing,
    LocatingArtifact,
    Transferring,
    CleaningUp,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Resolving => "resolving",
            Self::ToolChecking => "tool-checking",
            Self::Composing => "composing",
            Self::Executing => "executing",
            Self::LocatingArtifact => "locating-artifact",
            Self::Transferring => "transferring",
            Self::CleaningUp => "cleaning-up",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Drives one invocation through its stages. Consumed by [`Orchestrator::run`].
pub struct Orchestrator<'a, E, F, T, P> {
    executor: &'a E,
    fs: &'a F,
    tokens: &'a T,
    reporter: &'a P,
    cf_trace: bool,
    stage: Stage,
}

impl<'a, E, F, T, P> Orchestrator<'a, E, F, T, P>
where
    E: RemoteExecutor,
    F: LocalFs,
    T: TokenGenerator,
    P: ProgressReporter,
{
    pub fn new(executor: &'a E, fs: &'a F, tokens: &'a T, reporter: &'a P) -> Self {
        Self {
            executor,
            fs,
            tokens,
            reporter,
            cf_trace: false,
            stage: Stage::Resolving,
        }
    }

    /// Whether `CF_TRACE=true` is set; it corrupts downloads, so runs refuse to start.
    #[must_use]
    pub fn with_cf_trace(mut self, cf_trace: bool) -> Self {
        self.cf_trace = cf_trace;
        self
    }

    fn enter(&mut self, stage: Stage) {
        debug!(from = %self.stage, to = %stage, "stage transition");
        self.stage = stage;
    }

    /// Run `inv` and return the text to show the user.
    ///
    /// # Errors
    ///
    /// Returns the first failure; see [`DiagnosticError`] for the categories.
    pub async fn run(mut self, inv: &Invocation) -> Result<String, DiagnosticError> {
        self.enter(Stage::Resolving);
        let op = resolve(inv)?;

        let fspath = if inv.dry_run {
            dry_run_fspath(op, inv)
        } else {
            self.enter(Stage::ToolChecking);
            prerequisites::check(self.executor, self.reporter, inv, op, self.cf_trace).await?
        };

        self.enter(Stage::Composing);
        let token = self.tokens.generate();
        let plan = compose::compose(inv, op, &fspath, &token)?;
        debug!(command = %plan.remote_command, "composed remote command");

        if inv.dry_run {
            self.enter(Stage::Done);
            return Ok(plan.dry_run_line());
        }

        self.enter(Stage::Executing);
        self.reporter
            .step(&format!("Running {} on {}...", op.name, inv.app_name));
        let output = self
            .executor
            .execute(&plan.command_args())
            .await
            .map_err(command_error)?;
        info!(operation = op.name, app = %inv.app_name, lines = output.len(), "remote command finished");

        let text = match op.artifact {
            ArtifactMode::None => output.join("\n"),
            ArtifactMode::SingleFile => self.collect_single(inv, op, &plan, output).await?,
            ArtifactMode::ArbitraryFiles { .. } => {
                self.collect_folder(inv, op, &plan, output).await?
            }
        };

        self.enter(Stage::Done);
        Ok(text)
    }

    async fn collect_single(
        &mut self,
        inv: &Invocation,
        op: &OperationDescriptor,
        plan: &CommandPlan,
        output: Vec<String>,
    ) -> Result<String, DiagnosticError> {
        self.enter(Stage::LocatingArtifact);
        self.reporter.step(&format!("Locating {}...", op.file_label));
        let strategy = ExactThenNewest {
            expected: plan.file_name.clone().unwrap_or_default(),
            search_dir: plan.fspath.clone(),
            pattern: op.search_pattern.to_string(),
            await_stable: op.async_write,
        };
        let artifact = match locate::locate(self.executor, &plan.ssh_args, &strategy).await? {
            LocateOutcome::Found(artifact) => artifact,
            LocateOutcome::NotFound => {
                return Err(DiagnosticError::ArtifactNotFound {
                    label: op.file_label.to_string(),
                    output,
                });
            }
        };

        let mut lines = vec![format!(
            "Successfully created {} in application container at: {}",
            op.file_label, artifact.remote_path
        )];

        if inv.skips_download(op) {
            lines.push(SKIP_DOWNLOAD.to_string());
            return Ok(lines.join("\n"));
        }

        self.enter(Stage::Transferring);
        self.reporter.step(&format!("Downloading {}...", op.file_label));
        let local = inv.local_dir.join(format!(
            "{}-{}-{}{}",
            inv.app_name,
            op.file_name_part,
            self.tokens.generate(),
            op.file_extension
        ));
        let saved = transfer::transfer(
            self.executor,
            self.fs,
            &plan.ssh_args,
            &artifact.remote_path,
            &local,
        )
        .await?;
        let label = op.file_label_sentence();
        self.reporter.success(&format!("{label} downloaded"));
        lines.push(format!(
            "{label} file saved to: {}",
            saved.local_path.as_deref().unwrap_or(local.as_path()).display()
        ));

        if !inv.retains_remote() {
            self.enter(Stage::CleaningUp);
            transfer::cleanup(self.executor, &plan.ssh_args, &artifact.remote_path).await?;
            lines.push(format!("{label} file deleted in application container"));
        }
        Ok(lines.join("\n"))
    }

    async fn collect_folder(
        &mut self,
        inv: &Invocation,
        op: &OperationDescriptor,
        plan: &CommandPlan,
        output: Vec<String>,
    ) -> Result<String, DiagnosticError> {
        let mut lines = output;
        if inv.skips_download(op) {
            lines.push(SKIP_DOWNLOAD.to_string());
            return Ok(lines.join("\n"));
        }

        // transfer_all removes the folder itself, after the last download.
        self.enter(Stage::Transferring);
        self.reporter.step("Downloading files...");
        let retain = inv.retains_remote();
        let saved = transfer::transfer_all(
            self.executor,
            self.fs,
            &plan.ssh_args,
            &plan.fspath,
            &inv.local_dir,
            retain,
        )
        .await?;
        self.reporter.success(&format!("Downloaded {} file(s)", saved.len()));
        for artifact in &saved {
            if let Some(local) = &artifact.local_path {
                lines.push(format!(
                    "File {} saved to: {}",
                    artifact.remote_path,
                    local.display()
                ));
            }
        }
        if !retain {
            lines.push("File folder deleted in application container".to_string());
        }
        Ok(lines.join("\n"))
    }
}

/// Look the operation up and check the invocation against it.
fn resolve(inv: &Invocation) -> Result<&'static OperationDescriptor, DiagnosticError> {
    let op = CATALOG.lookup(&inv.operation).ok_or_else(|| {
        DiagnosticError::InvalidUsage(format!(
            "Unrecognized command \"{}\", did you mean: {}?",
            inv.operation,
            join_with_or(&CATALOG.suggestions(&inv.operation))
        ))
    })?;
    inv.validate_for(op)?;
    compose::preflight(inv)?;
    Ok(op)
}

/// Working directory shown in a dry run, where nothing is discovered remotely.
fn dry_run_fspath(op: &OperationDescriptor, inv: &Invocation) -> String {
    let base = inv.container_dir.as_deref().unwrap_or(DEFAULT_REMOTE_DIR);
    if op.uses_remote_dir() {
        compose::remote_fspath(op, base)
    } else {
        DEFAULT_REMOTE_DIR.to_string()
    }
}
