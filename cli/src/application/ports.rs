//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::Path;
use std::process::{ExitStatus, Output};
use std::sync::LazyLock;
use std::time::Duration;

use anyhow::Result;
use regex::Regex;
use thiserror::Error;
use tokio::io::AsyncWrite;

use crate::domain::CfJavaConfig;

// ── Remote Executor Port ──────────────────────────────────────────────────────

/// What the `cf` CLI prints when it could not obtain an SSH session.
static AUTH_FAILURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"(?i)error getting (one time auth|ssh) code|authentication failed")
        .expect("valid regex")
});

/// A `cf` invocation that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ExecFailure {
    /// Short description, usually the last line the CLI printed.
    pub message: String,
    /// Everything captured before the failure, for diagnosis.
    pub output: Vec<String>,
}

impl ExecFailure {
    #[must_use]
    pub fn new(message: impl Into<String>, output: Vec<String>) -> Self {
        Self {
            message: message.into(),
            output,
        }
    }

    /// The SSH session could not be authenticated.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        std::iter::once(&self.message)
            .chain(&self.output)
            .any(|line| AUTH_FAILURE_RE.is_match(line))
    }

    /// The connection dropped mid-command.
    #[must_use]
    pub fn is_unexpected_eof(&self) -> bool {
        self.message == "unexpected EOF"
    }
}

/// Runs `cf` with a pre-composed argument vector. The remote shell is the
/// only shell that ever interprets the command.
#[allow(async_fn_in_trait)]
pub trait RemoteExecutor {
    /// Run `cf <args>` and return its output lines.
    ///
    /// # Errors
    ///
    /// Returns `ExecFailure` if the command could not run or exited non-zero.
    async fn execute(&self, args: &[String]) -> Result<Vec<String>, ExecFailure>;

    /// Run `cf <args>` and copy its raw stdout into `sink`.
    ///
    /// # Errors
    ///
    /// Returns `ExecFailure` if the command failed or the sink rejected a write.
    async fn stream_to<W>(&self, args: &[String], sink: &mut W) -> Result<u64, ExecFailure>
    where
        W: AsyncWrite + Unpin + Send;
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Result of a process whose stdout was copied into a writer.
#[derive(Debug)]
pub struct StreamedOutput {
    pub status: ExitStatus,
    /// Bytes copied from stdout into the sink.
    pub bytes: u64,
    pub stderr: Vec<u8>,
}

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output; a `None` timeout waits forever.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Option<Duration>,
    ) -> Result<Output>;
    /// Run a program and copy its stdout into `sink` as it arrives.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned, exceeds `timeout`,
    /// or the sink fails.
    async fn run_to_writer<W>(
        &self,
        program: &str,
        args: &[&str],
        timeout: Option<Duration>,
        sink: &mut W,
    ) -> Result<StreamedOutput>
    where
        W: AsyncWrite + Unpin + Send;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait; no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message, closing the current step.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Local Filesystem and Token Ports ──────────────────────────────────────────

/// Creates local destination files for downloaded artifacts.
#[allow(async_fn_in_trait)]
pub trait LocalFs {
    type File: AsyncWrite + Unpin + Send;

    /// Create (or truncate) the file at `path`.
    async fn create(&self, path: &Path) -> Result<Self::File>;
}

/// Source of uniqueness tokens for generated file names.
pub trait TokenGenerator {
    fn generate(&self) -> String;
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts loading of the CLI configuration.
pub trait ConfigStore {
    /// Load the configuration, falling back to defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    fn load(&self) -> Result<CfJavaConfig>;
}
