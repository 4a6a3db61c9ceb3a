//! The per-run request handed from the CLI layer to the orchestrator.

use std::path::PathBuf;

use crate::domain::catalog::OperationDescriptor;
use crate::domain::error::DiagnosticError;

/// One fully-parsed diagnostic request. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub operation: String,
    pub app_name: String,
    pub instance_index: u32,
    pub container_dir: Option<String>,
    pub local_dir: PathBuf,
    pub keep: bool,
    pub no_download: bool,
    pub dry_run: bool,
    pub args: Option<String>,
}

impl Invocation {
    #[must_use]
    pub fn new(operation: impl Into<String>, app_name: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            app_name: app_name.into(),
            instance_index: 0,
            container_dir: None,
            local_dir: PathBuf::from("."),
            keep: false,
            no_download: false,
            dry_run: false,
            args: None,
        }
    }

    /// Remote files survive the run: explicit `keep`, or no download at all.
    #[must_use]
    pub fn retains_remote(&self) -> bool {
        self.keep || self.no_download
    }

    /// Whether the artifact stays remote this run. Besides `--no-download`,
    /// a profiler `start` passed through `asprof` produces nothing to collect
    /// until the matching `stop`.
    #[must_use]
    pub fn skips_download(&self, op: &OperationDescriptor) -> bool {
        self.no_download
            || (op.produces_arbitrary_files()
                && op.required_tools.contains(&crate::domain::tools::ASPROF)
                && self.args_or_empty().trim_start().starts_with("start"))
    }

    /// Free-form arguments, empty when none were given.
    #[must_use]
    pub fn args_or_empty(&self) -> &str {
        self.args.as_deref().unwrap_or_default()
    }

    /// Convert a raw instance index from the command line.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUsage` for negative values.
    pub fn parse_instance_index(raw: i64) -> Result<u32, DiagnosticError> {
        u32::try_from(raw).map_err(|_| {
            DiagnosticError::InvalidUsage(format!(
                "Invalid application instance index {raw}, must be >= 0"
            ))
        })
    }

    /// Reject flags the selected operation has no use for.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUsage` naming the first unsupported flag.
    pub fn validate_for(&self, op: &OperationDescriptor) -> Result<(), DiagnosticError> {
        let unsupported = |flag: &str| {
            Err(DiagnosticError::InvalidUsage(format!(
                "The flag \"{flag}\" is not supported for {}",
                op.name
            )))
        };

        if self.args.is_some() && !op.supports_args() {
            return unsupported("args");
        }
        if self.keep && !op.uses_remote_dir() {
            return unsupported("keep");
        }
        if self.no_download && !op.produces_artifact() {
            return unsupported("no-download");
        }
        if self.container_dir.is_some() && !op.uses_remote_dir() {
            return unsupported("container-dir");
        }
        if self.local_dir != PathBuf::from(".") && !op.produces_artifact() {
            return unsupported("local-dir");
        }
        Ok(())
    }
}
