//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Substitution errors ───────────────────────────────────────────────────────

/// Violations of the placeholder rules, detected before any command is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubstitutionError {
    #[error("invalid variable reference: {placeholder} cannot contain @ variables")]
    NestedPlaceholder { placeholder: &'static str },

    #[error("invalid variable reference: {placeholder} cannot contain itself")]
    SelfReference { placeholder: &'static str },

    #[error("command template references {placeholder} but no value is bound for it")]
    MissingBinding { placeholder: &'static str },
}

// ── Engine errors ─────────────────────────────────────────────────────────────

/// Error categories the CLI layer reacts to (help prompt, exit code).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidUsage,
    PrerequisiteUnavailable,
    ValidationFailure,
    TransportFailure,
    RemoteCommandFailed,
    ArtifactNotFound,
    LocalIoFailure,
}

/// Terminal failure of one diagnostic invocation.
#[derive(Debug, Error)]
pub enum DiagnosticError {
    #[error("{0}")]
    InvalidUsage(String),

    #[error("{0}")]
    PrerequisiteUnavailable(String),

    #[error(transparent)]
    Validation(#[from] SubstitutionError),

    #[error("{0}")]
    Transport(String),

    #[error("{0}")]
    RemoteCommandFailed(String),

    #[error("Failed to find {label} in application container{}", render_output(.output))]
    ArtifactNotFound { label: String, output: Vec<String> },

    #[error("{0}")]
    LocalIo(String),
}

impl DiagnosticError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidUsage(_) => ErrorKind::InvalidUsage,
            Self::PrerequisiteUnavailable(_) => ErrorKind::PrerequisiteUnavailable,
            Self::Validation(_) => ErrorKind::ValidationFailure,
            Self::Transport(_) => ErrorKind::TransportFailure,
            Self::RemoteCommandFailed(_) => ErrorKind::RemoteCommandFailed,
            Self::ArtifactNotFound { .. } => ErrorKind::ArtifactNotFound,
            Self::LocalIo(_) => ErrorKind::LocalIoFailure,
        }
    }

    /// Whether the CLI should follow the message with command help.
    #[must_use]
    pub fn wants_help(&self) -> bool {
        self.kind() == ErrorKind::InvalidUsage
    }
}

fn render_output(output: &[String]) -> String {
    if output.is_empty() {
        String::new()
    } else {
        format!("\nOutput: {}", output.join("\n"))
    }
}
