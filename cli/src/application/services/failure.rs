//! Mapping of executor failures into user-facing engine errors.

use crate::application::ports::ExecFailure;
use crate::domain::error::DiagnosticError;

const AUTH_HINT: &str = "Authentication with the application container failed, please log in again with 'cf login' and retry";

/// Failure of the diagnostic command itself.
pub(crate) fn command_error(failure: ExecFailure) -> DiagnosticError {
    if failure.is_auth_failure() {
        return DiagnosticError::Transport(AUTH_HINT.to_string());
    }
    if failure.is_unexpected_eof() {
        return DiagnosticError::RemoteCommandFailed("Command failed".to_string());
    }
    let mut message = format!("Command execution failed: {}", failure.message);
    if !failure.output.is_empty() {
        message.push_str("\nOutput: ");
        message.push_str(&failure.output.join("\n"));
    }
    DiagnosticError::RemoteCommandFailed(message)
}

/// Failure of a follow-up call (locate, transfer, cleanup, API query).
pub(crate) fn transport_error(context: &str, failure: &ExecFailure) -> DiagnosticError {
    if failure.is_auth_failure() {
        return DiagnosticError::Transport(AUTH_HINT.to_string());
    }
    DiagnosticError::Transport(format!("{context}: {}", failure.message))
}
