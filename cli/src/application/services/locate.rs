//! Application service — find the artifact a command produced.

use tracing::debug;

use crate::application::ports::RemoteExecutor;
use crate::application::services::compose::ssh_with;
use crate::application::services::failure::transport_error;
use crate::domain::artifact::{LocateOutcome, LocateStrategy, RemoteArtifact};
use crate::domain::error::DiagnosticError;

/// Run the strategy's probe over ssh and interpret the result.
///
/// # Errors
///
/// Returns `Transport` if the probe itself could not be executed.
pub async fn locate(
    executor: &impl RemoteExecutor,
    ssh_args: &[String],
    strategy: &impl LocateStrategy,
) -> Result<LocateOutcome, DiagnosticError> {
    let output = executor
        .execute(&ssh_with(ssh_args, &strategy.probe()))
        .await
        .map_err(|f| transport_error("Locating the file in the application container failed", &f))?;

    Ok(match strategy.interpret(&output) {
        Some(path) => {
            debug!(%path, "artifact located");
            LocateOutcome::Found(RemoteArtifact::new(path))
        }
        None => LocateOutcome::NotFound,
    })
}
