//! `cf-java <OPERATION> <APP_NAME>` — run one diagnostic operation.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::Orchestrator;
use crate::domain::invocation::Invocation;
use crate::infra::fs::TokioLocalFs;
use crate::infra::tokens::RandomTokenGenerator;
use crate::output::TerminalReporter;

/// Run `inv` against the real `cf` CLI and print what it produced.
///
/// # Errors
///
/// Returns the `DiagnosticError` the run failed with.
pub async fn run(app: &AppContext, inv: &Invocation) -> Result<()> {
    let reporter = TerminalReporter::new(&app.output);
    let outcome = Orchestrator::new(&app.executor, &TokioLocalFs, &RandomTokenGenerator, &reporter)
        .with_cf_trace(app.cf_trace)
        .run(inv)
        .await;
    reporter.finish();

    app.output.result(&outcome?);
    Ok(())
}
