//! cf-java - remote diagnostics for Java applications on Cloud Foundry

use std::process::ExitCode;

use cf_java::cli::Cli;
use cf_java::domain::error::DiagnosticError;
use cf_java::output::OutputContext;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default = if verbose { "cf_java=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    init_tracing(cli.verbose);

    let ctx = OutputContext::new(cli.no_color, cli.quiet);
    match cli.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ctx.error(&format!("Error: {e:#}"));
            if e.downcast_ref::<DiagnosticError>().is_some_and(DiagnosticError::wants_help) {
                eprintln!();
                let _ = Cli::command().write_help(&mut std::io::stderr());
            }
            ExitCode::FAILURE
        }
    }
}
