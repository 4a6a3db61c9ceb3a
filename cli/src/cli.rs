//! CLI argument parsing with clap derive

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::app::{AppContext, AppFlags};
use crate::commands;
use crate::domain::error::DiagnosticError;
use crate::domain::invocation::Invocation;

/// Remote diagnostics for Java applications on Cloud Foundry
#[derive(Parser, Debug)]
#[command(
    name = "cf-java",
    version,
    arg_required_else_help = true,
    after_help = "Run `cf-java --list` to see every operation."
)]
pub struct Cli {
    /// Operation to run, e.g. heap-dump or thread-dump
    #[arg(value_name = "OPERATION", required_unless_present = "list")]
    pub operation: Option<String>,

    /// Name of the Cloud Foundry application
    #[arg(value_name = "APP_NAME", required_unless_present = "list")]
    pub app_name: Option<String>,

    /// Application instance to connect to
    #[arg(
        short = 'i',
        long,
        value_name = "INDEX",
        default_value_t = 0,
        allow_negative_numbers = true
    )]
    pub app_instance_index: i64,

    /// Keep the generated files in the application container
    #[arg(short, long)]
    pub keep: bool,

    /// Leave the generated files in the container without downloading them
    #[arg(long)]
    pub no_download: bool,

    /// Print the `cf ssh` command instead of running it
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Directory in the container to write files to
    #[arg(short, long, value_name = "PATH")]
    pub container_dir: Option<String>,

    /// Local directory to save downloaded files in
    #[arg(short, long, value_name = "PATH", default_value = ".")]
    pub local_dir: PathBuf,

    /// Extra arguments passed to the underlying tool
    #[arg(short, long, value_name = "ARGS", allow_hyphen_values = true)]
    pub args: Option<String>,

    /// Log engine stages and cf calls to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR", value_parser = clap::builder::FalseyValueParser::new())]
    pub no_color: bool,

    /// Configuration file [default: ~/.cf-java/config.yaml]
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// List the available operations and exit
    #[arg(long)]
    pub list: bool,
}

impl Cli {
    /// Build the run request from the parsed arguments.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUsage` if a positional is missing or the instance
    /// index is negative.
    pub fn invocation(&self) -> Result<Invocation, DiagnosticError> {
        let (Some(operation), Some(app_name)) = (&self.operation, &self.app_name) else {
            return Err(DiagnosticError::InvalidUsage(
                "Both OPERATION and APP_NAME are required".to_string(),
            ));
        };
        Ok(Invocation {
            instance_index: Invocation::parse_instance_index(self.app_instance_index)?,
            container_dir: self.container_dir.clone(),
            local_dir: self.local_dir.clone(),
            keep: self.keep,
            no_download: self.no_download,
            dry_run: self.dry_run,
            args: self.args.clone(),
            ..Invocation::new(operation.as_str(), app_name.as_str())
        })
    }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or the run fails.
    pub async fn run(self) -> Result<()> {
        let app = AppContext::new(&AppFlags {
            no_color: self.no_color,
            quiet: self.quiet,
            config: self.config.clone(),
        })?;

        if self.list {
            commands::list::run(&app.output);
            return Ok(());
        }

        let inv = self.invocation()?;
        commands::diagnose::run(&app, &inv).await
    }
}
