//! Application context — unified state passed to every command handler.

use std::path::PathBuf;

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::infra::cf_cli::CfCli;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlConfigStore;
use crate::output::OutputContext;

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress progress output.
    pub quiet: bool,
    /// Explicit configuration file.
    pub config: Option<PathBuf>,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// The `cf` CLI every remote call goes through.
    pub executor: CfCli<TokioCommandRunner>,
    /// `CF_TRACE=true` in the environment.
    pub cf_trace: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let config = YamlConfigStore::with_path(flags.config.clone()).load()?;
        let no_color = flags.no_color || !config.output.color;

        Ok(Self {
            output: OutputContext::new(no_color, flags.quiet),
            executor: CfCli::new(TokioCommandRunner, &config.cf),
            cf_trace: cf_trace_enabled(std::env::var("CF_TRACE").ok().as_deref()),
        })
    }
}

fn cf_trace_enabled(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}
