//! `RemoteExecutor` backed by the Cloud Foundry CLI.
//!
//! Arguments go straight to the `cf` process; no local shell is involved.

use std::process::ExitStatus;
use std::time::Duration;

use tokio::io::AsyncWrite;
use tracing::debug;

use crate::application::ports::{CommandRunner, ExecFailure, RemoteExecutor};
use crate::domain::config::CfConfig;

/// The `cf` CLI driven through a [`CommandRunner`].
pub struct CfCli<R> {
    runner: R,
    binary: String,
    query_timeout: Duration,
    ssh_timeout: Option<Duration>,
}

impl<R: CommandRunner> CfCli<R> {
    #[must_use]
    pub fn new(runner: R, config: &CfConfig) -> Self {
        Self {
            runner,
            binary: config.binary.clone(),
            query_timeout: config.query_timeout(),
            ssh_timeout: config.ssh_timeout(),
        }
    }

    /// `cf ssh` may legitimately run for minutes; API queries should not.
    fn timeout_for(&self, args: &[String]) -> Option<Duration> {
        if args.first().is_some_and(|a| a == "ssh") {
            self.ssh_timeout
        } else {
            Some(self.query_timeout)
        }
    }
}

fn split_lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::to_string)
        .collect()
}

fn failure(status: ExitStatus, output: Vec<String>) -> ExecFailure {
    let eof = output
        .iter()
        .any(|line| line.trim_end().ends_with("unexpected EOF"));
    let message = if eof {
        "unexpected EOF".to_string()
    } else {
        match status.code() {
            Some(code) => format!("exit status {code}"),
            None => "terminated by signal".to_string(),
        }
    };
    ExecFailure::new(message, output)
}

impl<R: CommandRunner> RemoteExecutor for CfCli<R> {
    async fn execute(&self, args: &[String]) -> Result<Vec<String>, ExecFailure> {
        let argv: Vec<&str> = args.iter().map(String::as_str).collect();
        debug!(binary = %self.binary, ?args, "running cf");
        let out = self
            .runner
            .run_with_timeout(&self.binary, &argv, self.timeout_for(args))
            .await
            .map_err(|e| ExecFailure::new(format!("{e:#}"), Vec::new()))?;

        let mut lines = split_lines(&out.stdout);
        if out.status.success() {
            return Ok(lines);
        }
        lines.extend(split_lines(&out.stderr));
        Err(failure(out.status, lines))
    }

    async fn stream_to<W>(&self, args: &[String], sink: &mut W) -> Result<u64, ExecFailure>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let argv: Vec<&str> = args.iter().map(String::as_str).collect();
        debug!(binary = %self.binary, ?args, "streaming cf output");
        let out = self
            .runner
            .run_to_writer(&self.binary, &argv, self.timeout_for(args), sink)
            .await
            .map_err(|e| ExecFailure::new(format!("{e:#}"), Vec::new()))?;

        if out.status.success() {
            Ok(out.bytes)
        } else {
            Err(failure(out.status, split_lines(&out.stderr)))
        }
    }
}
