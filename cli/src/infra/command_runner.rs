//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` is the production implementation that uses tokio
//! for async process execution with guaranteed timeout and kill on all platforms.

use std::process::{Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};

use crate::application::ports::{CommandRunner, StreamedOutput};

/// Production `CommandRunner`. Uses tokio for async process execution
/// with guaranteed timeout and kill on all platforms.
///
/// On Windows, `tokio::time::timeout` around `.output().await` does NOT kill
/// the child process when the timeout fires: the future is dropped but the
/// OS process keeps running. This implementation uses `tokio::select!` with
/// explicit `child.kill()` to guarantee the process is terminated.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioCommandRunner;

/// Resolves after `timeout`, or never when there is none.
async fn deadline(timeout: Option<Duration>) {
    match timeout {
        Some(t) => tokio::time::sleep(t).await,
        None => std::future::pending::<()>().await,
    }
}

async fn drain(handle: Option<impl AsyncRead + Unpin>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut h) = handle {
        let _ = h.read_to_end(&mut buf).await;
    }
    buf
}

fn timed_out(program: &str, timeout: Option<Duration>) -> anyhow::Error {
    anyhow::anyhow!(
        "{program} timed out after {}s",
        timeout.map_or(0, |t| t.as_secs())
    )
}

impl CommandRunner for TokioCommandRunner {
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Option<Duration>,
    ) -> Result<Output> {
        let mut child = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let stdout_handle = child.stdout.take();
        let stderr_handle = child.stderr.take();

        tokio::select! {
            result = async {
                let (status, stdout, stderr) = tokio::join!(
                    child.wait(),
                    drain(stdout_handle),
                    drain(stderr_handle),
                );
                Ok(Output {
                    status: status.with_context(|| format!("waiting for {program}"))?,
                    stdout,
                    stderr,
                })
            } => result,
            () = deadline(timeout) => {
                let _ = child.kill().await;
                Err(timed_out(program, timeout))
            }
        }
    }

    async fn run_to_writer<W>(
        &self,
        program: &str,
        args: &[&str],
        timeout: Option<Duration>,
        sink: &mut W,
    ) -> Result<StreamedOutput>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let mut child = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let stdout_handle = child.stdout.take();
        let stderr_handle = child.stderr.take();

        tokio::select! {
            result = async {
                let (copied, stderr) = tokio::join!(
                    async {
                        match stdout_handle {
                            Some(mut out) => tokio::io::copy(&mut out, sink).await,
                            None => Ok(0),
                        }
                    },
                    drain(stderr_handle),
                );
                let status = child
                    .wait()
                    .await
                    .with_context(|| format!("waiting for {program}"))?;
                let bytes = copied.with_context(|| format!("copying output of {program}"))?;
                Ok(StreamedOutput { status, bytes, stderr })
            } => result,
            () = deadline(timeout) => {
                let _ = child.kill().await;
                Err(timed_out(program, timeout))
            }
        }
    }
}
