//! Child process execution with timeout.

use super::command::{ProbeCommand, ProcessOutput};
use crate::error::{HarnessError, HarnessResult};
use std::future::Future;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Split};
use tokio::process::{ChildStderr, ChildStdout, Command};
use tracing::debug;

/// Default per-trial timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// Runs one probe invocation to completion.
///
/// Implementations must merge stdout and stderr into
/// [`ProcessOutput::output`] and fail with
/// [`HarnessError::ProcessTimeout`] once `timeout` elapses. A non-zero exit
/// is *not* an error at this layer; callers inspect
/// [`ProcessOutput::exit_code`].
pub trait ProcessRunner {
    /// Run `command` and wait for it to exit.
    fn run(
        &self,
        command: &ProbeCommand,
        timeout: Duration,
    ) -> impl Future<Output = HarnessResult<ProcessOutput>> + Send;
}

/// Runs probes as real child processes on the tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    /// Create a new runner.
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRunner for SystemRunner {
    fn run(
        &self,
        command: &ProbeCommand,
        timeout: Duration,
    ) -> impl Future<Output = HarnessResult<ProcessOutput>> + Send {
        async move {
            let program = command.to_string();
            debug!(command = %program, "spawning probe");

            let mut child = Command::new(command.program())
                .args(command.arguments())
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .spawn()
                .map_err(|source| HarnessError::Spawn {
                    program: program.clone(),
                    source,
                })?;

            let stdout = child.stdout.take();
            let stderr = child.stderr.take();

            let finished = tokio::time::timeout(timeout, async {
                let output = collect_merged(stdout, stderr).await?;
                let status = child.wait().await?;
                Ok::<_, std::io::Error>((status, output))
            })
            .await;

            match finished {
                Ok(Ok((status, output))) => Ok(ProcessOutput {
                    exit_code: status.code(),
                    output,
                }),
                Ok(Err(source)) => Err(HarnessError::Io { program, source }),
                Err(_) => {
                    // Reap before reporting so no zombie outlives the trial.
                    if let Err(e) = child.kill().await {
                        debug!(command = %program, error = %e, "kill after timeout failed");
                    }
                    Err(HarnessError::ProcessTimeout { program, timeout })
                },
            }
        }
    }
}

/// Drain both pipes, appending lines in the order they arrive.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected.
async fn collect_merged(
    stdout: Option<ChildStdout>,
    stderr: Option<ChildStderr>,
) -> std::io::Result<String> {
    let mut out_lines = stdout.map(|s| BufReader::new(s).split(b'\n'));
    let mut err_lines = stderr.map(|s| BufReader::new(s).split(b'\n'));
    let mut merged = String::new();

    loop {
        tokio::select! {
            line = next_line(&mut out_lines), if out_lines.is_some() => match line? {
                Some(line) => push_line(&mut merged, &line),
                None => out_lines = None,
            },
            line = next_line(&mut err_lines), if err_lines.is_some() => match line? {
                Some(line) => push_line(&mut merged, &line),
                None => err_lines = None,
            },
            else => break,
        }
    }

    Ok(merged)
}

async fn next_line<R>(lines: &mut Option<Split<R>>) -> std::io::Result<Option<Vec<u8>>>
where
    R: AsyncBufRead + Unpin,
{
    match lines {
        Some(lines) => lines.next_segment().await,
        None => Ok(None),
    }
}

fn push_line(buf: &mut String, line: &[u8]) {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    buf.push_str(&String::from_utf8_lossy(line));
    buf.push('\n');
}
