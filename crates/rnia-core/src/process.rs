//! External process execution with optional output streaming
//!
//! Two entry points: [`run`] waits for an executable and reports its exit
//! status, [`run_streamed`] additionally forwards each line of stdout and
//! stderr to the progress sink as a log chunk tagged with the active step.
//! Neither retries; retry policy belongs to callers, and no caller in this
//! crate has one.

use crate::error::ProcessError;
use crate::progress::{self, ProgressEvent, ProgressSink};
use std::ffi::OsStr;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

/// Options for a plain (non-streamed) run.
#[derive(Debug, Default)]
pub struct RunOptions<'a> {
    /// Working directory override.
    pub cwd: Option<&'a Path>,
    /// Attach the child directly to the caller's terminal instead of
    /// discarding its output.
    pub inherit_stdio: bool,
}

/// Run an external command to completion. Succeeds only on exit status 0.
pub async fn run<I, S>(program: &str, args: I, options: RunOptions<'_>) -> Result<(), ProcessError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(program);
    command.args(args).kill_on_drop(true);
    if let Some(cwd) = options.cwd {
        command.current_dir(cwd);
    }
    if !options.inherit_stdio {
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
    }

    let status = command.status().await.map_err(|source| ProcessError::Spawn {
        program: program.to_string(),
        source,
    })?;

    if status.success() {
        Ok(())
    } else {
        Err(ProcessError::NonZeroExit {
            program: program.to_string(),
            code: status.code().unwrap_or(-1),
        })
    }
}

/// Run an external command, forwarding each line of its stdout and stderr
/// to the progress sink.
///
/// Chunks are tagged with the step index and message active at emission
/// time. Arrival order between the two pipes is whatever the OS delivers;
/// nothing is reordered and nothing is dropped. The child is killed if the
/// returned future is dropped mid-flight.
pub async fn run_streamed<I, S>(
    program: &str,
    args: I,
    step: usize,
    total: usize,
    message: &str,
    sink: Option<&dyn ProgressSink>,
    cwd: Option<&Path>,
) -> Result<(), ProcessError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let spawn_error = |source| ProcessError::Spawn {
        program: program.to_string(),
        source,
    };

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(cwd) = cwd {
        command.current_dir(cwd);
    }

    let mut child = command.spawn().map_err(spawn_error)?;

    let stdout = child.stdout.take().expect("Failed to capture stdout");
    let stderr = child.stderr.take().expect("Failed to capture stderr");

    let mut stdout_lines = BufReader::new(stdout).lines();
    let mut stderr_lines = BufReader::new(stderr).lines();
    let mut stdout_done = false;
    let mut stderr_done = false;

    while !(stdout_done && stderr_done) {
        tokio::select! {
            line = stdout_lines.next_line(), if !stdout_done => match line {
                Ok(Some(line)) => {
                    progress::emit(
                        sink,
                        ProgressEvent::log(step, total, message, format!("{}\n", line)),
                    );
                }
                _ => stdout_done = true,
            },
            line = stderr_lines.next_line(), if !stderr_done => match line {
                Ok(Some(line)) => {
                    progress::emit(
                        sink,
                        ProgressEvent::log(step, total, message, format!("{}\n", line)),
                    );
                }
                _ => stderr_done = true,
            },
        }
    }

    let status = child.wait().await.map_err(spawn_error)?;

    if status.success() {
        Ok(())
    } else {
        Err(ProcessError::NonZeroExit {
            program: program.to_string(),
            code: status.code().unwrap_or(-1),
        })
    }
}
