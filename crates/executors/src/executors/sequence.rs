//! Sequential execution of shell command lines with a per-line deadline.

use std::{sync::Arc, time::Duration};

use command_group::AsyncGroupChild;
use tokio::{
    io::{AsyncRead, AsyncReadExt},
    time::{Instant, timeout, timeout_at},
};

use crate::{
    actions::{CommandSpawner, script::ShellSpawner},
    command::{AggregateResult, CommandOutcome, CommandRequest},
    executors::ExecutorError,
};

/// Wall-clock budget for a single command unit.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// How long to wait for the pipes to close after a timed out process group
/// has been killed.
const DRAIN_GRACE: Duration = Duration::from_secs(2);

/// Runs the lines of a request one after another through a shell and folds
/// the outcomes into one [`AggregateResult`].
///
/// A failing line never stops the sequence. The executor holds no per-request
/// state, so one instance can serve concurrent requests.
#[derive(Clone)]
pub struct CommandSequenceExecutor {
    spawner: Arc<dyn CommandSpawner>,
    timeout: Duration,
}

impl Default for CommandSequenceExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CommandSequenceExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSequenceExecutor")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl CommandSequenceExecutor {
    pub fn new() -> Self {
        Self::with_spawner(Arc::new(ShellSpawner::default()))
    }

    pub fn with_spawner(spawner: Arc<dyn CommandSpawner>) -> Self {
        Self {
            spawner,
            timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Parse `text` and run every command unit in order.
    ///
    /// Only empty input is an error; spawn failures, non-zero exits and
    /// timeouts all come back as a result with `succeeded == false`.
    pub async fn execute(&self, text: &str) -> Result<AggregateResult, ExecutorError> {
        let request = CommandRequest::parse(text)?;
        Ok(self.execute_request(&request).await)
    }

    pub async fn execute_request(&self, request: &CommandRequest) -> AggregateResult {
        let mut outcomes = Vec::with_capacity(request.len());
        for unit in request.units() {
            let outcome = self.run_unit(unit).await;
            if let Some(failure) = outcome.failure() {
                tracing::warn!(
                    command = %outcome.command,
                    ?failure,
                    "Command failed, continuing with the remaining commands"
                );
            }
            outcomes.push(outcome);
        }

        let result = AggregateResult::from_outcomes(outcomes);
        tracing::debug!(
            commands = request.len(),
            succeeded = result.succeeded,
            "Command sequence finished"
        );
        result
    }

    /// Run one command line to completion or until the deadline passes.
    pub async fn run_unit(&self, command: &str) -> CommandOutcome {
        tracing::info!(command, "Executing command");
        let started = Instant::now();

        let mut child = match self.spawner.spawn(command).await {
            Ok(child) => child,
            Err(err) => {
                tracing::error!(command, error = %err, "Failed to spawn command");
                return CommandOutcome::spawn_failed(command, &err);
            }
        };

        let stdout = child.inner().stdout.take();
        let stderr = child.inner().stderr.take();
        let mut stdout_buf = Vec::new();
        let mut stderr_buf = Vec::new();

        let deadline = started + self.timeout;
        let finish = {
            let output = collect_output(stdout, stderr, &mut stdout_buf, &mut stderr_buf);
            tokio::pin!(output);

            match timeout_at(deadline, &mut output).await {
                Ok(()) => match timeout_at(deadline, child.wait()).await {
                    Ok(Ok(status)) => Finish::Exited(status.code()),
                    Ok(Err(err)) => Finish::WaitFailed(err),
                    Err(_) => {
                        self.terminate(&mut child, command).await;
                        Finish::TimedOut
                    }
                },
                Err(_) => {
                    self.terminate(&mut child, command).await;
                    // A detached descendant may keep the pipes open past the grace
                    if timeout(DRAIN_GRACE, &mut output).await.is_err() {
                        tracing::debug!(command, "Output pipes still open after kill");
                    }
                    Finish::TimedOut
                }
            }
        };

        let stdout = String::from_utf8_lossy(&stdout_buf).into_owned();
        let mut stderr = String::from_utf8_lossy(&stderr_buf).into_owned();
        let outcome = match finish {
            Finish::Exited(code) => CommandOutcome::exited(command, code, stdout, stderr),
            Finish::WaitFailed(err) => {
                tracing::error!(command, error = %err, "Failed to wait for command");
                stderr.push_str(&err.to_string());
                CommandOutcome::exited(command, None, stdout, stderr)
            }
            Finish::TimedOut => CommandOutcome::timed_out(command, stdout, stderr),
        };

        tracing::info!(
            command,
            exit_code = ?outcome.exit_code,
            timed_out = outcome.timed_out,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Command exited"
        );
        outcome
    }

    async fn terminate(&self, child: &mut AsyncGroupChild, command: &str) {
        tracing::warn!(
            command,
            timeout_secs = self.timeout.as_secs_f64(),
            "Command timed out, killing its process group"
        );
        if let Err(err) = child.kill().await {
            tracing::warn!(command, error = %err, "Failed to kill timed out command");
        }
    }
}

/// How a unit's process ended, before its output is decoded.
enum Finish {
    Exited(Option<i32>),
    WaitFailed(std::io::Error),
    TimedOut,
}

/// Drain stdout and stderr concurrently so neither pipe can fill up and
/// stall the child. Bytes land in the caller's buffers as they arrive, so
/// they survive this future being dropped.
async fn collect_output<O, E>(
    stdout: Option<O>,
    stderr: Option<E>,
    stdout_buf: &mut Vec<u8>,
    stderr_buf: &mut Vec<u8>,
) where
    O: AsyncRead + Unpin,
    E: AsyncRead + Unpin,
{
    tokio::join!(
        read_stream(stdout, stdout_buf),
        read_stream(stderr, stderr_buf)
    );
}

async fn read_stream<R: AsyncRead + Unpin>(stream: Option<R>, buf: &mut Vec<u8>) {
    let Some(mut stream) = stream else {
        return;
    };
    let mut chunk = [0u8; 8192];
    loop {
        match stream.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
            Err(err) => {
                tracing::debug!(error = %err, "Error reading command output");
                break;
            }
        }
    }
}
