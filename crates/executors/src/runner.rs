use std::time::Duration;

use async_trait::async_trait;
use command_group::{AsyncCommandGroup, AsyncGroupChild};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_util::sync::CancellationToken;
use utils::shell::HostShell;

use crate::{command::CommandLine, result::ExecutionResult};

// How long to keep reading stderr after the process group was killed.
const DRAIN_GRACE: Duration = Duration::from_secs(2);

/// Runs one command to completion and reduces it to an [`ExecutionResult`].
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &CommandLine, cancel: CancellationToken) -> ExecutionResult;
}

/// Spawns commands on the local host as their own process group.
#[derive(Debug, Clone)]
pub struct LocalCommandRunner {
    shell: HostShell,
    timeout: Duration,
}

enum Interrupt {
    TimedOut,
    Cancelled,
}

// Kills the process group when a run is abandoned before the child exits,
// e.g. because the HTTP client went away.
struct GroupGuard(AsyncGroupChild);

impl Drop for GroupGuard {
    fn drop(&mut self) {
        if let Ok(None) = self.0.try_wait() {
            if let Err(error) = self.0.start_kill() {
                tracing::warn!(?error, "failed to kill abandoned process group");
            }
        }
    }
}

impl LocalCommandRunner {
    pub fn new(shell: HostShell, timeout: Duration) -> Self {
        Self { shell, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl CommandRunner for LocalCommandRunner {
    async fn run(&self, command: &CommandLine, cancel: CancellationToken) -> ExecutionResult {
        let mut child = match command.to_command(&self.shell).group_spawn() {
            Ok(child) => GroupGuard(child),
            Err(error) => {
                tracing::warn!(%command, ?error, "failed to spawn command");
                return ExecutionResult::spawn_failed(command.program(), &error);
            }
        };

        let mut stdout_task = tokio::spawn(drain(child.0.inner().stdout.take()));
        let mut stderr_task = tokio::spawn(drain(child.0.inner().stderr.take()));

        let finished = async {
            let status = child.0.wait().await;
            let stdout = (&mut stdout_task).await.unwrap_or_default();
            let stderr = (&mut stderr_task).await.unwrap_or_default();
            (status, stdout, stderr)
        };

        let interrupt = tokio::select! {
            (status, stdout, stderr) = finished => {
                return match status {
                    Ok(status) => ExecutionResult::from_exit(status, &stdout, &stderr),
                    Err(error) => {
                        tracing::warn!(%command, ?error, "failed to wait for command");
                        ExecutionResult::spawn_failed(command.program(), &error)
                    }
                };
            }
            _ = tokio::time::sleep(self.timeout) => Interrupt::TimedOut,
            _ = cancel.cancelled() => Interrupt::Cancelled,
        };

        if let Err(error) = child.0.kill().await {
            tracing::warn!(%command, ?error, "failed to kill command process group");
        }
        stdout_task.abort();
        let stderr = tokio::time::timeout(DRAIN_GRACE, &mut stderr_task)
            .await
            .ok()
            .and_then(Result::ok)
            .unwrap_or_default();
        stderr_task.abort();

        match interrupt {
            Interrupt::TimedOut => {
                tracing::warn!(%command, timeout_secs = self.timeout.as_secs(), "command timed out");
                ExecutionResult::timed_out(self.timeout, &stderr)
            }
            Interrupt::Cancelled => {
                tracing::info!(%command, "command cancelled");
                ExecutionResult::cancelled(&stderr)
            }
        }
    }
}

async fn drain<R: AsyncRead + Unpin>(pipe: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        if let Err(error) = pipe.read_to_end(&mut buf).await {
            tracing::debug!(?error, "failed to read command output");
        }
    }
    buf
}

#[cfg(all(test, unix))]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::result::Outcome;

    fn runner(timeout: Duration) -> LocalCommandRunner {
        LocalCommandRunner::new(HostShell::posix(), timeout)
    }

    fn shell(line: &str) -> CommandLine {
        CommandLine::Shell { line: line.into() }
    }

    #[tokio::test]
    async fn success_returns_stdout_only() {
        let result = runner(Duration::from_secs(10))
            .run(&shell("echo '  ready  '; echo noise >&2"), CancellationToken::new())
            .await;
        assert_eq!(result.output, "ready");
        assert_eq!(result.outcome, Outcome::Succeeded);
    }

    #[tokio::test]
    async fn failure_returns_stderr_only() {
        let result = runner(Duration::from_secs(10))
            .run(
                &shell("echo table; echo 'Error from server (NotFound)' >&2; exit 1"),
                CancellationToken::new(),
            )
            .await;
        assert_eq!(result.output, "Error from server (NotFound)");
        assert_eq!(result.outcome, Outcome::Failed { exit_code: Some(1) });
    }

    #[tokio::test]
    async fn shell_mode_interprets_metacharacters() {
        let result = runner(Duration::from_secs(10))
            .run(&shell("echo node-1; echo INJECTED"), CancellationToken::new())
            .await;
        assert_eq!(result.output, "node-1\nINJECTED");
    }

    #[tokio::test]
    async fn direct_mode_passes_metacharacters_literally() {
        let command = CommandLine::Direct {
            program: "echo".into(),
            args: vec!["get".into(), "nodes;".into(), "echo".into(), "INJECTED".into()],
        };
        let result = runner(Duration::from_secs(10))
            .run(&command, CancellationToken::new())
            .await;
        assert_eq!(result.output, "get nodes; echo INJECTED");
    }

    #[tokio::test]
    async fn missing_program_is_reported_as_text() {
        let command = CommandLine::Direct {
            program: "kubectl-definitely-not-installed".into(),
            args: vec!["get".into()],
        };
        let result = runner(Duration::from_secs(10))
            .run(&command, CancellationToken::new())
            .await;
        assert_eq!(result.outcome, Outcome::SpawnFailed);
        assert!(result.output.contains("kubectl-definitely-not-installed"));
    }

    #[tokio::test]
    async fn missing_program_through_the_shell_is_a_failed_exit() {
        let result = runner(Duration::from_secs(10))
            .run(
                &shell("kubectl-definitely-not-installed get nodes"),
                CancellationToken::new(),
            )
            .await;
        assert_eq!(result.outcome, Outcome::Failed { exit_code: Some(127) });
        assert!(!result.output.is_empty());
    }

    #[tokio::test]
    async fn slow_commands_time_out_and_are_killed() {
        let started = Instant::now();
        let result = runner(Duration::from_millis(200))
            .run(&shell("echo waiting >&2; sleep 30"), CancellationToken::new())
            .await;
        assert!(started.elapsed() < Duration::from_secs(10));
        assert_eq!(result.outcome, Outcome::TimedOut { after_ms: 200 });
        assert_eq!(result.output, "waiting");
    }

    #[tokio::test]
    async fn cancellation_stops_the_command() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let started = Instant::now();
        let result = runner(Duration::from_secs(30))
            .run(&shell("sleep 30"), cancel)
            .await;
        assert!(started.elapsed() < Duration::from_secs(10));
        assert_eq!(result.outcome, Outcome::Cancelled);
        assert_eq!(result.output, "command cancelled");
    }

    #[tokio::test]
    async fn abandoned_run_kills_the_process_group() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("finished");
        let line = format!("sleep 1; touch '{}'", marker.display());

        let runner = runner(Duration::from_secs(30));
        let abandoned = tokio::time::timeout(
            Duration::from_millis(200),
            runner.run(&shell(&line), CancellationToken::new()),
        )
        .await;
        assert!(abandoned.is_err());

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(!marker.exists());
    }
}
