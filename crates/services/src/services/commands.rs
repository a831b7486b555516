use std::{sync::Arc, time::Instant};

use executors::{CommandError, CommandLine, CommandRunner, ExecutionResult, Kubectl};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use super::{
    catalog::CommandCatalog,
    execution_tracker::{ExecutionTracker, TrackerError},
    quick_action::QuickAction,
};

#[derive(Debug, Error)]
pub enum CommandServiceError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Tracker(#[from] TrackerError),
    #[error("unknown kubectl command `{0}`")]
    UnknownCommand(String),
}

/// One finished run as reported to the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct CommandRun {
    pub execution_id: Uuid,
    pub command: String,
    #[serde(flatten)]
    pub result: ExecutionResult,
    pub duration_ms: u64,
}

/// Runs typed commands, quick actions and help lookups through kubectl.
#[derive(Clone)]
pub struct CommandService {
    kubectl: Kubectl,
    runner: Arc<dyn CommandRunner>,
    tracker: ExecutionTracker,
    catalog: &'static CommandCatalog,
}

impl CommandService {
    pub fn new(kubectl: Kubectl, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            kubectl,
            runner,
            tracker: ExecutionTracker::new(),
            catalog: CommandCatalog::global(),
        }
    }

    pub fn kubectl(&self) -> &Kubectl {
        &self.kubectl
    }

    pub fn tracker(&self) -> &ExecutionTracker {
        &self.tracker
    }

    pub fn catalog(&self) -> &'static CommandCatalog {
        self.catalog
    }

    /// Run whatever the user typed after the kubectl prefix.
    pub async fn run_input(
        &self,
        input: &str,
        execution_id: Option<Uuid>,
    ) -> Result<CommandRun, CommandServiceError> {
        let command = self.kubectl.user_command(input, self.catalog)?;
        self.execute(command, execution_id).await
    }

    pub async fn run_quick_action(
        &self,
        action: QuickAction,
        execution_id: Option<Uuid>,
    ) -> Result<CommandRun, CommandServiceError> {
        let command = self.kubectl.fixed(action.args());
        self.execute(command, execution_id).await
    }

    /// `kubectl <command> --help`, for commands listed in the catalog only.
    pub async fn help(&self, command: &str) -> Result<CommandRun, CommandServiceError> {
        let (_, entry) = self
            .catalog
            .find(command)
            .ok_or_else(|| CommandServiceError::UnknownCommand(command.to_string()))?;
        let command = self.kubectl.fixed(&[entry.name, "--help"]);
        self.execute(command, None).await
    }

    async fn execute(
        &self,
        command: CommandLine,
        execution_id: Option<Uuid>,
    ) -> Result<CommandRun, CommandServiceError> {
        let command_text = command.to_string();
        let guard = self
            .tracker
            .register(execution_id.unwrap_or_else(Uuid::new_v4), command_text.clone())?;
        let execution_id = guard.id();

        tracing::info!(
            %execution_id,
            command = %command_text,
            mode = %self.kubectl.mode(),
            "running command"
        );
        let started = Instant::now();
        let result = self.runner.run(&command, guard.token()).await;
        let duration_ms = started.elapsed().as_millis() as u64;
        tracing::info!(
            %execution_id,
            outcome = ?result.outcome,
            duration_ms,
            "command finished"
        );

        Ok(CommandRun {
            execution_id,
            command: command_text,
            result,
            duration_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use executors::{ExecutionMode, Outcome};
    use tokio_util::sync::CancellationToken;

    use super::*;

    #[derive(Default)]
    struct RecordingRunner {
        seen: Mutex<Vec<CommandLine>>,
    }

    #[async_trait]
    impl CommandRunner for RecordingRunner {
        async fn run(&self, command: &CommandLine, _cancel: CancellationToken) -> ExecutionResult {
            self.seen.lock().unwrap().push(command.clone());
            ExecutionResult {
                output: format!("ran {command}"),
                outcome: Outcome::Succeeded,
            }
        }
    }

    fn service(mode: ExecutionMode) -> (CommandService, Arc<RecordingRunner>) {
        let runner = Arc::new(RecordingRunner::default());
        let service = CommandService::new(Kubectl::new("kubectl", mode), runner.clone());
        (service, runner)
    }

    #[tokio::test]
    async fn typed_input_is_prefixed_with_kubectl() {
        let (service, runner) = service(ExecutionMode::Shell);
        let run = service.run_input("get nodes", None).await.unwrap();
        assert_eq!(run.command, "kubectl get nodes");
        assert_eq!(run.result.output, "ran kubectl get nodes");
        assert_eq!(runner.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_input_runs_nothing() {
        let (service, runner) = service(ExecutionMode::Shell);
        let err = service.run_input("  ", None).await.unwrap_err();
        assert!(matches!(
            err,
            CommandServiceError::Command(CommandError::EmptyCommand)
        ));
        assert!(runner.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn quick_action_runs_its_literal_command() {
        let (service, runner) = service(ExecutionMode::Shell);
        service
            .run_quick_action(QuickAction::Nodes, None)
            .await
            .unwrap();
        assert_eq!(
            runner.seen.lock().unwrap()[0],
            CommandLine::Shell {
                line: "kubectl get nodes".into()
            }
        );
    }

    #[tokio::test]
    async fn help_runs_dash_dash_help() {
        let (service, runner) = service(ExecutionMode::Restricted);
        let run = service.help("get").await.unwrap();
        assert_eq!(run.command, "kubectl get --help");
        assert_eq!(
            runner.seen.lock().unwrap()[0],
            CommandLine::Direct {
                program: "kubectl".into(),
                args: vec!["get".into(), "--help".into()],
            }
        );
    }

    #[tokio::test]
    async fn help_for_unknown_command_is_rejected() {
        let (service, runner) = service(ExecutionMode::Shell);
        let err = service.help("get; reboot").await.unwrap_err();
        assert!(matches!(err, CommandServiceError::UnknownCommand(_)));
        assert!(runner.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn restricted_mode_consults_the_catalog() {
        let (service, _) = service(ExecutionMode::Restricted);
        assert!(service.run_input("describe pod web", None).await.is_ok());
        let err = service.run_input("bash -c id", None).await.unwrap_err();
        assert!(matches!(
            err,
            CommandServiceError::Command(CommandError::SubcommandNotAllowed(_))
        ));
    }

    #[tokio::test]
    async fn execution_is_untracked_after_it_finishes() {
        let (service, _) = service(ExecutionMode::Shell);
        let id = Uuid::new_v4();
        let run = service.run_input("get ns", Some(id)).await.unwrap();
        assert_eq!(run.execution_id, id);
        assert!(!service.tracker().is_running(id));
    }
}
