use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use executors::{ExecutionMode, Kubectl, LocalCommandRunner};
use services::services::commands::CommandService;
use utils::shell::{HostShell, resolve_executable_path};

use crate::{AppState, config::ServerConfig, routes};

pub struct Server;

impl Server {
    pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
        let resolved = resolve_executable_path(&config.kubectl).await;
        match &resolved {
            Some(path) => tracing::info!(kubectl = %path.display(), "found kubectl"),
            // runs still go ahead; the failure text ends up in the result pane
            None => tracing::warn!(kubectl = %config.kubectl, "kubectl not found on PATH"),
        }
        let program = kubectl_program(config.mode, &config.kubectl, resolved);

        let shell = HostShell::detect();
        if config.mode == ExecutionMode::Shell {
            tracing::warn!(
                shell = %shell.program,
                "shell mode: submitted text is interpreted by the shell; set KUBEDASH_MODE=restricted to disable"
            );
        }

        let runner = LocalCommandRunner::new(shell, config.command_timeout);
        let commands = CommandService::new(
            Kubectl::new(program, config.mode),
            Arc::new(runner),
        );

        let addr = config.listen_addr;
        let state = AppState::new(commands, config);
        let router = routes::router(state);

        let tcp_listener = tokio::net::TcpListener::bind(addr)
            .await
            .context("failed to bind tcp listener")?;

        tracing::info!(%addr, "kubectl dashboard listening");

        axum::serve(tcp_listener, router.into_make_service())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("kubectl dashboard server failure")?;

        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(?error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

/// Restricted mode spawns kubectl directly, so it runs the binary found at
/// startup. Shell mode keeps the configured text, which may be a whole
/// command prefix.
fn kubectl_program(mode: ExecutionMode, configured: &str, resolved: Option<PathBuf>) -> String {
    match (mode, resolved) {
        (ExecutionMode::Restricted, Some(path)) => path.to_string_lossy().into_owned(),
        _ => configured.to_string(),
    }
}
