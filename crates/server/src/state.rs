use std::sync::Arc;

use services::services::commands::CommandService;

use crate::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    commands: CommandService,
    config: ServerConfig,
}

impl AppState {
    pub fn new(commands: CommandService, config: ServerConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner { commands, config }),
        }
    }

    pub fn commands(&self) -> &CommandService {
        &self.inner.commands
    }

    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }
}
