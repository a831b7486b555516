use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use services::services::{
    commands::CommandRun,
    quick_action::{QuickAction, QuickActionInfo},
};
use utils::{markdown::fenced_code_block, response::ApiResponse};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct RunCommandRequest {
    pub command: String,
    pub execution_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
pub struct QuickActionQuery {
    pub execution_id: Option<Uuid>,
}

/// A finished run plus the markdown the result pane renders.
#[derive(Debug, Serialize)]
pub struct CommandRunResponse {
    #[serde(flatten)]
    pub run: CommandRun,
    pub markdown: String,
}

impl From<CommandRun> for CommandRunResponse {
    fn from(run: CommandRun) -> Self {
        let markdown = fenced_code_block(&run.result.output);
        Self { run, markdown }
    }
}

#[derive(Debug, Serialize)]
pub struct CommandSettings {
    pub prefix: String,
    pub mode: String,
    pub timeout_secs: u64,
    pub quick_actions: Vec<QuickActionInfo>,
}

pub async fn run_command(
    State(state): State<AppState>,
    Json(payload): Json<RunCommandRequest>,
) -> Result<ResponseJson<ApiResponse<CommandRunResponse>>, ApiError> {
    let run = state
        .commands()
        .run_input(&payload.command, payload.execution_id)
        .await?;
    Ok(ResponseJson(ApiResponse::success(run.into())))
}

pub async fn run_quick_action(
    State(state): State<AppState>,
    Path(action): Path<String>,
    Query(query): Query<QuickActionQuery>,
) -> Result<ResponseJson<ApiResponse<CommandRunResponse>>, ApiError> {
    let action: QuickAction = action
        .parse()
        .map_err(|_| ApiError::NotFound(format!("quick action `{action}`")))?;
    let run = state
        .commands()
        .run_quick_action(action, query.execution_id)
        .await?;
    Ok(ResponseJson(ApiResponse::success(run.into())))
}

pub async fn get_settings(
    State(state): State<AppState>,
) -> ResponseJson<ApiResponse<CommandSettings>> {
    let kubectl = state.commands().kubectl();
    ResponseJson(ApiResponse::success(CommandSettings {
        prefix: kubectl.prefix(),
        mode: kubectl.mode().to_string(),
        timeout_secs: state.config().command_timeout.as_secs(),
        quick_actions: QuickAction::all(kubectl),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/commands/settings", get(get_settings))
        .route("/commands/run", post(run_command))
        .route("/commands/quick/{action}", post(run_quick_action))
}
