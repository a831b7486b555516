use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::get,
};
use serde::Serialize;
use services::services::catalog::{CommandCatalog, CommandEntry};
use utils::response::ApiResponse;

use super::commands::CommandRunResponse;
use crate::{AppState, error::ApiError};

#[derive(Debug, Serialize)]
pub struct CommandDescription {
    pub group: &'static str,
    pub command: &'static str,
    pub description: &'static str,
}

pub async fn list_groups() -> ResponseJson<ApiResponse<Vec<&'static str>>> {
    ResponseJson(ApiResponse::success(CommandCatalog::global().group_names()))
}

pub async fn list_group_commands(
    Path(group): Path<String>,
) -> ResponseJson<ApiResponse<&'static [CommandEntry]>> {
    ResponseJson(ApiResponse::success(
        CommandCatalog::global().commands(&group),
    ))
}

pub async fn get_command_description(
    Path((group, command)): Path<(String, String)>,
) -> Result<ResponseJson<ApiResponse<CommandDescription>>, ApiError> {
    let catalog = CommandCatalog::global();
    let group = catalog
        .group(&group)
        .ok_or_else(|| ApiError::NotFound(format!("command group `{group}`")))?;
    let entry = group
        .commands
        .iter()
        .find(|entry| entry.name == command)
        .ok_or_else(|| ApiError::NotFound(format!("command `{command}` in `{}`", group.name)))?;

    Ok(ResponseJson(ApiResponse::success(CommandDescription {
        group: group.name,
        command: entry.name,
        description: entry.description,
    })))
}

pub async fn get_command_help(
    State(state): State<AppState>,
    Path(command): Path<String>,
) -> Result<ResponseJson<ApiResponse<CommandRunResponse>>, ApiError> {
    let run = state.commands().help(&command).await?;
    Ok(ResponseJson(ApiResponse::success(run.into())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/catalog/groups", get(list_groups))
        .route("/catalog/groups/{group}/commands", get(list_group_commands))
        .route(
            "/catalog/groups/{group}/commands/{command}",
            get(get_command_description),
        )
        .route("/catalog/commands/{command}/help", get(get_command_help))
}
