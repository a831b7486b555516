use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{delete, get},
};
use services::services::execution_tracker::RunningExecution;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

pub async fn list_executions(
    State(state): State<AppState>,
) -> ResponseJson<ApiResponse<Vec<RunningExecution>>> {
    ResponseJson(ApiResponse::success(state.commands().tracker().list()))
}

pub async fn cancel_execution(
    State(state): State<AppState>,
    Path(execution_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    state.commands().tracker().cancel(execution_id)?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/executions", get(list_executions))
        .route("/executions/{execution_id}", delete(cancel_execution))
}
