use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use executors::CommandError;
use services::services::{commands::CommandServiceError, execution_tracker::TrackerError};
use thiserror::Error;
use utils::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Tracker(#[from] TrackerError),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Unauthorized")]
    Unauthorized,
}

impl From<CommandServiceError> for ApiError {
    fn from(err: CommandServiceError) -> Self {
        match err {
            CommandServiceError::Command(err) => ApiError::Command(err),
            CommandServiceError::Tracker(err) => ApiError::Tracker(err),
            CommandServiceError::UnknownCommand(command) => {
                ApiError::NotFound(format!("kubectl command `{command}`"))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, error_type) = match &self {
            ApiError::Command(_) => (StatusCode::BAD_REQUEST, "CommandError"),
            ApiError::Tracker(err) => match err {
                TrackerError::NotFound(_) => (StatusCode::NOT_FOUND, "ExecutionNotFound"),
                TrackerError::AlreadyRunning(_) => (StatusCode::CONFLICT, "ExecutionConflict"),
            },
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BadRequest"),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
        };

        let error_message = match &self {
            // shown verbatim in the result pane
            ApiError::Command(err) => err.to_string(),
            ApiError::Unauthorized => "Unauthorized. Provide a valid access token.".to_string(),
            _ => format!("{}: {}", error_type, self),
        };
        tracing::debug!(%status_code, error_type, "request failed: {}", self);

        let response = ApiResponse::<()>::error(&error_message);
        (status_code, Json(response)).into_response()
    }
}
