use axum::{Router, middleware::from_fn_with_state, routing::get};
use tower_http::trace::TraceLayer;

use crate::{AppState, middleware::require_access_token};

pub mod catalog;
pub mod commands;
pub mod executions;
pub mod frontend;
pub mod health;
pub mod reference;

pub fn router(state: AppState) -> Router {
    let protected = Router::<AppState>::new()
        .merge(commands::router())
        .merge(executions::router())
        .merge(catalog::router())
        .merge(reference::router())
        .layer(from_fn_with_state(state.clone(), require_access_token));

    let api = Router::<AppState>::new()
        .route("/health", get(health::health_check))
        .merge(protected);

    Router::new()
        .route("/", get(frontend::serve_index))
        .route("/assets/{*path}", get(frontend::serve_asset))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
