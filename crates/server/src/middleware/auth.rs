use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use secrecy::ExposeSecret;
use tracing::warn;

use crate::{AppState, error::ApiError};

/// Rejects API requests without the configured bearer token.
///
/// Passes everything through when no token is configured, which config
/// validation only allows on loopback listeners.
pub async fn require_access_token(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let Some(expected) = state.config().auth_token.as_ref() else {
        return next.run(req).await;
    };

    match extract_token(req.headers()) {
        Some(token) if tokens_match(token.as_bytes(), expected.expose_secret().as_bytes()) => {
            next.run(req).await
        }
        Some(_) => {
            warn!(uri = %req.uri(), "rejected request with invalid access token");
            ApiError::Unauthorized.into_response()
        }
        None => ApiError::Unauthorized.into_response(),
    }
}

fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(Authorization(bearer)) = headers.typed_get::<Authorization<Bearer>>() {
        return Some(bearer.token().to_owned());
    }
    headers
        .get("X-Kubedash-Token")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

// Compares every byte so the response time does not leak the matching prefix.
fn tokens_match(given: &[u8], expected: &[u8]) -> bool {
    given.len() == expected.len()
        && given
            .iter()
            .zip(expected)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}
