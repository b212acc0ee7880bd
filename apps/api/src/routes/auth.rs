use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::errors::AppError;
use crate::state::AppState;

/// Header names accepted for the shared secret, checked in order.
const API_KEY_HEADERS: [&str; 2] = ["api-key", "x-api-key"];

/// Rejects requests whose shared secret is missing or wrong.
pub async fn require_api_key(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Response {
    let presented = API_KEY_HEADERS
        .iter()
        .find_map(|name| headers.get(*name))
        .and_then(|value| value.to_str().ok());

    match presented {
        Some(key) if keys_match(key, &state.config.api_key) => next.run(request).await,
        _ => {
            warn!(path = %request.uri().path(), "Rejected request with missing or invalid API key");
            AppError::Unauthorized.into_response()
        }
    }
}

fn keys_match(presented: &str, expected: &str) -> bool {
    presented.as_bytes().ct_eq(expected.as_bytes()).into()
}
