use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
    Json,
};
use serde_json::json;
use super::AppState;

/// Environment variable holding the bearer token API callers must present.
/// Unset or empty leaves the API open.
pub const API_TOKEN_ENV: &str = "CTEM_API_TOKEN";

/// Token from [`API_TOKEN_ENV`], if set to something non-blank.
pub fn api_token_from_env() -> Option<String> {
    std::env::var(API_TOKEN_ENV)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub async fn api_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<serde_json::Value>)> {
    let Some(expected) = state.api_token.as_deref() else {
        return Ok(next.run(request).await);
    };

    let presented = request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    match presented {
        Some(token) if token == expected => Ok(next.run(request).await),
        Some(_) => Err((StatusCode::UNAUTHORIZED, Json(json!({"error": "Invalid API token"})))),
        None => Err((StatusCode::UNAUTHORIZED, Json(json!({"error": "Missing Authorization header"})))),
    }
}
