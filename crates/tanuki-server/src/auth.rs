//! GitLab Secret Token Check
//!
//! GitLab sends the webhook's secret token verbatim in `X-Gitlab-Token`.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

use crate::AppState;

pub const TOKEN_HEADER: &str = "x-gitlab-token";

/// Token middleware
/// Rejects deliveries whose token does not match the configured one
pub async fn token_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let expected = match state.gitlab_token.as_deref() {
        Some(token) if !token.is_empty() => token,
        // No token configured = check disabled (for development)
        _ => return Ok(next.run(request).await),
    };

    let provided = request
        .headers()
        .get(TOKEN_HEADER)
        .and_then(|h| h.to_str().ok());

    match provided {
        Some(token) if token == expected => Ok(next.run(request).await),
        Some(_) => {
            tracing::warn!("Invalid GitLab token attempted");
            Err(StatusCode::UNAUTHORIZED)
        }
        None => {
            tracing::warn!("Missing X-Gitlab-Token header");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}
