//! GitLab Hook Route
//!
//! Renders each delivery with the shared Dispatcher and answers with the
//! rendered document. When a forwarder is configured the message is also
//! posted to the chat platform, once.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::Value;
use thiserror::Error;

use tanuki::{ChatMessage, ErrorReport, InboundEvent, Outcome};

use crate::models::HookQuery;
use crate::AppState;

/// Header carrying the event discriminator
pub const EVENT_HEADER: &str = "x-gitlab-event";

/// Errors rejected before the Dispatcher runs
#[derive(Debug, Error)]
pub enum HookError {
    #[error("missing required header: {0}")]
    MissingHeader(&'static str),

    #[error("invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl IntoResponse for HookError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, self.to_string()).into_response()
    }
}

/// Receive a GitLab webhook
#[utoipa::path(
    post,
    path = "/hooks/gitlab",
    params(
        HookQuery,
        ("x-gitlab-event" = String, Header, description = "GitLab event name, e.g. `Push Hook`"),
        ("x-gitlab-token" = Option<String>, Header, description = "Secret token, when configured")
    ),
    request_body(content = Object, description = "GitLab webhook payload", content_type = "application/json"),
    responses(
        (status = 200, description = "Rendered message, or diagnostic notice on failure", body = ChatMessage),
        (status = 204, description = "Event suppressed by configuration"),
        (status = 400, description = "Missing event header or malformed JSON"),
        (status = 401, description = "Missing or invalid token"),
        (status = 422, description = "Event could not be rendered", body = ErrorReport)
    ),
    tag = "Hooks"
)]
pub async fn receive_hook(
    State(state): State<AppState>,
    Query(query): Query<HookQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, HookError> {
    let event_type = headers
        .get(EVENT_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or(HookError::MissingHeader(EVENT_HEADER))?;
    let payload: Value = serde_json::from_slice(&body)?;

    let event = InboundEvent::new(event_type, payload).with_channel(query.channel);
    tracing::info!(event = %event.event_type, channel = ?event.channel, "Hook received");

    let outcome = state.dispatcher.route(&event);

    if let (Some(forwarder), Some(message)) = (&state.forwarder, outcome.deliverable()) {
        match forwarder.post(message).await {
            Ok(()) => tracing::debug!(sink = forwarder.name(), "Message forwarded"),
            Err(e) => tracing::warn!(sink = forwarder.name(), error = %e, "Failed to forward message"),
        }
    }

    let response = match outcome {
        Outcome::Message(message) => Json(message).into_response(),
        Outcome::Failed {
            notice: Some(notice),
            ..
        } => Json(notice).into_response(),
        Outcome::Failed { report, .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, Json(report)).into_response()
        }
        Outcome::Ignored => StatusCode::NO_CONTENT.into_response(),
    };

    Ok(response)
}

pub fn router() -> Router<AppState> {
    Router::new().route("/hooks/gitlab", post(receive_hook))
}
