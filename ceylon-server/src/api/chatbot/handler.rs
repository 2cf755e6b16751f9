//! Chat proxy handler
//!
//! Every response, including errors, is a `{ "reply": ... }` body.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use shared::client::{ChatReply, ChatRequest};

use crate::core::ServerState;
use crate::services::chat::ERROR_REPLY;

const MISSING_MESSAGE_REPLY: &str = "Please type a message so I can help you.";

/// POST /api/chatbot
pub async fn chat(
    State(state): State<ServerState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> (StatusCode, Json<ChatReply>) {
    let request = match body {
        Ok(Json(request)) => request,
        Err(e) => {
            tracing::debug!(error = %e.body_text(), "Unreadable chat request");
            return (StatusCode::BAD_REQUEST, Json(ChatReply::new(MISSING_MESSAGE_REPLY)));
        }
    };
    let Some(message) = request.text() else {
        return (StatusCode::BAD_REQUEST, Json(ChatReply::new(MISSING_MESSAGE_REPLY)));
    };

    match state.chat().reply(message).await {
        Ok(reply) => (StatusCode::OK, Json(ChatReply::new(reply))),
        Err(e) => {
            tracing::error!(error = %e, "Chat upstream failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ChatReply::new(ERROR_REPLY)),
            )
        }
    }
}
