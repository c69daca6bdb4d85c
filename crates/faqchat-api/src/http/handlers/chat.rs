//! Conversation handlers: start a session, continue it, read its transcript.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};

use faqchat_types::chat::{ChatReply, ChatRequest, ChatSession, SessionId};

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestMeta};
use crate::state::AppState;

fn parse_session_id(raw: &str) -> Result<SessionId, AppError> {
    raw.parse()
        .map_err(|_| AppError::Validation(format!("invalid session id: '{raw}'")))
}

/// POST /api/v1/chat/start - Open a session with the first message.
pub async fn start_conversation(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ChatReply>>, AppError> {
    let meta = RequestMeta::start();
    let Json(body) = body?;

    let reply = state.engine.start_conversation(&body.message).await?;
    let href = format!("/api/v1/chat/{}", reply.session_id);

    Ok(Json(meta.respond(reply).with_link("session", &href)))
}

/// POST /api/v1/chat/{sessionId} - Send the next message in a session.
pub async fn continue_conversation(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ChatReply>>, AppError> {
    let meta = RequestMeta::start();
    let session_id = parse_session_id(&session_id)?;
    let Json(body) = body?;

    let reply = state
        .engine
        .continue_conversation(&session_id, &body.message)
        .await?;

    Ok(Json(
        meta.respond(reply)
            .with_link("session", &format!("/api/v1/chat/{session_id}")),
    ))
}

/// GET /api/v1/chat/{sessionId} - Full transcript of a session.
pub async fn get_transcript(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<ChatSession>>, AppError> {
    let meta = RequestMeta::start();
    let session_id = parse_session_id(&session_id)?;

    let session = state.engine.get_transcript(&session_id).await?;

    Ok(Json(
        meta.respond(session)
            .with_link("self", &format!("/api/v1/chat/{session_id}")),
    ))
}
