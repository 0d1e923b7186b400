//! Axum route handler for the chat API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::debug;

use crate::chat::models::{ChatRequest, ChatResponse, ConversationTurn};
use crate::chat::orchestrator::{respond, ChatSettings};
use crate::errors::AppError;
use crate::state::AppState;

/// Returned for bodies that are not a valid `ChatRequest`.
pub const INVALID_BODY_MESSAGE: &str = "Invalid chat request body.";

/// POST /chat
///
/// Answers one question about the CV subject. The caller owns the history:
/// it is sent in full on every request and returned extended by two turns.
pub async fn handle_chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        debug!("rejected chat body: {rejection}");
        AppError::Validation(INVALID_BODY_MESSAGE.to_string())
    })?;
    validate_request(&request.message, &request.conversation_history, &state.chat)?;

    let exchange = respond(
        &request.message,
        &request.conversation_history,
        state.readiness.knowledge(),
        state.llm.as_ref(),
        &state.chat,
    )
    .await?;

    Ok(Json(ChatResponse {
        response: exchange.reply,
        conversation_history: exchange.history,
    }))
}

/// Rejects empty messages and oversized histories before any provider call.
fn validate_request(
    message: &str,
    history: &[ConversationTurn],
    settings: &ChatSettings,
) -> Result<(), AppError> {
    if message.trim().is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }
    if message.chars().count() > settings.max_turn_chars {
        return Err(AppError::Validation(format!(
            "message exceeds {} characters",
            settings.max_turn_chars
        )));
    }
    if history.len() > settings.max_history_turns {
        return Err(AppError::Validation(format!(
            "conversationHistory exceeds {} turns",
            settings.max_history_turns
        )));
    }
    if let Some(pos) = history
        .iter()
        .position(|t| t.content.chars().count() > settings.max_turn_chars)
    {
        return Err(AppError::Validation(format!(
            "conversationHistory[{pos}] exceeds {} characters",
            settings.max_turn_chars
        )));
    }
    Ok(())
}
