use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Message returned to clients whenever a chat request fails server-side.
/// Provider and internal details are logged, never echoed.
pub const CHAT_FAILURE_MESSAGE: &str =
    "Sorry, I couldn't process your question right now. Please try again later.";

/// Request-scoped error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Llm(e) => {
                tracing::error!("LLM error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    CHAT_FAILURE_MESSAGE.to_string(),
                )
            }
        };

        (status, Json(json!({ "response": message }))).into_response()
    }
}
