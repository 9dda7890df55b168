use axum::{
    Json,
    extract::{FromRequest, State},
};

use crate::{
    error::AppError,
    message::{ChatRequest, ChatResponse, HealthResponse},
    state::SharedState,
};

/// JSON body extractor whose rejections render as the error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

pub async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(state.gateway.health_check())
}

pub async fn chat_handler(
    State(state): State<SharedState>,
    AppJson(payload): AppJson<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    tracing::info!(
        message_len = payload.message.len(),
        history_len = payload.history.len(),
        "Chat request received"
    );

    let response = state.gateway.handle_chat(payload).await?;
    Ok(Json(response))
}

pub async fn not_found_handler() -> AppError {
    AppError::NotFound
}

pub async fn method_not_allowed_handler() -> AppError {
    AppError::MethodNotAllowed
}
