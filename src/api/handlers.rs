//! HTTP request handlers

use super::types::{
    ErrorResponse, GenerateRequest, GenerateResponse, HistoryEntry, StatusResponse,
    WelcomeResponse,
};
use super::AppState;
use crate::imagegen::{engineer_prompt, reply_text};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(welcome))
        // Connectivity probe for the frontend
        .route("/api/test", get(test_connection))
        .route("/api/history", get(get_history))
        .route("/api/generate", post(generate))
        .with_state(state)
}

async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to the AI Tattoo Designer Backend!",
    })
}

async fn test_connection() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "Success",
        data: "Backend is running and talking to the tattoo API!",
    })
}

// ============================================================
// History
// ============================================================

async fn get_history(State(state): State<AppState>) -> Result<Json<Vec<HistoryEntry>>, AppError> {
    let turns = state
        .db
        .list_turns()
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(turns.into_iter().map(HistoryEntry::from).collect()))
}

// ============================================================
// Generation
// ============================================================

async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    let Json(req) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let prompt = req.prompt.trim();
    if prompt.is_empty() {
        return Err(AppError::BadRequest("Prompt must not be empty".to_string()));
    }

    let generator = state.generator.as_ref().ok_or_else(|| {
        AppError::Unavailable("Image generation is not configured".to_string())
    })?;

    let engineered = engineer_prompt(prompt);
    let image = generator.generate(&engineered).await.map_err(|e| {
        tracing::warn!(kind = e.kind.as_str(), error = %e.message, "Design generation failed");
        AppError::BadGateway(format!("Image generation failed: {}", e.message))
    })?;

    let text = reply_text(prompt);
    let (user, ai) = state
        .db
        .record_exchange(prompt, &text, Some(&image.url), Some(&engineered))
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::info!(user_turn = user.id, ai_turn = ai.id, "Exchange recorded");

    Ok(Json(GenerateResponse {
        text,
        image_url: Some(image.url),
    }))
}

// ============================================================
// Error Handling
// ============================================================

enum AppError {
    BadRequest(String),
    BadGateway(String),
    Unavailable(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
