use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Longest `details` string sent to the browser. Full errors stay in the logs.
const MAX_DETAILS_CHARS: usize = 300;

const API_KEY_HINT: &str = "Check your GEMINI_API_KEY in .env file";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every failure is scoped to one request; the body is always
/// `{error, details, hint?}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("Advice generation failed: {0}")]
    Advice(String),

    #[error("Chat generation failed: {0}")]
    Chat(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details, hint) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "Not found", msg.clone(), None),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "Invalid request", msg.clone(), None)
            }
            AppError::Upload(msg) => (
                StatusCode::BAD_REQUEST,
                "Invalid transcript upload",
                msg.clone(),
                None,
            ),
            AppError::Advice(msg) => {
                tracing::error!("Error calling Gemini API for advice: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to generate advice",
                    truncate(msg),
                    Some(API_KEY_HINT),
                )
            }
            AppError::Chat(msg) => {
                tracing::error!("Error calling Gemini API for chat: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to generate chat response",
                    truncate(msg),
                    None,
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        let mut body = json!({
            "error": error,
            "details": details,
        });
        if let Some(hint) = hint {
            body["hint"] = json!(hint);
        }

        (status, Json(body)).into_response()
    }
}

fn truncate(details: &str) -> String {
    if details.chars().count() <= MAX_DETAILS_CHARS {
        return details.to_string();
    }
    let mut short: String = details.chars().take(MAX_DETAILS_CHARS).collect();
    short.push('…');
    short
}
