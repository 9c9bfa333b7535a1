// src/error.rs

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use crate::engine::QuizError;
use crate::store::StoreError;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request
    BadRequest(String),

    // 404 Not Found, optionally listing topics the client could ask for instead
    NotFound {
        message: String,
        supported_topics: Option<Vec<String>>,
    },

    // 503 Service Unavailable (history store down)
    ServiceUnavailable(String),
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound {
            message: message.into(),
            supported_topics: None,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal Server Error" }),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::NotFound {
                message,
                supported_topics: Some(topics),
            } => (
                StatusCode::NOT_FOUND,
                json!({ "error": message, "supportedTopics": topics }),
            ),
            AppError::NotFound { message, .. } => {
                (StatusCode::NOT_FOUND, json!({ "error": message }))
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::error!("History store unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    json!({ "error": "History is temporarily unavailable" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<QuizError> for AppError {
    fn from(err: QuizError) -> Self {
        match err {
            QuizError::MissingTopic => AppError::BadRequest(
                "Either 'topic' or 'keyword' must be provided".to_string(),
            ),
            QuizError::InsufficientQuestions {
                ref topic,
                ref supported,
                ..
            } => {
                tracing::info!("Quiz requested for unavailable topic: {}", err);
                AppError::NotFound {
                    message: format!("Topic '{}' is not available", topic),
                    supported_topics: Some(supported.clone()),
                }
            }
            QuizError::SessionNotFound => AppError::not_found(err.to_string()),
            QuizError::SessionIdCollision(_) => AppError::InternalServerError(err.to_string()),
        }
    }
}

/// Store failures on history paths have no fallback, so they surface.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => AppError::not_found(msg),
            StoreError::Database(_) | StoreError::Timeout(_) => {
                AppError::ServiceUnavailable(err.to_string())
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// Malformed bodies, wrong content types and missing fields all become 400s.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!("Rejected request body: {}", rejection.body_text());
        AppError::BadRequest(rejection.body_text())
    }
}
