// src/handlers/history.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{engine::QuizEngine, error::AppError};

/// Lists a user's saved results, newest first.
pub async fn list_history(
    State(engine): State<Arc<QuizEngine>>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let history = engine.store().list_for_user(&user_id).await.map_err(|e| {
        tracing::error!("Failed to fetch history for {}: {}", user_id, e);
        AppError::from(e)
    })?;

    Ok(Json(history))
}

/// Deletes one saved result. Returns how many results the user has left.
pub async fn delete_history_entry(
    State(engine): State<Arc<QuizEngine>>,
    Path((user_id, quiz_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let remaining = engine.store().delete_one(&user_id, &quiz_id).await?;

    tracing::info!("Deleted quiz {} from history of {}", quiz_id, user_id);
    Ok(Json(serde_json::json!({
        "message": "Quiz deleted from history",
        "remaining": remaining
    })))
}

/// Deletes all saved results of a user.
pub async fn clear_history(
    State(engine): State<Arc<QuizEngine>>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = engine.store().delete_all(&user_id).await?;

    tracing::info!("Cleared {} result(s) from history of {}", deleted, user_id);
    Ok(Json(serde_json::json!({
        "message": "History cleared",
        "deleted": deleted
    })))
}
