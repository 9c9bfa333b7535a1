// src/store/mod.rs

//! Durable storage for scored quiz results.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::quiz_result::QuizResult;

pub mod memory;
pub mod postgres;

pub use memory::MemoryResultStore;
pub use postgres::PgResultStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store did not respond within {0:?}")]
    Timeout(Duration),
}

/// Persistence collaborator for quiz results, keyed by user.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Stores a result for `user_id`. Submitting the same quiz again
    /// replaces the earlier result.
    async fn save(&self, user_id: &str, result: &QuizResult) -> Result<(), StoreError>;

    /// All results for a user, newest `completed_at` first.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<QuizResult>, StoreError>;

    /// Deletes one result and returns how many the user has left.
    /// Fails with `NotFound` when nothing matched.
    async fn delete_one(&self, user_id: &str, quiz_id: &str) -> Result<u64, StoreError>;

    /// Deletes every result for a user and returns how many were removed.
    async fn delete_all(&self, user_id: &str) -> Result<u64, StoreError>;
}

pub(crate) fn history_not_found() -> StoreError {
    StoreError::NotFound("Quiz not found in history".to_string())
}
