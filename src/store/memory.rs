// src/store/memory.rs

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::quiz_result::QuizResult;
use crate::store::{ResultStore, StoreError, history_not_found};

/// Process-local result store. Used when no database is configured and in tests.
#[derive(Debug, Default)]
pub struct MemoryResultStore {
    results: RwLock<HashMap<String, Vec<QuizResult>>>,
}

impl MemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResultStore for MemoryResultStore {
    async fn save(&self, user_id: &str, result: &QuizResult) -> Result<(), StoreError> {
        let mut results = self.results.write().await;
        let history = results.entry(user_id.to_string()).or_default();

        let mut stored = result.clone();
        stored.user_id = Some(user_id.to_string());

        match history
            .iter_mut()
            .find(|r| r.session_id == stored.session_id)
        {
            Some(existing) => *existing = stored,
            None => history.push(stored),
        }
        Ok(())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<QuizResult>, StoreError> {
        let results = self.results.read().await;
        let mut history = results.get(user_id).cloned().unwrap_or_default();
        history.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        Ok(history)
    }

    async fn delete_one(&self, user_id: &str, quiz_id: &str) -> Result<u64, StoreError> {
        let mut results = self.results.write().await;
        let history = results.get_mut(user_id).ok_or_else(history_not_found)?;

        let before = history.len();
        history.retain(|r| r.session_id != quiz_id);
        if history.len() == before {
            return Err(history_not_found());
        }
        Ok(history.len() as u64)
    }

    async fn delete_all(&self, user_id: &str) -> Result<u64, StoreError> {
        let mut results = self.results.write().await;
        Ok(results
            .remove(user_id)
            .map(|history| history.len() as u64)
            .unwrap_or(0))
    }
}
