// src/store/postgres.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, types::Json};

use crate::models::quiz_result::{QuestionResult, QuizResult};
use crate::store::{ResultStore, StoreError, history_not_found};

/// Represents a row of the 'quiz_results' table.
#[derive(Debug, FromRow)]
struct QuizResultRow {
    user_id: String,
    quiz_id: String,
    topic: String,
    score: i32,
    correct_answers: i32,
    total_questions: i32,
    /// Per-question details, stored as a JSON array.
    results: Json<Vec<QuestionResult>>,
    completed_at: DateTime<Utc>,
}

impl From<QuizResultRow> for QuizResult {
    fn from(row: QuizResultRow) -> Self {
        QuizResult {
            session_id: row.quiz_id,
            topic: row.topic,
            score: row.score.max(0) as u32,
            correct_count: row.correct_answers.max(0) as u32,
            total_questions: row.total_questions.max(0) as u32,
            details: row.results.0,
            completed_at: row.completed_at,
            user_id: Some(row.user_id),
        }
    }
}

/// Result store backed by Postgres.
#[derive(Debug, Clone)]
pub struct PgResultStore {
    pool: PgPool,
}

impl PgResultStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResultStore for PgResultStore {
    async fn save(&self, user_id: &str, result: &QuizResult) -> Result<(), StoreError> {
        // Upsert: a resubmitted quiz replaces the earlier result.
        sqlx::query(
            r#"
            INSERT INTO quiz_results
                (user_id, quiz_id, topic, score, correct_answers, total_questions, results, completed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (user_id, quiz_id) DO UPDATE SET
                topic = EXCLUDED.topic,
                score = EXCLUDED.score,
                correct_answers = EXCLUDED.correct_answers,
                total_questions = EXCLUDED.total_questions,
                results = EXCLUDED.results,
                completed_at = EXCLUDED.completed_at,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(user_id)
        .bind(&result.session_id)
        .bind(&result.topic)
        .bind(result.score as i32)
        .bind(result.correct_count as i32)
        .bind(result.total_questions as i32)
        .bind(Json(&result.details))
        .bind(result.completed_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<QuizResult>, StoreError> {
        let rows: Vec<QuizResultRow> = sqlx::query_as(
            r#"
            SELECT user_id, quiz_id, topic, score, correct_answers, total_questions,
                   results, completed_at
            FROM quiz_results
            WHERE user_id = $1
            ORDER BY completed_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(QuizResult::from).collect())
    }

    async fn delete_one(&self, user_id: &str, quiz_id: &str) -> Result<u64, StoreError> {
        // The delete and the count share one transaction so `remaining`
        // matches the history this delete left behind.
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM quiz_results WHERE user_id = $1 AND quiz_id = $2")
            .bind(user_id)
            .bind(quiz_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(history_not_found());
        }

        let remaining: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM quiz_results WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&mut *tx)
                .await?;

        tx.commit().await?;

        Ok(remaining.max(0) as u64)
    }

    async fn delete_all(&self, user_id: &str) -> Result<u64, StoreError> {
        let deleted = sqlx::query("DELETE FROM quiz_results WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted)
    }
}
