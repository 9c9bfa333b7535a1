// src/handlers/quiz.rs

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;
use validator::Validate;

use crate::{
    engine::QuizEngine,
    error::AppError,
    extractors::AppJson,
    models::quiz_result::{GenerateQuizRequest, SubmitQuizRequest, SubmitQuizResponse},
};

/// Generates a 10-question quiz for the requested topic or keyword.
///
/// Returns the questions without correct answers or explanations; the answer
/// key stays in the session cache until the quiz expires.
pub async fn generate_quiz(
    State(engine): State<Arc<QuizEngine>>,
    AppJson(req): AppJson<GenerateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let quiz = engine
        .generate(req.topic.as_deref(), req.keyword.as_deref())
        .await?;

    Ok(Json(quiz))
}

/// Scores a quiz attempt.
///
/// * Compares answers with the session's answer key (exact match).
/// * Score is the rounded percentage of correct answers.
/// * When `userId` is present the result is saved to history. A failed save
///   is reported in `persistenceWarning`; the score is returned regardless.
pub async fn submit_quiz(
    State(engine): State<Arc<QuizEngine>>,
    AppJson(req): AppJson<SubmitQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let scored = engine
        .submit(&req.quiz_id, &req.answers, req.user_id)
        .await?;

    Ok(Json(SubmitQuizResponse::from(scored)))
}

/// Lists topics that currently have enough questions for a quiz.
pub async fn list_topics(State(engine): State<Arc<QuizEngine>>) -> impl IntoResponse {
    let topics: Vec<_> = engine
        .supported_topics()
        .into_iter()
        .map(|(topic, count)| json!({ "topic": topic, "questionCount": count }))
        .collect();

    Json(json!({ "topics": topics }))
}

/// Liveness probe with the number of quizzes currently in flight.
pub async fn health(State(engine): State<Arc<QuizEngine>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "activeSessions": engine.sessions().len().await,
    }))
}
