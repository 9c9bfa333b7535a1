// src/models/quiz_result.rs

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::question::PublicQuestion;

/// Outcome of scoring a single question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    #[serde(rename = "questionId")]
    pub position: u32,
    #[serde(rename = "question")]
    pub question_text: String,
    /// `None` when the submission skipped this position.
    #[serde(rename = "userAnswer")]
    pub submitted_answer: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
    pub explanation: String,
}

/// The scored outcome of one submission. Never mutated after creation.
///
/// This is also the shape stored in `quiz_results` and returned by the
/// history endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    #[serde(rename = "quizId")]
    pub session_id: String,
    pub topic: String,
    /// Percentage score, 0-100.
    pub score: u32,
    #[serde(rename = "correctAnswers")]
    pub correct_count: u32,
    pub total_questions: u32,
    #[serde(rename = "results")]
    pub details: Vec<QuestionResult>,
    pub completed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// What happened when the scorer handed a result to durable storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceOutcome {
    Saved,
    /// Anonymous submission; nothing to store.
    Skipped,
    Failed(String),
}

impl PersistenceOutcome {
    pub fn warning(&self) -> Option<String> {
        match self {
            PersistenceOutcome::Failed(reason) => {
                Some(format!("Result could not be saved to history: {}", reason))
            }
            _ => None,
        }
    }
}

/// A scored result together with the outcome of the persist step.
#[derive(Debug, Clone)]
pub struct ScoredSubmission {
    pub result: QuizResult,
    pub persistence: PersistenceOutcome,
}

/// DTO for requesting a new quiz. At least one of the fields is required.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct GenerateQuizRequest {
    #[validate(length(max = 100, message = "Topic must be at most 100 characters."))]
    pub topic: Option<String>,
    #[validate(length(max = 100, message = "Keyword must be at most 100 characters."))]
    pub keyword: Option<String>,
}

/// DTO for returning a generated quiz.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuiz {
    pub quiz_id: String,
    pub topic: String,
    pub total_questions: u32,
    pub questions: Vec<PublicQuestion>,
    pub time_limit_seconds: u64,
}

/// DTO for submitting a quiz attempt.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizRequest {
    /// The id received from generate.
    #[validate(length(min = 1, max = 64, message = "quizId is required."))]
    pub quiz_id: String,

    /// User's answers map.
    /// Key: question position (1-based)
    /// Value: submitted answer text
    #[validate(custom(function = validate_answers))]
    pub answers: HashMap<u32, String>,

    #[validate(length(min = 1, max = 128))]
    pub user_id: Option<String>,
}

fn validate_answers(answers: &HashMap<u32, String>) -> Result<(), validator::ValidationError> {
    if answers.len() > 20 {
        return Err(validator::ValidationError::new("too_many_answers"));
    }
    for answer in answers.values() {
        if answer.chars().count() > 500 {
            return Err(validator::ValidationError::new("answer_too_long"));
        }
    }
    Ok(())
}

/// Response body for a submission.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizResponse {
    #[serde(flatten)]
    pub result: QuizResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persistence_warning: Option<String>,
}

impl From<ScoredSubmission> for SubmitQuizResponse {
    fn from(scored: ScoredSubmission) -> Self {
        Self {
            persistence_warning: scored.persistence.warning(),
            result: scored.result,
        }
    }
}
