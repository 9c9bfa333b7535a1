// src/engine/scorer.rs

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::models::quiz_result::{QuestionResult, QuizResult};
use crate::models::session::Session;

/// Percentage score rounded half-up: `(100 * correct + total / 2) / total`.
/// An empty quiz scores 0.
pub fn score_percentage(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (100 * correct + total / 2) / total
}

/// Scores a submission against the session's answer key.
///
/// Matching is exact and case-sensitive. Positions missing from `answers`
/// count as wrong; answers for positions outside the quiz are ignored.
pub fn score_session(
    session: &Session,
    answers: &HashMap<u32, String>,
    user_id: Option<String>,
    completed_at: DateTime<Utc>,
) -> QuizResult {
    let details: Vec<QuestionResult> = session
        .questions
        .iter()
        .map(|q| {
            let submitted = answers.get(&q.position).cloned();
            let is_correct = submitted.as_deref() == Some(q.question.correct_answer.as_str());
            QuestionResult {
                position: q.position,
                question_text: q.question.text.clone(),
                submitted_answer: submitted,
                correct_answer: q.question.correct_answer.clone(),
                is_correct,
                explanation: q.question.explanation.clone(),
            }
        })
        .collect();

    let correct_count = details.iter().filter(|d| d.is_correct).count() as u32;
    let total_questions = details.len() as u32;

    QuizResult {
        session_id: session.session_id.clone(),
        topic: session.topic.clone(),
        score: score_percentage(correct_count, total_questions),
        correct_count,
        total_questions,
        details,
        completed_at,
        user_id,
    }
}
