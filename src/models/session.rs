// src/models/session.rs

use chrono::{DateTime, Utc};

use crate::models::question::{PublicQuestion, Question};

/// A question placed into a quiz, together with its answer key.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionQuestion {
    /// Stable 1-based position; doubles as the public question id.
    pub position: u32,
    /// Topic the question was drawn from. Differs from the session topic
    /// only for quizzes built from the aggregate pool.
    pub source_topic: String,
    pub question: Question,
}

impl SessionQuestion {
    /// Answer-free view of this question.
    pub fn to_public(&self) -> PublicQuestion {
        PublicQuestion {
            id: self.position,
            question: self.question.text.clone(),
            options: self.question.options.clone(),
            question_type: self.question.question_type,
        }
    }
}

/// A quiz in flight, held by the session cache between issue and scoring.
#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: String,
    pub topic: String,
    pub questions: Vec<SessionQuestion>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn public_questions(&self) -> Vec<PublicQuestion> {
        self.questions.iter().map(SessionQuestion::to_public).collect()
    }
}
