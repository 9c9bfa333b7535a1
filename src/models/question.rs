// src/models/question.rs

use serde::{Deserialize, Serialize};

/// How a question is presented to the player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    #[default]
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
}

/// A question as stored in the question bank.
///
/// Carries the answer key, so it must never be sent to a client as-is;
/// use [`PublicQuestion`] for that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// The text content of the question.
    pub text: String,

    /// Ordered list of options. Empty for short-answer questions.
    #[serde(default)]
    pub options: Vec<String>,

    /// The exact answer string a submission must match.
    pub correct_answer: String,

    /// Explanation shown after scoring.
    #[serde(default)]
    pub explanation: String,

    #[serde(rename = "type", default)]
    pub question_type: QuestionType,
}

/// DTO for sending a question to the client (excludes answer and explanation).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicQuestion {
    /// 1-based position within the quiz.
    pub id: u32,
    pub question: String,
    pub options: Vec<String>,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
}
