// src/engine/assembler.rs

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use uuid::Uuid;

use crate::config::QUIZ_QUESTION_COUNT;
use crate::engine::QuizError;
use crate::models::question::Question;
use crate::models::session::{Session, SessionQuestion};

/// A fresh random 128-bit session id.
pub fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}

/// Samples `QUIZ_QUESTION_COUNT` questions from `pool` and builds a session.
///
/// `pool` pairs each question with its source topic. Fails with
/// `InsufficientQuestions` when the pool is too small; the `supported` list
/// is left empty for the caller to fill in.
pub fn assemble<R: Rng + ?Sized>(
    topic: &str,
    mut pool: Vec<(String, Question)>,
    created_at: DateTime<Utc>,
    rng: &mut R,
) -> Result<Session, QuizError> {
    if pool.len() < QUIZ_QUESTION_COUNT {
        return Err(QuizError::InsufficientQuestions {
            topic: topic.to_string(),
            available: pool.len(),
            required: QUIZ_QUESTION_COUNT,
            supported: Vec::new(),
        });
    }

    pool.shuffle(rng);
    pool.truncate(QUIZ_QUESTION_COUNT);

    let questions = pool
        .into_iter()
        .zip(1u32..)
        .map(|((source_topic, question), position)| SessionQuestion {
            position,
            source_topic,
            question,
        })
        .collect();

    Ok(Session {
        session_id: new_session_id(),
        topic: topic.to_string(),
        questions,
        created_at,
    })
}
