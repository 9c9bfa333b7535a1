// src/engine/mod.rs

//! Quiz assembly, session holding and scoring.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;

use crate::config::{AGGREGATE_TOPIC, QUIZ_QUESTION_COUNT, TIME_LIMIT_SECONDS};
use crate::models::quiz_result::{
    GeneratedQuiz, PersistenceOutcome, QuizResult, ScoredSubmission,
};
use crate::store::{ResultStore, StoreError};

pub mod assembler;
pub mod question_bank;
pub mod scorer;
pub mod session_cache;
pub mod topic_resolver;

use question_bank::QuestionBank;
use session_cache::SessionCache;
use topic_resolver::{Resolution, resolve_topic};

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("Either a topic or a keyword is required")]
    MissingTopic,

    #[error("Topic '{topic}' is not available: {available} question(s), {required} required")]
    InsufficientQuestions {
        topic: String,
        available: usize,
        required: usize,
        /// Topics that do have enough questions.
        supported: Vec<String>,
    },

    #[error("Quiz not found or expired")]
    SessionNotFound,

    #[error("session id collision on '{0}'")]
    SessionIdCollision(String),
}

/// Wires the question bank, session cache and result store together.
pub struct QuizEngine {
    bank: Arc<QuestionBank>,
    sessions: Arc<SessionCache>,
    store: Arc<dyn ResultStore>,
    persist_timeout: Duration,
}

impl QuizEngine {
    pub fn new(
        bank: Arc<QuestionBank>,
        sessions: Arc<SessionCache>,
        store: Arc<dyn ResultStore>,
        persist_timeout: Duration,
    ) -> Self {
        Self {
            bank,
            sessions,
            store,
            persist_timeout,
        }
    }

    pub fn sessions(&self) -> &Arc<SessionCache> {
        &self.sessions
    }

    pub fn store(&self) -> &Arc<dyn ResultStore> {
        &self.store
    }

    /// Canonical topics with enough questions for a full quiz.
    pub fn supported_topics(&self) -> Vec<(String, usize)> {
        self.bank.supported_topics(QUIZ_QUESTION_COUNT)
    }

    /// Resolves the requested subject, assembles a quiz and stores its session.
    ///
    /// `topic` is tried first, then `keyword`. When neither matches any topic
    /// the quiz is drawn from every question in the bank.
    pub async fn generate(
        &self,
        topic: Option<&str>,
        keyword: Option<&str>,
    ) -> Result<GeneratedQuiz, QuizError> {
        let inputs: Vec<&str> = [topic, keyword]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .collect();
        if inputs.is_empty() {
            return Err(QuizError::MissingTopic);
        }

        let resolved = inputs
            .iter()
            .find_map(|input| match resolve_topic(&self.bank, input) {
                Resolution::Topic(name) => Some(name),
                Resolution::NoMatch => None,
            });

        let (topic, pool) = match resolved {
            Some(name) => {
                let pool = self
                    .bank
                    .questions(&name)
                    .unwrap_or_default()
                    .iter()
                    .map(|q| (name.clone(), q.clone()))
                    .collect();
                (name, pool)
            }
            None => {
                tracing::info!(
                    "No topic matched {:?}, falling back to the aggregate pool",
                    inputs
                );
                (AGGREGATE_TOPIC.to_string(), self.bank.aggregate_pool())
            }
        };

        let session = {
            let mut rng = StdRng::from_rng(&mut rand::rng());
            assembler::assemble(&topic, pool, self.sessions.now(), &mut rng)
        }
        .map_err(|err| self.with_suggestions(err))?;

        let quiz = GeneratedQuiz {
            quiz_id: session.session_id.clone(),
            topic: session.topic.clone(),
            total_questions: session.questions.len() as u32,
            questions: session.public_questions(),
            time_limit_seconds: TIME_LIMIT_SECONDS,
        };

        self.sessions.put(session).await?;
        tracing::info!("Generated quiz {} on topic '{}'", quiz.quiz_id, quiz.topic);

        Ok(quiz)
    }

    /// Scores a submission and hands the result to the store when a user is
    /// attached. The result is returned whatever the store does.
    pub async fn submit(
        &self,
        quiz_id: &str,
        answers: &HashMap<u32, String>,
        user_id: Option<String>,
    ) -> Result<ScoredSubmission, QuizError> {
        let session = self
            .sessions
            .get(quiz_id)
            .await
            .ok_or(QuizError::SessionNotFound)?;

        let result = scorer::score_session(&session, answers, user_id, self.sessions.now());
        tracing::info!(
            "Scored quiz {}: {}/{} ({}%)",
            result.session_id,
            result.correct_count,
            result.total_questions,
            result.score
        );

        let persistence = self.persist(&result).await;
        Ok(ScoredSubmission {
            result,
            persistence,
        })
    }

    /// Awaits the store for at most `persist_timeout`, so a slow store delays
    /// the submit response by up to that long before it reports `Failed`.
    async fn persist(&self, result: &QuizResult) -> PersistenceOutcome {
        let Some(user_id) = result.user_id.as_deref() else {
            return PersistenceOutcome::Skipped;
        };

        let outcome =
            match tokio::time::timeout(self.persist_timeout, self.store.save(user_id, result))
                .await
            {
                Ok(Ok(())) => return PersistenceOutcome::Saved,
                Ok(Err(e)) => e,
                Err(_) => StoreError::Timeout(self.persist_timeout),
            };

        tracing::warn!(
            "Failed to save result of quiz {} for user {}: {}",
            result.session_id,
            user_id,
            outcome
        );
        PersistenceOutcome::Failed(outcome.to_string())
    }

    fn with_suggestions(&self, err: QuizError) -> QuizError {
        match err {
            QuizError::InsufficientQuestions {
                topic,
                available,
                required,
                ..
            } => QuizError::InsufficientQuestions {
                topic,
                available,
                required,
                supported: self
                    .supported_topics()
                    .into_iter()
                    .map(|(name, _)| name)
                    .collect(),
            },
            other => other,
        }
    }
}
