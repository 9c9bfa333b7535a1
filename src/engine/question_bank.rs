// src/engine/question_bank.rs

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::models::question::{Question, QuestionType};

/// Errors raised while loading the question bank at startup.
#[derive(Debug, Error)]
pub enum BankError {
    #[error("failed to read question bank: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse question bank: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("topic name cannot be empty")]
    EmptyTopicName,

    #[error("topic '{0}' is declared more than once")]
    DuplicateTopic(String),

    #[error("alias '{alias}' is claimed by both '{first}' and '{second}'")]
    ConflictingAlias {
        alias: String,
        first: String,
        second: String,
    },

    #[error("question {index} of topic '{topic}' is invalid: {reason}")]
    InvalidQuestion {
        topic: String,
        index: usize,
        reason: &'static str,
    },
}

/// One canonical topic with its matching hints and questions.
#[derive(Debug, Clone, Deserialize)]
pub struct TopicDefinition {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Deserialize)]
struct BankDocument {
    topics: Vec<TopicDefinition>,
}

/// Read-only registry of canonical topics.
///
/// Topic declaration order is preserved; keyword and substring scans in the
/// resolver walk topics in this order.
#[derive(Debug, Default)]
pub struct QuestionBank {
    topics: Vec<TopicDefinition>,
    /// Canonical names and aliases, normalized, mapped to an index in `topics`.
    lookup: HashMap<String, usize>,
}

pub fn normalize(input: &str) -> String {
    input.trim().to_lowercase()
}

impl QuestionBank {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BankError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, BankError> {
        let doc: BankDocument = serde_json::from_str(raw)?;
        Self::from_topics(doc.topics)
    }

    pub fn from_topics(definitions: Vec<TopicDefinition>) -> Result<Self, BankError> {
        let mut topics = Vec::with_capacity(definitions.len());
        let mut lookup: HashMap<String, usize> = HashMap::new();

        for (idx, def) in definitions.into_iter().enumerate() {
            let name = normalize(&def.name);
            if name.is_empty() {
                return Err(BankError::EmptyTopicName);
            }
            if let Some(&existing) = lookup.get(&name) {
                let owner: &TopicDefinition = &topics[existing];
                if owner.name == name {
                    return Err(BankError::DuplicateTopic(name));
                }
                return Err(BankError::ConflictingAlias {
                    alias: name.clone(),
                    first: owner.name.clone(),
                    second: name,
                });
            }
            lookup.insert(name.clone(), idx);

            let mut aliases = Vec::with_capacity(def.aliases.len());
            for alias in def.aliases.iter().map(|a| normalize(a)) {
                if alias.is_empty() {
                    continue;
                }
                match lookup.get(&alias) {
                    Some(&owner) if owner == idx => {}
                    Some(&owner) => {
                        return Err(BankError::ConflictingAlias {
                            alias,
                            first: topics[owner].name.clone(),
                            second: name,
                        });
                    }
                    None => {
                        lookup.insert(alias.clone(), idx);
                    }
                }
                aliases.push(alias);
            }

            let keywords = def
                .keywords
                .iter()
                .map(|k| normalize(k))
                .filter(|k| !k.is_empty())
                .collect();

            for (q_idx, question) in def.questions.iter().enumerate() {
                check_question(&name, q_idx, question)?;
            }

            topics.push(TopicDefinition {
                name,
                aliases,
                keywords,
                questions: def.questions,
            });
        }

        Ok(Self { topics, lookup })
    }

    /// Exact lookup of a normalized canonical name or alias.
    pub fn canonical(&self, normalized: &str) -> Option<&str> {
        self.lookup
            .get(normalized)
            .map(|&idx| self.topics[idx].name.as_str())
    }

    /// Topics in declaration order.
    pub fn topics(&self) -> &[TopicDefinition] {
        &self.topics
    }

    pub fn questions(&self, topic: &str) -> Option<&[Question]> {
        self.topics
            .iter()
            .find(|t| t.name == topic)
            .map(|t| t.questions.as_slice())
    }

    /// Topics holding at least `min_questions` questions, with their counts.
    pub fn supported_topics(&self, min_questions: usize) -> Vec<(String, usize)> {
        self.topics
            .iter()
            .filter(|t| t.questions.len() >= min_questions)
            .map(|t| (t.name.clone(), t.questions.len()))
            .collect()
    }

    /// Every question across every topic, tagged with its source topic.
    pub fn aggregate_pool(&self) -> Vec<(String, Question)> {
        self.topics
            .iter()
            .flat_map(|t| t.questions.iter().map(|q| (t.name.clone(), q.clone())))
            .collect()
    }

    pub fn question_count(&self) -> usize {
        self.topics.iter().map(|t| t.questions.len()).sum()
    }
}

fn check_question(topic: &str, index: usize, question: &Question) -> Result<(), BankError> {
    let invalid = |reason| BankError::InvalidQuestion {
        topic: topic.to_string(),
        index,
        reason,
    };

    if question.text.trim().is_empty() {
        return Err(invalid("text is empty"));
    }
    if question.correct_answer.is_empty() {
        return Err(invalid("correct answer is empty"));
    }
    if question.question_type != QuestionType::ShortAnswer
        && !question.options.is_empty()
        && !question.options.contains(&question.correct_answer)
    {
        tracing::warn!(
            "Question {} of topic '{}' has no option matching its correct answer",
            index,
            topic
        );
    }
    Ok(())
}
