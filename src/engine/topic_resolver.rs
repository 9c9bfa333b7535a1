// src/engine/topic_resolver.rs

use crate::engine::question_bank::{QuestionBank, normalize};

/// Result of mapping free text onto the topic registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Topic(String),
    /// Nothing matched; callers fall back to the aggregate pool.
    NoMatch,
}

/// Maps a free-text subject onto a canonical topic.
///
/// Precedence: exact name or alias, then keyword tokens, then substring of a
/// canonical name. Scans walk topics in declaration order, so the first
/// declared topic wins ties.
pub fn resolve_topic(bank: &QuestionBank, input: &str) -> Resolution {
    let needle = normalize(input);
    if needle.is_empty() {
        return Resolution::NoMatch;
    }

    if let Some(topic) = bank.canonical(&needle) {
        return Resolution::Topic(topic.to_string());
    }

    for topic in bank.topics() {
        let hit = topic
            .keywords
            .iter()
            .any(|kw| needle.contains(kw.as_str()) || kw.contains(needle.as_str()));
        if hit {
            return Resolution::Topic(topic.name.clone());
        }
    }

    for topic in bank.topics() {
        if needle.contains(topic.name.as_str()) || topic.name.contains(needle.as_str()) {
            return Resolution::Topic(topic.name.clone());
        }
    }

    Resolution::NoMatch
}
