//! Core content types shared by the game engines.
//!
//! All entities are immutable once loaded; sessions hold them by value and
//! never write back. Validation covers exactly the invariants the engines
//! rely on; anything beyond that is the content pipeline's job.

use crate::error::{ConfigurationError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Practice category a question is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Vocabulary,
    Grammar,
    Script,
}

impl Category {
    /// All categories, in the order quiz content is mixed from them.
    pub fn all() -> [Category; 3] {
        [Self::Vocabulary, Self::Grammar, Self::Script]
    }
}

/// A multiple-choice question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Question {
    /// Check the invariants a quiz session depends on: a non-empty,
    /// duplicate-free options list that contains the correct answer.
    pub fn validate(&self) -> Result<()> {
        if self.options.is_empty() {
            return Err(ConfigurationError::NoOptions {
                id: self.id.clone(),
            });
        }
        let mut seen = HashSet::new();
        for option in &self.options {
            if !seen.insert(option.as_str()) {
                return Err(ConfigurationError::DuplicateOption {
                    id: self.id.clone(),
                    option: option.clone(),
                });
            }
        }
        if !self.options.contains(&self.correct_answer) {
            return Err(ConfigurationError::AnswerNotInOptions {
                id: self.id.clone(),
                answer: self.correct_answer.clone(),
            });
        }
        Ok(())
    }
}

/// A vocabulary flashcard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: String,
    pub front: String,
    pub back: String,
    pub meaning: String,
}

/// One source/target pairing for the matching games.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchPair {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl MatchPair {
    /// Build a pair from a flashcard's front and meaning.
    pub fn from_flashcard(card: &Flashcard) -> Self {
        Self {
            id: card.id.clone(),
            source: card.front.clone(),
            target: card.meaning.clone(),
        }
    }
}

/// An example sentence attached to a grammar point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarExample {
    pub id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub romanization: Option<String>,
    pub translation: String,
}

/// A sentence to reassemble from shuffled tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentenceTarget {
    pub id: String,
    pub translation: String,
    pub text: String,
    pub tokens: Vec<String>,
}

impl SentenceTarget {
    /// Tokenize a grammar example character by character.
    ///
    /// Scripts without whitespace word boundaries (Devanagari, kana, kanji)
    /// get one block per character; the assembly game reads naturally either
    /// way.
    pub fn from_example(example: &GrammarExample) -> Self {
        Self {
            id: example.id.clone(),
            translation: example.translation.clone(),
            text: example.text.clone(),
            tokens: example.text.chars().map(String::from).collect(),
        }
    }

    /// Check that the token list is usable: non-empty and rebuilding the
    /// target text exactly when concatenated.
    pub fn validate(&self) -> Result<()> {
        if self.tokens.is_empty() {
            return Err(ConfigurationError::EmptyTokens {
                id: self.id.clone(),
            });
        }
        if self.tokens.concat() != self.text {
            return Err(ConfigurationError::TokenMismatch {
                id: self.id.clone(),
            });
        }
        Ok(())
    }
}
