//! Error types for minigame-core.

use thiserror::Error;

/// Result type alias using ConfigurationError.
pub type Result<T> = std::result::Result<T, ConfigurationError>;

/// Errors raised when content handed to a session fails validation.
///
/// These are fatal to the session being set up; the caller renders an
/// empty/disabled state and does not retry. Intents arriving in a phase
/// that does not accept them are silent no-ops, not errors.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("no questions available")]
    NoQuestions,

    #[error("no flashcards available")]
    NoFlashcards,

    #[error("no match pairs available")]
    NoPairs,

    #[error("no quests available")]
    NoQuests,

    #[error("question {id}: options list is empty")]
    NoOptions { id: String },

    #[error("question {id}: duplicate option {option:?}")]
    DuplicateOption { id: String, option: String },

    #[error("question {id}: correct answer {answer:?} is not among the options")]
    AnswerNotInOptions { id: String, answer: String },

    #[error("duplicate pair id {id}")]
    DuplicatePairId { id: String },

    #[error("duplicate quest id {id}")]
    DuplicateQuestId { id: String },

    #[error("sentence target {id}: token list is empty")]
    EmptyTokens { id: String },

    #[error("sentence target {id}: tokens do not concatenate to the target text")]
    TokenMismatch { id: String },
}
