//! Scoring policies for the mini-games.
//!
//! A policy is a pure outcome → delta mapping. Sessions accumulate the
//! signed sum of deltas and clamp to the policy floor only when exposing the
//! score, so the displayed total is independent of answer order.

use serde::{Deserialize, Serialize};

/// Outcome of a single answer, match attempt, or card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Correct,
    Incorrect,
}

impl Outcome {
    /// Map a correctness flag to an outcome.
    pub fn from_correct(correct: bool) -> Self {
        if correct { Self::Correct } else { Self::Incorrect }
    }
}

/// Trait for per-game scoring rulesets.
pub trait ScoringPolicy: Send + Sync {
    /// Policy identifier.
    fn name(&self) -> &'static str;

    /// Score delta for one outcome.
    fn delta(&self, outcome: Outcome) -> i32;

    /// Lower bound applied when exposing the accumulated total.
    fn floor(&self) -> Option<i32> {
        None
    }

    /// Clamp an accumulated delta sum for display.
    fn clamp(&self, total: i32) -> i32 {
        match self.floor() {
            Some(floor) => total.max(floor),
            None => total,
        }
    }
}

/// Simple quiz ruleset: +1 correct, 0 incorrect.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuizScoring;

impl ScoringPolicy for QuizScoring {
    fn name(&self) -> &'static str {
        "quiz"
    }

    fn delta(&self, outcome: Outcome) -> i32 {
        match outcome {
            Outcome::Correct => 1,
            Outcome::Incorrect => 0,
        }
    }
}

/// Time attack ruleset: +10 correct, −5 incorrect, total never below 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeAttackScoring;

impl ScoringPolicy for TimeAttackScoring {
    fn name(&self) -> &'static str {
        "time_attack"
    }

    fn delta(&self, outcome: Outcome) -> i32 {
        match outcome {
            Outcome::Correct => 10,
            Outcome::Incorrect => -5,
        }
    }

    fn floor(&self) -> Option<i32> {
        Some(0)
    }
}

/// Matching ruleset: +10 per matched pair, mismatches are free.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchingScoring;

impl ScoringPolicy for MatchingScoring {
    fn name(&self) -> &'static str {
        "matching"
    }

    fn delta(&self, outcome: Outcome) -> i32 {
        match outcome {
            Outcome::Correct => 10,
            Outcome::Incorrect => 0,
        }
    }
}

/// Sentence assembly ruleset: +1 per fully correct sentence.
#[derive(Debug, Clone, Copy, Default)]
pub struct SentenceScoring;

impl ScoringPolicy for SentenceScoring {
    fn name(&self) -> &'static str {
        "sentence"
    }

    fn delta(&self, outcome: Outcome) -> i32 {
        match outcome {
            Outcome::Correct => 1,
            Outcome::Incorrect => 0,
        }
    }
}

/// Flashcard sprint ruleset: +1 per card marked known.
#[derive(Debug, Clone, Copy, Default)]
pub struct SprintScoring;

impl ScoringPolicy for SprintScoring {
    fn name(&self) -> &'static str {
        "sprint"
    }

    fn delta(&self, outcome: Outcome) -> i32 {
        match outcome {
            Outcome::Correct => 1,
            Outcome::Incorrect => 0,
        }
    }
}

/// Get a scoring policy by name.
pub fn get_policy(name: &str) -> Option<Box<dyn ScoringPolicy>> {
    match name {
        "quiz" => Some(Box::new(QuizScoring)),
        "time_attack" => Some(Box::new(TimeAttackScoring)),
        "matching" => Some(Box::new(MatchingScoring)),
        "sentence" => Some(Box::new(SentenceScoring)),
        "sprint" => Some(Box::new(SprintScoring)),
        _ => None,
    }
}
