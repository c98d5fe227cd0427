//! Flashcard sprint engine.
//!
//! A timed self-report loop: flip the card, mark it known or unknown, move
//! on. The round ends when the deck runs out or the clock does, whichever
//! comes first. No per-card difficulty carries over between rounds; spaced
//! repetition lives in the content pipeline.

use crate::clock::{SessionClock, Tick};
use crate::error::{ConfigurationError, Result};
use crate::scoring::{Outcome, ScoringPolicy, SprintScoring};
use crate::settings::EffectiveSettings;
use crate::types::Flashcard;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use tracing::debug;

/// Discrete state of a sprint session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SprintPhase {
    NotStarted,
    Active,
    Completed,
}

/// One run of a flashcard sprint.
pub struct SprintSession {
    cards: Vec<Flashcard>,
    index: usize,
    show_front: bool,
    raw_score: i32,
    phase: SprintPhase,
    clock: SessionClock,
    window_secs: u32,
    policy: Box<dyn ScoringPolicy>,
    rng: StdRng,
}

impl SprintSession {
    pub fn new(settings: &EffectiveSettings) -> Self {
        Self::build(
            settings.sprint_seconds,
            Box::new(SprintScoring),
            StdRng::from_entropy(),
        )
    }

    /// Session with a deterministic deck shuffle.
    pub fn new_seeded(settings: &EffectiveSettings, seed: u64) -> Self {
        Self::build(
            settings.sprint_seconds,
            Box::new(SprintScoring),
            StdRng::seed_from_u64(seed),
        )
    }

    /// Session with a caller-supplied scoring policy.
    pub fn with_policy(settings: &EffectiveSettings, policy: Box<dyn ScoringPolicy>) -> Self {
        Self::build(settings.sprint_seconds, policy, StdRng::from_entropy())
    }

    fn build(window_secs: u32, policy: Box<dyn ScoringPolicy>, rng: StdRng) -> Self {
        Self {
            cards: Vec::new(),
            index: 0,
            show_front: true,
            raw_score: 0,
            phase: SprintPhase::NotStarted,
            clock: SessionClock::new(),
            window_secs,
            policy,
            rng,
        }
    }

    /// Shuffle the deck and open the countdown window.
    pub fn start(&mut self, cards: Vec<Flashcard>) -> Result<()> {
        if cards.is_empty() {
            return Err(ConfigurationError::NoFlashcards);
        }
        self.cards = cards;
        self.cards.shuffle(&mut self.rng);
        self.index = 0;
        self.show_front = true;
        self.raw_score = 0;
        self.phase = SprintPhase::Active;
        self.clock.start(self.window_secs);
        debug!(
            cards = self.cards.len(),
            window_secs = self.window_secs,
            "sprint started"
        );
        Ok(())
    }

    /// Turn the current card over (or back).
    pub fn flip(&mut self) {
        if self.phase != SprintPhase::Active {
            return;
        }
        self.show_front = !self.show_front;
    }

    /// Mark the current card as recalled and advance.
    pub fn mark_known(&mut self) {
        self.mark(Outcome::Correct);
    }

    /// Mark the current card as missed and advance.
    pub fn mark_unknown(&mut self) {
        self.mark(Outcome::Incorrect);
    }

    fn mark(&mut self, outcome: Outcome) {
        if self.phase != SprintPhase::Active {
            return;
        }
        self.raw_score += self.policy.delta(outcome);
        self.index += 1;
        self.show_front = true;
        if self.index == self.cards.len() {
            self.complete("deck exhausted");
        }
    }

    /// Advance the countdown by one second; expiry ends the round.
    pub fn tick(&mut self) -> Tick {
        if self.phase != SprintPhase::Active {
            return Tick::Ignored;
        }
        let outcome = self.clock.tick();
        if outcome == Tick::Expired {
            self.complete("clock expired");
        }
        outcome
    }

    /// Reshuffle the deck and run another round from zero.
    pub fn restart(&mut self) {
        if self.cards.is_empty() {
            return;
        }
        let cards = std::mem::take(&mut self.cards);
        // Cannot fail: the deck was non-empty on the way in.
        let _ = self.start(cards);
    }

    fn complete(&mut self, reason: &str) {
        self.phase = SprintPhase::Completed;
        self.clock.cancel();
        debug!(score = self.score(), cards = self.index, reason, "sprint completed");
    }

    pub fn phase(&self) -> SprintPhase {
        self.phase
    }

    pub fn score(&self) -> i32 {
        self.policy.clamp(self.raw_score)
    }

    pub fn show_front(&self) -> bool {
        self.show_front
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.clock.remaining()
    }

    pub fn current_card(&self) -> Option<&Flashcard> {
        match self.phase {
            SprintPhase::Active => self.cards.get(self.index),
            _ => None,
        }
    }

    /// Average pace over the window, for the results screen. Only available
    /// once the round is over and at least one card scored.
    pub fn seconds_per_card(&self) -> Option<f64> {
        if self.phase == SprintPhase::Completed && self.score() > 0 {
            Some(f64::from(self.window_secs) / f64::from(self.score()))
        } else {
            None
        }
    }

    /// Immutable render state.
    pub fn snapshot(&self) -> SprintSnapshot {
        SprintSnapshot {
            phase: self.phase,
            index: self.index,
            total_cards: self.cards.len(),
            score: self.score(),
            show_front: self.show_front,
            current_card: self.current_card().cloned(),
            remaining_seconds: self.remaining_seconds(),
            seconds_per_card: self.seconds_per_card(),
        }
    }
}

/// Render snapshot of a sprint session.
#[derive(Debug, Clone, Serialize)]
pub struct SprintSnapshot {
    pub phase: SprintPhase,
    pub index: usize,
    pub total_cards: usize,
    pub score: i32,
    pub show_front: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_card: Option<Flashcard>,
    pub remaining_seconds: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seconds_per_card: Option<f64>,
}
