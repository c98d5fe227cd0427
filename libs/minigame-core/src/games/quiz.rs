//! Quiz session engine.
//!
//! Linear traversal of a shuffled question sequence with per-question
//! feedback. Powers Quick Quiz (untimed, +1 per correct answer) and Time
//! Attack (bound to a countdown, +10/−5). One answer per question: a second
//! tap while feedback is showing is dropped.

use crate::clock::{SessionClock, Tick};
use crate::error::{ConfigurationError, Result};
use crate::scoring::{Outcome, QuizScoring, ScoringPolicy, TimeAttackScoring};
use crate::settings::EffectiveSettings;
use crate::types::Question;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use tracing::debug;

/// Discrete state of a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizPhase {
    NotStarted,
    Active,
    ShowingFeedback,
    Completed,
}

/// One run of a quiz or time attack game.
pub struct QuizSession {
    questions: Vec<Question>,
    index: usize,
    raw_score: i32,
    selected_answer: Option<String>,
    last_correct: Option<bool>,
    phase: QuizPhase,
    policy: Box<dyn ScoringPolicy>,
    clock: Option<SessionClock>,
    window_secs: u32,
    rng: StdRng,
}

impl QuizSession {
    /// Untimed quick quiz.
    pub fn quick_quiz() -> Self {
        Self::build(Box::new(QuizScoring), None, StdRng::from_entropy())
    }

    /// Untimed quick quiz with a deterministic shuffle.
    pub fn quick_quiz_seeded(seed: u64) -> Self {
        Self::build(Box::new(QuizScoring), None, StdRng::seed_from_u64(seed))
    }

    /// Time attack bound to a countdown window.
    pub fn time_attack(settings: &EffectiveSettings) -> Self {
        Self::build(
            Box::new(TimeAttackScoring),
            Some(settings.time_attack_seconds),
            StdRng::from_entropy(),
        )
    }

    /// Time attack with a deterministic shuffle.
    pub fn time_attack_seeded(settings: &EffectiveSettings, seed: u64) -> Self {
        Self::build(
            Box::new(TimeAttackScoring),
            Some(settings.time_attack_seconds),
            StdRng::seed_from_u64(seed),
        )
    }

    /// Session with a caller-supplied scoring policy, optionally timed.
    pub fn with_policy(policy: Box<dyn ScoringPolicy>, window_secs: Option<u32>) -> Self {
        Self::build(policy, window_secs, StdRng::from_entropy())
    }

    fn build(policy: Box<dyn ScoringPolicy>, window_secs: Option<u32>, rng: StdRng) -> Self {
        Self {
            questions: Vec::new(),
            index: 0,
            raw_score: 0,
            selected_answer: None,
            last_correct: None,
            phase: QuizPhase::NotStarted,
            policy,
            clock: window_secs.map(|_| SessionClock::new()),
            window_secs: window_secs.unwrap_or(0),
            rng,
        }
    }

    /// Begin a session over the given questions.
    ///
    /// Shuffles once; the order is fixed for the rest of the session. An
    /// empty or invalid question set leaves the session in `NotStarted`.
    pub fn start(&mut self, questions: Vec<Question>) -> Result<()> {
        if questions.is_empty() {
            return Err(ConfigurationError::NoQuestions);
        }
        for question in &questions {
            question.validate()?;
        }
        self.questions = questions;
        self.questions.shuffle(&mut self.rng);
        self.index = 0;
        self.raw_score = 0;
        self.selected_answer = None;
        self.last_correct = None;
        self.phase = QuizPhase::Active;
        if let Some(clock) = &mut self.clock {
            clock.start(self.window_secs);
        }
        debug!(
            policy = self.policy.name(),
            questions = self.questions.len(),
            "quiz session started"
        );
        Ok(())
    }

    /// Record the answer for the current question and show feedback.
    ///
    /// Dropped outside the `Active` phase, so a double-tap or a tap racing
    /// the feedback overlay cannot score twice.
    pub fn select_answer(&mut self, answer: &str) {
        if self.phase != QuizPhase::Active {
            return;
        }
        let correct = answer == self.questions[self.index].correct_answer;
        self.raw_score += self.policy.delta(Outcome::from_correct(correct));
        self.selected_answer = Some(answer.to_string());
        self.last_correct = Some(correct);
        self.phase = QuizPhase::ShowingFeedback;
    }

    /// Move past the feedback to the next question, or finish.
    pub fn advance(&mut self) {
        if self.phase != QuizPhase::ShowingFeedback {
            return;
        }
        self.index += 1;
        self.selected_answer = None;
        self.last_correct = None;
        if self.index == self.questions.len() {
            self.complete();
        } else {
            self.phase = QuizPhase::Active;
        }
    }

    /// Advance the bound clock by one second.
    ///
    /// Expiry forces `Completed` wherever the session is, preserving the
    /// score; `questions_answered` stays at the current index. Untimed
    /// sessions ignore ticks.
    pub fn tick(&mut self) -> Tick {
        let Some(clock) = &mut self.clock else {
            return Tick::Ignored;
        };
        if matches!(self.phase, QuizPhase::NotStarted | QuizPhase::Completed) {
            return Tick::Ignored;
        }
        let outcome = clock.tick();
        if outcome == Tick::Expired {
            self.phase = QuizPhase::Completed;
            debug!(
                score = self.score(),
                answered = self.index,
                "time attack expired"
            );
        }
        outcome
    }

    /// Reshuffle the same questions and run again. No-op before `start`.
    pub fn restart(&mut self) {
        if self.questions.is_empty() {
            return;
        }
        let questions = std::mem::take(&mut self.questions);
        // Cannot fail: the set was validated on the way in.
        let _ = self.start(questions);
    }

    fn complete(&mut self) {
        self.phase = QuizPhase::Completed;
        if let Some(clock) = &mut self.clock {
            clock.cancel();
        }
        debug!(
            score = self.score(),
            answered = self.index,
            "quiz session completed"
        );
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    /// Accumulated score, clamped to the policy floor.
    pub fn score(&self) -> i32 {
        self.policy.clamp(self.raw_score)
    }

    /// Questions fully answered and advanced past.
    pub fn questions_answered(&self) -> usize {
        self.index
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            QuizPhase::Active | QuizPhase::ShowingFeedback => self.questions.get(self.index),
            _ => None,
        }
    }

    pub fn remaining_seconds(&self) -> Option<u32> {
        self.clock.as_ref().map(SessionClock::remaining)
    }

    /// Immutable render state.
    pub fn snapshot(&self) -> QuizSnapshot {
        QuizSnapshot {
            phase: self.phase,
            index: self.index,
            total_questions: self.questions.len(),
            score: self.score(),
            questions_answered: self.index,
            current_question: self.current_question().cloned(),
            selected_answer: self.selected_answer.clone(),
            last_correct: self.last_correct,
            remaining_seconds: self.remaining_seconds(),
        }
    }
}

/// Render snapshot of a quiz session.
#[derive(Debug, Clone, Serialize)]
pub struct QuizSnapshot {
    pub phase: QuizPhase,
    pub index: usize,
    pub total_questions: usize,
    pub score: i32,
    pub questions_answered: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_question: Option<Question>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_correct: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_seconds: Option<u32>,
}
