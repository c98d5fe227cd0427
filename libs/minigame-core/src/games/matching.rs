//! Matching session engine.
//!
//! Two columns of cards: sources in stable order on the left, targets on the
//! right in an independently shuffled order, so position never gives a pair
//! away. Selecting one card on each side triggers an evaluation; both
//! selections clear afterwards whatever the outcome.

use crate::error::{ConfigurationError, Result};
use crate::scoring::{MatchingScoring, Outcome, ScoringPolicy};
use crate::types::MatchPair;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// Discrete state of a matching session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchingPhase {
    Active,
    Completed,
}

/// One run of a word-match round.
pub struct MatchingSession {
    pairs: Vec<MatchPair>,
    right_order: Vec<String>,
    matched: HashSet<String>,
    selected_left: Option<String>,
    selected_right: Option<String>,
    attempts: u32,
    raw_score: i32,
    phase: MatchingPhase,
    policy: Box<dyn ScoringPolicy>,
    rng: StdRng,
}

impl fmt::Debug for MatchingSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchingSession")
            .field("pairs", &self.pairs)
            .field("right_order", &self.right_order)
            .field("matched", &self.matched)
            .field("selected_left", &self.selected_left)
            .field("selected_right", &self.selected_right)
            .field("attempts", &self.attempts)
            .field("raw_score", &self.raw_score)
            .field("phase", &self.phase)
            .field("policy", &self.policy.name())
            .finish_non_exhaustive()
    }
}

impl MatchingSession {
    pub fn new(pairs: Vec<MatchPair>) -> Result<Self> {
        Self::build(pairs, Box::new(MatchingScoring), StdRng::from_entropy())
    }

    /// Session with a deterministic right-column shuffle.
    pub fn new_seeded(pairs: Vec<MatchPair>, seed: u64) -> Result<Self> {
        Self::build(pairs, Box::new(MatchingScoring), StdRng::seed_from_u64(seed))
    }

    /// Session with a caller-supplied scoring policy.
    pub fn with_policy(pairs: Vec<MatchPair>, policy: Box<dyn ScoringPolicy>) -> Result<Self> {
        Self::build(pairs, policy, StdRng::from_entropy())
    }

    fn build(
        pairs: Vec<MatchPair>,
        policy: Box<dyn ScoringPolicy>,
        mut rng: StdRng,
    ) -> Result<Self> {
        if pairs.is_empty() {
            return Err(ConfigurationError::NoPairs);
        }
        let mut ids = HashSet::new();
        for pair in &pairs {
            if !ids.insert(pair.id.as_str()) {
                return Err(ConfigurationError::DuplicatePairId {
                    id: pair.id.clone(),
                });
            }
        }
        let mut right_order: Vec<String> = pairs.iter().map(|p| p.id.clone()).collect();
        // Shuffle exactly one side; the left column keeps content order.
        right_order.shuffle(&mut rng);
        debug!(pairs = pairs.len(), "matching session started");
        Ok(Self {
            pairs,
            right_order,
            matched: HashSet::new(),
            selected_left: None,
            selected_right: None,
            attempts: 0,
            raw_score: 0,
            phase: MatchingPhase::Active,
            policy,
            rng,
        })
    }

    /// Select a card in the left (source) column.
    pub fn select_left(&mut self, id: &str) {
        if !self.selectable(id) {
            return;
        }
        self.selected_left = Some(id.to_string());
        self.try_evaluate();
    }

    /// Select a card in the right (target) column.
    pub fn select_right(&mut self, id: &str) {
        if !self.selectable(id) {
            return;
        }
        self.selected_right = Some(id.to_string());
        self.try_evaluate();
    }

    fn selectable(&self, id: &str) -> bool {
        self.phase == MatchingPhase::Active
            && !self.matched.contains(id)
            && self.pairs.iter().any(|p| p.id == id)
    }

    /// Runs once both slots hold a selection. Clears both slots
    /// unconditionally afterwards, so at most one comparison is ever
    /// pending.
    fn try_evaluate(&mut self) {
        let (Some(left), Some(right)) = (&self.selected_left, &self.selected_right) else {
            return;
        };
        self.attempts += 1;
        let hit = left == right;
        self.raw_score += self.policy.delta(Outcome::from_correct(hit));
        if hit {
            self.matched.insert(left.clone());
        }
        self.selected_left = None;
        self.selected_right = None;
        if self.matched.len() == self.pairs.len() {
            self.phase = MatchingPhase::Completed;
            debug!(
                score = self.score(),
                attempts = self.attempts,
                "matching session completed"
            );
        }
    }

    /// Clear all progress and reshuffle the right column.
    pub fn restart(&mut self) {
        self.matched.clear();
        self.selected_left = None;
        self.selected_right = None;
        self.attempts = 0;
        self.raw_score = 0;
        self.phase = MatchingPhase::Active;
        self.right_order.shuffle(&mut self.rng);
    }

    pub fn phase(&self) -> MatchingPhase {
        self.phase
    }

    pub fn score(&self) -> i32 {
        self.policy.clamp(self.raw_score)
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_matched(&self, id: &str) -> bool {
        self.matched.contains(id)
    }

    /// Immutable render state.
    pub fn snapshot(&self) -> MatchingSnapshot {
        let left = self
            .pairs
            .iter()
            .map(|p| MatchItem {
                id: p.id.clone(),
                text: p.source.clone(),
                matched: self.matched.contains(&p.id),
            })
            .collect();
        let right = self
            .right_order
            .iter()
            .filter_map(|id| self.pairs.iter().find(|p| &p.id == id))
            .map(|p| MatchItem {
                id: p.id.clone(),
                text: p.target.clone(),
                matched: self.matched.contains(&p.id),
            })
            .collect();
        MatchingSnapshot {
            phase: self.phase,
            score: self.score(),
            attempts: self.attempts,
            matched_count: self.matched.len(),
            pair_count: self.pairs.len(),
            left,
            right,
            selected_left: self.selected_left.clone(),
            selected_right: self.selected_right.clone(),
        }
    }
}

/// One card in a matching column.
#[derive(Debug, Clone, Serialize)]
pub struct MatchItem {
    pub id: String,
    pub text: String,
    pub matched: bool,
}

/// Render snapshot of a matching session.
#[derive(Debug, Clone, Serialize)]
pub struct MatchingSnapshot {
    pub phase: MatchingPhase,
    pub score: i32,
    pub attempts: u32,
    pub matched_count: usize,
    pub pair_count: usize,
    pub left: Vec<MatchItem>,
    pub right: Vec<MatchItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_left: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_right: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(n: usize) -> Vec<MatchPair> {
        (0..n)
            .map(|i| MatchPair {
                id: format!("p{i}"),
                source: format!("源{i}"),
                target: format!("meaning {i}"),
            })
            .collect()
    }

    #[test]
    fn empty_pair_set_is_rejected() {
        assert!(matches!(
            MatchingSession::new_seeded(vec![], 1).unwrap_err(),
            ConfigurationError::NoPairs
        ));
    }

    #[test]
    fn duplicate_pair_ids_are_rejected() {
        let mut set = pairs(2);
        set[1].id = set[0].id.clone();
        assert!(matches!(
            MatchingSession::new_seeded(set, 1).unwrap_err(),
            ConfigurationError::DuplicatePairId { .. }
        ));
    }

    #[test]
    fn three_correct_matches_complete_the_round() {
        let mut session = MatchingSession::new_seeded(pairs(3), 3).unwrap();
        for i in 0..3 {
            let id = format!("p{i}");
            session.select_left(&id);
            session.select_right(&id);
        }
        assert_eq!(session.phase(), MatchingPhase::Completed);
        assert_eq!(session.score(), 30);
        assert_eq!(session.attempts(), 3);
    }

    #[test]
    fn mismatch_counts_an_attempt_without_scoring() {
        let mut session = MatchingSession::new_seeded(pairs(3), 3).unwrap();
        session.select_left("p0");
        session.select_right("p1");
        assert_eq!(session.attempts(), 1);
        assert_eq!(session.score(), 0);
        assert!(!session.is_matched("p0"));
    }

    #[test]
    fn both_slots_clear_after_every_evaluation() {
        let mut session = MatchingSession::new_seeded(pairs(3), 3).unwrap();
        session.select_left("p0");
        session.select_right("p1"); // miss
        let snapshot = session.snapshot();
        assert_eq!(snapshot.selected_left, None);
        assert_eq!(snapshot.selected_right, None);

        session.select_left("p2");
        session.select_right("p2"); // hit
        let snapshot = session.snapshot();
        assert_eq!(snapshot.selected_left, None);
        assert_eq!(snapshot.selected_right, None);
    }

    #[test]
    fn matched_cards_cannot_be_reselected() {
        let mut session = MatchingSession::new_seeded(pairs(2), 3).unwrap();
        session.select_left("p0");
        session.select_right("p0");
        assert!(session.is_matched("p0"));
        session.select_left("p0");
        assert_eq!(session.snapshot().selected_left, None);
        assert_eq!(session.attempts(), 1);
    }

    #[test]
    fn unknown_ids_are_dropped() {
        let mut session = MatchingSession::new_seeded(pairs(2), 3).unwrap();
        session.select_left("nope");
        assert_eq!(session.snapshot().selected_left, None);
    }

    #[test]
    fn reselecting_left_replaces_the_pending_selection() {
        let mut session = MatchingSession::new_seeded(pairs(3), 3).unwrap();
        session.select_left("p0");
        session.select_left("p1");
        assert_eq!(session.attempts(), 0);
        session.select_right("p1");
        assert_eq!(session.attempts(), 1);
        assert!(session.is_matched("p1"));
    }

    #[test]
    fn right_column_is_a_permutation_of_the_left() {
        let session = MatchingSession::new_seeded(pairs(6), 99).unwrap();
        let snapshot = session.snapshot();
        let left_ids: HashSet<_> = snapshot.left.iter().map(|i| i.id.clone()).collect();
        let right_ids: HashSet<_> = snapshot.right.iter().map(|i| i.id.clone()).collect();
        assert_eq!(left_ids, right_ids);
        assert_eq!(snapshot.right.len(), 6);
        // Left column keeps content order.
        let left_order: Vec<_> = snapshot.left.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(left_order, ["p0", "p1", "p2", "p3", "p4", "p5"]);
    }

    #[test]
    fn restart_clears_progress() {
        let mut session = MatchingSession::new_seeded(pairs(2), 3).unwrap();
        session.select_left("p0");
        session.select_right("p0");
        session.select_left("p1");
        session.select_right("p1");
        assert_eq!(session.phase(), MatchingPhase::Completed);
        session.restart();
        assert_eq!(session.phase(), MatchingPhase::Active);
        assert_eq!(session.score(), 0);
        assert_eq!(session.attempts(), 0);
        assert_eq!(session.snapshot().matched_count, 0);
    }
}
