//! Sentence assembly engine.
//!
//! The target sentence is split into tokens, shuffled into a pool, and the
//! player rebuilds it by picking tokens in order. Tokens may repeat (a
//! character-level split of a real sentence usually has duplicates), so every
//! pool slot carries its own instance id and removal goes by identity, never
//! by text or position.

use crate::error::Result;
use crate::scoring::{Outcome, ScoringPolicy, SentenceScoring};
use crate::types::SentenceTarget;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use std::fmt;
use tracing::debug;
use uuid::Uuid;

/// Discrete state of an assembly session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssemblyPhase {
    Building,
    Checked,
}

/// One selectable token in the pool.
#[derive(Debug, Clone, Serialize)]
pub struct TokenSlot {
    pub id: Uuid,
    pub text: String,
    pub used: bool,
}

/// One run of a sentence builder session.
///
/// An instance handles one sentence at a time; [`SentenceAssembly::next`]
/// moves it to a new target while the score keeps accumulating. The caller
/// owns the target list and decides when the session is over.
pub struct SentenceAssembly {
    target: SentenceTarget,
    pool: Vec<TokenSlot>,
    built: Vec<Uuid>,
    phase: AssemblyPhase,
    is_correct: Option<bool>,
    raw_score: i32,
    policy: Box<dyn ScoringPolicy>,
    rng: StdRng,
}

impl fmt::Debug for SentenceAssembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SentenceAssembly")
            .field("target", &self.target)
            .field("pool", &self.pool)
            .field("built", &self.built)
            .field("phase", &self.phase)
            .field("is_correct", &self.is_correct)
            .field("raw_score", &self.raw_score)
            .field("policy", &self.policy.name())
            .finish_non_exhaustive()
    }
}

impl SentenceAssembly {
    pub fn new(target: SentenceTarget) -> Result<Self> {
        Self::build(target, Box::new(SentenceScoring), StdRng::from_entropy())
    }

    /// Session with a deterministic pool shuffle.
    pub fn new_seeded(target: SentenceTarget, seed: u64) -> Result<Self> {
        Self::build(target, Box::new(SentenceScoring), StdRng::seed_from_u64(seed))
    }

    /// Session with a caller-supplied scoring policy.
    pub fn with_policy(target: SentenceTarget, policy: Box<dyn ScoringPolicy>) -> Result<Self> {
        Self::build(target, policy, StdRng::from_entropy())
    }

    fn build(
        target: SentenceTarget,
        policy: Box<dyn ScoringPolicy>,
        mut rng: StdRng,
    ) -> Result<Self> {
        target.validate()?;
        let pool = Self::shuffled_pool(&target, &mut rng);
        debug!(target_id = %target.id, tokens = pool.len(), "sentence target set up");
        Ok(Self {
            target,
            pool,
            built: Vec::new(),
            phase: AssemblyPhase::Building,
            is_correct: None,
            raw_score: 0,
            policy,
            rng,
        })
    }

    fn shuffled_pool(target: &SentenceTarget, rng: &mut StdRng) -> Vec<TokenSlot> {
        let mut pool: Vec<TokenSlot> = target
            .tokens
            .iter()
            .map(|text| TokenSlot {
                id: Uuid::new_v4(),
                text: text.clone(),
                used: false,
            })
            .collect();
        pool.shuffle(rng);
        pool
    }

    /// Append an unused pool token to the built sentence.
    pub fn pick(&mut self, token_id: Uuid) {
        if self.phase != AssemblyPhase::Building {
            return;
        }
        let Some(slot) = self.pool.iter_mut().find(|s| s.id == token_id && !s.used) else {
            return;
        };
        slot.used = true;
        self.built.push(token_id);
    }

    /// Put a picked token back into the pool.
    ///
    /// Removal is by instance identity: with repeated token texts, only the
    /// exact slot picked earlier is released.
    pub fn remove(&mut self, token_id: Uuid) {
        if self.phase != AssemblyPhase::Building {
            return;
        }
        let Some(slot) = self.pool.iter_mut().find(|s| s.id == token_id && s.used) else {
            return;
        };
        slot.used = false;
        self.built.retain(|id| *id != token_id);
    }

    /// Compare the built sentence to the target, exactly as written.
    ///
    /// Whatever normalization the content pipeline applied is inherited; the
    /// engine adds none of its own.
    pub fn check(&mut self) {
        if self.phase != AssemblyPhase::Building {
            return;
        }
        let correct = self.built_text() == self.target.text;
        self.is_correct = Some(correct);
        self.raw_score += self.policy.delta(Outcome::from_correct(correct));
        self.phase = AssemblyPhase::Checked;
        debug!(target_id = %self.target.id, correct, "sentence checked");
    }

    /// Move on to the next target, keeping the accumulated score.
    pub fn next(&mut self, target: SentenceTarget) -> Result<()> {
        target.validate()?;
        self.pool = Self::shuffled_pool(&target, &mut self.rng);
        debug!(target_id = %target.id, tokens = self.pool.len(), "sentence target set up");
        self.target = target;
        self.built.clear();
        self.phase = AssemblyPhase::Building;
        self.is_correct = None;
        Ok(())
    }

    /// The picked tokens joined in selection order.
    pub fn built_text(&self) -> String {
        self.built
            .iter()
            .filter_map(|id| self.pool.iter().find(|s| s.id == *id))
            .map(|s| s.text.as_str())
            .collect()
    }

    pub fn phase(&self) -> AssemblyPhase {
        self.phase
    }

    pub fn is_correct(&self) -> Option<bool> {
        self.is_correct
    }

    pub fn score(&self) -> i32 {
        self.policy.clamp(self.raw_score)
    }

    pub fn target(&self) -> &SentenceTarget {
        &self.target
    }

    /// Immutable render state.
    pub fn snapshot(&self) -> AssemblySnapshot {
        AssemblySnapshot {
            phase: self.phase,
            translation: self.target.translation.clone(),
            pool: self.pool.clone(),
            built: self.built.clone(),
            built_text: self.built_text(),
            is_correct: self.is_correct,
            score: self.score(),
        }
    }
}

/// Render snapshot of an assembly session.
#[derive(Debug, Clone, Serialize)]
pub struct AssemblySnapshot {
    pub phase: AssemblyPhase,
    pub translation: String,
    pub pool: Vec<TokenSlot>,
    pub built: Vec<Uuid>,
    pub built_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
    pub score: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigurationError;
    use crate::types::GrammarExample;
    use pretty_assertions::assert_eq;

    fn target(text: &str) -> SentenceTarget {
        SentenceTarget::from_example(&GrammarExample {
            id: "g1".to_string(),
            text: text.to_string(),
            romanization: None,
            translation: "translation".to_string(),
        })
    }

    /// Pick pool tokens so the built text spells out the target.
    fn assemble_correctly(session: &mut SentenceAssembly) {
        let tokens = session.target().tokens.clone();
        for text in tokens {
            let slot = session
                .snapshot()
                .pool
                .into_iter()
                .find(|s| s.text == text && !s.used)
                .expect("an unused slot for the token");
            session.pick(slot.id);
        }
    }

    #[test]
    fn empty_token_list_is_rejected() {
        let err = SentenceAssembly::new_seeded(target(""), 1).unwrap_err();
        assert!(matches!(err, ConfigurationError::EmptyTokens { .. }));
    }

    #[test]
    fn correct_assembly_scores_one() {
        let mut session = SentenceAssembly::new_seeded(target("水を飲む"), 2).unwrap();
        assemble_correctly(&mut session);
        assert_eq!(session.built_text(), "水を飲む");
        session.check();
        assert_eq!(session.phase(), AssemblyPhase::Checked);
        assert_eq!(session.is_correct(), Some(true));
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn wrong_order_scores_nothing() {
        let mut session = SentenceAssembly::new_seeded(target("ab"), 2).unwrap();
        let pool = session.snapshot().pool;
        let b = pool.iter().find(|s| s.text == "b").unwrap().id;
        let a = pool.iter().find(|s| s.text == "a").unwrap().id;
        session.pick(b);
        session.pick(a);
        session.check();
        assert_eq!(session.is_correct(), Some(false));
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn picking_a_used_token_is_dropped() {
        let mut session = SentenceAssembly::new_seeded(target("ab"), 2).unwrap();
        let id = session.snapshot().pool[0].id;
        session.pick(id);
        session.pick(id);
        assert_eq!(session.snapshot().built.len(), 1);
    }

    #[test]
    fn ops_after_check_are_dropped() {
        let mut session = SentenceAssembly::new_seeded(target("ab"), 2).unwrap();
        let id = session.snapshot().pool[0].id;
        session.check();
        session.pick(id);
        assert!(session.snapshot().built.is_empty());
        // A second check does not double-score.
        let score = session.score();
        session.check();
        assert_eq!(session.score(), score);
    }

    #[test]
    fn removal_is_by_identity_with_repeated_tokens() {
        let mut session = SentenceAssembly::new_seeded(target("aab"), 7).unwrap();
        let pool = session.snapshot().pool;
        let a_slots: Vec<Uuid> = pool.iter().filter(|s| s.text == "a").map(|s| s.id).collect();
        assert_eq!(a_slots.len(), 2);
        session.pick(a_slots[0]);
        session.pick(a_slots[1]);
        assert_eq!(session.built_text(), "aa");
        session.remove(a_slots[0]);
        assert_eq!(session.built_text(), "a");
        // The other instance stays picked.
        let pool = session.snapshot().pool;
        assert!(!pool.iter().find(|s| s.id == a_slots[0]).unwrap().used);
        assert!(pool.iter().find(|s| s.id == a_slots[1]).unwrap().used);
    }

    #[test]
    fn remove_then_pick_round_trips() {
        let mut session = SentenceAssembly::new_seeded(target("abc"), 5).unwrap();
        assemble_correctly(&mut session);
        let before = session.built_text();
        let last = *session.snapshot().built.last().unwrap();
        session.remove(last);
        session.pick(last);
        assert_eq!(session.built_text(), before);
    }

    #[test]
    fn next_target_keeps_the_running_score() {
        let mut session = SentenceAssembly::new_seeded(target("ab"), 9).unwrap();
        assemble_correctly(&mut session);
        session.check();
        assert_eq!(session.score(), 1);

        session.next(target("cd")).unwrap();
        assert_eq!(session.phase(), AssemblyPhase::Building);
        assert_eq!(session.score(), 1);
        assert!(session.snapshot().built.is_empty());
        assemble_correctly(&mut session);
        session.check();
        assert_eq!(session.score(), 2);
    }

    #[test]
    fn pool_is_a_permutation_of_target_tokens() {
        let session = SentenceAssembly::new_seeded(target("学校に行きます"), 13).unwrap();
        let mut pool_texts: Vec<String> =
            session.snapshot().pool.iter().map(|s| s.text.clone()).collect();
        let mut tokens = session.target().tokens.clone();
        pool_texts.sort();
        tokens.sort();
        assert_eq!(pool_texts, tokens);
    }
}
