//! Daily quest aggregator.
//!
//! Tracks completion of a fixed quest set for one session. Each quest owns
//! an async completion check (did the player actually review the cards,
//! answer the questions, ...); the aggregator awaits it, banks the points,
//! and pays a one-time bonus when the whole board is done.

use crate::error::{ConfigurationError, Result};
use crate::settings::EffectiveSettings;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// Async predicate deciding whether a quest's goal has been met.
#[async_trait]
pub trait CompletionCheck: Send + Sync {
    async fn is_complete(&self) -> bool;
}

/// Check that always succeeds. Placeholder for quests whose completion is
/// decided by the tap itself.
pub struct AlwaysComplete;

#[async_trait]
impl CompletionCheck for AlwaysComplete {
    async fn is_complete(&self) -> bool {
        true
    }
}

/// One entry on the daily quest board.
pub struct Quest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub points: u32,
    check: Box<dyn CompletionCheck>,
}

impl Quest {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        points: u32,
        check: Box<dyn CompletionCheck>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            points,
            check,
        }
    }
}

impl fmt::Debug for Quest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Quest")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("points", &self.points)
            .finish_non_exhaustive()
    }
}

/// The standard daily board.
pub fn daily_quests() -> Vec<Quest> {
    vec![
        Quest::new(
            "review-flashcards",
            "Review 5 Flashcards",
            "Practice with flashcards",
            10,
            Box::new(AlwaysComplete),
        ),
        Quest::new(
            "answer-questions",
            "Answer 5 Questions",
            "Test your knowledge",
            15,
            Box::new(AlwaysComplete),
        ),
        Quest::new(
            "study-grammar",
            "Study Grammar",
            "Learn 3 grammar points",
            20,
            Box::new(AlwaysComplete),
        ),
        Quest::new(
            "practice-listening",
            "Practice Listening",
            "Complete a listening exercise",
            15,
            Box::new(AlwaysComplete),
        ),
    ]
}

/// One session of the daily quest board.
#[derive(Debug)]
pub struct QuestAggregator {
    quests: Vec<Quest>,
    completed: HashSet<String>,
    total_score: u32,
    bonus: u32,
    bonus_applied: bool,
}

impl QuestAggregator {
    pub fn new(quests: Vec<Quest>, settings: &EffectiveSettings) -> Result<Self> {
        if quests.is_empty() {
            return Err(ConfigurationError::NoQuests);
        }
        let mut ids = HashSet::new();
        for quest in &quests {
            if !ids.insert(quest.id.as_str()) {
                return Err(ConfigurationError::DuplicateQuestId {
                    id: quest.id.clone(),
                });
            }
        }
        Ok(Self {
            quests,
            completed: HashSet::new(),
            total_score: 0,
            bonus: settings.quest_completion_bonus,
            bonus_applied: false,
        })
    }

    /// Try to complete a quest. Returns whether it was newly completed.
    ///
    /// Unknown ids and quests already completed this session are dropped
    /// without awaiting the check, so repeated taps bank points at most
    /// once. Completing the final quest adds the board bonus exactly once,
    /// even if `complete` keeps being called afterwards.
    pub async fn complete(&mut self, quest_id: &str) -> bool {
        if self.completed.contains(quest_id) {
            return false;
        }
        let Some(quest) = self.quests.iter().find(|q| q.id == quest_id) else {
            return false;
        };
        if !quest.check.is_complete().await {
            return false;
        }
        self.completed.insert(quest.id.clone());
        self.total_score += quest.points;
        debug!(quest = %quest.id, points = quest.points, "quest completed");
        if self.completed.len() == self.quests.len() && !self.bonus_applied {
            self.total_score += self.bonus;
            self.bonus_applied = true;
            debug!(bonus = self.bonus, "all quests completed, bonus applied");
        }
        true
    }

    pub fn total_score(&self) -> u32 {
        self.total_score
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    pub fn all_completed(&self) -> bool {
        self.completed.len() == self.quests.len()
    }

    pub fn is_completed(&self, quest_id: &str) -> bool {
        self.completed.contains(quest_id)
    }

    /// Immutable render state.
    pub fn snapshot(&self) -> QuestBoardSnapshot {
        QuestBoardSnapshot {
            quests: self
                .quests
                .iter()
                .map(|q| QuestStatus {
                    id: q.id.clone(),
                    title: q.title.clone(),
                    description: q.description.clone(),
                    points: q.points,
                    completed: self.completed.contains(&q.id),
                })
                .collect(),
            completed_count: self.completed.len(),
            quest_count: self.quests.len(),
            total_score: self.total_score,
            bonus_applied: self.bonus_applied,
        }
    }
}

/// One quest with its completion state.
#[derive(Debug, Clone, Serialize)]
pub struct QuestStatus {
    pub id: String,
    pub title: String,
    pub description: String,
    pub points: u32,
    pub completed: bool,
}

/// Render snapshot of the quest board.
#[derive(Debug, Clone, Serialize)]
pub struct QuestBoardSnapshot {
    pub quests: Vec<QuestStatus>,
    pub completed_count: usize,
    pub quest_count: usize,
    pub total_score: u32,
    pub bonus_applied: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Check that never succeeds.
    struct NeverComplete;

    #[async_trait]
    impl CompletionCheck for NeverComplete {
        async fn is_complete(&self) -> bool {
            false
        }
    }

    fn aggregator() -> QuestAggregator {
        QuestAggregator::new(daily_quests(), &EffectiveSettings::default()).unwrap()
    }

    #[tokio::test]
    async fn completing_a_quest_banks_its_points() {
        let mut board = aggregator();
        assert!(board.complete("review-flashcards").await);
        assert_eq!(board.total_score(), 10);
        assert_eq!(board.completed_count(), 1);
        assert!(!board.all_completed());
    }

    #[tokio::test]
    async fn completion_is_idempotent() {
        let mut board = aggregator();
        assert!(board.complete("study-grammar").await);
        assert!(!board.complete("study-grammar").await);
        assert_eq!(board.total_score(), 20);
        assert_eq!(board.completed_count(), 1);
    }

    #[tokio::test]
    async fn unknown_quest_ids_are_dropped() {
        let mut board = aggregator();
        assert!(!board.complete("no-such-quest").await);
        assert_eq!(board.total_score(), 0);
    }

    #[tokio::test]
    async fn failing_check_banks_nothing_and_allows_retry() {
        let quests = vec![
            Quest::new("a", "A", "", 10, Box::new(NeverComplete)),
            Quest::new("b", "B", "", 5, Box::new(AlwaysComplete)),
        ];
        let mut board = QuestAggregator::new(quests, &EffectiveSettings::default()).unwrap();
        assert!(!board.complete("a").await);
        assert_eq!(board.total_score(), 0);
        assert!(!board.is_completed("a"));
        // A failed check is not a completion; the quest stays available.
        assert!(!board.complete("a").await);
    }

    #[tokio::test]
    async fn full_board_pays_the_bonus_exactly_once() {
        let mut board = aggregator();
        for id in [
            "review-flashcards",
            "answer-questions",
            "study-grammar",
            "practice-listening",
        ] {
            board.complete(id).await;
        }
        assert!(board.all_completed());
        // 10 + 15 + 20 + 15 quest points, plus the 50-point board bonus.
        assert_eq!(board.total_score(), 110);

        // Late calls with the board already full cannot re-trigger it.
        assert!(!board.complete("study-grammar").await);
        assert_eq!(board.total_score(), 110);
        assert!(board.snapshot().bonus_applied);
    }

    #[tokio::test]
    async fn bonus_honors_settings_override() {
        let settings = EffectiveSettings {
            quest_completion_bonus: 100,
            ..EffectiveSettings::default()
        };
        let quests = vec![Quest::new("only", "Only", "", 5, Box::new(AlwaysComplete))];
        let mut board = QuestAggregator::new(quests, &settings).unwrap();
        board.complete("only").await;
        assert_eq!(board.total_score(), 105);
    }

    #[test]
    fn duplicate_quest_ids_are_rejected() {
        let quests = vec![
            Quest::new("dup", "A", "", 10, Box::new(AlwaysComplete)),
            Quest::new("dup", "B", "", 5, Box::new(AlwaysComplete)),
        ];
        assert!(matches!(
            QuestAggregator::new(quests, &EffectiveSettings::default()).unwrap_err(),
            ConfigurationError::DuplicateQuestId { .. }
        ));
    }

    #[test]
    fn empty_board_is_rejected() {
        assert!(matches!(
            QuestAggregator::new(vec![], &EffectiveSettings::default()).unwrap_err(),
            ConfigurationError::NoQuests
        ));
    }

    #[tokio::test]
    async fn snapshot_reflects_board_state() {
        let mut board = aggregator();
        board.complete("answer-questions").await;
        let snapshot = board.snapshot();
        assert_eq!(snapshot.quest_count, 4);
        assert_eq!(snapshot.completed_count, 1);
        let entry = snapshot
            .quests
            .iter()
            .find(|q| q.id == "answer-questions")
            .unwrap();
        assert!(entry.completed);
        assert_eq!(entry.points, 15);
    }
}
