//! Session engines for the learning mini-games.
//!
//! Provides:
//! - Game state machines (quiz/time attack, word matching, sentence
//!   assembly, flashcard sprint, daily quests)
//! - Pure scoring policies per game type
//! - A tick-driven countdown clock for the timed games
//! - The content provider contract and shared content types
//!
//! The presentation layer instantiates one engine per game screen, forwards
//! user intents, and renders from the immutable snapshot each engine
//! returns. Engines never fetch content and never touch the wall clock.

pub mod clock;
pub mod error;
pub mod games;
pub mod provider;
pub mod scoring;
pub mod settings;
pub mod types;

pub use clock::{SessionClock, Tick};
pub use error::{ConfigurationError, Result};
pub use games::matching::{MatchItem, MatchingPhase, MatchingSession, MatchingSnapshot};
pub use games::quest::{
    daily_quests, AlwaysComplete, CompletionCheck, Quest, QuestAggregator, QuestBoardSnapshot,
    QuestStatus,
};
pub use games::quiz::{QuizPhase, QuizSession, QuizSnapshot};
pub use games::sentence::{AssemblyPhase, AssemblySnapshot, SentenceAssembly, TokenSlot};
pub use games::sprint::{SprintPhase, SprintSession, SprintSnapshot};
pub use provider::{ContentProvider, SampleContent};
pub use scoring::{get_policy, Outcome, ScoringPolicy};
pub use settings::{EffectiveSettings, GameOverrides, GameSettings};
pub use types::{
    Category, Flashcard, GrammarExample, MatchPair, Question, SentenceTarget,
};
