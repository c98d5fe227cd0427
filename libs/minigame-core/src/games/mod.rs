//! Mini-game session engines.
//!
//! One engine instance per game screen. The presentation layer feeds an
//! engine content and user intents and renders from the snapshot it returns;
//! no state is shared between instances.

pub mod matching;
pub mod quest;
pub mod quiz;
pub mod sentence;
pub mod sprint;
