//! Session configuration with per-game overrides.

use serde::{Deserialize, Serialize};

/// Global game settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSettings {
    /// Time Attack window in seconds.
    pub time_attack_seconds: u32,
    /// Flashcard sprint window in seconds.
    pub sprint_seconds: u32,
    /// Pairs dealt per matching round.
    pub pairs_per_round: usize,
    /// One-time bonus for completing every daily quest.
    pub quest_completion_bonus: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            time_attack_seconds: 60,
            sprint_seconds: 30,
            pairs_per_round: 6,
            quest_completion_bonus: 50,
        }
    }
}

/// Per-game overrides (all fields optional).
///
/// A game screen passes these when its content carries its own limits, e.g.
/// a time attack round with a custom window.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_attack_seconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprint_seconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pairs_per_round: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quest_completion_bonus: Option<u32>,
}

/// Effective settings (global merged with overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveSettings {
    pub time_attack_seconds: u32,
    pub sprint_seconds: u32,
    pub pairs_per_round: usize,
    pub quest_completion_bonus: u32,
}

impl EffectiveSettings {
    /// Merge global settings with optional per-game overrides.
    pub fn merge(global: &GameSettings, overrides: Option<&GameOverrides>) -> Self {
        match overrides {
            Some(o) => Self {
                time_attack_seconds: o.time_attack_seconds.unwrap_or(global.time_attack_seconds),
                sprint_seconds: o.sprint_seconds.unwrap_or(global.sprint_seconds),
                pairs_per_round: o.pairs_per_round.unwrap_or(global.pairs_per_round),
                quest_completion_bonus: o
                    .quest_completion_bonus
                    .unwrap_or(global.quest_completion_bonus),
            },
            None => Self {
                time_attack_seconds: global.time_attack_seconds,
                sprint_seconds: global.sprint_seconds,
                pairs_per_round: global.pairs_per_round,
                quest_completion_bonus: global.quest_completion_bonus,
            },
        }
    }
}

impl Default for EffectiveSettings {
    fn default() -> Self {
        Self::merge(&GameSettings::default(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_without_overrides_keeps_globals() {
        let global = GameSettings::default();
        let effective = EffectiveSettings::merge(&global, None);
        assert_eq!(effective.time_attack_seconds, 60);
        assert_eq!(effective.sprint_seconds, 30);
        assert_eq!(effective.pairs_per_round, 6);
        assert_eq!(effective.quest_completion_bonus, 50);
    }

    #[test]
    fn override_wins_over_global() {
        let global = GameSettings::default();
        let overrides = GameOverrides {
            time_attack_seconds: Some(90),
            ..Default::default()
        };
        let effective = EffectiveSettings::merge(&global, Some(&overrides));
        assert_eq!(effective.time_attack_seconds, 90);
        // Untouched fields fall through.
        assert_eq!(effective.sprint_seconds, 30);
    }
}
