//! Session configuration
//!
//! Immutable tuning structs passed into the session at start. Difficulty is a
//! single scalar in [0, 1]; everything the opponent does derives from it
//! through the mapping below, which is part of the public contract.

use serde::{Deserialize, Serialize};

/// Opponent tuning derived from the difficulty scalar.
///
/// The mapping is fixed:
/// - shooting accuracy: 0.4 → 0.9
/// - goalkeeper reflexes: 0.3 → 0.9
/// - decision delay: 2.0s → 1.0s
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultySettings {
    /// Chance the opponent's shot goes in, in [0.4, 0.9]
    pub shooting_accuracy: f32,
    /// Base save chance for the simulated keeper, in [0.3, 0.9]
    pub goalkeeper_reflexes: f32,
    /// Seconds the opponent "thinks" before its result is published
    pub decision_delay: f32,
}

impl DifficultySettings {
    /// Map a difficulty scalar to concrete opponent tunables.
    ///
    /// Out-of-range input is clamped at the boundary rather than rejected.
    pub fn from_difficulty(difficulty: f32) -> Self {
        let d = difficulty.clamp(0.0, 1.0);
        Self {
            shooting_accuracy: 0.4 + d * 0.5,
            goalkeeper_reflexes: 0.3 + d * 0.6,
            decision_delay: 2.0 - d * 1.0,
        }
    }
}

impl Default for DifficultySettings {
    fn default() -> Self {
        Self::from_difficulty(0.5)
    }
}

/// Structural rules for a session, independent of difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionRules {
    /// Regulation rounds in a shootout (sudden death extends past this)
    pub max_rounds: u32,
    /// Attempts in a score-attack session
    pub max_attempts: u32,
    /// Seconds between a resolved attempt and the published transition
    pub round_pause: f32,
}

impl Default for SessionRules {
    fn default() -> Self {
        Self {
            max_rounds: 5,
            max_attempts: 5,
            round_pause: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_mapping_midpoint() {
        // difficulty 0.5 -> accuracy 0.65, reflexes 0.6, delay 1.5s
        let s = DifficultySettings::from_difficulty(0.5);
        assert!((s.shooting_accuracy - 0.65).abs() < 1e-6);
        assert!((s.goalkeeper_reflexes - 0.6).abs() < 1e-6);
        assert!((s.decision_delay - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_difficulty_mapping_extremes() {
        let easy = DifficultySettings::from_difficulty(0.0);
        assert!((easy.shooting_accuracy - 0.4).abs() < 1e-6);
        assert!((easy.goalkeeper_reflexes - 0.3).abs() < 1e-6);
        assert!((easy.decision_delay - 2.0).abs() < 1e-6);

        let hard = DifficultySettings::from_difficulty(1.0);
        assert!((hard.shooting_accuracy - 0.9).abs() < 1e-6);
        assert!((hard.goalkeeper_reflexes - 0.9).abs() < 1e-6);
        assert!((hard.decision_delay - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_difficulty_out_of_range_is_clamped() {
        assert_eq!(
            DifficultySettings::from_difficulty(-3.0),
            DifficultySettings::from_difficulty(0.0)
        );
        assert_eq!(
            DifficultySettings::from_difficulty(7.5),
            DifficultySettings::from_difficulty(1.0)
        );
    }
}
