//! Simulated opponent
//!
//! The opponent is a pair of probability rolls wearing a profile: a kicker
//! resolved against its shooting accuracy, and a keeper resolved through the
//! configured save model. The dive pick is cosmetic flavor for the
//! presentation layer; it never influences the roll.

use crate::config::DifficultySettings;
use crate::models::{DiveDirection, ShotInput};
use crate::outcome::{self, SaveContext, SaveModel, SaveRolls};
use crate::random::RandomSource;

/// Difficulty-derived behavior of the simulated opponent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpponentProfile {
    pub settings: DifficultySettings,
    pub save_model: SaveModel,
}

impl OpponentProfile {
    pub fn from_difficulty(difficulty: f32) -> Self {
        Self {
            settings: DifficultySettings::from_difficulty(difficulty),
            save_model: SaveModel::default(),
        }
    }

    pub fn with_save_model(mut self, save_model: SaveModel) -> Self {
        self.save_model = save_model;
        self
    }

    /// Seconds the opponent spends over the ball before its shot resolves.
    pub fn decision_delay(&self) -> f32 {
        self.settings.decision_delay
    }

    /// The opponent's own attempt from the spot: one roll against its
    /// shooting accuracy.
    pub fn take_shot(&self, random: &mut dyn RandomSource) -> bool {
        outcome::resolve_shot(self.settings.shooting_accuracy, random.next_uniform())
    }

    /// The opponent's keeper against the player's (pre-normalized) shot.
    /// Returns whether the stop came off, plus the dive committed to.
    pub fn attempt_save(
        &self,
        shot: &ShotInput,
        random: &mut dyn RandomSource,
    ) -> (bool, DiveDirection) {
        let dive = self.pick_dive(random);
        let ctx = SaveContext::reflex(
            self.settings.goalkeeper_reflexes,
            shot.direction_x,
            shot.direction_y,
            shot.power,
        );
        let rolls = SaveRolls {
            save_roll: random.next_uniform(),
            bonus_roll: random.next_uniform(),
        };
        (self.save_model.resolve(&ctx, &rolls), dive)
    }

    fn pick_dive(&self, random: &mut dyn RandomSource) -> DiveDirection {
        match random.next_index(3) {
            0 => DiveDirection::Left,
            1 => DiveDirection::Right,
            _ => DiveDirection::Center,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;

    #[test]
    fn test_take_shot_respects_accuracy() {
        // Difficulty 0.5 -> accuracy 0.65.
        let profile = OpponentProfile::from_difficulty(0.5);

        let mut low = ScriptedRandom::constant(0.64);
        assert!(profile.take_shot(&mut low));

        let mut high = ScriptedRandom::constant(0.65);
        assert!(!profile.take_shot(&mut high));
    }

    #[test]
    fn test_attempt_save_consumes_dive_then_save_roll() {
        // Difficulty 0.5 -> reflexes 0.6. Wide fast shot: chance = 0.28.
        let profile = OpponentProfile::from_difficulty(0.5);
        let shot = ShotInput::new(1.0, 0.0, 100.0);

        // dive roll 0.0 -> Left; save roll 0.5 beats the 0.42 chance at
        // speed 100 (factor 1.0): 0.6 * 0.7 = 0.42.
        let mut rolls = ScriptedRandom::new(vec![0.0, 0.5, 0.0]);
        let (saved, dive) = profile.attempt_save(&shot, &mut rolls);
        assert!(!saved);
        assert_eq!(dive, DiveDirection::Left);

        let mut rolls = ScriptedRandom::new(vec![0.4, 0.41, 0.0]);
        let (saved, dive) = profile.attempt_save(&shot, &mut rolls);
        assert!(saved);
        assert_eq!(dive, DiveDirection::Right);
    }

    #[test]
    fn test_dive_pick_covers_all_directions() {
        let profile = OpponentProfile::from_difficulty(0.5);
        let shot = ShotInput::new(0.0, -1.0, 50.0);

        let mut picks = Vec::new();
        for first in [0.0, 0.4, 0.9] {
            let mut rolls = ScriptedRandom::new(vec![first, 0.99, 0.99]);
            let (_, dive) = profile.attempt_save(&shot, &mut rolls);
            picks.push(dive);
        }
        assert_eq!(
            picks,
            vec![DiveDirection::Left, DiveDirection::Right, DiveDirection::Center]
        );
    }
}
