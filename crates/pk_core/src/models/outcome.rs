use serde::{Deserialize, Serialize};

/// Minimum magnitude for a shot direction to be usable.
pub const DIRECTION_EPSILON: f32 = 1e-4;

/// A shot as captured by the input layer: aim direction plus charged power.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotInput {
    /// Aim direction; normalized by the controller before resolution.
    pub direction_x: f32,
    pub direction_y: f32,
    /// Charged power, clamped to [0, 100] at the boundary.
    pub power: f32,
}

impl ShotInput {
    pub fn new(direction_x: f32, direction_y: f32, power: f32) -> Self {
        Self {
            direction_x,
            direction_y,
            power,
        }
    }

    pub fn magnitude(&self) -> f32 {
        (self.direction_x * self.direction_x + self.direction_y * self.direction_y).sqrt()
    }

    /// Whether the aim vector is too short to carry a direction.
    pub fn is_degenerate(&self) -> bool {
        self.magnitude() < DIRECTION_EPSILON
    }

    /// Unit-length copy. Caller must have ruled out the degenerate case.
    pub fn normalized(&self) -> Self {
        let m = self.magnitude();
        debug_assert!(m >= DIRECTION_EPSILON);
        Self {
            direction_x: self.direction_x / m,
            direction_y: self.direction_y / m,
            power: self.power,
        }
    }
}

/// Result of one resolved attempt. Produced once, consumed immediately by
/// the active session; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    Goal,
    Saved,
    Missed,
}

impl AttemptOutcome {
    pub fn is_goal(self) -> bool {
        matches!(self, AttemptOutcome::Goal)
    }
}

/// Which way the simulated keeper commits. Cosmetic: reported to the
/// presentation layer, no effect on the save roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiveDirection {
    Left,
    Right,
    Center,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_direction() {
        assert!(ShotInput::new(0.0, 0.0, 50.0).is_degenerate());
        assert!(ShotInput::new(1e-5, -1e-5, 50.0).is_degenerate());
        assert!(!ShotInput::new(0.0, -1.0, 50.0).is_degenerate());
    }

    #[test]
    fn test_normalized_is_unit_length() {
        let shot = ShotInput::new(3.0, -4.0, 80.0).normalized();
        assert!((shot.magnitude() - 1.0).abs() < 1e-6);
        assert_eq!(shot.power, 80.0);
    }
}
