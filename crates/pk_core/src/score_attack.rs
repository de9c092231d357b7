//! Score-attack session
//!
//! Solo mode: a fixed number of attempts against the simulated keeper, no
//! turn alternation. Tracks goals/saves/misses, derives accuracy, and grades
//! the final ratio into five tiers for end-of-session reporting.

use serde::{Deserialize, Serialize};

/// Discrete grade of a finished score-attack run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceTier {
    /// Every attempt scored
    Perfect,
    /// Ratio >= 0.8
    Excellent,
    /// Ratio >= 0.6
    VeryGood,
    /// Ratio >= 0.4
    Decent,
    /// Everything below
    NeedsWork,
}

impl PerformanceTier {
    pub fn from_ratio(ratio: f32) -> Self {
        if ratio >= 1.0 {
            PerformanceTier::Perfect
        } else if ratio >= 0.8 {
            PerformanceTier::Excellent
        } else if ratio >= 0.6 {
            PerformanceTier::VeryGood
        } else if ratio >= 0.4 {
            PerformanceTier::Decent
        } else {
            PerformanceTier::NeedsWork
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PerformanceTier::Perfect => "Perfect!",
            PerformanceTier::Excellent => "Excellent!",
            PerformanceTier::VeryGood => "Very good",
            PerformanceTier::Decent => "Decent",
            PerformanceTier::NeedsWork => "Needs work",
        }
    }
}

/// Mutable score-attack aggregate. `current_attempt <= max_attempts` always;
/// the session stops accepting input once the two are equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreAttackState {
    pub goals_scored: u32,
    pub saves: u32,
    pub misses: u32,
    pub current_attempt: u32,
    pub max_attempts: u32,
}

impl ScoreAttackState {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            goals_scored: 0,
            saves: 0,
            misses: 0,
            current_attempt: 0,
            max_attempts: max_attempts.max(1),
        }
    }
}

/// Final report, produced exactly once when the last attempt resolves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreAttackReport {
    pub goals_scored: u32,
    pub attempts: u32,
    pub accuracy_percent: f32,
    pub tier: PerformanceTier,
}

/// Bookkeeping for one score-attack run.
#[derive(Debug, Clone)]
pub struct ScoreAttackSession {
    state: ScoreAttackState,
    finished: bool,
}

impl ScoreAttackSession {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            state: ScoreAttackState::new(max_attempts),
            finished: false,
        }
    }

    pub fn state(&self) -> &ScoreAttackState {
        &self.state
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Open the next attempt. Must be called exactly once per resolved
    /// attempt, before the outcome-specific register call. Returns false
    /// (and changes nothing) once the session is terminal.
    pub fn register_attempt(&mut self) -> bool {
        if self.finished {
            log::warn!("register_attempt ignored: score attack already finished");
            return false;
        }
        self.state.current_attempt += 1;
        true
    }

    pub fn register_goal(&mut self) -> Option<ScoreAttackReport> {
        if self.finished {
            log::warn!("register_goal ignored: score attack already finished");
            return None;
        }
        self.state.goals_scored += 1;
        self.check_completion()
    }

    pub fn register_miss(&mut self) -> Option<ScoreAttackReport> {
        if self.finished {
            log::warn!("register_miss ignored: score attack already finished");
            return None;
        }
        self.state.misses += 1;
        self.check_completion()
    }

    pub fn register_save(&mut self) -> Option<ScoreAttackReport> {
        if self.finished {
            log::warn!("register_save ignored: score attack already finished");
            return None;
        }
        self.state.saves += 1;
        self.check_completion()
    }

    /// Goals over attempts, 0.0 before the first attempt.
    pub fn accuracy(&self) -> f32 {
        if self.state.current_attempt == 0 {
            0.0
        } else {
            self.state.goals_scored as f32 / self.state.current_attempt as f32
        }
    }

    pub fn accuracy_percent(&self) -> f32 {
        self.accuracy() * 100.0
    }

    /// Fires the completion report exactly once, on the attempt that
    /// exhausts the allotment.
    fn check_completion(&mut self) -> Option<ScoreAttackReport> {
        if self.state.current_attempt < self.state.max_attempts {
            return None;
        }
        self.finished = true;
        let report = ScoreAttackReport {
            goals_scored: self.state.goals_scored,
            attempts: self.state.current_attempt,
            accuracy_percent: self.accuracy_percent(),
            tier: PerformanceTier::from_ratio(self.accuracy()),
        };
        log::info!(
            "Score attack finished: {}/{} ({:.1}%)",
            report.goals_scored,
            report.attempts,
            report.accuracy_percent
        );
        Some(report)
    }
}
