use serde::{Deserialize, Serialize};

use super::outcome::{AttemptOutcome, DiveDirection};
use super::team::Team;
use crate::score_attack::PerformanceTier;
use crate::shootout::{GamePhase, TurnOwner};

/// Why an incoming shot was turned away without touching session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Aim vector magnitude below the epsilon floor
    DegenerateDirection,
    /// A previous attempt's resolution sequence is still pending
    ResolutionPending,
    /// Session is terminal (or was never started)
    NotAccepting,
}

/// Everything the core publishes to presentation/audio/AI collaborators.
/// Fire-and-forget; ordering is emission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    StateChanged {
        phase: GamePhase,
    },
    ScoreChanged {
        player_score: u32,
        opponent_score: u32,
    },
    AttemptResolved {
        side: TurnOwner,
        outcome: AttemptOutcome,
        /// Keeper commitment on attempts that involved a save roll
        #[serde(skip_serializing_if = "Option::is_none")]
        dive: Option<DiveDirection>,
    },
    ShotRejected {
        reason: RejectReason,
    },
    SessionFinished {
        summary: SessionSummary,
    },
}

impl SessionEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            SessionEvent::StateChanged { .. } => EventKind::StateChanged,
            SessionEvent::ScoreChanged { .. } => EventKind::ScoreChanged,
            SessionEvent::AttemptResolved { .. } => EventKind::AttemptResolved,
            SessionEvent::ShotRejected { .. } => EventKind::ShotRejected,
            SessionEvent::SessionFinished { .. } => EventKind::SessionFinished,
        }
    }
}

/// Discriminant used by the event bus to route typed subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    StateChanged,
    ScoreChanged,
    AttemptResolved,
    ShotRejected,
    SessionFinished,
}

/// Terminal report attached to `SessionFinished`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SessionSummary {
    Shootout {
        winner: TurnOwner,
        /// Identity of the winning side, when teams were selected
        #[serde(skip_serializing_if = "Option::is_none")]
        winning_team: Option<Team>,
        player_score: u32,
        opponent_score: u32,
        rounds_played: u32,
    },
    ScoreAttack {
        goals_scored: u32,
        attempts: u32,
        accuracy_percent: f32,
        tier: PerformanceTier,
    },
    /// Session ended by an explicit `end_session` before a natural finish
    Aborted,
}
