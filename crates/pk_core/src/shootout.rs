//! Shootout state machine
//!
//! Turn alternation, score bookkeeping and end-of-round evaluation for the
//! adversarial mode. The machine is the only writer of `MatchState`;
//! presentation code never sets a phase directly. Out-of-context events are
//! ignored and logged, never fatal.

use serde::{Deserialize, Serialize};

use crate::models::Team;

/// Which side an attempt belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnOwner {
    Player,
    Opponent,
}

impl TurnOwner {
    pub fn other(self) -> Self {
        match self {
            TurnOwner::Player => TurnOwner::Opponent,
            TurnOwner::Opponent => TurnOwner::Player,
        }
    }
}

/// Session phase.
///
/// `RoundEnd` and the two goalkeeping phases are part of the published
/// contract but the machine never enters them; they exist for presentation
/// layers that drive a manual-goalkeeping variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    TeamSelection,
    PlayerShooting,
    OpponentShooting,
    GoalkeepingPlayerTurn,
    GoalkeepingOpponentTurn,
    RoundEnd,
    GameEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Finished,
}

/// Mutable match aggregate. Owned by the machine; collaborators see
/// read-only snapshots through emitted events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub player_score: u32,
    pub opponent_score: u32,
    /// 1-based; may transiently exceed `max_rounds` during sudden-death
    /// evaluation
    pub current_round: u32,
    /// Grows one round at a time in sudden death, never shrinks
    pub max_rounds: u32,
    pub turn_owner: TurnOwner,
    pub status: SessionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_team: Option<Team>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opponent_team: Option<Team>,
}

impl MatchState {
    pub fn new(max_rounds: u32) -> Self {
        Self {
            player_score: 0,
            opponent_score: 0,
            current_round: 1,
            max_rounds: max_rounds.max(1),
            turn_owner: TurnOwner::Player,
            status: SessionStatus::InProgress,
            player_team: None,
            opponent_team: None,
        }
    }

    /// Back to a fresh first round, teams kept.
    pub fn reset(&mut self, max_rounds: u32) {
        self.player_score = 0;
        self.opponent_score = 0;
        self.current_round = 1;
        self.max_rounds = max_rounds.max(1);
        self.turn_owner = TurnOwner::Player;
        self.status = SessionStatus::InProgress;
    }

    /// Completed full rounds.
    pub fn rounds_played(&self) -> u32 {
        self.current_round.saturating_sub(1)
    }
}

/// What a resolved attempt did to the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotTransition {
    /// Event arrived in a phase that does not accept it; state untouched
    Ignored,
    /// Player's attempt booked, opponent is up
    TurnPassed,
    /// Full round complete, next regulation round starts
    RoundContinued,
    /// Regulation exhausted while catchable: one extra round granted
    SuddenDeath,
    Finished {
        winner: TurnOwner,
    },
}

/// The turn state machine for the adversarial mode.
#[derive(Debug, Clone)]
pub struct ShootoutMachine {
    phase: GamePhase,
    state: MatchState,
}

impl ShootoutMachine {
    pub fn new(max_rounds: u32) -> Self {
        Self {
            phase: GamePhase::TeamSelection,
            state: MatchState::new(max_rounds),
        }
    }

    pub fn with_teams(mut self, player: Team, opponent: Team) -> Self {
        self.state.player_team = Some(player);
        self.state.opponent_team = Some(opponent);
        self
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Reset scores and rounds and put the player on the spot.
    ///
    /// Restarting mid-match is allowed and resets everything; sudden-death
    /// extensions from a previous run do not carry over.
    pub fn start(&mut self, max_rounds: u32) {
        self.state.reset(max_rounds);
        self.phase = GamePhase::PlayerShooting;
        log::info!("Shootout started: {} regulation rounds", max_rounds);
    }

    /// Book a resolved attempt for whoever is on the spot.
    ///
    /// After the opponent's attempt the round closes and the end-of-round
    /// evaluation runs: a mathematically uncatchable lead finishes the
    /// match; an exhausted regulation with the score still contestable
    /// extends it by one sudden-death round.
    pub fn shot_resolved(&mut self, scored: bool) -> ShotTransition {
        match self.phase {
            GamePhase::PlayerShooting => {
                if scored {
                    self.state.player_score += 1;
                }
                self.state.turn_owner = TurnOwner::Opponent;
                self.phase = GamePhase::OpponentShooting;
                ShotTransition::TurnPassed
            }
            GamePhase::OpponentShooting => {
                if scored {
                    self.state.opponent_score += 1;
                }
                self.state.current_round += 1;
                self.close_round()
            }
            _ => {
                log::warn!(
                    "shot_resolved ignored: phase {:?} does not accept attempts",
                    self.phase
                );
                ShotTransition::Ignored
            }
        }
    }

    fn close_round(&mut self) -> ShotTransition {
        if self.lead_is_uncatchable() {
            let winner = self.leader();
            self.state.status = SessionStatus::Finished;
            self.phase = GamePhase::GameEnd;
            log::info!(
                "Shootout finished {}-{}, winner {:?}",
                self.state.player_score,
                self.state.opponent_score,
                winner
            );
            return ShotTransition::Finished { winner };
        }

        self.state.turn_owner = TurnOwner::Player;
        self.phase = GamePhase::PlayerShooting;

        if self.state.current_round > self.state.max_rounds {
            // Sudden death: one extra round at a time while still level.
            self.state.max_rounds += 1;
            log::info!(
                "Sudden death: round {} (max now {})",
                self.state.current_round,
                self.state.max_rounds
            );
            ShotTransition::SuddenDeath
        } else {
            ShotTransition::RoundContinued
        }
    }

    /// The trailing side cannot catch up in the rounds that remain.
    fn lead_is_uncatchable(&self) -> bool {
        let remaining =
            self.state.max_rounds as i64 - self.state.current_round as i64 + 1;
        let diff =
            (self.state.player_score as i64 - self.state.opponent_score as i64).abs();
        diff > remaining
    }

    fn leader(&self) -> TurnOwner {
        // A level score never reaches here: the catch-up rule only fires on
        // a strict lead.
        debug_assert_ne!(self.state.player_score, self.state.opponent_score);
        if self.state.player_score > self.state.opponent_score {
            TurnOwner::Player
        } else {
            TurnOwner::Opponent
        }
    }

    /// Winning side once the match is over.
    pub fn winner(&self) -> Option<TurnOwner> {
        if self.state.status == SessionStatus::Finished {
            Some(self.leader())
        } else {
            None
        }
    }

    /// Identity of the winning team, when teams were selected.
    pub fn winning_team(&self) -> Option<&Team> {
        match self.winner()? {
            TurnOwner::Player => self.state.player_team.as_ref(),
            TurnOwner::Opponent => self.state.opponent_team.as_ref(),
        }
    }
}
