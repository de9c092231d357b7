//! Session controller
//!
//! Composition root for a running session: routes inbound commands to the
//! outcome model and the active session type, publishes results through the
//! typed event bus, and owns the deferred-emission queue. Collaborators are
//! injected at construction; there is no ambient global state.
//!
//! Resolution is synchronous and atomic - an accepted shot updates session
//! state before the call returns. Only the *delivery* of follow-up work is
//! deferred: the opponent's decision delay and the pause before the next
//! round. While anything is queued, new shots are rejected.

use serde::{Deserialize, Serialize};

use crate::ai::OpponentProfile;
use crate::config::SessionRules;
use crate::error::{Result, SessionError};
use crate::events::EventBus;
use crate::models::{
    AttemptOutcome, DiveDirection, RejectReason, SessionEvent, SessionSummary, ShotInput, Team,
};
use crate::outcome::{self, SaveModel};
use crate::random::RandomSource;
use crate::scheduler::{Scheduled, Scheduler, Task};
use crate::score_attack::{ScoreAttackSession, ScoreAttackState};
use crate::shootout::{GamePhase, MatchState, ShootoutMachine, ShotTransition, TurnOwner};

/// Ceiling for charged shot power; inputs are clamped, not rejected.
pub const MAX_POWER: f32 = 100.0;

/// Which session type a `start_session` spins up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    TurnBased,
    ScoreAttack,
}

enum ActiveMode {
    Shootout(ShootoutMachine),
    ScoreAttack(ScoreAttackSession),
}

/// Builder for [`SessionController`]. `build` fails when a required
/// collaborator was never supplied; a session is never started with
/// partially-initialized dependencies.
#[derive(Default)]
pub struct SessionControllerBuilder {
    rules: SessionRules,
    save_model: SaveModel,
    random: Option<Box<dyn RandomSource>>,
    scheduler: Option<Box<dyn Scheduler>>,
    teams: Option<(Team, Team)>,
}

impl SessionControllerBuilder {
    pub fn rules(mut self, rules: SessionRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn save_model(mut self, save_model: SaveModel) -> Self {
        self.save_model = save_model;
        self
    }

    pub fn random(mut self, random: impl RandomSource + 'static) -> Self {
        self.random = Some(Box::new(random));
        self
    }

    pub fn scheduler(mut self, scheduler: impl Scheduler + 'static) -> Self {
        self.scheduler = Some(Box::new(scheduler));
        self
    }

    pub fn teams(mut self, player: Team, opponent: Team) -> Self {
        self.teams = Some((player, opponent));
        self
    }

    pub fn build(self) -> Result<SessionController> {
        let random = self
            .random
            .ok_or(SessionError::MissingCollaborator { name: "random source" })?;
        let scheduler = self
            .scheduler
            .ok_or(SessionError::MissingCollaborator { name: "scheduler" })?;

        Ok(SessionController {
            rules: self.rules,
            save_model: self.save_model,
            random,
            scheduler,
            bus: EventBus::new(),
            opponent: OpponentProfile::from_difficulty(0.5).with_save_model(self.save_model),
            teams: self.teams,
            mode: None,
            generation: 0,
        })
    }
}

pub struct SessionController {
    rules: SessionRules,
    save_model: SaveModel,
    random: Box<dyn RandomSource>,
    scheduler: Box<dyn Scheduler>,
    bus: EventBus,
    opponent: OpponentProfile,
    teams: Option<(Team, Team)>,
    mode: Option<ActiveMode>,
    /// Bumped on every start/end; scheduled work from older generations is
    /// dropped instead of firing into the new session.
    generation: u64,
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl SessionController {
    pub fn builder() -> SessionControllerBuilder {
        SessionControllerBuilder::default()
    }

    /// Subscription point for presentation/audio/AI collaborators.
    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    // ========================================================================
    // Inbound commands
    // ========================================================================

    /// Begin a fresh session, superseding any session in progress. Pending
    /// deferred work from the old session is invalidated.
    pub fn start_session(&mut self, mode: SessionMode, difficulty: f32) -> Result<()> {
        self.generation += 1;
        self.scheduler.clear();
        self.opponent =
            OpponentProfile::from_difficulty(difficulty).with_save_model(self.save_model);

        match mode {
            SessionMode::TurnBased => {
                let mut machine = match self.teams.clone() {
                    Some((player, opponent)) => {
                        ShootoutMachine::new(self.rules.max_rounds).with_teams(player, opponent)
                    }
                    None => ShootoutMachine::new(self.rules.max_rounds),
                };
                machine.start(self.rules.max_rounds);
                self.mode = Some(ActiveMode::Shootout(machine));
            }
            SessionMode::ScoreAttack => {
                self.mode = Some(ActiveMode::ScoreAttack(ScoreAttackSession::new(
                    self.rules.max_attempts,
                )));
                log::info!("Score attack started: {} attempts", self.rules.max_attempts);
            }
        }

        self.bus.emit(&SessionEvent::StateChanged {
            phase: GamePhase::PlayerShooting,
        });
        self.bus.emit(&SessionEvent::ScoreChanged {
            player_score: 0,
            opponent_score: 0,
        });
        Ok(())
    }

    /// Handle a shot from the input layer.
    ///
    /// Rejections never mutate session state: the caller gets a
    /// `ShotRejected` event and everything else stays as it was.
    pub fn shot_attempted(&mut self, shot: ShotInput) {
        if self.mode.is_none() || self.is_terminal() {
            self.reject(RejectReason::NotAccepting);
            return;
        }
        if self.scheduler.pending() > 0 {
            self.reject(RejectReason::ResolutionPending);
            return;
        }
        if shot.is_degenerate() {
            self.reject(RejectReason::DegenerateDirection);
            return;
        }

        // Boundary clamps: power into [0, MAX_POWER], direction to unit
        // length. Out-of-range values are corrected, not refused.
        let mut shot = shot;
        shot.power = shot.power.clamp(0.0, MAX_POWER);
        let shot = shot.normalized();

        let (outcome, dive) = self.resolve_player_shot(&shot);

        match self.mode().expect("checked above") {
            SessionMode::TurnBased => self.player_shot_in_shootout(outcome, dive),
            SessionMode::ScoreAttack => self.player_shot_in_score_attack(outcome, dive),
        }

        self.pump(0.0);
    }

    /// Abort whatever is running. Terminal state is forced immediately and
    /// any pending deferred emissions are invalidated.
    pub fn end_session(&mut self) -> Result<()> {
        if self.mode.is_none() {
            return Err(SessionError::NotRunning);
        }

        let was_terminal = self.is_terminal();
        self.generation += 1;
        self.scheduler.clear();

        if !was_terminal {
            log::info!("Session aborted before a natural finish");
            if matches!(self.mode, Some(ActiveMode::Shootout(_))) {
                self.bus.emit(&SessionEvent::StateChanged {
                    phase: GamePhase::GameEnd,
                });
            }
            self.bus.emit(&SessionEvent::SessionFinished {
                summary: SessionSummary::Aborted,
            });
        }
        self.mode = None;
        Ok(())
    }

    /// Pump the deferred queue with the host's frame delta. Immediate
    /// follow-ups scheduled by fired work are drained in the same call.
    pub fn advance(&mut self, dt_seconds: f32) {
        self.pump(dt_seconds);
    }

    // ========================================================================
    // Read-only views
    // ========================================================================

    pub fn mode(&self) -> Option<SessionMode> {
        match self.mode {
            Some(ActiveMode::Shootout(_)) => Some(SessionMode::TurnBased),
            Some(ActiveMode::ScoreAttack(_)) => Some(SessionMode::ScoreAttack),
            None => None,
        }
    }

    pub fn phase(&self) -> Option<GamePhase> {
        match &self.mode {
            Some(ActiveMode::Shootout(machine)) => Some(machine.phase()),
            _ => None,
        }
    }

    pub fn match_state(&self) -> Option<&MatchState> {
        match &self.mode {
            Some(ActiveMode::Shootout(machine)) => Some(machine.state()),
            _ => None,
        }
    }

    pub fn score_attack_state(&self) -> Option<&ScoreAttackState> {
        match &self.mode {
            Some(ActiveMode::ScoreAttack(session)) => Some(session.state()),
            _ => None,
        }
    }

    /// Whether a resolution/transition sequence is still pending.
    pub fn is_busy(&self) -> bool {
        self.scheduler.pending() > 0
    }

    pub fn is_terminal(&self) -> bool {
        match &self.mode {
            Some(ActiveMode::Shootout(machine)) => machine.phase() == GamePhase::GameEnd,
            Some(ActiveMode::ScoreAttack(session)) => session.is_finished(),
            None => false,
        }
    }

    // ========================================================================
    // Resolution internals
    // ========================================================================

    /// Resolve the player's (normalized) shot: wide of the frame is a miss
    /// with no save attempt; on frame, the simulated keeper decides it.
    fn resolve_player_shot(&mut self, shot: &ShotInput) -> (AttemptOutcome, Option<DiveDirection>) {
        if !outcome::is_on_frame(shot.direction_x, shot.direction_y) {
            return (AttemptOutcome::Missed, None);
        }
        let (saved, dive) = self.opponent.attempt_save(shot, self.random.as_mut());
        let outcome = if saved {
            AttemptOutcome::Saved
        } else {
            AttemptOutcome::Goal
        };
        (outcome, Some(dive))
    }

    fn player_shot_in_shootout(&mut self, outcome: AttemptOutcome, dive: Option<DiveDirection>) {
        self.bus.emit(&SessionEvent::AttemptResolved {
            side: TurnOwner::Player,
            outcome,
            dive,
        });

        let (player_score, opponent_score) = {
            let Some(ActiveMode::Shootout(machine)) = &mut self.mode else {
                unreachable!("caller checked the mode");
            };
            let transition = machine.shot_resolved(outcome.is_goal());
            debug_assert_eq!(transition, ShotTransition::TurnPassed);
            (machine.state().player_score, machine.state().opponent_score)
        };

        self.bus.emit(&SessionEvent::ScoreChanged {
            player_score,
            opponent_score,
        });
        self.bus.emit(&SessionEvent::StateChanged {
            phase: GamePhase::OpponentShooting,
        });

        // The opponent thinks, then shoots.
        let delay = self.opponent.decision_delay();
        self.schedule(delay, Task::OpponentShot);
    }

    fn player_shot_in_score_attack(&mut self, outcome: AttemptOutcome, dive: Option<DiveDirection>) {
        let (goals, report) = {
            let Some(ActiveMode::ScoreAttack(session)) = &mut self.mode else {
                unreachable!("caller checked the mode");
            };
            session.register_attempt();
            let report = match outcome {
                AttemptOutcome::Goal => session.register_goal(),
                AttemptOutcome::Missed => session.register_miss(),
                AttemptOutcome::Saved => session.register_save(),
            };
            (session.state().goals_scored, report)
        };

        self.bus.emit(&SessionEvent::AttemptResolved {
            side: TurnOwner::Player,
            outcome,
            dive,
        });
        self.bus.emit(&SessionEvent::ScoreChanged {
            player_score: goals,
            opponent_score: 0,
        });

        if let Some(report) = report {
            let pause = self.rules.round_pause;
            self.schedule(
                pause,
                Task::Emit(SessionEvent::SessionFinished {
                    summary: SessionSummary::ScoreAttack {
                        goals_scored: report.goals_scored,
                        attempts: report.attempts,
                        accuracy_percent: report.accuracy_percent,
                        tier: report.tier,
                    },
                }),
            );
        }
    }

    /// The simulated opponent's attempt, fired from the deferred queue after
    /// its decision delay.
    fn resolve_opponent_shot(&mut self) {
        match &self.mode {
            Some(ActiveMode::Shootout(machine))
                if machine.phase() == GamePhase::OpponentShooting => {}
            _ => {
                log::warn!("opponent shot fired outside an opponent turn; dropped");
                return;
            }
        }

        let scored = self.opponent.take_shot(self.random.as_mut());
        let outcome = if scored {
            AttemptOutcome::Goal
        } else {
            AttemptOutcome::Missed
        };

        self.bus.emit(&SessionEvent::AttemptResolved {
            side: TurnOwner::Opponent,
            outcome,
            dive: None,
        });

        let (transition, player_score, opponent_score, summary) = {
            let Some(ActiveMode::Shootout(machine)) = &mut self.mode else {
                unreachable!("checked above");
            };
            let transition = machine.shot_resolved(scored);
            let state = machine.state();
            let summary = if let ShotTransition::Finished { winner } = transition {
                Some(SessionSummary::Shootout {
                    winner,
                    winning_team: machine.winning_team().cloned(),
                    player_score: state.player_score,
                    opponent_score: state.opponent_score,
                    rounds_played: state.rounds_played(),
                })
            } else {
                None
            };
            (transition, state.player_score, state.opponent_score, summary)
        };

        self.bus.emit(&SessionEvent::ScoreChanged {
            player_score,
            opponent_score,
        });

        let pause = self.rules.round_pause;
        match transition {
            ShotTransition::RoundContinued | ShotTransition::SuddenDeath => {
                self.schedule(
                    pause,
                    Task::Emit(SessionEvent::StateChanged {
                        phase: GamePhase::PlayerShooting,
                    }),
                );
            }
            ShotTransition::Finished { .. } => {
                self.schedule(
                    pause,
                    Task::Emit(SessionEvent::StateChanged {
                        phase: GamePhase::GameEnd,
                    }),
                );
                self.schedule(
                    pause,
                    Task::Emit(SessionEvent::SessionFinished {
                        summary: summary.expect("built for Finished"),
                    }),
                );
            }
            ShotTransition::TurnPassed | ShotTransition::Ignored => {
                log::warn!("unexpected transition {:?} after opponent shot", transition);
            }
        }
    }

    // ========================================================================
    // Deferred queue
    // ========================================================================

    fn schedule(&mut self, delay_seconds: f32, task: Task) {
        self.scheduler.schedule(
            delay_seconds,
            Scheduled {
                generation: self.generation,
                task,
            },
        );
    }

    fn pump(&mut self, dt_seconds: f32) {
        let mut due = self.scheduler.advance(dt_seconds);
        while !due.is_empty() {
            for item in due {
                if item.generation != self.generation {
                    log::debug!("dropping scheduled task from superseded session");
                    continue;
                }
                match item.task {
                    Task::Emit(event) => self.bus.emit(&event),
                    Task::OpponentShot => self.resolve_opponent_shot(),
                }
            }
            due = self.scheduler.advance(0.0);
        }
    }

    fn reject(&mut self, reason: RejectReason) {
        log::warn!("shot rejected: {:?}", reason);
        self.bus.emit(&SessionEvent::ShotRejected { reason });
    }
}
