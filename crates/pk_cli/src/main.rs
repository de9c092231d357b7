//! Penalty session CLI
//!
//! Drives seeded sessions against the core and prints the event log, or
//! pipes a JSON request file through the session API.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use pk_core::{
    run_session_json, AttemptOutcome, ImmediateScheduler, RandomSource, SeededRandom,
    SessionController, SessionEvent, SessionMode, SessionRules, SessionSummary, ShotInput, Team,
};

#[derive(Parser)]
#[command(name = "pk_cli")]
#[command(about = "Run penalty shootout sessions from the command line", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a turn-based shootout with a seeded player
    Shootout {
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Difficulty scalar in [0, 1]
        #[arg(long, default_value = "0.5")]
        difficulty: f32,

        /// Regulation rounds
        #[arg(long, default_value = "5")]
        rounds: u32,
    },

    /// Run a solo score-attack session
    ScoreAttack {
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Difficulty scalar in [0, 1]
        #[arg(long, default_value = "0.5")]
        difficulty: f32,

        /// Attempts in the session
        #[arg(long, default_value = "5")]
        attempts: u32,
    },

    /// Pipe a JSON session request through the core
    Json {
        /// Request file path
        #[arg(long)]
        r#in: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Shootout {
            seed,
            difficulty,
            rounds,
        } => {
            let rules = SessionRules {
                max_rounds: rounds,
                ..SessionRules::default()
            };
            run_session(SessionMode::TurnBased, seed, difficulty, rules)
        }
        Commands::ScoreAttack {
            seed,
            difficulty,
            attempts,
        } => {
            let rules = SessionRules {
                max_attempts: attempts,
                ..SessionRules::default()
            };
            run_session(SessionMode::ScoreAttack, seed, difficulty, rules)
        }
        Commands::Json { r#in } => {
            let request = std::fs::read_to_string(&r#in)
                .with_context(|| format!("reading request from {}", r#in.display()))?;
            let response = run_session_json(&request)
                .map_err(|e| anyhow::anyhow!("session failed: {e}"))?;
            println!("{response}");
            Ok(())
        }
    }
}

/// Run a live-style session with player aims generated from the seed.
fn run_session(mode: SessionMode, seed: u64, difficulty: f32, rules: SessionRules) -> Result<()> {
    let catalog = Team::default_catalog();
    let mut controller = SessionController::builder()
        .rules(rules)
        .random(SeededRandom::new(seed))
        .scheduler(ImmediateScheduler::new())
        .teams(catalog[0].clone(), catalog[1].clone())
        .build()?;

    controller.bus_mut().subscribe_all(|ev| print_event(ev));
    controller.start_session(mode, difficulty)?;

    // Independent aim stream so tweaking outcome rolls never shifts aims.
    let mut aim = SeededRandom::new(seed.wrapping_add(0x9E37_79B9));
    let mut shots = 0;
    while !controller.is_terminal() {
        let direction_x = aim.next_uniform() * 1.2 - 0.6;
        let power = 40.0 + aim.next_uniform() * 60.0;
        controller.shot_attempted(ShotInput::new(direction_x, -1.0, power));

        shots += 1;
        if shots > 500 {
            bail!("session failed to terminate after {shots} shots");
        }
    }

    Ok(())
}

fn print_event(event: &SessionEvent) {
    match event {
        SessionEvent::StateChanged { phase } => println!("[state] {phase:?}"),
        SessionEvent::ScoreChanged {
            player_score,
            opponent_score,
        } => println!("[score] {player_score}-{opponent_score}"),
        SessionEvent::AttemptResolved {
            side,
            outcome,
            dive,
        } => {
            let verdict = match outcome {
                AttemptOutcome::Goal => "GOAL",
                AttemptOutcome::Saved => "saved",
                AttemptOutcome::Missed => "missed",
            };
            match dive {
                Some(dive) => println!("[attempt] {side:?}: {verdict} (keeper dove {dive:?})"),
                None => println!("[attempt] {side:?}: {verdict}"),
            }
        }
        SessionEvent::ShotRejected { reason } => println!("[rejected] {reason:?}"),
        SessionEvent::SessionFinished { summary } => print_summary(summary),
    }
}

fn print_summary(summary: &SessionSummary) {
    match summary {
        SessionSummary::Shootout {
            winner,
            winning_team,
            player_score,
            opponent_score,
            rounds_played,
        } => {
            println!("=== Full time after {rounds_played} rounds ===");
            println!("Final score {player_score}-{opponent_score}, winner: {winner:?}");
            if let Some(team) = winning_team {
                println!("{} take the shootout", team.name);
            }
        }
        SessionSummary::ScoreAttack {
            goals_scored,
            attempts,
            accuracy_percent,
            tier,
        } => {
            println!("=== Score attack over ===");
            println!(
                "{goals_scored}/{attempts} scored ({accuracy_percent:.1}%) - {}",
                tier.label()
            );
        }
        SessionSummary::Aborted => println!("=== Session aborted ==="),
    }
}
