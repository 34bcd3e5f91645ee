use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use range_app::autopilot::Autopilot;
use range_app::config::AppConfig;
use range_app::game_loop::{self, TracingSink};
use range_app::session;
use range_app::state::AppState;
use range_core::enums::GamePhase;
use range_core::state::RangeSnapshot;

#[derive(Parser)]
#[command(name = "range-app", about = "Shooting range session host")]
struct Cli {
    /// JSON config file (defaults are used for missing fields)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the session length in seconds
    #[arg(long)]
    seconds: Option<f64>,

    /// Run the real-time game loop thread instead of stepping headless
    #[arg(long)]
    realtime: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Printed to stdout when the session ends.
#[derive(Debug, Serialize)]
struct SessionSummary {
    phase: GamePhase,
    elapsed_ms: f64,
    score: u32,
    hits: u32,
    round_scores: Vec<u32>,
}

impl From<&RangeSnapshot> for SessionSummary {
    fn from(snapshot: &RangeSnapshot) -> Self {
        Self {
            phase: snapshot.phase,
            elapsed_ms: snapshot.time.elapsed_ms,
            score: snapshot.score.score,
            hits: snapshot.score.hits,
            round_scores: snapshot.score.round_scores.clone(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .compact()
        .init();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.sim.seed = seed;
    }
    if let Some(seconds) = cli.seconds {
        config.duration_secs = seconds;
    }
    if cli.realtime {
        config.headless = false;
    }
    tracing::info!(seed = config.sim.seed, headless = config.headless, "range-app starting");

    let mut pilot = Autopilot::new(config.sim.mouse_sensitivity);
    let last = if config.headless {
        session::run_headless(&config, &mut pilot)
    } else {
        run_realtime(&config, &mut pilot)?
    };

    let summary = SessionSummary::from(&last);
    tracing::info!(score = summary.score, hits = summary.hits, "session finished");
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Drive the threaded game loop with the autopilot, polling the latest
/// snapshot once per frame.
fn run_realtime(config: &AppConfig, pilot: &mut Autopilot) -> Result<RangeSnapshot> {
    let state = AppState::new();
    session::start_simulation(&state, config.sim.clone(), config.frame_rate_hz, TracingSink)
        .context("starting game loop")?;

    let frame = game_loop::frame_duration(config.frame_rate_hz);
    let deadline = Instant::now() + Duration::from_secs_f64(config.duration_secs.max(0.0));
    let mut last_tick = None;
    let mut last = RangeSnapshot::default();

    while Instant::now() < deadline {
        std::thread::sleep(frame);
        let Some(snapshot) = session::get_snapshot(&state)? else {
            continue;
        };
        // Only react to each simulated frame once.
        if last_tick == Some(snapshot.time.tick) {
            continue;
        }
        last_tick = Some(snapshot.time.tick);
        for command in pilot.next_commands(&snapshot) {
            session::send_command(&state, command)?;
        }
        let over = snapshot.phase == GamePhase::GameOver;
        last = snapshot;
        if over {
            break;
        }
    }

    session::stop_simulation(&state)?;
    Ok(last)
}
