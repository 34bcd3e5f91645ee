//! Session handle: starts the game loop and bridges host requests to it.

use thiserror::Error;

use range_core::commands::PlayerCommand;
use range_core::enums::GamePhase;
use range_core::state::RangeSnapshot;
use range_sim::engine::{SimConfig, SimulationEngine};

use crate::autopilot::Autopilot;
use crate::config::AppConfig;
use crate::game_loop::{self, SnapshotSink};
use crate::state::{AppState, GameLoopCommand};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("simulation already running")]
    AlreadyRunning,
    #[error("simulation not started")]
    NotStarted,
    #[error("game loop has stopped")]
    Disconnected,
    #[error("shared state lock poisoned")]
    Poisoned,
    #[error("failed to spawn game loop thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Start the simulation. Spawns the game loop thread if not already running.
pub fn start_simulation<S: SnapshotSink>(
    state: &AppState,
    config: SimConfig,
    frame_rate_hz: u32,
    sink: S,
) -> Result<(), SessionError> {
    let mut running = state.running.lock().map_err(|_| SessionError::Poisoned)?;
    if *running {
        return Err(SessionError::AlreadyRunning);
    }

    let cmd_tx =
        game_loop::spawn_game_loop(config, frame_rate_hz, sink, state.latest_snapshot.clone())?;

    let mut tx_lock = state.command_tx.lock().map_err(|_| SessionError::Poisoned)?;
    *tx_lock = Some(cmd_tx);
    *running = true;
    Ok(())
}

/// Send a player command to the simulation.
pub fn send_command(state: &AppState, command: PlayerCommand) -> Result<(), SessionError> {
    let tx_lock = state.command_tx.lock().map_err(|_| SessionError::Poisoned)?;
    match tx_lock.as_ref() {
        Some(tx) => tx
            .send(GameLoopCommand::PlayerCommand(command))
            .map_err(|_| SessionError::Disconnected),
        None => Err(SessionError::NotStarted),
    }
}

/// Get the latest snapshot synchronously.
pub fn get_snapshot(state: &AppState) -> Result<Option<RangeSnapshot>, SessionError> {
    let lock = state
        .latest_snapshot
        .lock()
        .map_err(|_| SessionError::Poisoned)?;
    Ok(lock.clone())
}

/// Play a whole session on the calling thread with a fixed frame time.
///
/// Stops at game over or after `config.duration_secs` of simulated time,
/// whichever comes first, and returns the last snapshot.
pub fn run_headless(config: &AppConfig, pilot: &mut Autopilot) -> RangeSnapshot {
    let mut engine = SimulationEngine::new(config.sim.clone());
    let frame_ms = config.frame_ms();
    let budget_ms = config.duration_secs * 1000.0;

    let mut snapshot = engine.tick(frame_ms);
    while snapshot.phase != GamePhase::GameOver && snapshot.time.elapsed_ms < budget_ms {
        engine.queue_commands(pilot.next_commands(&snapshot));
        snapshot = engine.tick(frame_ms);
        for event in &snapshot.events {
            tracing::debug!(tick = snapshot.time.tick, ?event, "range event");
        }
    }
    snapshot
}

/// Ask the game loop to exit. Stopping a session that never started is a no-op.
pub fn stop_simulation(state: &AppState) -> Result<(), SessionError> {
    let mut running = state.running.lock().map_err(|_| SessionError::Poisoned)?;
    let mut tx_lock = state.command_tx.lock().map_err(|_| SessionError::Poisoned)?;
    if let Some(tx) = tx_lock.take() {
        let _ = tx.send(GameLoopCommand::Shutdown);
    }
    *running = false;
    Ok(())
}
