//! Game loop thread. Runs the simulation engine at the configured frame rate
//! and publishes snapshots.
//!
//! The engine is created inside this thread so it never crosses threads.
//! Commands arrive via `mpsc` channel. Snapshots go to a `SnapshotSink` and
//! are stored in shared state for synchronous polling.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use range_core::state::RangeSnapshot;
use range_sim::engine::{SimConfig, SimulationEngine};

use crate::state::GameLoopCommand;

/// Longest frame the engine is asked to simulate in one step (ms).
/// Longer stalls (debugger, suspended laptop) are truncated.
pub const MAX_FRAME_MS: f64 = 250.0;

/// Receives every snapshot the game loop produces.
pub trait SnapshotSink: Send + 'static {
    fn publish(&mut self, snapshot: &RangeSnapshot);
}

impl<F> SnapshotSink for F
where
    F: FnMut(&RangeSnapshot) + Send + 'static,
{
    fn publish(&mut self, snapshot: &RangeSnapshot) {
        self(snapshot)
    }
}

/// Logs gameplay events as they come out of the engine.
#[derive(Debug, Default)]
pub struct TracingSink;

impl SnapshotSink for TracingSink {
    fn publish(&mut self, snapshot: &RangeSnapshot) {
        for event in &snapshot.events {
            tracing::debug!(
                tick = snapshot.time.tick,
                phase = ?snapshot.phase,
                ?event,
                "range event"
            );
        }
    }
}

/// Nominal duration of one frame at `frame_rate_hz`.
pub fn frame_duration(frame_rate_hz: u32) -> Duration {
    Duration::from_nanos(1_000_000_000 / u64::from(frame_rate_hz.max(1)))
}

/// Spawns the game loop in a new thread.
///
/// Returns the command sender for the session handle to use.
pub fn spawn_game_loop<S: SnapshotSink>(
    config: SimConfig,
    frame_rate_hz: u32,
    sink: S,
    latest_snapshot: Arc<Mutex<Option<RangeSnapshot>>>,
) -> std::io::Result<mpsc::Sender<GameLoopCommand>> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    std::thread::Builder::new()
        .name("range-game-loop".into())
        .spawn(move || {
            run_game_loop(config, frame_rate_hz, sink, cmd_rx, &latest_snapshot);
        })?;

    Ok(cmd_tx)
}

/// The game loop. Runs until Shutdown command or channel disconnect.
fn run_game_loop<S: SnapshotSink>(
    config: SimConfig,
    frame_rate_hz: u32,
    mut sink: S,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<RangeSnapshot>>,
) {
    let mut engine = SimulationEngine::new(config);
    let frame = frame_duration(frame_rate_hz);
    let mut last_frame = Instant::now();
    let mut next_frame_time = last_frame;
    tracing::info!(frame_rate_hz, "game loop started");

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => {
                    engine.queue_command(cmd);
                }
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    tracing::info!(tick = engine.time().tick, "game loop stopped");
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance by the measured frame time
        let now = Instant::now();
        let dt_ms = (now - last_frame).as_secs_f64() * 1000.0;
        last_frame = now;
        let snapshot = engine.tick(dt_ms.min(MAX_FRAME_MS));

        // 3. Store latest snapshot for synchronous polling (before the sink sees it)
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot.clone());
        }

        // 4. Publish
        sink.publish(&snapshot);

        // 5. Sleep until the next frame
        next_frame_time += frame;
        let now = Instant::now();
        if next_frame_time > now {
            std::thread::sleep(next_frame_time - now);
        } else if now - next_frame_time > frame * 2 {
            // Too far behind, reset to avoid catch-up spiral
            next_frame_time = now;
        }
    }
}
