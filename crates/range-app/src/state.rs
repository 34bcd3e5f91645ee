//! Application state shared between the session handle and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use range_core::commands::PlayerCommand;
use range_core::state::RangeSnapshot;

/// Commands sent from the session handle to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulation engine.
    PlayerCommand(PlayerCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Shared application state.
///
/// - `mpsc::Sender` sits in a `Mutex` so the state is `Sync`
/// - `Mutex<Option<...>>` for the sender, which only exists once a session starts
/// - `Arc<Mutex<...>>` for the latest snapshot, shared with the game loop thread
pub struct AppState {
    /// `None` before `session::start_simulation` is called.
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    /// Latest snapshot for synchronous polling.
    /// Updated by the game loop thread after each tick.
    pub latest_snapshot: Arc<Mutex<Option<RangeSnapshot>>>,
    pub running: Mutex<bool>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
            running: Mutex::new(false),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
