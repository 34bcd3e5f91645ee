//! Shooting range host application.
//!
//! Runs the simulation on a game loop thread, forwards player commands to it
//! over a channel, and publishes snapshots to a pluggable sink. The binary
//! drives a session with the autopilot player.

pub mod autopilot;
pub mod config;
pub mod game_loop;
pub mod session;
pub mod state;

pub use range_core as core;
