//! Simulation engine for the shooting range.
//!
//! Owns the hecs ECS world, advances it by variable frame times,
//! and produces RangeSnapshots for the renderer and HUD.

pub mod arsenal;
pub mod camera;
pub mod engine;
pub mod round;
pub mod systems;
pub mod world_setup;

pub use engine::{SimConfig, SimulationEngine};
pub use range_core as core;

#[cfg(test)]
mod tests;
