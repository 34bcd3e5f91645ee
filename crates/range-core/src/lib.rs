//! Core types and definitions for the shooting range simulation.
//!
//! This crate defines the vocabulary shared across the other crates:
//! components, commands, state snapshots, events, errors and constants.
//! It has no dependency on any runtime or rendering framework.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod errors;
pub mod events;
pub mod state;
pub mod types;
