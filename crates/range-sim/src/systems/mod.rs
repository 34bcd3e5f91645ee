//! ECS systems that operate on the range world each tick.
//!
//! Systems are functions over `&mut World` (or `&World` where hecs dynamic
//! borrows are enough). They do not own state; all state lives in components
//! or on the engine.

pub mod ballistics;
pub mod bullet_hits;
pub mod cleanup;
pub mod detonation;
pub mod snapshot;
