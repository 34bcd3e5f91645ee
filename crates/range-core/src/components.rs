//! ECS components for hecs entities.
//!
//! Components are plain data structs. Per-tick behaviour lives in the
//! simulation systems, not here.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::types::{Countdown, Position, Stopwatch};

/// A bullet or shotgun pellet. Spawned with `Position` and `Velocity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub radius: f64,
    /// Cumulative distance flown.
    pub travel: f64,
    pub max_travel: f64,
    /// Terminal: the bullet is retired once set.
    pub hit: bool,
    /// Whether gravity applies.
    pub has_drop: bool,
}

impl Bullet {
    pub fn new(has_drop: bool) -> Self {
        Self {
            radius: BULLET_RADIUS,
            travel: 0.0,
            max_travel: BULLET_MAX_TRAVEL,
            hit: false,
            has_drop,
        }
    }
}

/// A thrown grenade. Spawned with `Position` and `Velocity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grenade {
    pub fuse: Stopwatch,
    pub exploded: bool,
    /// Visual lifetime of the explosion, started at detonation.
    pub explosion: Countdown,
    /// Captured at detonation; immutable afterwards.
    pub explosion_pos: Option<Position>,
}

impl Default for Grenade {
    fn default() -> Self {
        Self {
            fuse: Stopwatch::new(GRENADE_FUSE_MS),
            exploded: false,
            explosion: Countdown::new(GRENADE_EXPLOSION_MS),
            explosion_pos: None,
        }
    }
}

impl Grenade {
    /// Explosion finished playing; safe to despawn.
    pub fn spent(&self) -> bool {
        self.exploded && self.explosion.expired()
    }
}

/// A range target. Spawned with `Position`, which is authoritative for hits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    /// Lateral centre the draw wobble oscillates around.
    pub base_x: f64,
    /// Wobble phase offset (radians).
    pub phase: f64,
    pub radius: f64,
    pub alive: bool,
    pub points: u32,
    /// Lane distance the target was generated from.
    pub lane_distance: f64,
    /// Spawn order within the round.
    pub slot: usize,
}

/// Marker for entities cleared at every round boundary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Projectile;
