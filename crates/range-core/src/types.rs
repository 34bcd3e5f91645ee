//! Fundamental geometric, timing and simulation types.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// 3D position in world units.
/// x = left/right, y = forward/back (negative is downrange), z = up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// 3D velocity in world units per reference frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Simulation time tracking. Frame durations are variable.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of frames processed.
    pub tick: u64,
    /// Elapsed simulation time in milliseconds.
    pub elapsed_ms: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn as_dvec3(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    /// Euclidean distance to another position.
    pub fn range_to(&self, other: &Position) -> f64 {
        self.as_dvec3().distance(other.as_dvec3())
    }

    /// Displace by one frame of velocity.
    pub fn translate(&mut self, vel: &Velocity) {
        *self = (self.as_dvec3() + vel.as_dvec3()).into();
    }
}

impl From<DVec3> for Position {
    fn from(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl Velocity {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn as_dvec3(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    /// Speed magnitude (units per frame).
    pub fn speed(&self) -> f64 {
        self.as_dvec3().length()
    }
}

impl From<DVec3> for Velocity {
    fn from(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl SimTime {
    /// Advance by one frame of `dt_ms` milliseconds.
    pub fn advance(&mut self, dt_ms: f64) {
        self.tick += 1;
        self.elapsed_ms += dt_ms;
    }
}

/// Scale factor that converts a frame of `dt_ms` into reference frames.
pub fn effective_delta(dt_ms: f64) -> f64 {
    dt_ms / crate::constants::REFERENCE_FRAME_MS
}

/// A timer that counts down from a fixed duration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    pub duration_ms: f64,
    pub remaining_ms: f64,
}

impl Countdown {
    pub fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms,
            remaining_ms: duration_ms,
        }
    }

    pub fn advance(&mut self, dt_ms: f64) {
        self.remaining_ms = (self.remaining_ms - dt_ms).max(0.0);
    }

    pub fn expired(&self) -> bool {
        self.remaining_ms <= 0.0
    }

    /// Fraction of the duration already elapsed, in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        (1.0 - self.remaining_ms / self.duration_ms).clamp(0.0, 1.0)
    }
}

/// A timer that accumulates elapsed time and compares against a threshold.
///
/// `expired` is strict (`elapsed > threshold`), matching the fuse and travel
/// checks it backs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Stopwatch {
    pub elapsed_ms: f64,
    pub threshold_ms: f64,
}

impl Stopwatch {
    pub fn new(threshold_ms: f64) -> Self {
        Self {
            elapsed_ms: 0.0,
            threshold_ms,
        }
    }

    pub fn advance(&mut self, dt_ms: f64) {
        self.elapsed_ms += dt_ms;
    }

    pub fn expired(&self) -> bool {
        self.elapsed_ms > self.threshold_ms
    }
}
