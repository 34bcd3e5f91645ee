//! Events emitted by the simulation for UI and render feedback.

use serde::{Deserialize, Serialize};

/// Transient on-screen message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Popup {
    pub text: String,
    pub duration_ms: f64,
    /// Simulation time at which the popup was raised.
    pub raised_at_ms: f64,
}

impl Popup {
    pub fn new(text: impl Into<String>, duration_ms: f64, raised_at_ms: f64) -> Self {
        Self {
            text: text.into(),
            duration_ms,
            raised_at_ms,
        }
    }

    /// Whether the popup is still showing at `now_ms`.
    pub fn visible_at(&self, now_ms: f64) -> bool {
        now_ms - self.raised_at_ms <= self.duration_ms
    }
}

/// Render-time camera jitter request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ShakePulse {
    pub duration_ms: f64,
    pub strength: f64,
}

/// Discrete gameplay events, drained into every snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RangeEvent {
    RoundStarted { round: usize },
    RoundCompleted { round: usize, points: u32 },
    GameOver { score: u32 },
    TargetDestroyed { points: u32 },
    GrenadeDetonated { kills: u32, airburst: bool },
    ShotFired { pellets: u32 },
    ReloadStarted,
    ReloadFinished { loaded: u32 },
    Shake(ShakePulse),
}
