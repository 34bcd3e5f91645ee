//! Game state snapshot: everything the renderer and HUD need after a tick.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::{Popup, RangeEvent, ShakePulse};
use crate::types::{Position, SimTime};

/// Complete game state published after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RangeSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub round: RoundView,
    pub score: ScoreView,
    pub camera: CameraView,
    pub weapons: WeaponsView,
    pub bullets: Vec<BulletView>,
    pub grenades: Vec<GrenadeView>,
    pub targets: Vec<TargetView>,
    /// Popups still on screen.
    pub popups: Vec<Popup>,
    /// Remaining camera shake (zero duration when calm).
    pub shake: ShakePulse,
    pub events: Vec<RangeEvent>,
}

/// Round progress for the HUD.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoundView {
    /// -1 before the first round.
    pub index: i32,
    pub total: usize,
    pub time_remaining_ms: f64,
    /// Set once the game is over.
    pub credits_started_at_ms: Option<f64>,
}

/// Running score.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreView {
    pub score: u32,
    pub hits: u32,
    /// Points earned in each completed round.
    pub round_scores: Vec<u32>,
    pub grenades_left: u32,
}

/// Camera pose for the renderer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CameraView {
    pub position: Position,
    pub yaw: f64,
    pub pitch: f64,
    /// Unit forward vector derived from yaw/pitch.
    pub forward: DVec3,
}

/// Weapon and ammunition state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeaponsView {
    pub held: WeaponKind,
    pub activity: WeaponActivity,
    /// One entry per weapon kind, in `WeaponKind::ALL` order.
    pub ammo: Vec<AmmoView>,
    /// Weapon being reloaded, if any.
    pub reloading: Option<WeaponKind>,
    /// Reload completion in `0.0..=1.0` (0 when idle).
    pub reload_progress: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmmoView {
    pub weapon: WeaponKind,
    pub magazine: u32,
    pub capacity: u32,
    pub reserve: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulletView {
    pub position: Position,
    pub radius: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrenadeView {
    pub position: Position,
    pub exploded: bool,
    /// Time since detonation (ms), for the expanding blast sphere.
    pub explosion_elapsed_ms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetView {
    /// Authoritative position used for collision.
    pub position: Position,
    /// Position to draw at, including the wobble.
    pub draw_position: Position,
    pub radius: f64,
    pub points: u32,
}
