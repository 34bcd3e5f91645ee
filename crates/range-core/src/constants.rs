//! Simulation constants and tuning parameters.

use std::f64::consts::FRAC_PI_2;

/// Reference frame duration in milliseconds (60 fps).
/// Velocity-based integration is normalized against this.
pub const REFERENCE_FRAME_MS: f64 = 16.6667;

// --- Rounds ---

/// Number of rounds in a full game.
pub const ROUNDS_TOTAL: usize = 4;

/// Duration of a single round in milliseconds.
pub const ROUND_DURATION_MS: f64 = 45_000.0;

/// Targets spawned per round.
pub const TARGETS_PER_ROUND: usize = 4;

/// Downrange distance of every target lane, per round.
pub const ROUND_DISTANCES: [[f64; TARGETS_PER_ROUND]; ROUNDS_TOTAL] = [
    [500.0, 800.0, 1100.0, 1400.0],
    [700.0, 1200.0, 1700.0, 2200.0],
    [900.0, 1500.0, 2100.0, 2500.0],
    [1400.0, 2000.0, 2400.0, 2800.0],
];

// --- Targets ---

/// Nearest lane distance used for radius/points interpolation.
pub const TARGET_DISTANCE_NEAR: f64 = 500.0;

/// Farthest lane distance used for radius/points interpolation.
pub const TARGET_DISTANCE_FAR: f64 = 2800.0;

/// Target radius at the nearest lane.
pub const TARGET_RADIUS_NEAR: f64 = 60.0;

/// Target radius at the farthest lane.
pub const TARGET_RADIUS_FAR: f64 = 28.0;

/// Point value at the nearest lane.
pub const TARGET_POINTS_NEAR: f64 = 20.0;

/// Point value at the farthest lane.
pub const TARGET_POINTS_FAR: f64 = 120.0;

/// Base lateral offset of a target from the centre line.
pub const TARGET_LATERAL_BASE: f64 = 200.0;

/// Random lateral jitter (±).
pub const TARGET_LATERAL_JITTER: f64 = 150.0;

/// Random depth jitter (±).
pub const TARGET_DEPTH_JITTER: f64 = 60.0;

/// Minimum target height.
pub const TARGET_HEIGHT_MIN: f64 = 20.0;

/// Maximum target height.
pub const TARGET_HEIGHT_MAX: f64 = 80.0;

/// Amplitude of the render-only lateral wobble.
pub const TARGET_WOBBLE_AMPLITUDE: f64 = 60.0;

// --- Bullets ---

/// Maximum number of live bullets; oldest are evicted beyond this.
pub const MAX_BULLETS: usize = 400;

/// Bullet collision/draw radius.
pub const BULLET_RADIUS: f64 = 6.0;

/// Cumulative travel after which a bullet retires.
pub const BULLET_MAX_TRAVEL: f64 = 10_000.0;

/// Per-reference-frame vertical acceleration applied to dropping bullets.
pub const SNIPER_GRAVITY: f64 = -0.01;

/// Muzzle offset in multiples of the bullet velocity.
pub const MUZZLE_OFFSET_FRAMES: f64 = 2.0;

// --- Grenades ---

/// Per-reference-frame vertical acceleration applied to grenades.
pub const GRENADE_GRAVITY: f64 = -0.08;

/// Grenade contact radius.
pub const GRENADE_RADIUS: f64 = 10.0;

/// Fuse duration in milliseconds before an airburst.
pub const GRENADE_FUSE_MS: f64 = 1800.0;

/// Lethal radius of a grenade explosion (strict `<`).
pub const GRENADE_BLAST_RADIUS: f64 = 300.0;

/// Visual lifetime of an explosion in milliseconds.
pub const GRENADE_EXPLOSION_MS: f64 = 500.0;

/// Throw speed along the aim direction.
pub const GRENADE_THROW_SPEED: f64 = 12.0;

/// Extra upward speed added to a throw.
pub const GRENADE_THROW_LOFT: f64 = 2.0;

/// Forward distance from the camera at which a grenade spawns.
pub const GRENADE_SPAWN_FORWARD: f64 = 30.0;

/// Height below the camera at which a grenade spawns.
pub const GRENADE_SPAWN_DROP: f64 = 20.0;

/// Grenades available for a whole game.
pub const GRENADES_PER_GAME: u32 = 1;

// --- Weapons ---

/// Inter-shot delay within a burst (ms).
pub const BURST_INTERVAL_MS: f64 = 100.0;

/// Pistol muzzle speed.
pub const PISTOL_SPEED: f64 = 14.0;

/// Pistol magazine capacity.
pub const PISTOL_MAGAZINE: u32 = 12;

/// Pistol starting reserve.
pub const PISTOL_RESERVE: u32 = 60;

/// Pistol reload time (ms).
pub const PISTOL_RELOAD_MS: f64 = 1200.0;

/// Pistol shots per trigger press.
pub const PISTOL_BURST: u32 = 3;

/// Shotgun pellet speed.
pub const SHOTGUN_SPEED: f64 = 13.0;

/// Shotgun magazine capacity.
pub const SHOTGUN_MAGAZINE: u32 = 5;

/// Shotgun starting reserve.
pub const SHOTGUN_RESERVE: u32 = 25;

/// Shotgun reload time (ms).
pub const SHOTGUN_RELOAD_MS: f64 = 1800.0;

/// Pellets per shotgun shell.
pub const SHOTGUN_PELLETS: u32 = 5;

/// Pellet yaw spread (±radians).
pub const SHOTGUN_YAW_SPREAD: f64 = 0.08;

/// Pellet pitch spread (±radians).
pub const SHOTGUN_PITCH_SPREAD: f64 = 0.06;

// --- Camera ---

/// Default camera position.
pub const CAMERA_START: [f64; 3] = [0.0, 100.0, 150.0];

/// Yaw facing downrange.
pub const CAMERA_DEFAULT_YAW: f64 = -FRAC_PI_2;

/// Margin kept between pitch and straight up/down.
pub const PITCH_EPSILON: f64 = 0.01;

/// Pitch limit magnitude.
pub const PITCH_LIMIT: f64 = FRAC_PI_2 - PITCH_EPSILON;

/// Pointer-lock look sensitivity (radians per pixel).
pub const MOUSE_SENSITIVITY: f64 = 0.0025;

/// Drag-fallback look sensitivity (radians per pixel).
pub const DRAG_SENSITIVITY: f64 = 0.01;

/// Walking speed base; scaled by 0.01 per tick.
pub const MOVE_SPEED: f64 = 8.0;

// --- Feedback ---

/// Camera shake duration after a detonation (ms).
pub const SHAKE_DURATION_MS: f64 = 400.0;

/// Camera shake strength after a detonation (pixels).
pub const SHAKE_STRENGTH: f64 = 18.0;
