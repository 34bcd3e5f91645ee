//! Weapon and ammunition controller.
//!
//! Tracks magazine/reserve counts per weapon, the active burst and the
//! active reload. Firing produces muzzle spawns; the engine turns them into
//! bullet entities. Stored on the engine, not as ECS entities.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use range_core::constants::*;
use range_core::enums::{WeaponActivity, WeaponKind};
use range_core::errors::ActionRejected;
use range_core::state::{AmmoView, WeaponsView};
use range_core::types::{Countdown, Position, Velocity};

use crate::camera::Camera;

/// Fire and reload parameters for one weapon kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponSpec {
    pub kind: WeaponKind,
    pub muzzle_speed: f64,
    pub magazine_capacity: u32,
    pub starting_reserve: u32,
    pub reload_ms: f64,
    /// Shots fired per trigger press.
    pub burst_shots: u32,
    /// Bullets spawned per shot.
    pub pellets: u32,
    pub yaw_spread: f64,
    pub pitch_spread: f64,
    pub has_drop: bool,
}

/// Indexed by `WeaponKind::index`.
pub const WEAPON_SPECS: [WeaponSpec; 2] = [
    WeaponSpec {
        kind: WeaponKind::Pistol,
        muzzle_speed: PISTOL_SPEED,
        magazine_capacity: PISTOL_MAGAZINE,
        starting_reserve: PISTOL_RESERVE,
        reload_ms: PISTOL_RELOAD_MS,
        burst_shots: PISTOL_BURST,
        pellets: 1,
        yaw_spread: 0.0,
        pitch_spread: 0.0,
        has_drop: true,
    },
    WeaponSpec {
        kind: WeaponKind::Shotgun,
        muzzle_speed: SHOTGUN_SPEED,
        magazine_capacity: SHOTGUN_MAGAZINE,
        starting_reserve: SHOTGUN_RESERVE,
        reload_ms: SHOTGUN_RELOAD_MS,
        burst_shots: 1,
        pellets: SHOTGUN_PELLETS,
        yaw_spread: SHOTGUN_YAW_SPREAD,
        pitch_spread: SHOTGUN_PITCH_SPREAD,
        has_drop: true,
    },
];

pub fn weapon_spec(kind: WeaponKind) -> &'static WeaponSpec {
    &WEAPON_SPECS[kind.index()]
}

/// Loaded and spare rounds for one weapon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmmoState {
    pub magazine: u32,
    pub reserve: u32,
    pub capacity: u32,
}

impl AmmoState {
    fn full(spec: &WeaponSpec) -> Self {
        Self {
            magazine: spec.magazine_capacity,
            reserve: spec.starting_reserve,
            capacity: spec.magazine_capacity,
        }
    }

    pub fn needs_reload(&self) -> bool {
        self.magazine < self.capacity && self.reserve > 0
    }
}

/// A bullet to spawn: muzzle position, velocity and drop flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MuzzleSpawn {
    pub position: Position,
    pub velocity: Velocity,
    pub has_drop: bool,
}

#[derive(Debug, Clone)]
struct Burst {
    weapon: WeaponKind,
    timer_ms: f64,
    shots: u32,
}

#[derive(Debug, Clone)]
struct Reload {
    weapon: WeaponKind,
    timer: Countdown,
}

/// Result of advancing the arsenal by one frame.
#[derive(Debug, Default)]
pub struct ArsenalTick {
    pub spawns: Vec<MuzzleSpawn>,
    pub shots_fired: u32,
    /// Weapon and rounds moved into its magazine, if a reload finished.
    pub reload_finished: Option<(WeaponKind, u32)>,
}

#[derive(Debug, Clone)]
pub struct Arsenal {
    held: WeaponKind,
    ammo: [AmmoState; 2],
    burst: Option<Burst>,
    reload: Option<Reload>,
    trigger_held: bool,
    burst_interval_ms: f64,
}

impl Default for Arsenal {
    fn default() -> Self {
        Self::new(BURST_INTERVAL_MS)
    }
}

impl Arsenal {
    pub fn new(burst_interval_ms: f64) -> Self {
        Self {
            held: WeaponKind::default(),
            ammo: WEAPON_SPECS.map(|spec| AmmoState::full(&spec)),
            burst: None,
            reload: None,
            trigger_held: false,
            burst_interval_ms,
        }
    }

    pub fn held(&self) -> WeaponKind {
        self.held
    }

    pub fn ammo(&self, weapon: WeaponKind) -> AmmoState {
        self.ammo[weapon.index()]
    }

    pub fn is_reloading(&self) -> bool {
        self.reload.is_some()
    }

    pub fn is_firing(&self) -> bool {
        self.burst.is_some()
    }

    pub fn activity(&self) -> WeaponActivity {
        if self.reload.is_some() {
            WeaponActivity::Reloading
        } else if self.burst.is_some() {
            WeaponActivity::Firing
        } else {
            WeaponActivity::Idle
        }
    }

    /// Select a weapon. An active reload stays bound to its own weapon.
    pub fn switch_to(&mut self, weapon: WeaponKind) {
        self.held = weapon;
    }

    /// Trigger pressed: start a burst with the held weapon.
    pub fn pull_trigger(&mut self) -> Result<(), ActionRejected> {
        if std::mem::replace(&mut self.trigger_held, true) || self.burst.is_some() {
            return Err(ActionRejected::TriggerNotReset);
        }
        if self.reload.is_some() {
            return Err(ActionRejected::ReloadInProgress);
        }
        if self.ammo(self.held).magazine == 0 {
            return Err(ActionRejected::InsufficientAmmo(self.held));
        }
        self.burst = Some(Burst {
            weapon: self.held,
            timer_ms: 0.0,
            shots: 0,
        });
        Ok(())
    }

    pub fn release_trigger(&mut self) {
        self.trigger_held = false;
    }

    /// Drop any burst in flight (round boundaries).
    pub fn cancel_burst(&mut self) {
        self.burst = None;
    }

    /// Start reloading the held weapon. Cancels a burst in flight.
    pub fn begin_reload(&mut self) -> Result<WeaponKind, ActionRejected> {
        if self.reload.is_some() {
            return Err(ActionRejected::ReloadInProgress);
        }
        let weapon = self.held;
        if !self.ammo(weapon).needs_reload() {
            return Err(ActionRejected::ReloadNotNeeded(weapon));
        }
        self.burst = None;
        self.reload = Some(Reload {
            weapon,
            timer: Countdown::new(weapon_spec(weapon).reload_ms),
        });
        Ok(weapon)
    }

    /// Fire a single shot of `weapon` from the camera.
    ///
    /// Consumes one round and returns one spawn per pellet.
    pub fn fire(
        &mut self,
        weapon: WeaponKind,
        camera: &Camera,
        rng: &mut ChaCha8Rng,
    ) -> Result<Vec<MuzzleSpawn>, ActionRejected> {
        if self.reload.is_some() {
            return Err(ActionRejected::ReloadInProgress);
        }
        let ammo = &mut self.ammo[weapon.index()];
        if ammo.magazine == 0 {
            return Err(ActionRejected::InsufficientAmmo(weapon));
        }
        ammo.magazine -= 1;
        Ok(muzzle_spawns(weapon_spec(weapon), camera, rng))
    }

    /// Advance reload and burst timers by `dt_ms`. Reload resolves first.
    pub fn advance(&mut self, dt_ms: f64, camera: &Camera, rng: &mut ChaCha8Rng) -> ArsenalTick {
        let mut tick = ArsenalTick::default();

        if let Some(reload) = &mut self.reload {
            reload.timer.advance(dt_ms);
            if reload.timer.expired() {
                let weapon = reload.weapon;
                let ammo = &mut self.ammo[weapon.index()];
                let loaded = (ammo.capacity - ammo.magazine).min(ammo.reserve);
                ammo.magazine += loaded;
                ammo.reserve -= loaded;
                self.reload = None;
                tick.reload_finished = Some((weapon, loaded));
            }
        }

        let Some(mut burst) = self.burst.take() else {
            return tick;
        };
        let spec = weapon_spec(burst.weapon);
        burst.timer_ms += dt_ms;
        if burst.shots < spec.burst_shots
            && burst.timer_ms > f64::from(burst.shots) * self.burst_interval_ms
        {
            if let Ok(spawns) = self.fire(burst.weapon, camera, rng) {
                tick.spawns.extend(spawns);
                tick.shots_fired += 1;
            }
            burst.shots += 1;
        }
        if burst.timer_ms < f64::from(spec.burst_shots) * self.burst_interval_ms {
            self.burst = Some(burst);
        }
        tick
    }

    pub fn view(&self) -> WeaponsView {
        WeaponsView {
            held: self.held,
            activity: self.activity(),
            ammo: WeaponKind::ALL
                .iter()
                .map(|&weapon| {
                    let a = self.ammo(weapon);
                    AmmoView {
                        weapon,
                        magazine: a.magazine,
                        capacity: a.capacity,
                        reserve: a.reserve,
                    }
                })
                .collect(),
            reloading: self.reload.as_ref().map(|r| r.weapon),
            reload_progress: self.reload.as_ref().map_or(0.0, |r| r.timer.progress()),
        }
    }
}

/// Muzzle spawns for one shot: velocity along the (spread) aim direction,
/// positioned two frames of travel ahead of the camera.
pub fn muzzle_spawns(spec: &WeaponSpec, camera: &Camera, rng: &mut ChaCha8Rng) -> Vec<MuzzleSpawn> {
    (0..spec.pellets)
        .map(|_| {
            let dir = if spec.pellets > 1 {
                let d_yaw = rng.gen_range(-spec.yaw_spread..=spec.yaw_spread);
                let d_pitch = rng.gen_range(-spec.pitch_spread..=spec.pitch_spread);
                camera.forward_vector_with_offset(d_yaw, d_pitch)
            } else {
                camera.forward_vector()
            };
            let vel = dir * spec.muzzle_speed;
            MuzzleSpawn {
                position: (camera.position.as_dvec3() + vel * MUZZLE_OFFSET_FRAMES).into(),
                velocity: vel.into(),
                has_drop: spec.has_drop,
            }
        })
        .collect()
}
