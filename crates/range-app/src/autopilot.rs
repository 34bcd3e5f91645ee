//! Scripted player used by the headless host and the soak tests.
//!
//! Reads the latest snapshot and answers with the commands a player would
//! send that frame: aim at the nearest target, fire bursts, reload when the
//! magazine runs dry, throw the grenade once, and continue between rounds.

use range_core::commands::PlayerCommand;
use range_core::constants::PITCH_LIMIT;
use range_core::enums::{GamePhase, LookSource, WeaponActivity};
use range_core::state::{RangeSnapshot, TargetView};
use range_core::types::Position;

/// Aim error (radians) below which the autopilot considers itself on target.
const AIM_TOLERANCE: f64 = 0.005;

/// Frames to wait on the round-end screen before continuing.
const INTERMISSION_FRAMES: u32 = 30;

#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Must match the engine's pointer-lock sensitivity.
    sensitivity: f64,
    trigger_down: bool,
    intermission: u32,
}

impl Autopilot {
    pub fn new(sensitivity: f64) -> Self {
        Self {
            sensitivity,
            trigger_down: false,
            intermission: 0,
        }
    }

    /// Commands for the frame after `snapshot`.
    pub fn next_commands(&mut self, snapshot: &RangeSnapshot) -> Vec<PlayerCommand> {
        match snapshot.phase {
            GamePhase::Intro => vec![PlayerCommand::Continue],
            GamePhase::RoundEnd => {
                self.trigger_down = false;
                self.intermission += 1;
                if self.intermission >= INTERMISSION_FRAMES {
                    self.intermission = 0;
                    vec![PlayerCommand::Continue]
                } else {
                    Vec::new()
                }
            }
            GamePhase::Round => self.play(snapshot),
            GamePhase::GameOver => Vec::new(),
        }
    }

    fn play(&mut self, snapshot: &RangeSnapshot) -> Vec<PlayerCommand> {
        let mut commands = Vec::new();
        if self.trigger_down {
            commands.push(PlayerCommand::FireReleased);
            self.trigger_down = false;
        }

        let camera = &snapshot.camera;
        let Some(target) = nearest_target(&camera.position, &snapshot.targets) else {
            return commands;
        };
        let (yaw, pitch) = aim_angles(&camera.position, &target.position);
        let d_yaw = wrap_angle(yaw - camera.yaw);
        let d_pitch = pitch - camera.pitch;
        if d_yaw.abs() > AIM_TOLERANCE || d_pitch.abs() > AIM_TOLERANCE {
            commands.push(PlayerCommand::Look {
                dx: d_yaw / self.sensitivity,
                dy: -d_pitch / self.sensitivity,
                source: LookSource::PointerLock,
            });
            return commands;
        }

        if snapshot.score.grenades_left > 0 && snapshot.grenades.is_empty() {
            commands.push(PlayerCommand::ThrowGrenade);
        }

        let weapons = &snapshot.weapons;
        let Some(held) = weapons.ammo.iter().find(|a| a.weapon == weapons.held) else {
            return commands;
        };
        if held.magazine == 0 {
            if weapons.reloading.is_some() {
                return commands;
            }
            if held.reserve > 0 {
                commands.push(PlayerCommand::Reload);
            } else if let Some(spare) = weapons.ammo.iter().find(|a| a.magazine > 0) {
                commands.push(PlayerCommand::SwitchWeapon {
                    weapon: spare.weapon,
                });
            }
        } else if weapons.activity == WeaponActivity::Idle {
            commands.push(PlayerCommand::FirePressed);
            self.trigger_down = true;
        }
        commands
    }
}

fn nearest_target<'a>(from: &Position, targets: &'a [TargetView]) -> Option<&'a TargetView> {
    targets
        .iter()
        .min_by(|a, b| from.range_to(&a.position).total_cmp(&from.range_to(&b.position)))
}

/// Yaw and pitch that point from `from` at `to`.
pub fn aim_angles(from: &Position, to: &Position) -> (f64, f64) {
    let (dx, dy, dz) = (to.x - from.x, to.y - from.y, to.z - from.z);
    let length = (dx * dx + dy * dy + dz * dz).sqrt();
    if length == 0.0 {
        return (dy.atan2(dx), 0.0);
    }
    let pitch = (-dz / length).asin().clamp(-PITCH_LIMIT, PITCH_LIMIT);
    (dy.atan2(dx), pitch)
}

/// Wrap an angle into `(-PI, PI]`.
fn wrap_angle(angle: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}
