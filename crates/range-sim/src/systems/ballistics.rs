//! Projectile integration for bullets and grenades.
//!
//! Gravity is scaled by `dt / REFERENCE_FRAME_MS`; position integration is
//! not, because velocity is already a per-frame displacement.

use hecs::{Entity, World};

use range_core::components::{Bullet, Grenade, Target};
use range_core::constants::*;
use range_core::types::{effective_delta, Position, Velocity};

use crate::systems::detonation::{self, Detonation};

/// Advance every live bullet by one frame.
pub fn run_bullets(world: &mut World, dt_ms: f64) {
    let eff = effective_delta(dt_ms);
    for (_entity, (pos, vel, bullet)) in
        world.query_mut::<(&mut Position, &mut Velocity, &mut Bullet)>()
    {
        step_bullet(pos, vel, bullet, eff);
    }
}

/// One frame of bullet flight. Retires the bullet once it has flown too far.
pub fn step_bullet(pos: &mut Position, vel: &mut Velocity, bullet: &mut Bullet, eff: f64) {
    if bullet.hit {
        return;
    }
    if bullet.has_drop {
        vel.z += SNIPER_GRAVITY * eff;
    }
    pos.translate(vel);
    bullet.travel += vel.speed();
    if bullet.travel > bullet.max_travel {
        bullet.hit = true;
    }
}

/// Advance every grenade by one frame, detonating on contact or fuse expiry.
///
/// Grenades are processed in turn so a detonation is visible to the contact
/// checks of the grenades after it.
pub fn run_grenades(world: &World, dt_ms: f64, grenades: &mut Vec<Entity>) -> Vec<Detonation> {
    let eff = effective_delta(dt_ms);
    grenades.clear();
    grenades.extend(world.query::<&Grenade>().iter().map(|(e, _)| e));

    let mut detonations = Vec::new();
    for &entity in grenades.iter() {
        let Some((pos, fuse_expired)) = step_grenade(world, entity, dt_ms, eff) else {
            continue;
        };
        let contact = in_contact(world, &pos);
        if contact || fuse_expired {
            detonations.extend(detonation::detonate(world, entity, !contact));
        }
    }
    detonations
}

/// Integrate one grenade. Returns its new position and whether the fuse
/// ran out, or `None` if it has already exploded.
fn step_grenade(world: &World, entity: Entity, dt_ms: f64, eff: f64) -> Option<(Position, bool)> {
    let mut grenade = world.get::<&mut Grenade>(entity).ok()?;
    if grenade.exploded {
        grenade.explosion.advance(dt_ms);
        return None;
    }
    let mut vel = world.get::<&mut Velocity>(entity).ok()?;
    let mut pos = world.get::<&mut Position>(entity).ok()?;
    vel.z += GRENADE_GRAVITY * eff;
    pos.translate(&vel);
    grenade.fuse.advance(dt_ms);
    Some((*pos, grenade.fuse.expired()))
}

/// Whether `pos` touches any alive target.
fn in_contact(world: &World, pos: &Position) -> bool {
    world
        .query::<(&Position, &Target)>()
        .iter()
        .any(|(_, (tpos, target))| {
            target.alive && pos.range_to(tpos) < target.radius + GRENADE_RADIUS
        })
}
