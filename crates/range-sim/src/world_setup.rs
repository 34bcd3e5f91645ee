//! Entity spawn factories for the range world.

use hecs::{Entity, World};

use range_core::components::*;
use range_core::constants::*;
use range_core::types::{Position, Velocity};

use crate::arsenal::MuzzleSpawn;
use crate::camera::Camera;
use crate::round::TargetPlacement;

/// Spawn a bullet from a muzzle spawn.
pub fn spawn_bullet(world: &mut World, spawn: &MuzzleSpawn) -> Entity {
    world.spawn((
        Projectile,
        spawn.position,
        spawn.velocity,
        Bullet::new(spawn.has_drop),
    ))
}

/// Spawn a grenade thrown along the camera's aim, slightly lofted.
pub fn spawn_thrown_grenade(world: &mut World, camera: &Camera) -> Entity {
    let f = camera.forward_vector();
    let position = Position::new(
        camera.position.x + f.x * GRENADE_SPAWN_FORWARD,
        camera.position.y + f.y * GRENADE_SPAWN_FORWARD,
        camera.position.z - GRENADE_SPAWN_DROP,
    );
    let mut velocity: Velocity = (f * GRENADE_THROW_SPEED).into();
    velocity.z += GRENADE_THROW_LOFT;
    spawn_grenade(world, position, velocity)
}

/// Spawn a live grenade at an explicit position.
pub fn spawn_grenade(world: &mut World, position: Position, velocity: Velocity) -> Entity {
    world.spawn((Projectile, position, velocity, Grenade::default()))
}

/// Spawn one round's target batch.
pub fn spawn_targets(world: &mut World, placements: &[TargetPlacement]) -> Vec<Entity> {
    placements
        .iter()
        .enumerate()
        .map(|(slot, p)| {
            world.spawn((
                p.position,
                Target {
                    base_x: p.position.x,
                    phase: p.phase,
                    radius: p.radius,
                    alive: true,
                    points: p.points,
                    lane_distance: p.lane_distance,
                    slot,
                },
            ))
        })
        .collect()
}

/// Remove every bullet, grenade and target. Called at round start.
pub fn clear_round_entities(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();
    despawn_buffer.extend(world.query_mut::<&Projectile>().into_iter().map(|(e, _)| e));
    despawn_buffer.extend(world.query_mut::<&Target>().into_iter().map(|(e, _)| e));
    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
