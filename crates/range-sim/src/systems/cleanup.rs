//! Cleanup system: removes retired bullets and spent grenades, and enforces
//! the live-bullet cap.

use std::collections::VecDeque;

use hecs::{Entity, World};

use range_core::components::{Bullet, Grenade};
use range_core::constants::MAX_BULLETS;

/// Despawn retired bullets and grenades whose explosion has finished.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, bullet_order: &mut VecDeque<Entity>, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, bullet) in world.query_mut::<&Bullet>() {
        if bullet.hit {
            despawn_buffer.push(entity);
        }
    }

    for (entity, grenade) in world.query_mut::<&Grenade>() {
        if grenade.spent() {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }

    bullet_order.retain(|&e| world.contains(e));
    evict_oldest(world, bullet_order);
}

/// Drop the oldest bullets until at most `MAX_BULLETS` remain.
pub fn evict_oldest(world: &mut World, bullet_order: &mut VecDeque<Entity>) {
    while bullet_order.len() > MAX_BULLETS {
        if let Some(oldest) = bullet_order.pop_front() {
            let _ = world.despawn(oldest);
        }
    }
}
