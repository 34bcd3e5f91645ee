//! Bullet-target collision.
//!
//! Only runs when `SimConfig::bullet_hits_targets` is set; by default bullets
//! fly through targets and only grenades score.

use hecs::{Entity, World};

use range_core::components::{Bullet, Target};
use range_core::types::Position;

/// A target destroyed by a bullet this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulletHit {
    pub target: Entity,
    pub points: u32,
}

/// Resolve bullet-target contacts. Each bullet kills at most one target and
/// each target dies at most once.
pub fn run(world: &mut World) -> Vec<BulletHit> {
    let mut live_targets: Vec<(Entity, Position, f64, u32)> = world
        .query_mut::<(&Position, &Target)>()
        .into_iter()
        .filter(|(_, (_, t))| t.alive)
        .map(|(e, (pos, t))| (e, *pos, t.radius, t.points))
        .collect();

    let mut hits = Vec::new();
    for (_entity, (pos, bullet)) in world.query_mut::<(&Position, &mut Bullet)>() {
        if bullet.hit {
            continue;
        }
        let struck = live_targets
            .iter()
            .position(|(_, tpos, radius, _)| pos.range_to(tpos) < radius + bullet.radius);
        if let Some(idx) = struck {
            let (target, _, _, points) = live_targets.swap_remove(idx);
            bullet.hit = true;
            hits.push(BulletHit { target, points });
        }
    }

    for hit in &hits {
        if let Ok(mut target) = world.get::<&mut Target>(hit.target) {
            target.alive = false;
        }
    }
    hits
}
