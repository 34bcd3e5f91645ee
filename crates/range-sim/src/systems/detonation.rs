//! Grenade detonation: blast-radius kills and scoring input.

use hecs::{Entity, World};

use range_core::components::{Grenade, Target};
use range_core::constants::{GRENADE_BLAST_RADIUS, GRENADE_EXPLOSION_MS};
use range_core::types::{Countdown, Position};

/// Outcome of one detonation, applied to the score by the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detonation {
    pub grenade: Entity,
    pub center: Position,
    pub kills: u32,
    pub points: u32,
    /// Fuse ran out without touching a target.
    pub airburst: bool,
}

/// Detonate `grenade`, killing every alive target strictly inside the blast
/// radius. Returns `None` if it had already exploded (or does not exist).
pub fn detonate(world: &World, grenade: Entity, airburst: bool) -> Option<Detonation> {
    let center = *world.get::<&Position>(grenade).ok()?;
    {
        let mut g = world.get::<&mut Grenade>(grenade).ok()?;
        if g.exploded {
            return None;
        }
        g.exploded = true;
        g.explosion = Countdown::new(GRENADE_EXPLOSION_MS);
        g.explosion_pos = Some(center);
    }

    let mut kills = 0;
    let mut points = 0;
    for (_entity, (pos, target)) in world.query::<(&Position, &mut Target)>().iter() {
        if target.alive && pos.range_to(&center) < GRENADE_BLAST_RADIUS {
            target.alive = false;
            kills += 1;
            points += target.points;
        }
    }

    Some(Detonation {
        grenade,
        center,
        kills,
        points,
        airburst,
    })
}
