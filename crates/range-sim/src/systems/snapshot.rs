//! Snapshot system: queries the ECS world and builds a complete RangeSnapshot.
//!
//! Read-only: it never modifies the world.

use hecs::World;

use range_core::components::*;
use range_core::constants::TARGET_WOBBLE_AMPLITUDE;
use range_core::events::{Popup, RangeEvent, ShakePulse};
use range_core::state::*;
use range_core::types::{Position, SimTime};

use crate::arsenal::Arsenal;
use crate::camera::Camera;
use crate::round::RoundState;

/// Everything outside the ECS world that goes into a snapshot.
pub struct SnapshotInputs<'a> {
    pub time: &'a SimTime,
    pub round: &'a RoundState,
    pub camera: &'a Camera,
    pub arsenal: &'a Arsenal,
    pub grenades_left: u32,
    pub popups: &'a [Popup],
    pub shake: ShakePulse,
    pub events: Vec<RangeEvent>,
}

/// Build a complete RangeSnapshot from the current world state.
pub fn build_snapshot(world: &World, inputs: SnapshotInputs<'_>) -> RangeSnapshot {
    RangeSnapshot {
        time: *inputs.time,
        phase: inputs.round.phase,
        round: inputs.round.round_view(),
        score: inputs.round.score_view(inputs.grenades_left),
        camera: inputs.camera.view(),
        weapons: inputs.arsenal.view(),
        bullets: build_bullets(world),
        grenades: build_grenades(world),
        targets: build_targets(world, inputs.camera, inputs.time.elapsed_ms),
        popups: inputs.popups.to_vec(),
        shake: inputs.shake,
        events: inputs.events,
    }
}

fn build_bullets(world: &World) -> Vec<BulletView> {
    world
        .query::<(&Position, &Bullet)>()
        .iter()
        .filter(|(_, (_, b))| !b.hit)
        .map(|(_, (pos, b))| BulletView {
            position: *pos,
            radius: b.radius,
        })
        .collect()
}

fn build_grenades(world: &World) -> Vec<GrenadeView> {
    world
        .query::<(&Position, &Grenade)>()
        .iter()
        .map(|(_, (pos, g))| GrenadeView {
            position: g.explosion_pos.unwrap_or(*pos),
            exploded: g.exploded,
            explosion_elapsed_ms: if g.exploded {
                g.explosion.duration_ms - g.explosion.remaining_ms
            } else {
                0.0
            },
        })
        .collect()
}

/// Alive targets in spawn order. The one nearest the camera wobbles
/// sideways; the wobble only affects `draw_position`.
fn build_targets(world: &World, camera: &Camera, now_ms: f64) -> Vec<TargetView> {
    let mut targets: Vec<(usize, TargetView, f64)> = world
        .query::<(&Position, &Target)>()
        .iter()
        .filter(|(_, (_, t))| t.alive)
        .map(|(_, (pos, t))| {
            let wobble_x = t.base_x + TARGET_WOBBLE_AMPLITUDE * (now_ms * 0.001 + t.phase).sin();
            let view = TargetView {
                position: *pos,
                draw_position: Position::new(wobble_x, pos.y, pos.z),
                radius: t.radius,
                points: t.points,
            };
            (t.slot, view, camera.position.range_to(pos))
        })
        .collect();
    targets.sort_by_key(|(slot, _, _)| *slot);

    let nearest = targets
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.2.total_cmp(&b.2))
        .map(|(i, _)| i);

    targets
        .into_iter()
        .enumerate()
        .map(|(i, (_, mut view, _))| {
            if Some(i) != nearest {
                view.draw_position = view.position;
            }
            view
        })
        .collect()
}
