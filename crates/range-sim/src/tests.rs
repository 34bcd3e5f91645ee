//! Tests for the camera, arsenal, round machine, projectile systems and engine.

use hecs::{Entity, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use range_core::commands::PlayerCommand;
use range_core::components::{Bullet, Grenade, Target};
use range_core::constants::*;
use range_core::enums::*;
use range_core::errors::ActionRejected;
use range_core::events::RangeEvent;
use range_core::types::{Position, Velocity};

use crate::arsenal::{weapon_spec, Arsenal, MuzzleSpawn};
use crate::camera::Camera;
use crate::engine::{SimConfig, SimulationEngine};
use crate::round::{self, lane_points, lane_radius, RoundState};
use crate::systems::{ballistics, cleanup, detonation};
use crate::world_setup;

const FRAME_MS: f64 = 16.0;

fn engine_in_round() -> SimulationEngine {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.queue_command(PlayerCommand::Continue);
    engine.tick(0.0);
    assert_eq!(engine.phase(), GamePhase::Round);
    engine
}

/// Targets of the running round in spawn order.
fn targets(engine: &SimulationEngine) -> Vec<(Entity, Position, Target)> {
    let mut list: Vec<_> = engine
        .world()
        .query::<(&Position, &Target)>()
        .iter()
        .map(|(e, (p, t))| (e, *p, t.clone()))
        .collect();
    list.sort_by_key(|(_, _, t)| t.slot);
    list
}

/// Move every target except `keep_slot` far out of any blast.
fn isolate_target(engine: &mut SimulationEngine, keep_slot: usize) {
    for (_e, (pos, t)) in engine
        .world_mut()
        .query_mut::<(&mut Position, &Target)>()
    {
        if t.slot != keep_slot {
            pos.x += 10_000.0;
        }
    }
}

fn spawn_target(world: &mut World, pos: Position, points: u32) -> Entity {
    world.spawn((
        pos,
        Target {
            base_x: pos.x,
            phase: 0.0,
            radius: 40.0,
            alive: true,
            points,
            lane_distance: 500.0,
            slot: 0,
        },
    ))
}

// ---- Camera ----

#[test]
fn test_camera_default_faces_downrange() {
    let cam = Camera::default();
    let f = cam.forward_vector();
    assert!((f.length() - 1.0).abs() < 1e-12);
    assert!(f.x.abs() < 1e-12, "x should be ~0, got {}", f.x);
    assert!((f.y + 1.0).abs() < 1e-12, "Default aim is -Y, got {}", f.y);
    assert!(f.z.abs() < 1e-12);
}

#[test]
fn test_camera_look_delta_and_clamp() {
    let mut cam = Camera::default();
    cam.apply_look_delta(100.0, -40.0, 0.0025);
    assert!((cam.yaw - (CAMERA_DEFAULT_YAW + 0.25)).abs() < 1e-12);
    assert!(
        (cam.pitch - 0.1).abs() < 1e-12,
        "Moving the input up raises pitch, got {}",
        cam.pitch
    );

    cam.apply_look_delta(0.0, -1.0e6, 0.01);
    assert_eq!(cam.pitch, PITCH_LIMIT);
    cam.apply_look_delta(0.0, 1.0e6, 0.01);
    assert_eq!(cam.pitch, -PITCH_LIMIT);

    let f = cam.forward_vector();
    assert!((f.length() - 1.0).abs() < 1e-12, "Forward must stay unit length");
    assert!((f.z - PITCH_LIMIT.sin()).abs() < 1e-12);
}

#[test]
fn test_camera_reset_and_move() {
    let mut cam = Camera::default();
    cam.apply_look_delta(300.0, 200.0, 0.0025);
    cam.reset_orientation();
    assert_eq!(cam.yaw, CAMERA_DEFAULT_YAW);
    assert_eq!(cam.pitch, 0.0);

    let start = cam.position;
    cam.move_by(1.0, 0.0);
    assert!((cam.position.y - (start.y - 0.08)).abs() < 1e-12, "Walking forward heads downrange");
    assert!((cam.position.x - start.x).abs() < 1e-12);
    assert_eq!(cam.position.z, start.z, "Height is fixed");
}

// ---- Targets ----

#[test]
fn test_lane_mapping_endpoints() {
    assert!((lane_radius(TARGET_DISTANCE_NEAR) - 60.0).abs() < 1e-12);
    assert!((lane_radius(TARGET_DISTANCE_FAR) - 28.0).abs() < 1e-12);
    assert_eq!(lane_points(TARGET_DISTANCE_NEAR), 20);
    assert_eq!(lane_points(TARGET_DISTANCE_FAR), 120);
    assert_eq!(lane_points(800.0), 33);
}

#[test]
fn test_every_round_has_four_graded_targets() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for r in 0..ROUNDS_TOTAL {
        let batch = round::layout_targets(r, &mut rng);
        assert_eq!(batch.len(), 4, "Round {r} should spawn 4 targets");
        for pair in batch.windows(2) {
            assert!(pair[0].lane_distance < pair[1].lane_distance);
            assert!(
                pair[0].radius > pair[1].radius,
                "Farther targets must be smaller in round {r}"
            );
            assert!(
                pair[0].points < pair[1].points,
                "Farther targets must be worth more in round {r}"
            );
        }
        for (i, t) in batch.iter().enumerate() {
            let side = if i % 2 == 0 { -1.0 } else { 1.0 };
            let lateral = t.position.x * side;
            assert!((50.0..350.0).contains(&lateral), "Lateral {lateral} out of range");
            let depth = t.position.y + t.lane_distance;
            assert!((-60.0..60.0).contains(&depth), "Depth jitter {depth} out of range");
            assert!((20.0..80.0).contains(&t.position.z));
        }
    }
}

#[test]
fn test_start_round_spawns_targets_and_clears_projectiles() {
    let mut engine = engine_in_round();
    let list = targets(&engine);
    assert_eq!(list.len(), 4);
    let lanes: Vec<f64> = list.iter().map(|(_, _, t)| t.lane_distance).collect();
    assert_eq!(&lanes[..3], &[500.0, 800.0, 1100.0]);
    assert!(list.iter().all(|(_, _, t)| t.alive));

    engine.spawn_test_grenade(Position::new(0.0, 5000.0, 0.0), Velocity::default());
    engine.start_round(1);
    assert_eq!(engine.world().query::<&Grenade>().iter().count(), 0);
    assert_eq!(targets(&engine).len(), 4, "Old targets are replaced, not added to");
    assert_eq!(engine.round().index, 1);
}

// ---- Bullets ----

#[test]
fn test_bullet_retires_once_travel_exceeds_limit() {
    for speed in [14.0_f64, 13.0, 7.5, 10.0] {
        let mut pos = Position::default();
        let mut vel = Velocity::new(0.0, -speed, 0.0);
        let mut bullet = Bullet::new(false);
        let mut ticks = 0;
        while !bullet.hit {
            ballistics::step_bullet(&mut pos, &mut vel, &mut bullet, 1.0);
            ticks += 1;
        }
        // Retirement is strict: travel must exceed the limit.
        let expected = (BULLET_MAX_TRAVEL / speed).floor() as u32 + 1;
        assert_eq!(ticks, expected, "Speed {speed} should retire after {expected} ticks");
    }
}

#[test]
fn test_bullet_at_exact_limit_is_still_live() {
    let mut pos = Position::default();
    let mut vel = Velocity::new(0.0, -10.0, 0.0);
    let mut bullet = Bullet::new(false);
    for _ in 0..1000 {
        ballistics::step_bullet(&mut pos, &mut vel, &mut bullet, 1.0);
    }
    assert_eq!(bullet.travel, BULLET_MAX_TRAVEL);
    assert!(!bullet.hit, "Travel equal to the limit does not retire");
    ballistics::step_bullet(&mut pos, &mut vel, &mut bullet, 1.0);
    assert!(bullet.hit, "Retires on tick 1001");
}

#[test]
fn test_bullet_drop_scales_with_dt() {
    let mut pos = Position::default();
    let mut vel = Velocity::new(0.0, -14.0, 0.0);
    let mut bullet = Bullet::new(true);
    ballistics::step_bullet(&mut pos, &mut vel, &mut bullet, 2.0);
    assert!((vel.z - 2.0 * SNIPER_GRAVITY).abs() < 1e-12);
    assert!((pos.y + 14.0).abs() < 1e-12, "Position moves by one unscaled velocity step");

    let mut world = World::new();
    world.spawn((
        Position::default(),
        Velocity::new(0.0, -14.0, 0.0),
        Bullet::new(true),
    ));
    ballistics::run_bullets(&mut world, 2.0 * REFERENCE_FRAME_MS);
    let mut q = world.query::<&Velocity>();
    let (_, v) = q.iter().next().unwrap();
    assert!((v.z - 2.0 * SNIPER_GRAVITY).abs() < 1e-9);
}

#[test]
fn test_retired_bullets_are_not_advanced() {
    let mut pos = Position::default();
    let mut vel = Velocity::new(0.0, -14.0, 0.0);
    let mut bullet = Bullet::new(false);
    bullet.hit = true;
    ballistics::step_bullet(&mut pos, &mut vel, &mut bullet, 1.0);
    assert_eq!(pos, Position::default());
    assert_eq!(bullet.travel, 0.0);
}

#[test]
fn test_bullet_cap_evicts_oldest() {
    let mut world = World::new();
    let mut order = std::collections::VecDeque::new();
    let spawn = MuzzleSpawn {
        position: Position::default(),
        velocity: Velocity::new(0.0, -14.0, 0.0),
        has_drop: false,
    };
    for _ in 0..MAX_BULLETS + 5 {
        order.push_back(world_setup::spawn_bullet(&mut world, &spawn));
    }
    let oldest: Vec<Entity> = order.iter().take(5).copied().collect();
    let newest = *order.back().unwrap();

    let mut buffer = Vec::new();
    cleanup::run(&mut world, &mut order, &mut buffer);

    assert_eq!(order.len(), MAX_BULLETS);
    assert_eq!(world.query::<&Bullet>().iter().count(), MAX_BULLETS);
    assert!(oldest.iter().all(|&e| !world.contains(e)), "Oldest bullets go first");
    assert!(world.contains(newest));
}

// ---- Grenades ----

#[test]
fn test_explosion_radius_is_strict() {
    let mut world = World::new();
    let grenade = world_setup::spawn_grenade(&mut world, Position::default(), Velocity::default());
    let at_edge = spawn_target(&mut world, Position::new(300.0, 0.0, 0.0), 50);
    let inside = spawn_target(&mut world, Position::new(0.0, -299.99, 0.0), 70);

    let result = detonation::detonate(&world, grenade, false).unwrap();
    assert_eq!(result.kills, 1);
    assert_eq!(result.points, 70);
    assert!(world.get::<&Target>(at_edge).unwrap().alive, "Distance 300 survives");
    assert!(!world.get::<&Target>(inside).unwrap().alive, "Distance 299.99 dies");
}

#[test]
fn test_detonation_freezes_and_captures_center() {
    let mut world = World::new();
    let grenade = world_setup::spawn_grenade(
        &mut world,
        Position::new(1.0, 2.0, 3.0),
        Velocity::new(0.0, -12.0, 2.0),
    );
    detonation::detonate(&world, grenade, true).unwrap();
    let mut buffer = Vec::new();
    ballistics::run_grenades(&world, 100.0, &mut buffer);

    let g = world.get::<&Grenade>(grenade).unwrap();
    assert!(g.exploded);
    assert_eq!(g.explosion_pos, Some(Position::new(1.0, 2.0, 3.0)));
    assert_eq!(*world.get::<&Position>(grenade).unwrap(), Position::new(1.0, 2.0, 3.0));
    assert!((g.explosion.remaining_ms - 400.0).abs() < 1e-9, "Only the explosion timer runs");
}

#[test]
fn test_grenade_detonates_on_contact() {
    let mut world = World::new();
    let target = spawn_target(&mut world, Position::new(0.0, -500.0, 50.0), 20);
    // radius 40 + grenade 10 = 50 contact distance.
    let grenade = world_setup::spawn_grenade(
        &mut world,
        Position::new(0.0, -455.0, 50.0),
        Velocity::default(),
    );
    let mut buffer = Vec::new();
    let detonations = ballistics::run_grenades(&world, FRAME_MS, &mut buffer);
    assert_eq!(detonations.len(), 1);
    assert!(!detonations[0].airburst, "Contact detonation is not an airburst");
    assert_eq!(detonations[0].grenade, grenade);
    assert!(!world.get::<&Target>(target).unwrap().alive);
}

#[test]
fn test_grenade_airbursts_after_fuse() {
    let mut world = World::new();
    let grenade = world_setup::spawn_grenade(
        &mut world,
        Position::new(0.0, 0.0, 150.0),
        Velocity::new(0.0, -12.0, 2.0),
    );
    let mut buffer = Vec::new();
    let mut elapsed = 0.0;
    let mut detonated_at = None;
    for _ in 0..200 {
        let d = ballistics::run_grenades(&world, 10.0, &mut buffer);
        elapsed += 10.0;
        if let Some(det) = d.first() {
            assert!(det.airburst);
            detonated_at = Some(elapsed);
            break;
        }
    }
    assert_eq!(detonated_at, Some(1810.0), "Fuse is strict: 1800ms is not enough");
    assert!(world.get::<&Grenade>(grenade).unwrap().exploded);
}

#[test]
fn test_spent_grenade_is_cleaned_up() {
    let mut world = World::new();
    let grenade = world_setup::spawn_grenade(&mut world, Position::default(), Velocity::default());
    detonation::detonate(&world, grenade, true).unwrap();
    let mut buffer = Vec::new();
    let mut order = std::collections::VecDeque::new();

    ballistics::run_grenades(&world, 499.0, &mut buffer);
    cleanup::run(&mut world, &mut order, &mut buffer);
    assert!(world.contains(grenade), "Explosion still playing");

    ballistics::run_grenades(&world, 1.0, &mut buffer);
    cleanup::run(&mut world, &mut order, &mut buffer);
    assert!(!world.contains(grenade), "Removed after the 500ms window");
}

#[test]
fn test_detonate_twice_scores_once() {
    let mut engine = engine_in_round();
    let (_, pos, _) = targets(&engine)[0].clone();
    let grenade = engine.spawn_test_grenade(pos, Velocity::default());

    let first = engine.detonate(grenade);
    assert!(first.is_some());
    let score = engine.round().score;
    let hits = engine.round().hits;
    assert!(hits >= 1);

    assert!(engine.detonate(grenade).is_none(), "Second detonation is a no-op");
    assert_eq!(engine.round().score, score);
    assert_eq!(engine.round().hits, hits);
}

#[test]
fn test_grenade_at_target_zero_scenario() {
    let mut engine = engine_in_round();
    isolate_target(&mut engine, 0);
    let before = targets(&engine);
    let (target0, pos0, t0) = before[0].clone();
    assert_eq!(t0.lane_distance, 500.0);

    let grenade = engine.spawn_test_grenade(pos0, Velocity::default());
    let det = engine.detonate(grenade).unwrap();

    assert_eq!(det.kills, 1);
    assert_eq!(engine.round().score, lane_points(500.0));
    assert_eq!(engine.round().hits, 1);
    let after = targets(&engine);
    assert!(!after[0].2.alive, "Target 0 should be dead");
    assert_eq!(after[0].0, target0);
    for (_, _, t) in &after[1..] {
        assert!(t.alive, "Other targets are untouched");
    }

    let snap = engine.tick(FRAME_MS);
    assert!(snap.shake.strength > 0.0, "Detonation shakes the camera");
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, RangeEvent::GrenadeDetonated { kills: 1, .. })));
    assert_eq!(snap.targets.len(), 3, "Dead targets are not drawn");
}

#[test]
fn test_thrown_grenade_airbursts_in_round() {
    let mut engine = engine_in_round();
    isolate_target(&mut engine, usize::MAX);
    engine.queue_command(PlayerCommand::ThrowGrenade);
    let snap = engine.tick(FRAME_MS);
    assert_eq!(snap.grenades.len(), 1);
    assert_eq!(snap.score.grenades_left, 0);

    let mut airburst = false;
    for _ in 0..200 {
        let snap = engine.tick(FRAME_MS);
        if snap
            .events
            .iter()
            .any(|e| matches!(e, RangeEvent::GrenadeDetonated { airburst: true, .. }))
        {
            airburst = true;
            break;
        }
    }
    assert!(airburst, "Grenade far from every target should airburst");

    engine.queue_command(PlayerCommand::ThrowGrenade);
    let snap = engine.tick(FRAME_MS);
    assert!(snap.popups.iter().any(|p| p.text == "Grenades over."));
}

// ---- Bullet collision switch ----

fn bullet_on_target0(engine: &mut SimulationEngine) -> Entity {
    let (target0, pos0, _) = targets(engine)[0].clone();
    let spawn = MuzzleSpawn {
        position: pos0,
        velocity: Velocity::default(),
        has_drop: false,
    };
    world_setup::spawn_bullet(engine.world_mut(), &spawn);
    target0
}

#[test]
fn test_bullets_pass_through_targets_by_default() {
    let mut engine = engine_in_round();
    let target0 = bullet_on_target0(&mut engine);
    engine.tick(FRAME_MS);
    assert!(engine.world().get::<&Target>(target0).unwrap().alive);
    assert_eq!(engine.round().score, 0);
}

#[test]
fn test_bullet_hits_when_enabled() {
    let mut engine = SimulationEngine::new(SimConfig {
        bullet_hits_targets: true,
        ..Default::default()
    });
    engine.queue_command(PlayerCommand::Continue);
    engine.tick(0.0);
    let target0 = bullet_on_target0(&mut engine);
    let snap = engine.tick(FRAME_MS);
    assert!(!engine.world().get::<&Target>(target0).unwrap().alive);
    assert_eq!(engine.round().score, lane_points(500.0));
    assert_eq!(engine.round().hits, 1);
    assert!(snap.popups.iter().any(|p| p.text.starts_with("Target hit!")));
    assert_eq!(snap.bullets.len(), 0, "The bullet is spent on the hit");
}

// ---- Weapons ----

#[test]
fn test_pistol_burst_fires_three() {
    let mut engine = engine_in_round();
    engine.queue_command(PlayerCommand::FirePressed);
    for _ in 0..30 {
        engine.tick(FRAME_MS);
    }
    assert_eq!(engine.bullet_count(), 3, "A burst is capped at three shots");
    assert_eq!(engine.arsenal().ammo(WeaponKind::Pistol).magazine, 9);

    // Holding the trigger does not start another burst.
    engine.queue_command(PlayerCommand::FirePressed);
    for _ in 0..30 {
        engine.tick(FRAME_MS);
    }
    assert_eq!(engine.arsenal().ammo(WeaponKind::Pistol).magazine, 9);

    engine.queue_commands([PlayerCommand::FireReleased, PlayerCommand::FirePressed]);
    for _ in 0..30 {
        engine.tick(FRAME_MS);
    }
    assert_eq!(engine.arsenal().ammo(WeaponKind::Pistol).magazine, 6);
    assert_eq!(engine.bullet_count(), 6);
}

#[test]
fn test_pistol_bullet_spawns_at_muzzle() {
    let mut engine = engine_in_round();
    engine.queue_command(PlayerCommand::FirePressed);
    let snap = engine.tick(FRAME_MS);
    assert_eq!(snap.bullets.len(), 1, "First shot leaves on the first frame");
    let cam = engine.camera().position;
    let b = snap.bullets[0].position;
    assert!((b.y - (cam.y - 2.0 * PISTOL_SPEED)).abs() < 1e-9);
    assert!((b.x - cam.x).abs() < 1e-9);
}

#[test]
fn test_burst_cadence() {
    let mut arsenal = Arsenal::default();
    let cam = Camera::default();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    arsenal.pull_trigger().unwrap();

    let mut shots_by_frame = Vec::new();
    for _ in 0..8 {
        shots_by_frame.push(arsenal.advance(50.0, &cam, &mut rng).shots_fired);
    }
    // Shot n leaves once the burst timer passes n * 100ms; the burst ends at 300ms.
    assert_eq!(shots_by_frame, vec![1, 0, 1, 0, 1, 0, 0, 0]);
    assert!(!arsenal.is_firing());
}

#[test]
fn test_shotgun_fires_five_pellets_in_cone() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.queue_commands([
        PlayerCommand::Continue,
        PlayerCommand::SwitchWeapon {
            weapon: WeaponKind::Shotgun,
        },
        PlayerCommand::FirePressed,
    ]);
    engine.tick(FRAME_MS);
    assert_eq!(engine.bullet_count(), 5, "One shell is five pellets");
    assert_eq!(engine.arsenal().ammo(WeaponKind::Shotgun).magazine, 4);

    let cam = engine.camera().clone();
    {
        let mut q = engine.world().query::<(&Velocity, &Bullet)>();
        for (_, (vel, _)) in q.iter() {
            assert!((vel.speed() - SHOTGUN_SPEED).abs() < 1e-9);
            let yaw = vel.y.atan2(vel.x);
            let pitch = (-vel.z / vel.speed()).asin();
            assert!(
                (yaw - cam.yaw).abs() <= SHOTGUN_YAW_SPREAD + 1e-9,
                "Pellet yaw {yaw} outside spread"
            );
            assert!(
                (pitch - cam.pitch).abs() <= SHOTGUN_PITCH_SPREAD + 1e-9,
                "Pellet pitch {pitch} outside spread"
            );
        }
    }

    // The shotgun fires once per press.
    for _ in 0..30 {
        engine.tick(FRAME_MS);
    }
    assert_eq!(engine.arsenal().ammo(WeaponKind::Shotgun).magazine, 4);
}

#[test]
fn test_reload_refills_from_reserve() {
    let mut engine = engine_in_round();
    engine.queue_command(PlayerCommand::FirePressed);
    for _ in 0..30 {
        engine.tick(FRAME_MS);
    }
    engine.queue_commands([PlayerCommand::FireReleased, PlayerCommand::Reload]);
    let snap = engine.tick(100.0);
    assert_eq!(snap.weapons.activity, WeaponActivity::Reloading);
    assert_eq!(snap.weapons.reloading, Some(WeaponKind::Pistol));
    assert!(snap.weapons.reload_progress > 0.0 && snap.weapons.reload_progress < 1.0);

    // Firing is blocked while reloading.
    engine.queue_command(PlayerCommand::FirePressed);
    engine.tick(100.0);
    assert_eq!(engine.arsenal().ammo(WeaponKind::Pistol).magazine, 9);
    engine.queue_command(PlayerCommand::FireReleased);

    for _ in 0..10 {
        engine.tick(100.0);
    }
    let ammo = engine.arsenal().ammo(WeaponKind::Pistol);
    assert_eq!(ammo.magazine, PISTOL_MAGAZINE);
    assert_eq!(ammo.reserve, PISTOL_RESERVE - 3);
    assert!(!engine.arsenal().is_reloading());
}

#[test]
fn test_reload_rejections() {
    let mut arsenal = Arsenal::default();
    assert_eq!(
        arsenal.begin_reload(),
        Err(ActionRejected::ReloadNotNeeded(WeaponKind::Pistol)),
        "Full magazine needs no reload"
    );

    let cam = Camera::default();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    arsenal.fire(WeaponKind::Pistol, &cam, &mut rng).unwrap();
    assert_eq!(arsenal.begin_reload(), Ok(WeaponKind::Pistol));
    assert_eq!(arsenal.begin_reload(), Err(ActionRejected::ReloadInProgress));
    assert_eq!(
        arsenal.fire(WeaponKind::Shotgun, &cam, &mut rng),
        Err(ActionRejected::ReloadInProgress),
        "Any reload blocks every weapon"
    );
}

#[test]
fn test_reload_stays_with_its_weapon() {
    let mut arsenal = Arsenal::default();
    let cam = Camera::default();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    arsenal.fire(WeaponKind::Pistol, &cam, &mut rng).unwrap();
    arsenal.begin_reload().unwrap();
    arsenal.switch_to(WeaponKind::Shotgun);

    let tick = arsenal.advance(PISTOL_RELOAD_MS, &cam, &mut rng);
    assert_eq!(tick.reload_finished, Some((WeaponKind::Pistol, 1)));
    assert_eq!(arsenal.ammo(WeaponKind::Pistol).magazine, PISTOL_MAGAZINE);
    assert_eq!(arsenal.ammo(WeaponKind::Shotgun).reserve, SHOTGUN_RESERVE);
}

#[test]
fn test_empty_magazine_rejects_trigger() {
    let mut arsenal = Arsenal::default();
    let cam = Camera::default();
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    for _ in 0..PISTOL_MAGAZINE {
        arsenal.fire(WeaponKind::Pistol, &cam, &mut rng).unwrap();
    }
    assert_eq!(
        arsenal.fire(WeaponKind::Pistol, &cam, &mut rng),
        Err(ActionRejected::InsufficientAmmo(WeaponKind::Pistol))
    );
    assert_eq!(
        arsenal.pull_trigger(),
        Err(ActionRejected::InsufficientAmmo(WeaponKind::Pistol))
    );
}

#[test]
fn test_magazine_invariant_under_random_actions() {
    let mut arsenal = Arsenal::default();
    let cam = Camera::default();
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let mut fire_rng = ChaCha8Rng::seed_from_u64(99);

    for _ in 0..5_000 {
        match rng.gen_range(0..6) {
            0 => {
                let _ = arsenal.pull_trigger();
            }
            1 => arsenal.release_trigger(),
            2 => {
                let _ = arsenal.begin_reload();
            }
            3 => arsenal.switch_to(arsenal.held().toggled()),
            4 => {
                let weapon = WeaponKind::ALL[rng.gen_range(0..2)];
                let _ = arsenal.fire(weapon, &cam, &mut fire_rng);
            }
            _ => {
                arsenal.advance(rng.gen_range(0.0..400.0), &cam, &mut fire_rng);
            }
        }
        for weapon in WeaponKind::ALL {
            let ammo = arsenal.ammo(weapon);
            assert!(ammo.magazine <= ammo.capacity, "{weapon:?} overfilled: {ammo:?}");
            assert_eq!(ammo.capacity, weapon_spec(weapon).magazine_capacity);
            let total = ammo.magazine + ammo.reserve;
            let start = weapon_spec(weapon).magazine_capacity + weapon_spec(weapon).starting_reserve;
            assert!(total <= start, "Ammo is never created: {ammo:?}");
        }
    }
}

// ---- Rounds ----

#[test]
fn test_round_times_out_after_45_seconds() {
    let mut engine = engine_in_round();
    for _ in 0..449 {
        engine.tick(100.0);
    }
    assert_eq!(engine.phase(), GamePhase::Round);
    let snap = engine.tick(100.0);
    assert_eq!(snap.phase, GamePhase::RoundEnd);
    assert_eq!(snap.score.round_scores, vec![0]);
    assert!(snap.popups.iter().any(|p| p.text == "Round 1 complete: +0"));
}

#[test]
fn test_round_ends_when_all_targets_down() {
    let mut engine = engine_in_round();
    for (_e, t) in engine.world_mut().query_mut::<&mut Target>() {
        t.alive = false;
    }
    engine.tick(FRAME_MS);
    assert_eq!(engine.phase(), GamePhase::RoundEnd);
}

#[test]
fn test_round_scores_sum_to_score() {
    let mut engine = engine_in_round();
    isolate_target(&mut engine, 0);
    let (_, pos0, _) = targets(&engine)[0].clone();
    let grenade = engine.spawn_test_grenade(pos0, Velocity::default());
    engine.detonate(grenade);
    engine.end_round();
    assert_eq!(engine.round().round_scores, vec![20]);

    engine.queue_command(PlayerCommand::Continue);
    engine.tick(FRAME_MS);
    assert_eq!(engine.round().index, 1);
    engine.end_round();

    let r = engine.round();
    assert_eq!(r.round_scores.len(), 2);
    assert_eq!(r.round_scores.iter().sum::<u32>(), r.score);
}

#[test]
fn test_end_round_resets_camera() {
    let mut engine = engine_in_round();
    engine.queue_command(PlayerCommand::Look {
        dx: 120.0,
        dy: 80.0,
        source: LookSource::PointerLock,
    });
    engine.tick(FRAME_MS);
    assert_ne!(engine.camera().yaw, CAMERA_DEFAULT_YAW);
    engine.end_round();
    assert_eq!(engine.camera().yaw, CAMERA_DEFAULT_YAW);
    assert_eq!(engine.camera().pitch, 0.0);
}

#[test]
fn test_final_round_goes_to_game_over() {
    let mut engine = engine_in_round();
    for round in 0..ROUNDS_TOTAL {
        assert_eq!(engine.round().index, round as i32);
        engine.end_round();
        if round + 1 < ROUNDS_TOTAL {
            assert_eq!(engine.phase(), GamePhase::RoundEnd);
            engine.queue_command(PlayerCommand::Continue);
            engine.tick(FRAME_MS);
        }
    }
    assert_eq!(engine.phase(), GamePhase::GameOver);
    assert!(engine.round().credits_started_at_ms.is_some());
    assert_eq!(engine.round().round_scores.len(), ROUNDS_TOTAL);

    let snap = engine.tick(FRAME_MS);
    assert!(snap.events.iter().any(|e| matches!(e, RangeEvent::GameOver { .. })));

    // Continue does nothing once the game is over.
    engine.queue_command(PlayerCommand::Continue);
    assert_eq!(engine.tick(FRAME_MS).phase, GamePhase::GameOver);
}

#[test]
fn test_round_index_past_end_is_game_over() {
    let mut engine = engine_in_round();
    engine.start_round(ROUNDS_TOTAL);
    assert_eq!(engine.phase(), GamePhase::GameOver);
    assert!(engine.round().credits_started_at_ms.is_some());

    let mut state = RoundState::default();
    assert_eq!(
        state.begin(7, 10.0),
        Err(ActionRejected::InvalidRoundIndex(7))
    );
    assert_eq!(state.phase, GamePhase::GameOver);
    assert_eq!(state.credits_started_at_ms, Some(10.0));
}

#[test]
fn test_jump_past_last_round_keeps_running_round_score() {
    let mut engine = engine_in_round();
    isolate_target(&mut engine, 0);
    let (_, pos0, _) = targets(&engine)[0].clone();
    let grenade = engine.spawn_test_grenade(pos0, Velocity::default());
    engine.detonate(grenade);
    assert_eq!(engine.round().score, 20);

    engine.start_round(ROUNDS_TOTAL);

    let r = engine.round();
    assert_eq!(r.phase, GamePhase::GameOver);
    assert_eq!(r.round_scores, vec![20], "Running round is recorded");
    assert_eq!(r.round_scores.iter().sum::<u32>(), r.score);
    assert!(r.credits_started_at_ms.is_some());
    assert_eq!(engine.alive_targets(), 0, "Round entities are cleared");
    assert_eq!(engine.world().query::<&Target>().iter().count(), 0);
    assert_eq!(engine.world().query::<&Grenade>().iter().count(), 0);

    let snap = engine.tick(FRAME_MS);
    let announced = snap
        .events
        .iter()
        .filter(|e| matches!(e, RangeEvent::GameOver { .. }))
        .count();
    assert_eq!(announced, 1, "Game over is announced once");
}

// ---- Engine ----

#[test]
fn test_snapshot_camera_forward_is_unit_direction() {
    let mut engine = engine_in_round();
    engine.queue_command(PlayerCommand::Look {
        dx: 200.0,
        dy: -120.0,
        source: LookSource::PointerLock,
    });
    let snap = engine.tick(FRAME_MS);
    assert!((snap.camera.forward.length() - 1.0).abs() < 1e-12);
    assert_eq!(snap.camera.forward, engine.camera().forward_vector());
}

#[test]
fn test_intro_ignores_weapons_but_allows_look() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.queue_commands([
        PlayerCommand::FirePressed,
        PlayerCommand::ThrowGrenade,
        PlayerCommand::Look {
            dx: 10.0,
            dy: 0.0,
            source: LookSource::Drag,
        },
    ]);
    let snap = engine.tick(FRAME_MS);
    assert_eq!(snap.phase, GamePhase::Intro);
    assert_eq!(snap.round.index, -1);
    assert!(snap.bullets.is_empty());
    assert_eq!(snap.score.grenades_left, GRENADES_PER_GAME);
    assert!((engine.camera().yaw - (CAMERA_DEFAULT_YAW + 0.1)).abs() < 1e-12);
}

#[test]
fn test_popups_and_shake_expire() {
    let mut engine = engine_in_round();
    let snap = engine.tick(FRAME_MS);
    assert!(snap.popups.iter().any(|p| p.text == "Round 1 start!"));
    let snap = engine.tick(1300.0);
    assert!(snap.popups.is_empty(), "Round start popup lasts 1200ms");

    isolate_target(&mut engine, 0);
    let (_, pos0, _) = targets(&engine)[0].clone();
    let grenade = engine.spawn_test_grenade(pos0, Velocity::default());
    engine.detonate(grenade);
    let snap = engine.tick(100.0);
    assert!((snap.shake.duration_ms - 300.0).abs() < 1e-9);
    let snap = engine.tick(400.0);
    assert_eq!(snap.shake.strength, 0.0);
}

#[test]
fn test_snapshot_wobbles_only_nearest_target() {
    let mut engine = engine_in_round();
    let snap = engine.tick(700.0);
    let wobbling = snap
        .targets
        .iter()
        .filter(|t| t.draw_position != t.position)
        .count();
    assert!(wobbling <= 1, "At most the nearest target wobbles");
    for t in &snap.targets {
        assert_eq!(t.draw_position.y, t.position.y);
        assert!((t.draw_position.x - t.position.x).abs() <= TARGET_WOBBLE_AMPLITUDE + 1e-9);
    }
    // Collision positions are untouched by the wobble.
    let authoritative: Vec<Position> = targets(&engine).iter().map(|(_, p, _)| *p).collect();
    let drawn: Vec<Position> = snap.targets.iter().map(|t| t.position).collect();
    assert_eq!(authoritative, drawn);
}

#[test]
fn test_determinism_same_seed() {
    let script = |engine: &mut SimulationEngine| {
        let mut frames = Vec::new();
        engine.queue_command(PlayerCommand::Continue);
        for i in 0..120 {
            if i == 5 {
                engine.queue_commands([
                    PlayerCommand::ToggleWeapon,
                    PlayerCommand::FirePressed,
                    PlayerCommand::ThrowGrenade,
                ]);
            }
            let snap = engine.tick(FRAME_MS);
            frames.push(serde_json::to_string(&snap).unwrap());
        }
        frames
    };
    let mut a = SimulationEngine::new(SimConfig {
        seed: 12345,
        ..Default::default()
    });
    let mut b = SimulationEngine::new(SimConfig {
        seed: 12345,
        ..Default::default()
    });
    assert_eq!(script(&mut a), script(&mut b), "Snapshots diverged with same seed");
}
