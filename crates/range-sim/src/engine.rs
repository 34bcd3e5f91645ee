//! Simulation engine for one game session.
//!
//! `SimulationEngine` owns the hecs ECS world, the camera, the arsenal and
//! the round state. It applies player commands at tick boundaries, runs all
//! systems for one frame of `dt` milliseconds, and produces `RangeSnapshot`s.
//! Completely headless: rendering and input capture live in the host.

use std::collections::VecDeque;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use range_core::commands::PlayerCommand;
use range_core::components::Target;
use range_core::constants::*;
use range_core::enums::{GamePhase, LookSource};
use range_core::errors::ActionRejected;
use range_core::events::{Popup, RangeEvent, ShakePulse};
use range_core::state::RangeSnapshot;
use range_core::types::{Countdown, SimTime};

use crate::arsenal::{weapon_spec, Arsenal};
use crate::camera::Camera;
use crate::round::{self, RoundState};
use crate::systems;
use crate::systems::detonation::Detonation;
use crate::systems::snapshot::SnapshotInputs;
use crate::world_setup;

/// Configuration for starting a new session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for target placement and shotgun spread.
    pub seed: u64,
    /// Look sensitivity while the pointer is locked (radians per pixel).
    pub mouse_sensitivity: f64,
    /// Look sensitivity for the drag fallback (radians per pixel).
    pub drag_sensitivity: f64,
    /// Let pistol and shotgun bullets destroy targets.
    pub bullet_hits_targets: bool,
    /// Delay between shots inside a burst (ms).
    pub burst_interval_ms: f64,
    pub grenades_per_game: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            mouse_sensitivity: MOUSE_SENSITIVITY,
            drag_sensitivity: DRAG_SENSITIVITY,
            bullet_hits_targets: false,
            burst_interval_ms: BURST_INTERVAL_MS,
            grenades_per_game: GRENADES_PER_GAME,
        }
    }
}

/// The simulation engine. Owns the ECS world and all session state.
pub struct SimulationEngine {
    config: SimConfig,
    world: World,
    time: SimTime,
    rng: ChaCha8Rng,
    camera: Camera,
    arsenal: Arsenal,
    round: RoundState,
    grenades_left: u32,
    movement: (i8, i8),
    command_queue: VecDeque<PlayerCommand>,
    /// Live bullets, oldest first.
    bullet_order: VecDeque<Entity>,
    despawn_buffer: Vec<Entity>,
    grenade_buffer: Vec<Entity>,
    popups: Vec<Popup>,
    shake: Countdown,
    shake_strength: f64,
    events: Vec<RangeEvent>,
}

impl SimulationEngine {
    /// Create a new session with the given config.
    pub fn new(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            time: SimTime::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            camera: Camera::default(),
            arsenal: Arsenal::new(config.burst_interval_ms),
            round: RoundState::default(),
            grenades_left: config.grenades_per_game,
            movement: (0, 0),
            command_queue: VecDeque::new(),
            bullet_order: VecDeque::new(),
            despawn_buffer: Vec::new(),
            grenade_buffer: Vec::new(),
            popups: Vec::new(),
            shake: Countdown::default(),
            shake_strength: 0.0,
            events: Vec::new(),
            config,
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the session by one frame of `dt_ms` and return the snapshot.
    pub fn tick(&mut self, dt_ms: f64) -> RangeSnapshot {
        let dt_ms = dt_ms.max(0.0);
        self.process_commands();

        if self.round.phase == GamePhase::Round {
            self.run_systems(dt_ms);
        }

        self.shake.advance(dt_ms);
        if self.shake.expired() {
            self.shake_strength = 0.0;
        }
        self.time.advance(dt_ms);
        let now = self.time.elapsed_ms;
        self.popups.retain(|p| p.visible_at(now));

        self.snapshot()
    }

    /// Build a snapshot without advancing time. Drains pending events.
    pub fn snapshot(&mut self) -> RangeSnapshot {
        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            SnapshotInputs {
                time: &self.time,
                round: &self.round,
                camera: &self.camera,
                arsenal: &self.arsenal,
                grenades_left: self.grenades_left,
                popups: &self.popups,
                shake: ShakePulse {
                    duration_ms: self.shake.remaining_ms,
                    strength: self.shake_strength,
                },
                events,
            },
        )
    }

    pub fn phase(&self) -> GamePhase {
        self.round.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn arsenal(&self) -> &Arsenal {
        &self.arsenal
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    /// Number of live bullets.
    pub fn bullet_count(&self) -> usize {
        self.bullet_order.len()
    }

    pub fn alive_targets(&self) -> usize {
        self.world
            .query::<&Target>()
            .iter()
            .filter(|(_, t)| t.alive)
            .count()
    }

    /// Start round `index`: fresh targets, no projectiles, timer reset.
    /// Past the last round the running round is closed and the session
    /// moves to game over instead.
    pub fn start_round(&mut self, index: usize) {
        if index >= ROUNDS_TOTAL {
            self.end_round();
        }
        world_setup::clear_round_entities(&mut self.world, &mut self.despawn_buffer);
        self.bullet_order.clear();
        self.arsenal.cancel_burst();

        let already_over = self.round.phase == GamePhase::GameOver;
        if let Err(rejected) = self.round.begin(index, self.time.elapsed_ms) {
            tracing::warn!(%rejected, "round start refused, ending game");
            if !already_over {
                self.announce_game_over();
            }
            return;
        }

        let placements = round::layout_targets(index, &mut self.rng);
        world_setup::spawn_targets(&mut self.world, &placements);

        self.popup(format!("Round {} start!", index + 1), 1200.0);
        self.events.push(RangeEvent::RoundStarted { round: index });
        tracing::info!(round = index + 1, targets = placements.len(), "round started");
    }

    /// Close the running round, record its points and pick the next phase.
    pub fn end_round(&mut self) {
        if self.round.phase != GamePhase::Round {
            return;
        }
        self.camera.reset_orientation();
        let points = self.round.finish(self.time.elapsed_ms);
        let round = self.round.index as usize;

        self.popup(format!("Round {} complete: +{}", round + 1, points), 1800.0);
        self.events.push(RangeEvent::RoundCompleted { round, points });
        tracing::info!(round = round + 1, points, score = self.round.score, "round complete");

        if self.round.phase == GamePhase::GameOver {
            self.announce_game_over();
        }
    }

    /// Detonate a grenade and score its kills. Repeated calls are no-ops.
    pub fn detonate(&mut self, grenade: Entity) -> Option<Detonation> {
        let detonation = systems::detonation::detonate(&self.world, grenade, false)?;
        self.apply_detonation(&detonation);
        Some(detonation)
    }

    /// Spawn a grenade at an explicit position (for tests).
    #[cfg(test)]
    pub fn spawn_test_grenade(
        &mut self,
        position: range_core::types::Position,
        velocity: range_core::types::Velocity,
    ) -> Entity {
        world_setup::spawn_grenade(&mut self.world, position, velocity)
    }

    /// Get a mutable reference to the ECS world (for tests).
    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            if let Err(rejected) = self.handle_command(command) {
                tracing::debug!(%rejected, "player action ignored");
            }
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) -> Result<(), ActionRejected> {
        match command {
            PlayerCommand::Look { dx, dy, source } => {
                let sensitivity = match source {
                    LookSource::PointerLock => self.config.mouse_sensitivity,
                    LookSource::Drag => self.config.drag_sensitivity,
                };
                self.camera.apply_look_delta(dx, dy, sensitivity);
            }
            PlayerCommand::SetMovement { forward, strafe } => {
                self.movement = (forward.signum(), strafe.signum());
            }
            PlayerCommand::FirePressed => {
                self.require_round()?;
                if let Err(rejected) = self.arsenal.pull_trigger() {
                    if matches!(rejected, ActionRejected::InsufficientAmmo(_)) {
                        self.popup("Out of ammo! Press R to reload.", 1800.0);
                    }
                    return Err(rejected);
                }
            }
            PlayerCommand::FireReleased => {
                self.arsenal.release_trigger();
            }
            PlayerCommand::Reload => {
                self.require_round()?;
                let weapon = self.arsenal.begin_reload()?;
                self.popup("Reloading...", weapon_spec(weapon).reload_ms);
                self.events.push(RangeEvent::ReloadStarted);
            }
            PlayerCommand::SwitchWeapon { weapon } => {
                self.arsenal.switch_to(weapon);
            }
            PlayerCommand::ToggleWeapon => {
                self.arsenal.switch_to(self.arsenal.held().toggled());
            }
            PlayerCommand::ThrowGrenade => {
                self.require_round()?;
                if self.grenades_left == 0 {
                    self.popup("Grenades over.", 1400.0);
                    return Err(ActionRejected::NoGrenades);
                }
                self.grenades_left -= 1;
                world_setup::spawn_thrown_grenade(&mut self.world, &self.camera);
            }
            PlayerCommand::Continue => match self.round.phase {
                GamePhase::Intro => {
                    self.camera.reset_orientation();
                    self.start_round(0);
                }
                GamePhase::RoundEnd => match self.round.next_round() {
                    Some(next) => self.start_round(next),
                    None => {
                        self.round.enter_game_over(self.time.elapsed_ms);
                        self.announce_game_over();
                    }
                },
                phase => return Err(ActionRejected::WrongPhase(phase)),
            },
        }
        Ok(())
    }

    fn require_round(&self) -> Result<(), ActionRejected> {
        match self.round.phase {
            GamePhase::Round => Ok(()),
            phase => Err(ActionRejected::WrongPhase(phase)),
        }
    }

    /// Run all systems in order for one frame.
    fn run_systems(&mut self, dt_ms: f64) {
        // 1. Walking
        let (forward, strafe) = self.movement;
        if forward != 0 || strafe != 0 {
            self.camera.move_by(f64::from(forward), f64::from(strafe));
        }
        // 2. Grenades (flight, contact fuse, airburst)
        let detonations =
            systems::ballistics::run_grenades(&self.world, dt_ms, &mut self.grenade_buffer);
        for detonation in &detonations {
            self.apply_detonation(detonation);
        }
        // 3. Bullets
        systems::ballistics::run_bullets(&mut self.world, dt_ms);
        // 4. Bullet hits (opt-in)
        if self.config.bullet_hits_targets {
            for hit in systems::bullet_hits::run(&mut self.world) {
                self.round.award(1, hit.points);
                self.popup(format!("Target hit! +{}", hit.points), 900.0);
                self.events.push(RangeEvent::TargetDestroyed { points: hit.points });
            }
        }
        // 5. Reload and burst timers; new bullets appear after this frame's flight
        let fired = self.arsenal.advance(dt_ms, &self.camera, &mut self.rng);
        if let Some((weapon, loaded)) = fired.reload_finished {
            tracing::debug!(?weapon, loaded, "reload finished");
            self.events.push(RangeEvent::ReloadFinished { loaded });
        }
        if fired.shots_fired > 0 {
            self.events.push(RangeEvent::ShotFired {
                pellets: fired.spawns.len() as u32,
            });
        }
        for spawn in &fired.spawns {
            let bullet = world_setup::spawn_bullet(&mut self.world, spawn);
            self.bullet_order.push_back(bullet);
        }
        // 6. Cleanup (retired bullets, spent grenades, bullet cap)
        systems::cleanup::run(
            &mut self.world,
            &mut self.bullet_order,
            &mut self.despawn_buffer,
        );
        // 7. Round end
        self.round.timer.advance(dt_ms);
        if self.round.should_end(self.alive_targets()) {
            self.end_round();
        }
    }

    fn apply_detonation(&mut self, detonation: &Detonation) {
        self.round.award(detonation.kills, detonation.points);
        self.shake = Countdown::new(SHAKE_DURATION_MS);
        self.shake_strength = SHAKE_STRENGTH;
        self.popup("Boom! grenade exploded", 1600.0);
        self.events.push(RangeEvent::GrenadeDetonated {
            kills: detonation.kills,
            airburst: detonation.airburst,
        });
        self.events.push(RangeEvent::Shake(ShakePulse {
            duration_ms: SHAKE_DURATION_MS,
            strength: SHAKE_STRENGTH,
        }));
        tracing::info!(
            kills = detonation.kills,
            points = detonation.points,
            airburst = detonation.airburst,
            "grenade detonated"
        );
    }

    fn announce_game_over(&mut self) {
        let score = self.round.score;
        self.popup(format!("Game over! Final score: {score}"), 2000.0);
        self.events.push(RangeEvent::GameOver { score });
        tracing::info!(score, hits = self.round.hits, "game over");
    }

    fn popup(&mut self, text: impl Into<String>, duration_ms: f64) {
        self.popups
            .push(Popup::new(text, duration_ms, self.time.elapsed_ms));
    }
}
