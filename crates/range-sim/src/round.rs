//! Round state machine and per-round target layout.
//!
//! `intro -> round -> round_end -> (round[n+1] | game_over)`. The engine
//! drives transitions; this module owns the bookkeeping.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use range_core::constants::*;
use range_core::enums::GamePhase;
use range_core::errors::ActionRejected;
use range_core::state::{RoundView, ScoreView};
use range_core::types::{Countdown, Position};

/// Round, score and phase bookkeeping.
#[derive(Debug, Clone)]
pub struct RoundState {
    pub phase: GamePhase,
    /// -1 before the first round.
    pub index: i32,
    pub started_at_ms: f64,
    pub timer: Countdown,
    pub score: u32,
    pub hits: u32,
    /// Points earned in each completed round.
    pub round_scores: Vec<u32>,
    pub credits_started_at_ms: Option<f64>,
}

impl Default for RoundState {
    fn default() -> Self {
        Self {
            phase: GamePhase::Intro,
            index: -1,
            started_at_ms: 0.0,
            timer: Countdown::new(ROUND_DURATION_MS),
            score: 0,
            hits: 0,
            round_scores: Vec::new(),
            credits_started_at_ms: None,
        }
    }
}

impl RoundState {
    /// Enter round `index`. Past the last round the game ends instead.
    pub fn begin(&mut self, index: usize, now_ms: f64) -> Result<(), ActionRejected> {
        if index >= ROUNDS_TOTAL {
            self.enter_game_over(now_ms);
            return Err(ActionRejected::InvalidRoundIndex(index));
        }
        self.index = index as i32;
        self.started_at_ms = now_ms;
        self.timer = Countdown::new(ROUND_DURATION_MS);
        self.phase = GamePhase::Round;
        Ok(())
    }

    /// Whether the running round is over: time is up or nothing is left to shoot.
    pub fn should_end(&self, alive_targets: usize) -> bool {
        self.phase == GamePhase::Round && (self.timer.expired() || alive_targets == 0)
    }

    /// Close the running round and return the points it earned.
    pub fn finish(&mut self, now_ms: f64) -> u32 {
        let previous: u32 = self.round_scores.iter().sum();
        let points = self.score - previous;
        self.round_scores.push(points);
        if self.next_round().is_some() {
            self.phase = GamePhase::RoundEnd;
        } else {
            self.enter_game_over(now_ms);
        }
        points
    }

    /// Index of the round after the current one, if any remain.
    pub fn next_round(&self) -> Option<usize> {
        let next = (self.index + 1) as usize;
        (next < ROUNDS_TOTAL).then_some(next)
    }

    pub fn award(&mut self, kills: u32, points: u32) {
        self.hits += kills;
        self.score += points;
    }

    pub fn enter_game_over(&mut self, now_ms: f64) {
        self.phase = GamePhase::GameOver;
        if self.credits_started_at_ms.is_none() {
            self.credits_started_at_ms = Some(now_ms);
        }
    }

    pub fn round_view(&self) -> RoundView {
        RoundView {
            index: self.index,
            total: ROUNDS_TOTAL,
            time_remaining_ms: match self.phase {
                GamePhase::Round => self.timer.remaining_ms,
                _ => 0.0,
            },
            credits_started_at_ms: self.credits_started_at_ms,
        }
    }

    pub fn score_view(&self, grenades_left: u32) -> ScoreView {
        ScoreView {
            score: self.score,
            hits: self.hits,
            round_scores: self.round_scores.clone(),
            grenades_left,
        }
    }
}

/// Where and what to spawn for one target.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetPlacement {
    pub position: Position,
    pub phase: f64,
    pub radius: f64,
    pub points: u32,
    pub lane_distance: f64,
}

/// Linear remap of `value` from `[in_lo, in_hi]` onto `[out_lo, out_hi]`.
fn remap(value: f64, in_lo: f64, in_hi: f64, out_lo: f64, out_hi: f64) -> f64 {
    out_lo + (value - in_lo) / (in_hi - in_lo) * (out_hi - out_lo)
}

/// Target radius for a lane: nearer lanes get bigger targets.
pub fn lane_radius(distance: f64) -> f64 {
    remap(
        distance,
        TARGET_DISTANCE_NEAR,
        TARGET_DISTANCE_FAR,
        TARGET_RADIUS_NEAR,
        TARGET_RADIUS_FAR,
    )
}

/// Point value for a lane: farther lanes are worth more.
pub fn lane_points(distance: f64) -> u32 {
    remap(
        distance,
        TARGET_DISTANCE_NEAR,
        TARGET_DISTANCE_FAR,
        TARGET_POINTS_NEAR,
        TARGET_POINTS_FAR,
    )
    .round()
    .max(0.0) as u32
}

/// Randomized placements for every lane of `round`. Lanes alternate sides.
pub fn layout_targets(round: usize, rng: &mut ChaCha8Rng) -> Vec<TargetPlacement> {
    ROUND_DISTANCES[round]
        .iter()
        .enumerate()
        .map(|(i, &distance)| {
            let side = if i % 2 == 0 { -1.0 } else { 1.0 };
            let x = side
                * (TARGET_LATERAL_BASE
                    + rng.gen_range(-TARGET_LATERAL_JITTER..TARGET_LATERAL_JITTER));
            let y = -distance + rng.gen_range(-TARGET_DEPTH_JITTER..TARGET_DEPTH_JITTER);
            let z = rng.gen_range(TARGET_HEIGHT_MIN..TARGET_HEIGHT_MAX);
            TargetPlacement {
                position: Position::new(x, y, z),
                phase: rng.gen_range(0.0..std::f64::consts::TAU),
                radius: lane_radius(distance),
                points: lane_points(distance),
                lane_distance: distance,
            }
        })
        .collect()
}
