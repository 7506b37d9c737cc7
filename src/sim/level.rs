/// Level setup: scatter a fresh set of flowers and reset the countdown.
///
/// A level is fully determined by its number and the session RNG:
///   - flower count, time limit and sway speed-up come from `domain::rules`
///   - origins come from `domain::placement`
///   - each flower then draws its own sway parameters, in placement order
///
/// Score is not touched here; callers decide whether it carries over.

use std::f64::consts::TAU;
use std::time::Duration;

use rand::Rng;

use crate::domain::area::Point;
use crate::domain::entity::Flower;
use crate::domain::placement::place_origins;
use crate::domain::rules;
use super::event::GameEvent;
use super::session::{Phase, Session};

/// Sway speed before the level multiplier, in radians per second.
const SWAY_SPEED_MIN: f64 = 0.5;
const SWAY_SPEED_MAX: f64 = 1.5;
/// Sway amplitude bounds (whole units, inclusive).
const SWAY_RANGE_MIN: u32 = 20;
const SWAY_RANGE_MAX: u32 = 40;

/// Discard the current level and start `level` at clock reading `now`.
pub fn start_level(session: &mut Session, level: u32, now: Duration) -> GameEvent {
    let level = level.max(1);
    let count = rules::flower_count(level);

    let placement = place_origins(&mut session.rng, count, &session.area, &session.placement_params);
    if placement.relaxed() {
        log::warn!(
            "level {}: placement relaxed {} time(s), {} forced; spacing {:.1}, clearance {:.1}",
            level, placement.relaxations, placement.forced, placement.spacing, placement.clearance,
        );
    }

    let speedup = rules::speed_multiplier(level);
    session.flowers = placement.origins.iter()
        .enumerate()
        .map(|(i, &origin)| spawn_flower(&mut session.rng, origin, i, speedup))
        .collect();

    session.level = level;
    session.phase = Phase::Playing;
    session.time_limit = rules::time_limit(level);
    session.time_left = session.time_limit;
    session.level_started_at = now;
    session.player.pos = session.area.center();

    log::info!(
        "level {} started: {} flowers, {}s (seed {})",
        level, count, session.time_limit, session.seed,
    );

    GameEvent::LevelStarted { level, flowers: count, time_limit: session.time_limit }
}

fn spawn_flower<R: Rng>(rng: &mut R, origin: Point, index: usize, speedup: f64) -> Flower {
    let phase_offset = rng.random_range(0.0..TAU);
    let speed = rng.random_range(SWAY_SPEED_MIN..SWAY_SPEED_MAX) * speedup;
    let range = rng.random_range(SWAY_RANGE_MIN..=SWAY_RANGE_MAX) as f64;
    Flower::new(origin, rules::palette_color(index), phase_offset, speed, range)
}
