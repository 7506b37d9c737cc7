/// The update function: advances the session by one frame.
///
/// Processing order:
///   1. Actions (quit / advance / restart)
///   2. Countdown (may end the run)
///   3. Butterfly movement
///   4. Flower sway
///   5. Captures
///   6. Level clear check
///
/// Steps 3, 5 and 6 only run while `Playing`. Because the countdown runs
/// first, a timeout on the same frame as the last capture wins.
/// Step 4 runs in every phase so uncaptured flowers keep swaying behind
/// the banners.

use std::time::Duration;

use crate::domain::entity::FrameInput;
use crate::domain::rules;
use super::event::GameEvent;
use super::level::start_level;
use super::session::{GameOverCause, Phase, Session, SessionSnapshot};

/// Result of one update: what to draw and what happened.
#[derive(Clone, Debug)]
pub struct Frame {
    pub snapshot: SessionSnapshot,
    pub events: Vec<GameEvent>,
}

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

/// `now` is the clock reading for this frame (time since process start).
pub fn update(session: &mut Session, now: Duration, input: &FrameInput) -> Frame {
    let mut events: Vec<GameEvent> = Vec::new();

    resolve_actions(session, now, input, &mut events);
    resolve_countdown(session, now, &mut events);
    resolve_movement(session, input);
    resolve_sway(session, now);
    resolve_captures(session, &mut events);
    resolve_level_clear(session, &mut events);

    Frame { snapshot: session.snapshot(), events }
}

/// Start the next level. Only valid from `LevelComplete`; score carries over.
pub fn advance_level(session: &mut Session, now: Duration) -> Option<GameEvent> {
    if session.phase != Phase::LevelComplete { return None; }
    let next = session.level.saturating_add(1);
    Some(start_level(session, next, now))
}

/// Start over from level 1 with zero score. Only valid from `GameOver`.
pub fn restart(session: &mut Session, now: Duration) -> Option<GameEvent> {
    if !matches!(session.phase, Phase::GameOver(_)) { return None; }
    log::info!("restart after level {} with score {}", session.level, session.score);
    session.score = 0;
    Some(start_level(session, 1, now))
}

// ══════════════════════════════════════════════════════════════
// Resolution steps
// ══════════════════════════════════════════════════════════════

fn resolve_actions(session: &mut Session, now: Duration, input: &FrameInput, events: &mut Vec<GameEvent>) {
    if input.quit {
        session.exit_requested = true;
    }
    if input.advance {
        if let Some(ev) = advance_level(session, now) { events.push(ev); }
    }
    if input.restart {
        if let Some(ev) = restart(session, now) { events.push(ev); }
    }
}

fn resolve_countdown(session: &mut Session, now: Duration, events: &mut Vec<GameEvent>) {
    if session.phase != Phase::Playing { return; }

    let elapsed = now.saturating_sub(session.level_started_at);
    session.time_left = rules::time_left(session.time_limit, elapsed);
    if session.time_left > 0 { return; }

    let cause = if session.all_captured() {
        GameOverCause::AllCaptured
    } else {
        GameOverCause::TimeUp
    };
    session.phase = Phase::GameOver(cause);
    log::info!(
        "game over ({:?}) at level {}: score {}, {}/{} flowers",
        cause, session.level, session.score, session.captured_count(), session.flowers.len(),
    );
    events.push(GameEvent::GameOver { cause });
}

fn resolve_movement(session: &mut Session, input: &FrameInput) {
    if session.phase != Phase::Playing { return; }
    session.player.steer(input, &session.area);
}

fn resolve_sway(session: &mut Session, now: Duration) {
    let t = now.as_secs_f64();
    for flower in &mut session.flowers {
        flower.sway(t);
    }
}

fn resolve_captures(session: &mut Session, events: &mut Vec<GameEvent>) {
    if session.phase != Phase::Playing { return; }

    let player = session.player.pos;
    let radius = rules::capture_radius(session.player.size);
    let points = session.gameplay.points_per_flower;

    for (index, flower) in session.flowers.iter_mut().enumerate() {
        if flower.check_capture(player, radius) {
            session.score = session.score.saturating_add(points);
            log::debug!("flower {} captured, score {}", index, session.score);
            events.push(GameEvent::FlowerCaptured { index, points });
        }
    }
}

fn resolve_level_clear(session: &mut Session, events: &mut Vec<GameEvent>) {
    if session.phase != Phase::Playing { return; }
    if !session.all_captured() { return; }

    session.phase = Phase::LevelComplete;
    log::info!("level {} complete, score {}", session.level, session.score);
    events.push(GameEvent::LevelComplete { level: session.level });
}
