/// Session: the complete state of a running game.
///
/// ## Ownership
///
/// The loop driver owns exactly one `Session` and passes it by `&mut` to
/// `step::update`. Nothing lives at process scope. Starting a level
/// (advance or restart) rebuilds the per-level parts wholesale; `score`
/// survives an advance and is zeroed by a restart.
///
/// ## Phase
///
/// ```text
///   Playing ──all captured──▶ LevelComplete ──advance──▶ Playing (level+1)
///      │
///      └──timer hits 0──▶ GameOver(cause) ──restart──▶ Playing (level 1)
/// ```
///
/// Within a level the phase only ever leaves `Playing`; it never returns
/// until a new level starts.

use std::time::Duration;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::{GameConfig, GameplayConfig};
use crate::domain::area::{PlayArea, Point};
use crate::domain::entity::{Butterfly, Color, Flower};
use crate::domain::placement::PlacementParams;

/// Why a run ended. Fixed on the tick the timer ran out.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameOverCause {
    /// Every flower was already captured when the timer ran out.
    AllCaptured,
    TimeUp,
}

impl GameOverCause {
    pub fn headline(self) -> &'static str {
        match self {
            GameOverCause::AllCaptured => "All Flowers Collected!",
            GameOverCause::TimeUp => "Time's Up!",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Playing,
    LevelComplete,
    GameOver(GameOverCause),
}

pub struct Session {
    // ── Progress ──
    pub level: u32,
    pub score: u32,
    pub phase: Phase,

    // ── Countdown ──
    pub time_limit: u32,
    pub time_left: u32,
    /// Clock reading when the current level started.
    pub level_started_at: Duration,

    // ── Entities ──
    pub player: Butterfly,
    pub flowers: Vec<Flower>,

    // ── Fixed for the whole run ──
    pub area: PlayArea,
    pub gameplay: GameplayConfig,
    pub placement_params: PlacementParams,
    pub seed: u64,
    pub(crate) rng: Pcg32,

    pub exit_requested: bool,
}

impl Session {
    /// Build a session and start level 1 at clock reading `now`.
    pub fn new(config: &GameConfig, seed: u64, now: Duration) -> Self {
        let area = config.play_area;
        let mut session = Session {
            level: 1,
            score: 0,
            phase: Phase::Playing,
            time_limit: 0,
            time_left: 0,
            level_started_at: now,
            player: Butterfly::new(
                area.center(),
                config.gameplay.butterfly_size,
                config.gameplay.butterfly_speed,
            ),
            flowers: vec![],
            area,
            gameplay: config.gameplay.clone(),
            placement_params: config.placement,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            exit_requested: false,
        };
        super::level::start_level(&mut session, 1, now);
        session
    }

    pub fn all_captured(&self) -> bool {
        self.flowers.iter().all(|f| f.captured)
    }

    pub fn captured_count(&self) -> usize {
        self.flowers.iter().filter(|f| f.captured).count()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            player: self.player.pos,
            area: self.area,
            flowers: self.flowers.iter()
                .map(|f| FlowerView { pos: f.pos, color: f.color, captured: f.captured })
                .collect(),
            score: self.score,
            time_left: self.time_left,
            time_limit: self.time_limit,
            level: self.level,
            phase: self.phase,
            exit_requested: self.exit_requested,
        }
    }
}

/// What the renderer needs for one flower.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct FlowerView {
    pub pos: Point,
    pub color: Color,
    pub captured: bool,
}

/// Read-only copy of everything a frame draws. Decouples the renderer
/// from the session's internals (RNG, config).
#[derive(Clone, PartialEq, Debug)]
pub struct SessionSnapshot {
    pub player: Point,
    pub area: PlayArea,
    pub flowers: Vec<FlowerView>,
    pub score: u32,
    pub time_left: u32,
    pub time_limit: u32,
    pub level: u32,
    pub phase: Phase,
    pub exit_requested: bool,
}

impl SessionSnapshot {
    pub fn captured_count(&self) -> usize {
        self.flowers.iter().filter(|f| f.captured).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_starts_level_one() {
        let s = Session::new(&GameConfig::default(), 11, Duration::from_secs(3));
        assert_eq!(s.level, 1);
        assert_eq!(s.score, 0);
        assert_eq!(s.phase, Phase::Playing);
        assert_eq!(s.flowers.len(), 6);
        assert_eq!(s.time_limit, 60);
        assert_eq!(s.time_left, 60);
        assert_eq!(s.level_started_at, Duration::from_secs(3));
        assert_eq!(s.player.pos, s.area.center());
        assert!(!s.all_captured());
    }

    #[test]
    fn snapshot_mirrors_session() {
        let mut s = Session::new(&GameConfig::default(), 5, Duration::ZERO);
        s.flowers[2].captured = true;
        s.score = 50;
        let snap = s.snapshot();
        assert_eq!(snap.flowers.len(), s.flowers.len());
        assert_eq!(snap.captured_count(), 1);
        assert!(snap.flowers[2].captured);
        assert_eq!(snap.flowers[0].color, s.flowers[0].color);
        assert_eq!(snap.score, 50);
        assert_eq!(snap.level, 1);
        assert_eq!(snap.player, s.player.pos);
        assert_eq!(snap.phase, Phase::Playing);
    }

    #[test]
    fn headlines() {
        assert_eq!(GameOverCause::TimeUp.headline(), "Time's Up!");
        assert_eq!(GameOverCause::AllCaptured.headline(), "All Flowers Collected!");
    }
}
