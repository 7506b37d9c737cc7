/// Events emitted during a session update.
/// The presentation layer consumes these for sound and logging.

use super::session::GameOverCause;

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    LevelStarted { level: u32, flowers: usize, time_limit: u32 },
    FlowerCaptured { index: usize, points: u32 },
    LevelComplete { level: u32 },
    GameOver { cause: GameOverCause },
}
