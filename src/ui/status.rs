/// Transient status message shown on the help row.
///
/// Fed from each frame's events; a message stays up for a fixed time
/// measured on the same clock the session runs on.

use std::time::Duration;

use crate::sim::event::GameEvent;

const SHORT: Duration = Duration::from_millis(1200);
const LONG: Duration = Duration::from_secs(3);

pub struct StatusLine {
    text: String,
    expires_at: Duration,
}

impl StatusLine {
    pub fn new() -> Self {
        StatusLine { text: String::new(), expires_at: Duration::ZERO }
    }

    fn set(&mut self, text: String, now: Duration, ttl: Duration) {
        self.text = text;
        self.expires_at = now + ttl;
    }

    /// The last event of the frame wins.
    pub fn observe(&mut self, events: &[GameEvent], now: Duration) {
        for event in events {
            match event {
                GameEvent::LevelStarted { level, flowers, time_limit } => self.set(
                    format!("Level {level}: catch {flowers} flowers in {time_limit}s"),
                    now,
                    LONG,
                ),
                GameEvent::FlowerCaptured { index, points } => {
                    self.set(format!("+{points}  (flower #{})", index + 1), now, SHORT)
                }
                GameEvent::LevelComplete { level } => {
                    self.set(format!("Level {level} cleared"), now, LONG)
                }
                GameEvent::GameOver { cause } => self.set(cause.headline().to_string(), now, LONG),
            }
        }
    }

    pub fn current(&self, now: Duration) -> Option<&str> {
        if self.text.is_empty() || now >= self.expires_at {
            None
        } else {
            Some(&self.text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::session::GameOverCause;

    #[test]
    fn empty_until_something_happens() {
        let status = StatusLine::new();
        assert_eq!(status.current(Duration::ZERO), None);
    }

    #[test]
    fn capture_message_expires() {
        let mut status = StatusLine::new();
        let t = Duration::from_secs(5);
        status.observe(&[GameEvent::FlowerCaptured { index: 2, points: 50 }], t);
        assert_eq!(status.current(t), Some("+50  (flower #3)"));
        assert_eq!(status.current(t + SHORT), None);
    }

    #[test]
    fn last_event_wins() {
        let mut status = StatusLine::new();
        status.observe(
            &[
                GameEvent::FlowerCaptured { index: 0, points: 50 },
                GameEvent::LevelComplete { level: 4 },
            ],
            Duration::ZERO,
        );
        assert_eq!(status.current(Duration::from_secs(2)), Some("Level 4 cleared"));
    }

    #[test]
    fn level_start_and_game_over_text() {
        let mut status = StatusLine::new();
        status.observe(&[GameEvent::LevelStarted { level: 2, flowers: 8, time_limit: 70 }], Duration::ZERO);
        assert_eq!(status.current(Duration::ZERO), Some("Level 2: catch 8 flowers in 70s"));
        status.observe(&[GameEvent::GameOver { cause: GameOverCause::TimeUp }], Duration::ZERO);
        assert_eq!(status.current(Duration::ZERO), Some("Time's Up!"));
    }
}
