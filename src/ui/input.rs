/// Keyboard state tracker.
///
/// Tracks which keys are currently held down, enabling:
///   - Smooth flight while an arrow key is held
///   - Diagonal flight (two arrows held at once)
///   - Edge-triggered actions (advance / restart fire once per press)
///
/// Uses crossterm's keyboard enhancement for Release events when the
/// terminal supports it. Otherwise a key counts as released once it stops
/// auto-repeating for `HOLD_TIMEOUT`.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, poll};

/// After this duration without a Press/Repeat event, consider the key released.
/// Only used when the terminal doesn't report Release events.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Keys that went from "not held" to "held" during the last drain.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events from the last drain (Ctrl+C detection).
    raw_events: Vec<KeyEvent>,

    /// Honor explicit Release events. Set once keyboard enhancement is on.
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            honor_release: false,
        }
    }

    /// Drain all pending terminal events without blocking.
    /// Call once per frame, before building the frame input.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.apply(key, Instant::now());
            }
        }

        let now = Instant::now();
        self.expire(now);
    }

    fn apply(&mut self, key: KeyEvent, at: Instant) {
        self.raw_events.push(key);
        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                self.last_active.remove(&key.code);
            }
            KeyEventKind::Release => {}
            _ => {
                let was_held = self.is_held_at(key.code, at);
                self.last_active.insert(key.code, at);
                if !was_held {
                    self.fresh_presses.push(key.code);
                }
            }
        }
    }

    fn expire(&mut self, now: Instant) {
        if self.honor_release { return; }
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    pub fn any_held(&self, codes: &[KeyCode]) -> bool {
        let now = Instant::now();
        codes.iter().any(|c| self.is_held_at(*c, now))
    }

    /// Was any of these keys freshly pressed this frame? (edge trigger)
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.fresh_presses.contains(c))
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }

    fn is_held_at(&self, code: KeyCode, now: Instant) -> bool {
        match self.last_active.get(&code) {
            Some(t) if self.honor_release => *t <= now,
            Some(t) => now.duration_since(*t) < HOLD_TIMEOUT,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent { code, modifiers: KeyModifiers::NONE, kind, state: KeyEventState::NONE }
    }

    #[test]
    fn press_is_fresh_once() {
        let mut kb = InputState::new();
        let t0 = Instant::now();
        kb.apply(key(KeyCode::Char(' '), KeyEventKind::Press), t0);
        assert!(kb.any_pressed(&[KeyCode::Char(' ')]));

        kb.fresh_presses.clear();
        kb.apply(key(KeyCode::Char(' '), KeyEventKind::Repeat), t0 + Duration::from_millis(30));
        assert!(!kb.any_pressed(&[KeyCode::Char(' ')]));
    }

    #[test]
    fn held_key_expires_without_release_support() {
        let mut kb = InputState::new();
        let t0 = Instant::now();
        kb.apply(key(KeyCode::Left, KeyEventKind::Press), t0);
        assert!(kb.is_held_at(KeyCode::Left, t0 + Duration::from_millis(100)));
        assert!(!kb.is_held_at(KeyCode::Left, t0 + HOLD_TIMEOUT));
        kb.expire(t0 + HOLD_TIMEOUT);
        assert!(kb.last_active.is_empty());
    }

    #[test]
    fn release_ends_hold_when_enhanced() {
        let mut kb = InputState::new();
        kb.honor_release = true;
        let t0 = Instant::now();
        kb.apply(key(KeyCode::Up, KeyEventKind::Press), t0);
        // No timeout in enhanced mode.
        assert!(kb.is_held_at(KeyCode::Up, t0 + Duration::from_secs(5)));
        kb.apply(key(KeyCode::Up, KeyEventKind::Release), t0 + Duration::from_secs(5));
        assert!(!kb.is_held_at(KeyCode::Up, t0 + Duration::from_secs(5)));
    }

    #[test]
    fn release_ignored_without_enhancement() {
        let mut kb = InputState::new();
        let t0 = Instant::now();
        kb.apply(key(KeyCode::Down, KeyEventKind::Press), t0);
        kb.apply(key(KeyCode::Down, KeyEventKind::Release), t0);
        assert!(kb.is_held_at(KeyCode::Down, t0 + Duration::from_millis(10)));
    }

    #[test]
    fn detects_ctrl_c() {
        let mut kb = InputState::new();
        let mut ev = key(KeyCode::Char('c'), KeyEventKind::Press);
        ev.modifiers = KeyModifiers::CONTROL;
        kb.apply(ev, Instant::now());
        assert!(kb.ctrl_c_pressed());
    }
}
