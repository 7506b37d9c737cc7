/// Entities: Flower, Butterfly, and the per-frame input that steers them.
/// Flowers sway on a closed-form path; nothing here reads a clock.

use super::area::{PlayArea, Point};

/// Capture is measured against the flower head, which sits above the
/// stem base stored in `pos`.
pub const FLOWER_HEAD_OFFSET: f64 = 12.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }
}

/// Frame input: held directions plus one-shot actions.
/// Directions are continuous (held key), actions are edge-triggered.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct FrameInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub restart: bool,
    pub advance: bool,
    pub quit: bool,
}

#[derive(Clone, Debug)]
pub struct Flower {
    /// Anchor of the sway path. Fixed at creation.
    pub origin: Point,
    /// Current (derived) position of the stem base.
    pub pos: Point,
    pub color: Color,
    pub captured: bool,
    /// Seconds added to the clock so flowers don't sway in lockstep.
    pub phase_offset: f64,
    pub speed: f64,
    /// Sway amplitude: x swings ±range/2, y swings ±range/3.
    pub range: f64,
}

impl Flower {
    pub fn new(origin: Point, color: Color, phase_offset: f64, speed: f64, range: f64) -> Self {
        Flower {
            origin,
            pos: origin,
            color,
            captured: false,
            phase_offset,
            speed,
            range,
        }
    }

    /// Recompute `pos` for clock reading `elapsed` (seconds).
    /// Captured flowers stay where they were caught.
    pub fn sway(&mut self, elapsed: f64) {
        if self.captured { return; }
        let t = elapsed + self.phase_offset;
        self.pos.x = self.origin.x + (t * self.speed).sin() * self.range / 2.0;
        self.pos.y = self.origin.y + (t * 0.7 * self.speed).cos() * self.range / 3.0;
    }

    pub fn head(&self) -> Point {
        Point::new(self.pos.x, self.pos.y - FLOWER_HEAD_OFFSET)
    }

    /// Returns true only on the tick the flower is caught.
    pub fn check_capture(&mut self, player: Point, radius: f64) -> bool {
        if self.captured { return false; }
        if player.distance(self.head()) < radius {
            self.captured = true;
            return true;
        }
        false
    }
}

#[derive(Clone, Debug)]
pub struct Butterfly {
    pub pos: Point,
    /// Half-extent used for edge clamping and the capture radius.
    pub size: f64,
    /// Units moved per tick per held direction.
    pub speed: f64,
}

impl Butterfly {
    pub fn new(pos: Point, size: f64, speed: f64) -> Self {
        Butterfly { pos, size, speed }
    }

    /// Move one tick according to held directions. A step is refused when
    /// the body already touches that edge.
    pub fn steer(&mut self, input: &FrameInput, area: &PlayArea) {
        let w = area.width as f64;
        let h = area.height as f64;
        if input.left && self.pos.x - self.size > 0.0 {
            self.pos.x -= self.speed;
        }
        if input.right && self.pos.x + self.size < w {
            self.pos.x += self.speed;
        }
        if input.up && self.pos.y - self.size > 0.0 {
            self.pos.y -= self.speed;
        }
        if input.down && self.pos.y + self.size < h {
            self.pos.y += self.speed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn flower_at(x: f64, y: f64) -> Flower {
        Flower::new(Point::new(x, y), Color::rgb(255, 255, 0), 0.0, 1.0, 30.0)
    }

    #[test]
    fn sway_follows_both_sinusoids() {
        let mut f = flower_at(100.0, 200.0);
        f.sway(0.0);
        // sin(0) = 0, cos(0) = 1
        assert!((f.pos.x - 100.0).abs() < 1e-9);
        assert!((f.pos.y - 210.0).abs() < 1e-9);

        f.sway(PI / 2.0);
        assert!((f.pos.x - 115.0).abs() < 1e-9);
        let expected_y = 200.0 + (PI / 2.0 * 0.7).cos() * 10.0;
        assert!((f.pos.y - expected_y).abs() < 1e-9);
    }

    #[test]
    fn phase_offset_shifts_the_clock() {
        let mut a = flower_at(0.0, 0.0);
        let mut b = flower_at(0.0, 0.0);
        b.phase_offset = 1.25;
        a.sway(3.25);
        b.sway(2.0);
        assert_eq!(a.pos, b.pos);
    }

    #[test]
    fn captured_flower_is_frozen() {
        let mut f = flower_at(100.0, 100.0);
        f.sway(1.0);
        let caught_at = f.pos;
        f.captured = true;
        f.sway(7.0);
        assert_eq!(f.pos, caught_at);
    }

    #[test]
    fn capture_uses_flower_head() {
        let mut f = flower_at(100.0, 100.0);
        // Head is at (100, 88). 44 below the head is inside radius 45.
        assert!(!f.check_capture(Point::new(100.0, 88.0 + 45.0), 45.0));
        assert!(f.check_capture(Point::new(100.0, 88.0 + 44.0), 45.0));
        assert!(f.captured);
    }

    #[test]
    fn capture_fires_once() {
        let mut f = flower_at(100.0, 100.0);
        let on_top = f.head();
        assert!(f.check_capture(on_top, 45.0));
        assert!(!f.check_capture(on_top, 45.0));
        assert!(f.captured);
    }

    #[test]
    fn butterfly_moves_by_speed() {
        let area = PlayArea::default();
        let mut b = Butterfly::new(area.center(), 30.0, 5.0);
        let input = FrameInput { right: true, down: true, ..Default::default() };
        b.steer(&input, &area);
        assert_eq!(b.pos, Point::new(355.0, 405.0));
    }

    #[test]
    fn opposite_keys_cancel() {
        let area = PlayArea::default();
        let mut b = Butterfly::new(area.center(), 30.0, 5.0);
        let input = FrameInput { left: true, right: true, ..Default::default() };
        b.steer(&input, &area);
        assert_eq!(b.pos, area.center());
    }

    #[test]
    fn butterfly_stops_at_edges() {
        let area = PlayArea::default();
        let mut b = Butterfly::new(Point::new(30.0, 30.0), 30.0, 5.0);
        let input = FrameInput { left: true, up: true, ..Default::default() };
        b.steer(&input, &area);
        assert_eq!(b.pos, Point::new(30.0, 30.0));

        let mut b = Butterfly::new(Point::new(670.0, 770.0), 30.0, 5.0);
        let input = FrameInput { right: true, down: true, ..Default::default() };
        b.steer(&input, &area);
        assert_eq!(b.pos, Point::new(670.0, 770.0));
    }

    #[test]
    fn butterfly_may_overshoot_by_one_step() {
        // Edge check happens before the step, like the classic game.
        let area = PlayArea::default();
        let mut b = Butterfly::new(Point::new(32.0, 400.0), 30.0, 5.0);
        b.steer(&FrameInput { left: true, ..Default::default() }, &area);
        assert_eq!(b.pos.x, 27.0);
        b.steer(&FrameInput { left: true, ..Default::default() }, &area);
        assert_eq!(b.pos.x, 27.0);
    }
}
