/// Play area geometry: the bounded rectangle everything lives in.
///
/// Coordinates are game units (not terminal cells). Origin is the top-left
/// corner, x grows right, y grows down. The renderer scales this rectangle
/// onto whatever terminal grid is available.

use std::ops::RangeInclusive;

/// A point in play-area coordinates.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Margins kept free of flower origins so flowers (with their petals and
/// sway) stay on screen.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Inset {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Default for Inset {
    fn default() -> Self {
        Inset { left: 30, right: 50, top: 50, bottom: 50 }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PlayArea {
    pub width: u32,
    pub height: u32,
    pub inset: Inset,
}

impl Default for PlayArea {
    fn default() -> Self {
        PlayArea { width: 700, height: 800, inset: Inset::default() }
    }
}

impl PlayArea {
    pub fn new(width: u32, height: u32) -> Self {
        PlayArea { width, height, inset: Inset::default() }
    }

    /// Player start position. Integer division, so odd sizes round down.
    pub fn center(&self) -> Point {
        Point::new((self.width / 2) as f64, (self.height / 2) as f64)
    }

    /// Inclusive x range for flower origins.
    /// Collapses to the low bound when the insets don't fit.
    pub fn spawn_x(&self) -> RangeInclusive<i64> {
        inset_range(self.width, self.inset.left, self.inset.right)
    }

    /// Inclusive y range for flower origins.
    pub fn spawn_y(&self) -> RangeInclusive<i64> {
        inset_range(self.height, self.inset.top, self.inset.bottom)
    }
}

fn inset_range(extent: u32, lo: u32, hi: u32) -> RangeInclusive<i64> {
    let lo = lo as i64;
    let hi = (extent as i64 - hi as i64).max(lo);
    lo..=hi
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_area_matches_classic_screen() {
        let a = PlayArea::default();
        assert_eq!(a.center(), Point::new(350.0, 400.0));
        assert_eq!(a.spawn_x(), 30..=650);
        assert_eq!(a.spawn_y(), 50..=750);
    }

    #[test]
    fn odd_center_rounds_down() {
        let a = PlayArea::new(101, 51);
        assert_eq!(a.center(), Point::new(50.0, 25.0));
    }

    #[test]
    fn cramped_area_collapses_spawn_range() {
        let a = PlayArea::new(60, 60);
        // 60 - 50 = 10 < left inset 30
        assert_eq!(a.spawn_x(), 30..=30);
        assert_eq!(a.spawn_y(), 50..=50);
    }

    #[test]
    fn distance_is_euclidean() {
        let d = Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0));
        assert!((d - 5.0).abs() < 1e-12);
    }
}
