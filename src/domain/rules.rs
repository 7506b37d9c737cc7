/// Difficulty ramp and scoring rules.
///
/// Pure functions of the level number, no side effects.
///
/// ## Level Table
///
/// ┌───────┬─────────┬────────────┬──────────────┐
/// │ Level │ Flowers │ Time limit │ Speed factor │
/// ├───────┼─────────┼────────────┼──────────────┤
/// │ 1     │ 6       │ 60s        │ ×1.0         │
/// │ 2     │ 8       │ 70s        │ ×1.2         │
/// │ 3     │ 10      │ 80s        │ ×1.4         │
/// │ L ≥ 3 │ 10      │ 60+10(L-1) │ ×(1+0.2(L-1))│
/// └───────┴─────────┴────────────┴──────────────┘
///
/// Flower count is capped by the palette size (one color per flower).
/// Level 0 is treated as level 1 everywhere.

use std::time::Duration;

use super::entity::Color;

pub const PALETTE: [Color; 10] = [
    Color::rgb(255, 255, 0),   // yellow
    Color::rgb(0, 255, 0),     // green
    Color::rgb(0, 0, 255),     // blue
    Color::rgb(255, 0, 255),   // magenta
    Color::rgb(0, 255, 255),   // cyan
    Color::rgb(255, 165, 0),   // orange
    Color::rgb(255, 100, 100), // light red
    Color::rgb(100, 100, 255), // light blue
    Color::rgb(200, 200, 100), // light yellow
    Color::rgb(150, 255, 150), // light green
];

pub const BASE_FLOWERS: usize = 6;
pub const FLOWERS_PER_LEVEL: usize = 2;
pub const BASE_TIME_LIMIT: u32 = 60;
pub const TIME_PER_LEVEL: u32 = 10;
pub const SPEED_RAMP: f64 = 0.2;

/// Extra reach added to the butterfly size when testing for a capture.
pub const CAPTURE_MARGIN: f64 = 15.0;

/// Minimum distance between two flower origins.
pub const MIN_FLOWER_SPACING: f64 = 70.0;
/// Minimum distance between a flower origin and the player start.
pub const MIN_PLAYER_CLEARANCE: f64 = 100.0;

#[inline]
fn steps(level: u32) -> u32 {
    level.max(1) - 1
}

pub fn flower_count(level: u32) -> usize {
    let n = BASE_FLOWERS.saturating_add((steps(level) as usize).saturating_mul(FLOWERS_PER_LEVEL));
    n.min(PALETTE.len())
}

pub fn time_limit(level: u32) -> u32 {
    BASE_TIME_LIMIT.saturating_add(steps(level).saturating_mul(TIME_PER_LEVEL))
}

pub fn speed_multiplier(level: u32) -> f64 {
    1.0 + steps(level) as f64 * SPEED_RAMP
}

pub fn capture_radius(butterfly_size: f64) -> f64 {
    butterfly_size + CAPTURE_MARGIN
}

/// Color for the `index`-th placed flower.
pub fn palette_color(index: usize) -> Color {
    PALETTE[index % PALETTE.len()]
}

/// Whole seconds remaining. Counts down once per full elapsed second and
/// saturates at zero.
pub fn time_left(limit: u32, elapsed: Duration) -> u32 {
    let secs = elapsed.as_secs().min(u32::MAX as u64) as u32;
    limit.saturating_sub(secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn level_table() {
        assert_eq!(flower_count(1), 6);
        assert_eq!(flower_count(2), 8);
        assert_eq!(flower_count(3), 10);
        assert_eq!(flower_count(9), 10);
        assert_eq!(time_limit(1), 60);
        assert_eq!(time_limit(2), 70);
        assert_eq!(time_limit(5), 100);
        assert!((speed_multiplier(1) - 1.0).abs() < 1e-12);
        assert!((speed_multiplier(3) - 1.4).abs() < 1e-12);
    }

    #[test]
    fn level_zero_is_level_one() {
        assert_eq!(flower_count(0), flower_count(1));
        assert_eq!(time_limit(0), time_limit(1));
        assert_eq!(speed_multiplier(0), speed_multiplier(1));
    }

    #[test]
    fn palette_cycles() {
        assert_eq!(palette_color(0), Color::rgb(255, 255, 0));
        assert_eq!(palette_color(10), palette_color(0));
        assert_eq!(palette_color(13), Color::rgb(255, 0, 255));
    }

    #[test]
    fn default_capture_radius() {
        assert_eq!(capture_radius(30.0), 45.0);
    }

    #[test]
    fn timer_counts_whole_seconds() {
        assert_eq!(time_left(60, Duration::ZERO), 60);
        assert_eq!(time_left(60, Duration::from_millis(999)), 60);
        assert_eq!(time_left(60, Duration::from_millis(1000)), 59);
        assert_eq!(time_left(60, Duration::from_millis(59_999)), 1);
        assert_eq!(time_left(60, Duration::from_secs(60)), 0);
    }

    proptest! {
        #[test]
        fn flower_count_formula(level in 1u32..10_000) {
            let expected = (6 + 2 * (level as usize - 1)).min(10);
            prop_assert_eq!(flower_count(level), expected);
        }

        #[test]
        fn timer_hits_zero_at_limit_and_stays(limit in 0u32..600, extra_ms in 0u64..10_000_000) {
            let at_limit = Duration::from_secs(limit as u64);
            prop_assert_eq!(time_left(limit, at_limit), 0);
            prop_assert_eq!(time_left(limit, at_limit + Duration::from_millis(extra_ms)), 0);
        }

        #[test]
        fn timer_positive_before_limit(limit in 1u32..600, ms in 0u64..600_000) {
            let elapsed = Duration::from_millis(ms);
            prop_assume!(elapsed < Duration::from_secs(limit as u64));
            prop_assert!(time_left(limit, elapsed) > 0);
        }
    }
}
