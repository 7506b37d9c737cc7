/// Flower placement: rejection sampling with a bounded attempt budget.
///
/// Each origin is drawn uniformly (integer coordinates) inside the play
/// area's spawn rectangle and accepted iff it is at least `spacing` from
/// every accepted origin and at least `clearance` from the player start.
///
/// When a flower exhausts `max_attempts` draws, both distances shrink by
/// `relax_factor` and sampling continues. Relaxation is sticky for the rest
/// of the level. After `max_relaxations` rounds the next draw is accepted
/// unconditionally, so placement always terminates.

use rand::Rng;

use super::area::{PlayArea, Point};
use super::rules::{MIN_FLOWER_SPACING, MIN_PLAYER_CLEARANCE};

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct PlacementParams {
    pub spacing: f64,
    pub clearance: f64,
    pub max_attempts: u32,
    pub relax_factor: f64,
    pub max_relaxations: u32,
}

impl Default for PlacementParams {
    fn default() -> Self {
        PlacementParams {
            spacing: MIN_FLOWER_SPACING,
            clearance: MIN_PLAYER_CLEARANCE,
            max_attempts: 2000,
            relax_factor: 0.8,
            max_relaxations: 10,
        }
    }
}

/// Outcome of one placement run.
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    pub origins: Vec<Point>,
    /// Relaxation rounds used. 0 means the full constraints hold.
    pub relaxations: u32,
    /// Spacing in force when the last origin was accepted.
    pub spacing: f64,
    pub clearance: f64,
    /// Origins accepted without checking constraints at all.
    pub forced: usize,
}

impl Placement {
    pub fn relaxed(&self) -> bool {
        self.relaxations > 0 || self.forced > 0
    }
}

fn fits(candidate: Point, accepted: &[Point], start: Point, spacing: f64, clearance: f64) -> bool {
    if candidate.distance(start) < clearance {
        return false;
    }
    accepted.iter().all(|p| candidate.distance(*p) >= spacing)
}

pub fn place_origins<R: Rng>(
    rng: &mut R,
    count: usize,
    area: &PlayArea,
    params: &PlacementParams,
) -> Placement {
    let start = area.center();
    let xs = area.spawn_x();
    let ys = area.spawn_y();
    let budget = params.max_attempts.max(1);

    let mut spacing = params.spacing;
    let mut clearance = params.clearance;
    let mut relaxations = 0;
    let mut forced = 0;
    let mut origins: Vec<Point> = Vec::with_capacity(count);

    for index in 0..count {
        let mut attempts = 0;
        let origin = loop {
            let candidate = Point::new(
                rng.random_range(xs.clone()) as f64,
                rng.random_range(ys.clone()) as f64,
            );
            if fits(candidate, &origins, start, spacing, clearance) {
                break candidate;
            }
            attempts += 1;
            if attempts < budget {
                continue;
            }
            if relaxations >= params.max_relaxations {
                log::warn!(
                    "placement: flower {} forced at ({}, {}) after {} relaxations",
                    index, candidate.x, candidate.y, relaxations,
                );
                forced += 1;
                break candidate;
            }
            relaxations += 1;
            spacing *= params.relax_factor;
            clearance *= params.relax_factor;
            attempts = 0;
            log::warn!(
                "placement: flower {} exhausted {} attempts, relaxing to spacing {:.1} / clearance {:.1}",
                index, budget, spacing, clearance,
            );
        };
        origins.push(origin);
    }

    Placement { origins, relaxations, spacing, clearance, forced }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn check_constraints(p: &Placement, area: &PlayArea) {
        let start = area.center();
        for (i, a) in p.origins.iter().enumerate() {
            assert!(a.distance(start) >= MIN_PLAYER_CLEARANCE, "flower {i} too close to start");
            assert!(area.spawn_x().contains(&(a.x as i64)));
            assert!(area.spawn_y().contains(&(a.y as i64)));
            for b in &p.origins[i + 1..] {
                assert!(a.distance(*b) >= MIN_FLOWER_SPACING);
            }
        }
    }

    #[test]
    fn places_requested_count() {
        let mut rng = Pcg32::seed_from_u64(7);
        let area = PlayArea::default();
        let p = place_origins(&mut rng, 10, &area, &PlacementParams::default());
        assert_eq!(p.origins.len(), 10);
        assert!(!p.relaxed());
        check_constraints(&p, &area);
    }

    #[test]
    fn same_seed_same_layout() {
        let area = PlayArea::default();
        let params = PlacementParams::default();
        let a = place_origins(&mut Pcg32::seed_from_u64(42), 8, &area, &params);
        let b = place_origins(&mut Pcg32::seed_from_u64(42), 8, &area, &params);
        assert_eq!(a, b);
    }

    #[test]
    fn origins_are_whole_units() {
        let mut rng = Pcg32::seed_from_u64(3);
        let p = place_origins(&mut rng, 6, &PlayArea::default(), &PlacementParams::default());
        for o in &p.origins {
            assert_eq!(o.x, o.x.trunc());
            assert_eq!(o.y, o.y.trunc());
        }
    }

    #[test]
    fn overcrowded_area_terminates_with_relaxation() {
        // 170x200 spawn box with a 100-unit hole around the start: no room for 10.
        let area = PlayArea::new(250, 300);
        let params = PlacementParams { max_attempts: 50, ..PlacementParams::default() };
        let mut rng = Pcg32::seed_from_u64(1);
        let p = place_origins(&mut rng, 10, &area, &params);
        assert_eq!(p.origins.len(), 10);
        assert!(p.relaxed());
        assert!(p.spacing < MIN_FLOWER_SPACING);
        assert!(p.clearance < MIN_PLAYER_CLEARANCE);
        // Unless something was forced, the relaxed distances still hold.
        if p.forced == 0 {
            let start = area.center();
            for (i, a) in p.origins.iter().enumerate() {
                assert!(a.distance(start) >= p.clearance, "flower {i} inside relaxed clearance");
                for b in &p.origins[i + 1..] {
                    assert!(a.distance(*b) >= p.spacing, "flower {i} inside relaxed spacing");
                }
            }
        }
    }

    #[test]
    fn single_point_area_forces_every_flower_after_the_first() {
        let area = PlayArea::new(10, 10);
        let params = PlacementParams {
            max_attempts: 3,
            max_relaxations: 2,
            clearance: 0.0,
            ..PlacementParams::default()
        };
        let mut rng = Pcg32::seed_from_u64(9);
        let p = place_origins(&mut rng, 4, &area, &params);
        assert_eq!(p.origins.len(), 4);
        assert_eq!(p.relaxations, 2);
        assert_eq!(p.forced, 3);
        assert!(p.origins.iter().all(|o| *o == Point::new(30.0, 50.0)));
    }

    #[test]
    fn zero_attempt_budget_still_samples() {
        let params = PlacementParams { max_attempts: 0, ..PlacementParams::default() };
        let mut rng = Pcg32::seed_from_u64(5);
        let p = place_origins(&mut rng, 6, &PlayArea::default(), &params);
        assert_eq!(p.origins.len(), 6);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn default_area_honors_constraints(seed in any::<u64>(), count in 0usize..=10) {
            let area = PlayArea::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let p = place_origins(&mut rng, count, &area, &PlacementParams::default());
            prop_assert_eq!(p.origins.len(), count);
            prop_assert!(!p.relaxed());
            check_constraints(&p, &area);
        }
    }
}
