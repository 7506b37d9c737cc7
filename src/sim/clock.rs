/// Clock injection.
///
/// The session never asks the OS for the time. The loop driver reads a
/// `Clock` once per frame and hands the reading to `step::update`, so tests
/// can drive the countdown and the flower sway with plain `Duration`s.

use std::time::{Duration, Instant};

pub trait Clock {
    /// Time elapsed since the clock's epoch.
    fn now(&self) -> Duration;
}

/// Wall clock anchored at construction (process start, in practice).
pub struct MonotonicClock {
    epoch: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        MonotonicClock { epoch: Instant::now() }
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}
