//! Monotonic frame clock.

use std::time::{Duration, Instant};

/// Reports the time elapsed between successive [`Clock::delta`] calls.
/// The first call measures from construction.
#[derive(Clone, Copy, Debug)]
pub struct Clock {
    start: Instant,
    last: Instant,
}

impl Clock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
        }
    }

    /// Seconds since the previous call.
    pub fn delta(&mut self) -> f32 {
        self.delta_at(Instant::now())
    }

    /// Same as [`Clock::delta`] with an explicit "now". A `now` earlier
    /// than the previous sample yields zero.
    pub fn delta_at(&mut self, now: Instant) -> f32 {
        let dt = now.saturating_duration_since(self.last);
        self.last = self.last.max(now);
        dt.as_secs_f32()
    }

    pub fn elapsed(&self) -> Duration {
        self.last.saturating_duration_since(self.start)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_measures_between_samples() {
        let mut clock = Clock::new();
        let t0 = clock.last;
        let dt = clock.delta_at(t0 + Duration::from_millis(250));
        assert!((dt - 0.25).abs() < 1e-6);
        let dt = clock.delta_at(t0 + Duration::from_millis(300));
        assert!((dt - 0.05).abs() < 1e-6);
        assert_eq!(clock.elapsed(), Duration::from_millis(300));
    }

    #[test]
    fn stale_sample_is_zero() {
        let mut clock = Clock::new();
        let t0 = clock.last;
        clock.delta_at(t0 + Duration::from_secs(1));
        assert_eq!(clock.delta_at(t0), 0.0);
    }
}
