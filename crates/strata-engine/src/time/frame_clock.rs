use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous tick, clamped.
    pub dt: Duration,

    /// Timestamp passed to the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// The caller supplies `now` on every tick so that the renderer stays
/// deterministic under test. Delta time is clamped to avoid pathological
/// values after stalls (debugger pauses, minimized hosts).
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a new clock with default clamps (100µs .. 250ms).
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: None,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Forgets the previous tick; the next `dt` will be `dt_min`.
    pub fn reset(&mut self) {
        self.last = None;
    }

    #[inline]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Advances the clock to `now` and returns the new `FrameTime`.
    pub fn tick(&mut self, now: Instant) -> FrameTime {
        let raw = match self.last {
            Some(last) => now.saturating_duration_since(last),
            None => Duration::ZERO,
        };
        let dt = raw.clamp(self.dt_min, self.dt_max);

        self.last = Some(now);

        let ft = FrameTime {
            dt,
            now,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_uses_minimum_dt() {
        let mut clock = FrameClock::new();
        let ft = clock.tick(Instant::now());
        assert_eq!(ft.dt, Duration::from_micros(100));
        assert_eq!(ft.frame_index, 0);
    }

    #[test]
    fn dt_is_clamped_after_stall() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        clock.tick(t0);
        let ft = clock.tick(t0 + Duration::from_secs(5));
        assert_eq!(ft.dt, Duration::from_millis(250));
        assert_eq!(ft.frame_index, 1);
    }

    #[test]
    fn regular_dt_passes_through() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        clock.tick(t0);
        let ft = clock.tick(t0 + Duration::from_millis(16));
        assert_eq!(ft.dt, Duration::from_millis(16));
    }
}
