use std::time::Duration;

/// Tick interval a game starts with.
pub const START_INTERVAL: Duration = Duration::from_millis(300);
/// Fastest tick interval acceleration can reach.
pub const END_INTERVAL: Duration = Duration::from_millis(150);
/// Play time between two accelerations.
pub const ACCELERATION_WINDOW: Duration = Duration::from_millis(300_000);

// interval * 95 / 100, floored
const DECAY_NUMERATOR: u64 = 95;
const DECAY_DENOMINATOR: u64 = 100;

/// Derives the logic tick interval from elapsed play time.
///
/// While acceleration is enabled, every full [`ACCELERATION_WINDOW`] of play
/// time shrinks the interval to `max(END_INTERVAL, floor(interval * 0.95))`.
/// Disabling acceleration puts the interval back to [`START_INTERVAL`].
/// The interval is therefore a non-increasing step function of play time,
/// bounded below by [`END_INTERVAL`].
///
/// The controller does not read a clock. The caller reports elapsed play
/// time with [`advance`](Self::advance), so pauses are simply not reported.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use tetrion_engine::engine::FallSpeed;
///
/// let mut speed = FallSpeed::new(true);
/// assert_eq!(speed.interval(), Duration::from_millis(300));
///
/// speed.advance(Duration::from_secs(300));
/// assert_eq!(speed.interval(), Duration::from_millis(285));
///
/// speed.set_accelerate(false);
/// assert_eq!(speed.interval(), Duration::from_millis(300));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallSpeed {
    accelerate: bool,
    interval_ms: u64,
    window_elapsed: Duration,
}

impl FallSpeed {
    #[must_use]
    pub fn new(accelerate: bool) -> Self {
        Self {
            accelerate,
            interval_ms: duration_millis(START_INTERVAL),
            window_elapsed: Duration::ZERO,
        }
    }

    /// Returns the current logic tick interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    #[must_use]
    pub fn is_accelerating(&self) -> bool {
        self.accelerate
    }

    /// Enables or disables acceleration. Disabling resets the interval.
    pub fn set_accelerate(&mut self, accelerate: bool) {
        self.accelerate = accelerate;
        if !accelerate {
            self.reset();
        }
    }

    /// Puts the interval back to the start value, keeping the acceleration flag.
    pub fn reset(&mut self) {
        self.interval_ms = duration_millis(START_INTERVAL);
        self.window_elapsed = Duration::ZERO;
    }

    /// Accounts for `elapsed` play time, applying one decay step per
    /// completed window.
    pub fn advance(&mut self, elapsed: Duration) {
        if !self.accelerate {
            return;
        }
        self.window_elapsed += elapsed;
        while self.window_elapsed >= ACCELERATION_WINDOW {
            self.window_elapsed -= ACCELERATION_WINDOW;
            self.interval_ms = decayed(self.interval_ms);
        }
    }
}

fn decayed(interval_ms: u64) -> u64 {
    u64::max(
        duration_millis(END_INTERVAL),
        interval_ms * DECAY_NUMERATOR / DECAY_DENOMINATOR,
    )
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_acceleration_keeps_start_interval() {
        let mut speed = FallSpeed::new(false);
        speed.advance(ACCELERATION_WINDOW * 10);
        assert_eq!(speed.interval(), START_INTERVAL);
    }

    #[test]
    fn test_decay_sequence() {
        let mut speed = FallSpeed::new(true);
        let mut intervals = vec![];
        for _ in 0..4 {
            speed.advance(ACCELERATION_WINDOW);
            intervals.push(speed.interval().as_millis());
        }
        // 300 -> 285 -> 270 (270.75) -> 256 (256.5) -> 243 (243.2)
        assert_eq!(intervals, vec![285, 270, 256, 243]);
    }

    #[test]
    fn test_partial_windows_accumulate() {
        let mut speed = FallSpeed::new(true);
        speed.advance(ACCELERATION_WINDOW - Duration::from_millis(1));
        assert_eq!(speed.interval(), START_INTERVAL);
        speed.advance(Duration::from_millis(1));
        assert_eq!(speed.interval(), Duration::from_millis(285));
    }

    #[test]
    fn test_intervals_are_monotonic_and_floored() {
        let mut speed = FallSpeed::new(true);
        let mut previous = speed.interval();
        for _ in 0..200 {
            speed.advance(Duration::from_secs(17));
            let current = speed.interval();
            assert!(current <= previous);
            assert!(current >= END_INTERVAL);
            previous = current;
        }
        speed.advance(ACCELERATION_WINDOW * 100);
        assert_eq!(speed.interval(), END_INTERVAL);
    }

    #[test]
    fn test_disabling_resets_interval() {
        let mut speed = FallSpeed::new(true);
        speed.advance(ACCELERATION_WINDOW * 3);
        assert!(speed.interval() < START_INTERVAL);

        speed.set_accelerate(false);
        assert_eq!(speed.interval(), START_INTERVAL);
        assert!(!speed.is_accelerating());

        // Time spent while disabled does not count toward the next window
        speed.advance(ACCELERATION_WINDOW - Duration::from_millis(1));
        speed.set_accelerate(true);
        speed.advance(Duration::from_millis(1));
        assert_eq!(speed.interval(), START_INTERVAL);
    }
}
