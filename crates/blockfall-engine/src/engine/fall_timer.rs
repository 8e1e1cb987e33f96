use std::time::{Duration, Instant};

/// Schedules the automatic fall of the active piece.
///
/// The timer holds the instant of the last fall and a fixed interval. The
/// current time is always passed in by the caller, never read from a clock,
/// so tests can drive the timer with synthetic instants.
///
/// A late check yields a single due fall; missed intervals are not replayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallTimer {
    interval: Duration,
    last_fall: Instant,
}

impl FallTimer {
    #[must_use]
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            last_fall: now,
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[must_use]
    pub fn last_fall(&self) -> Instant {
        self.last_fall
    }

    /// Returns `true` once at least one interval has elapsed since the last fall.
    #[must_use]
    pub fn is_due(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_fall) >= self.interval
    }

    /// Records that the piece has advanced (or the schedule restarts) at `now`.
    ///
    /// Every timer reset goes through here.
    pub fn mark_advanced(&mut self, now: Instant) {
        self.last_fall = now;
    }

    /// Time left until the next fall is due.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Duration {
        self.interval
            .saturating_sub(now.saturating_duration_since(self.last_fall))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(500);

    #[test]
    fn test_due_after_interval() {
        let start = Instant::now();
        let timer = FallTimer::new(INTERVAL, start);
        assert!(!timer.is_due(start));
        assert!(!timer.is_due(start + Duration::from_millis(499)));
        assert!(timer.is_due(start + INTERVAL));
        assert!(timer.is_due(start + Duration::from_secs(10)));
    }

    #[test]
    fn test_mark_advanced_restarts_schedule() {
        let start = Instant::now();
        let mut timer = FallTimer::new(INTERVAL, start);
        let later = start + Duration::from_millis(400);
        timer.mark_advanced(later);
        assert!(!timer.is_due(start + INTERVAL));
        assert!(timer.is_due(later + INTERVAL));
        assert_eq!(timer.last_fall(), later);
    }

    #[test]
    fn test_missed_intervals_do_not_accumulate() {
        let start = Instant::now();
        let mut timer = FallTimer::new(INTERVAL, start);
        let late = start + INTERVAL * 5;
        assert!(timer.is_due(late));
        timer.mark_advanced(late);
        assert!(!timer.is_due(late));
    }

    #[test]
    fn test_earlier_instant_is_not_due() {
        let start = Instant::now() + Duration::from_secs(1);
        let timer = FallTimer::new(INTERVAL, start);
        assert!(!timer.is_due(start - Duration::from_millis(100)));
        assert_eq!(timer.remaining(start - Duration::from_millis(100)), INTERVAL);
        assert_eq!(timer.remaining(start + Duration::from_millis(200)), Duration::from_millis(300));
    }
}
