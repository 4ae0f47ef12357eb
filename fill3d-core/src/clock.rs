/// Fixed-period scheduling for the update and draw passes
use std::time::{Duration, Instant};

/// A periodic timer polled from a single loop.
///
/// Two of these (one for logic ticks, one for frames) let update and draw
/// run at independent rates without threads.
#[derive(Debug, Clone)]
pub struct Interval {
    period: Duration,
    next: Instant,
    max_catch_up: u32,
}

impl Interval {
    /// A zero period is bumped to one millisecond.
    pub fn new(period: Duration, start: Instant) -> Self {
        let period = period.max(Duration::from_millis(1));
        Self {
            period,
            next: start + period,
            max_catch_up: 5,
        }
    }

    pub fn from_hz(hz: f32, start: Instant) -> Self {
        Self::new(Duration::from_secs_f32(1.0 / hz.max(1.0)), start)
    }

    /// Limit how many missed periods one `poll` reports after a stall
    pub fn with_max_catch_up(mut self, max: u32) -> Self {
        self.max_catch_up = max.max(1);
        self
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Number of periods that elapsed up to `now` (0 when not yet due).
    ///
    /// Periods beyond the catch-up limit are skipped rather than queued.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let mut due = 0;
        while now >= self.next && due < self.max_catch_up {
            self.next += self.period;
            due += 1;
        }
        if now >= self.next {
            // Stalled for too long; resync instead of spiralling
            self.next = now + self.period;
        }
        due
    }

    /// Time left until the next period is due
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }
}
