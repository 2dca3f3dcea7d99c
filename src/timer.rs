//! "Fires when due" interval timer.
//!
//! Every periodic activity in the main loop is gated by one of these rather
//! than by a blocking wait.  Time is injected as a millisecond uptime value,
//! so tests drive the timers with a fake clock.

/// A fixed-period timer that remembers when it last fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalTimer {
    period_ms: u64,
    last_fired_ms: u64,
}

impl IntervalTimer {
    /// Create a timer whose first deadline is one `period_ms` after `now_ms`.
    pub fn new(period_ms: u64, now_ms: u64) -> Self {
        Self {
            period_ms,
            last_fired_ms: now_ms,
        }
    }

    /// Returns `true` and re-arms from `now_ms` if at least one period has
    /// elapsed since the last fire.  Missed periods are not replayed.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        if self.is_due(now_ms) {
            self.last_fired_ms = now_ms;
            true
        } else {
            false
        }
    }

    /// Whether the timer would fire at `now_ms`, without re-arming it.
    pub fn is_due(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_fired_ms) >= self.period_ms
    }

    /// Re-arm from `now_ms` without firing.
    pub fn reset(&mut self, now_ms: u64) {
        self.last_fired_ms = now_ms;
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    pub fn last_fired_ms(&self) -> u64 {
        self.last_fired_ms
    }
}
