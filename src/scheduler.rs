//! Seven-day schedule clock.
//!
//! The "day" is not a calendar date: it is a rotating slot index that
//! advances once per rotation period of device uptime.  After a reset the
//! clock starts again at [`DayIndex::SUNDAY`] regardless of how many real
//! days have passed.
//!
//! ```text
//!   uptime ──▶ IntervalTimer(rotation) ──fires──▶ DayIndex = (DayIndex + 1) % 7
//! ```

use core::fmt;

use log::info;

use crate::timer::IntervalTimer;

/// Number of compartments / day slots.
pub const DAYS_PER_WEEK: usize = 7;

const DAY_NAMES: [&str; DAYS_PER_WEEK] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

// ═══════════════════════════════════════════════════════════════
//  Day index
// ═══════════════════════════════════════════════════════════════

/// Cyclic day slot in `0..7`.  0 = Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize)]
pub struct DayIndex(u8);

impl DayIndex {
    pub const SUNDAY: Self = Self(0);

    /// Wrap any integer onto the 7-slot cycle.
    pub fn new(raw: usize) -> Self {
        Self((raw % DAYS_PER_WEEK) as u8)
    }

    /// The following slot, wrapping Saturday → Sunday.
    pub fn next(self) -> Self {
        Self::new(self.0 as usize + 1)
    }

    pub fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// English day name shown on the display and status page.
    pub fn name(self) -> &'static str {
        DAY_NAMES[self.as_usize()]
    }
}

impl fmt::Display for DayIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ═══════════════════════════════════════════════════════════════
//  Schedule clock
// ═══════════════════════════════════════════════════════════════

/// Free-running counter that advances the day slot at a fixed period.
#[derive(Debug, Clone)]
pub struct ScheduleClock {
    day: DayIndex,
    rotation: IntervalTimer,
    rotations: u64,
}

impl ScheduleClock {
    /// Start at Sunday with the first rotation one period after `now_ms`.
    pub fn new(rotation_period_ms: u64, now_ms: u64) -> Self {
        Self {
            day: DayIndex::SUNDAY,
            rotation: IntervalTimer::new(rotation_period_ms, now_ms),
            rotations: 0,
        }
    }

    /// Advance the day if the rotation period has elapsed; otherwise no-op.
    /// Returns the (possibly new) current day.
    pub fn tick(&mut self, now_ms: u64) -> DayIndex {
        if self.rotation.poll(now_ms) {
            let from = self.day;
            self.day = self.day.next();
            self.rotations += 1;
            info!("Schedule: {} -> {} at {}ms", from, self.day, now_ms);
        }
        self.day
    }

    pub fn day(&self) -> DayIndex {
        self.day
    }

    /// Rotations since boot.
    pub fn rotations(&self) -> u64 {
        self.rotations
    }
}
