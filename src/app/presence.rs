//! Presence evaluation: turns the current day's sensor level into a
//! [`PillStatus`] on a fixed polling period.

use core::fmt;

use serde::Serialize;

use crate::config::SensorPolarity;
use crate::scheduler::DayIndex;
use crate::timer::IntervalTimer;

use super::ports::SensorPort;

/// Whether today's pill is still in its compartment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PillStatus {
    /// Pill still in the compartment, not yet taken.
    Present,
    /// Compartment empty: pill taken.
    Taken,
}

impl PillStatus {
    /// Status line shown on the display and the status page.
    pub fn message(self) -> &'static str {
        match self {
            Self::Present => "Take the pill!",
            Self::Taken => "You're fine!",
        }
    }

    /// Whether the reminder alert should sound.
    pub fn needs_reminder(self) -> bool {
        self == Self::Present
    }
}

impl fmt::Display for PillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Result of one [`PresenceEvaluator::sample`] call that fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub day: DayIndex,
    pub status: PillStatus,
    /// Whether the status differs from the previous sample.
    pub changed: bool,
}

/// Interval-gated reader of the single sensor bound to the current day.
#[derive(Debug, Clone)]
pub struct PresenceEvaluator {
    polarity: SensorPolarity,
    poll: IntervalTimer,
    status: PillStatus,
    samples: u64,
}

impl PresenceEvaluator {
    /// Until the first sample the status is `Present`: an unknown
    /// compartment is treated as an outstanding pill.
    pub fn new(polarity: SensorPolarity, poll_period_ms: u64, now_ms: u64) -> Self {
        Self {
            polarity,
            poll: IntervalTimer::new(poll_period_ms, now_ms),
            status: PillStatus::Present,
            samples: 0,
        }
    }

    /// Sample `day`'s sensor if the poll period has elapsed.
    ///
    /// Returns `None` off-interval; the previous status is retained and no
    /// sensor is read.
    pub fn sample(
        &mut self,
        now_ms: u64,
        day: DayIndex,
        sensors: &mut impl SensorPort,
    ) -> Option<Sample> {
        if !self.poll.poll(now_ms) {
            return None;
        }
        Some(self.read(day, sensors))
    }

    /// Sample immediately and re-arm the poll timer from `now_ms`.
    pub fn force_sample(
        &mut self,
        now_ms: u64,
        day: DayIndex,
        sensors: &mut impl SensorPort,
    ) -> Sample {
        self.poll.reset(now_ms);
        self.read(day, sensors)
    }

    fn read(&mut self, day: DayIndex, sensors: &mut impl SensorPort) -> Sample {
        let level_high = sensors.read_level(day);
        let status = if self.polarity.is_active(level_high) {
            PillStatus::Taken
        } else {
            PillStatus::Present
        };
        let changed = status != self.status;
        self.status = status;
        self.samples += 1;
        Sample { day, status, changed }
    }

    /// Most recently computed status.
    pub fn status(&self) -> PillStatus {
        self.status
    }

    /// Samples taken since boot.
    pub fn samples(&self) -> u64 {
        self.samples
    }
}
