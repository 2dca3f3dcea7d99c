//! Compartment presence sensor (IR reflective or reed switch module).
//!
//! Each compartment has one digital sensor wired to a pull-up input.  The
//! driver only reports the raw level; whether HIGH means "pill taken" is
//! decided by the configured [`SensorPolarity`](crate::config::SensorPolarity).
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads real GPIO levels via hw_init helpers.
//! On host/test: reads a per-slot simulated level (default LOW).

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

#[cfg(not(target_os = "espidf"))]
static SIM_LEVELS: [AtomicBool; 7] = [const { AtomicBool::new(false) }; 7];

/// Simulation: set the level the sensor in `slot` will report.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_level(slot: usize, high: bool) {
    if let Some(level) = SIM_LEVELS.get(slot) {
        level.store(high, Ordering::Relaxed);
    }
}

pub struct PresenceSensor {
    #[cfg_attr(target_os = "espidf", allow(dead_code))]
    slot: usize,
    gpio: i32,
    last_level: bool,
}

impl PresenceSensor {
    pub fn new(slot: usize, gpio: i32) -> Self {
        Self {
            slot,
            gpio,
            last_level: false,
        }
    }

    /// Sample the input level (`true` = HIGH).
    pub fn read(&mut self) -> bool {
        self.last_level = self.read_gpio();
        self.last_level
    }

    #[cfg(target_os = "espidf")]
    fn read_gpio(&self) -> bool {
        hw_init::gpio_read(self.gpio)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_gpio(&self) -> bool {
        SIM_LEVELS
            .get(self.slot)
            .is_some_and(|level| level.load(Ordering::Relaxed))
    }

    pub fn gpio(&self) -> i32 {
        self.gpio
    }

    /// Level seen by the most recent [`read`](Self::read).
    pub fn last_level(&self) -> bool {
        self.last_level
    }
}
