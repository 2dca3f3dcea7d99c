//! Active buzzer driver.
//!
//! A self-oscillating buzzer behind an NPN transistor on a single digital
//! output: HIGH sounds it, LOW silences it.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the GPIO via hw_init helpers.
//! On host/test: tracks state in-memory only.

use log::info;

use crate::drivers::hw_init;

pub struct Buzzer {
    gpio: i32,
    active: bool,
    toggles: u32,
}

impl Buzzer {
    pub fn new(gpio: i32) -> Self {
        Self {
            gpio,
            active: false,
            toggles: 0,
        }
    }

    /// Drive the output.  The pin is rewritten every call so a glitched
    /// level is corrected on the next loop iteration; only edges are logged.
    pub fn set(&mut self, active: bool) {
        hw_init::gpio_write(self.gpio, active);
        if active != self.active {
            self.toggles = self.toggles.wrapping_add(1);
            info!("Buzzer: {}", if active { "ON" } else { "OFF" });
        }
        self.active = active;
    }

    pub fn off(&mut self) {
        self.set(false);
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Number of on/off edges since boot.
    pub fn toggles(&self) -> u32 {
        self.toggles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pins;

    #[test]
    fn starts_silent() {
        let buzzer = Buzzer::new(pins::BUZZER_GPIO);
        assert!(!buzzer.is_active());
        assert_eq!(buzzer.toggles(), 0);
    }

    #[test]
    fn repeated_level_counts_one_edge() {
        let mut buzzer = Buzzer::new(pins::BUZZER_GPIO);
        for _ in 0..5 {
            buzzer.set(true);
        }
        assert!(buzzer.is_active());
        assert_eq!(buzzer.toggles(), 1);
        buzzer.off();
        assert!(!buzzer.is_active());
        assert_eq!(buzzer.toggles(), 2);
    }
}
