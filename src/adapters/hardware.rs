//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorArray`] and the [`Buzzer`], exposing them through
//! [`SensorPort`] and [`AlertPort`].  The LCD is a separate adapter
//! because it lives on the I²C bus rather than raw GPIO.  On non-espidf
//! targets, the underlying drivers use cfg-gated simulation stubs.

use crate::app::ports::{AlertPort, SensorPort};
use crate::drivers::buzzer::Buzzer;
use crate::pins;
use crate::scheduler::DayIndex;
use crate::sensors::SensorArray;

/// Concrete adapter that combines the GPIO hardware behind port traits.
pub struct HardwareAdapter {
    sensors: SensorArray,
    buzzer: Buzzer,
}

impl HardwareAdapter {
    pub fn new(sensors: SensorArray, buzzer: Buzzer) -> Self {
        Self { sensors, buzzer }
    }

    /// Adapter wired to the board pin table.
    pub fn from_pins() -> Self {
        Self::new(
            SensorArray::new(pins::SENSOR_GPIOS),
            Buzzer::new(pins::BUZZER_GPIO),
        )
    }

    pub fn sensors(&self) -> &SensorArray {
        &self.sensors
    }

    pub fn buzzer(&self) -> &Buzzer {
        &self.buzzer
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for HardwareAdapter {
    fn read_level(&mut self, day: DayIndex) -> bool {
        self.sensors.read(day)
    }
}

// ── AlertPort implementation ──────────────────────────────────

impl AlertPort for HardwareAdapter {
    fn set_alert(&mut self, active: bool) {
        self.buzzer.set(active);
    }

    fn is_alert_active(&self) -> bool {
        self.buzzer.is_active()
    }
}
