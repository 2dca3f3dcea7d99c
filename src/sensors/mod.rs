//! Sensor subsystem: the seven compartment sensors and the [`SensorArray`]
//! that binds them to day slots.
//!
//! The binding is fixed at construction: slot `i` is always read from
//! `gpios[i]`, and only one slot is read per poll.

pub mod presence;

use log::debug;

use crate::scheduler::{DAYS_PER_WEEK, DayIndex};
use presence::PresenceSensor;

/// One presence sensor per day slot, index-aligned with [`DayIndex`].
pub struct SensorArray {
    sensors: [PresenceSensor; DAYS_PER_WEEK],
    reads: u64,
}

impl SensorArray {
    pub fn new(gpios: [i32; DAYS_PER_WEEK]) -> Self {
        Self {
            sensors: core::array::from_fn(|slot| PresenceSensor::new(slot, gpios[slot])),
            reads: 0,
        }
    }

    /// Read the single sensor bound to `day`.
    pub fn read(&mut self, day: DayIndex) -> bool {
        let sensor = &mut self.sensors[day.as_usize()];
        let level = sensor.read();
        self.reads += 1;
        debug!("Sensor {} (GPIO {}): {}", day, sensor.gpio(), if level { "HIGH" } else { "LOW" });
        level
    }

    /// GPIO bound to `day`.
    pub fn gpio(&self, day: DayIndex) -> i32 {
        self.sensors[day.as_usize()].gpio()
    }

    /// Total sensor reads since boot.
    pub fn reads(&self) -> u64 {
        self.reads
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;
    use crate::pins;

    #[test]
    fn binding_follows_pin_table() {
        let array = SensorArray::new(pins::SENSOR_GPIOS);
        for (slot, gpio) in pins::SENSOR_GPIOS.iter().enumerate() {
            assert_eq!(array.gpio(DayIndex::new(slot)), *gpio);
        }
    }

    #[test]
    fn reads_only_the_requested_slot() {
        // Slot 6 is reserved for this test; other tests leave it alone.
        let mut array = SensorArray::new(pins::SENSOR_GPIOS);
        presence::sim_set_level(6, true);
        assert!(array.read(DayIndex::new(6)));
        presence::sim_set_level(6, false);
        assert!(!array.read(DayIndex::new(6)));
        assert_eq!(array.reads(), 2);
    }
}
