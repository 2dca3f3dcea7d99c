//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (sensors, alert output, display, event sinks) implement
//! these traits.  The [`AppService`](super::service::AppService) consumes
//! them via generics, so the domain core never touches hardware directly.
//!
//! None of the ports return errors: the device is best-effort by contract.
//! A failed GPIO or bus write is logged by the adapter and corrected on the
//! next loop iteration.

use crate::scheduler::DayIndex;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: raw levels of the compartment presence sensors.
pub trait SensorPort {
    /// Electrical level of the sensor bound to `day` (`true` = HIGH).
    ///
    /// Only the sensor for the current day is ever read.  Polarity is
    /// applied by the domain, not the adapter.
    fn read_level(&mut self, day: DayIndex) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Alert port (driven adapter: domain → buzzer)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the audible reminder.
pub trait AlertPort {
    /// Drive the alert output active or inactive.
    fn set_alert(&mut self, active: bool);

    /// Last level written to the alert output.
    fn is_alert_active(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → character LCD)
// ───────────────────────────────────────────────────────────────

/// Minimal capability set of a 2-row character display.
pub trait DisplayPort {
    /// Blank the whole screen and home the cursor.
    fn clear(&mut self);

    /// Move the cursor to `row` (0-based) and `col` (0-based).
    fn set_cursor(&mut self, row: u8, col: u8);

    /// Print `text` at the cursor.  Characters past the row end are dropped.
    fn print(&mut self, text: &str);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
