//! Alert driver: the buzzer is on for as long as today's pill is
//! outstanding.
//!
//! Stateless: a pure function of the latest status, applied every loop
//! iteration.  No debounce, no pulse pattern.

use super::ports::AlertPort;
use super::presence::PillStatus;

/// Set the alert output from `status`.
pub fn drive(status: PillStatus, out: &mut impl AlertPort) {
    out.set_alert(status.needs_reminder());
}
