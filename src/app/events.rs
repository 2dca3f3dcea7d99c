//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) and the status server
//! emit these through the [`EventSink`](super::ports::EventSink) port.
//! Adapters on the other side decide what to do with them.

use serde::Serialize;

use super::presence::PillStatus;
use crate::scheduler::DayIndex;

/// The day/status pair every component observes within one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    pub day: DayIndex,
    pub status: PillStatus,
    /// Uptime (ms) of the sample this snapshot was derived from.
    pub sampled_at_ms: u64,
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The service has started (carries the boot sample).
    Started(StatusSnapshot),

    /// The schedule clock moved to the next day slot.
    DayAdvanced { from: DayIndex, to: DayIndex },

    /// A poll produced a different status than the previous one.
    StatusChanged {
        day: DayIndex,
        from: PillStatus,
        to: PillStatus,
    },

    /// The display was redrawn.
    Rendered(StatusSnapshot),

    /// A status page was written to a client.
    RequestServed { bytes: usize },

    /// A client connection was dropped before a response was sent.
    RequestFailed(&'static str),
}
