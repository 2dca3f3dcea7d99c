//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the ESP-IDF
//! logger (UART / USB-CDC in production).  Every committed snapshot is also
//! printed as a one-line JSON record prefixed `STATUS ` so the serial
//! console can be scraped by a host script.

use log::{debug, info, warn};

use crate::app::events::{AppEvent, StatusSnapshot};
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink {
    last_json: Option<StatusSnapshot>,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit the JSON record only when day or status actually changed, so a
    /// 50 ms poll does not flood the console.
    fn status_line(&mut self, snapshot: &StatusSnapshot) {
        let unchanged = self
            .last_json
            .is_some_and(|prev| prev.day == snapshot.day && prev.status == snapshot.status);
        if unchanged {
            return;
        }
        match serde_json::to_string(snapshot) {
            Ok(json) => info!("STATUS {}", json),
            Err(e) => warn!("STATUS | encode failed: {}", e),
        }
        self.last_json = Some(*snapshot);
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(snapshot) => {
                info!("START | day={} status={:?}", snapshot.day, snapshot.status);
                self.status_line(snapshot);
            }
            AppEvent::DayAdvanced { from, to } => {
                info!("DAY   | {} -> {}", from, to);
            }
            AppEvent::StatusChanged { day, from, to } => {
                info!("PILL  | {}: {:?} -> {:?}", day, from, to);
            }
            AppEvent::Rendered(snapshot) => {
                debug!("LCD   | {} / {}", snapshot.day, snapshot.status);
                self.status_line(snapshot);
            }
            AppEvent::RequestServed { bytes } => {
                debug!("HTTP  | served {} bytes", bytes);
            }
            AppEvent::RequestFailed(reason) => {
                warn!("HTTP  | dropped ({})", reason);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::presence::PillStatus;
    use crate::scheduler::DayIndex;

    #[test]
    fn snapshot_json_shape() {
        let snap = StatusSnapshot {
            day: DayIndex::new(3),
            status: PillStatus::Present,
            sampled_at_ms: 42,
        };
        let json = serde_json::to_string(&snap).unwrap();
        assert_eq!(json, r#"{"day":3,"status":"Present","sampled_at_ms":42}"#);
    }

    #[test]
    fn status_line_deduplicates() {
        let mut sink = LogEventSink::new();
        let snap = StatusSnapshot {
            day: DayIndex::SUNDAY,
            status: PillStatus::Taken,
            sampled_at_ms: 0,
        };
        sink.emit(&AppEvent::Rendered(snap));
        sink.emit(&AppEvent::Rendered(StatusSnapshot { sampled_at_ms: 50, ..snap }));
        assert_eq!(sink.last_json.map(|s| s.sampled_at_ms), Some(0));
    }
}
