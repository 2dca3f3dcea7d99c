//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the whole device state: the schedule clock, the
//! presence evaluator, the display presenter and the committed
//! [`StatusSnapshot`].  All I/O flows through port traits injected at call
//! sites, making the service testable with mock adapters and a fake clock.
//!
//! ```text
//!  SensorPort  ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                  │          AppService          │
//!  AlertPort   ◀── │ Clock · Presence · Presenter │ ──▶ DisplayPort
//!                  └──────────────────────────────┘
//! ```
//!
//! The snapshot is committed only when the presence evaluator fires, so the
//! day and status on the display, the alert output and the status page are
//! always taken from the same sample.

use log::{debug, info};

use crate::config::SystemConfig;
use crate::scheduler::{DayIndex, ScheduleClock};

use super::alert;
use super::events::{AppEvent, StatusSnapshot};
use super::ports::{AlertPort, DisplayPort, EventSink, SensorPort};
use super::presence::{PillStatus, PresenceEvaluator, Sample};
use super::presenter::DisplayPresenter;

/// What one [`AppService::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    /// The schedule clock advanced to a new day.
    pub rotated: bool,
    /// The presence evaluator fired (and the display was redrawn).
    pub sampled: bool,
}

/// The application service orchestrates all domain logic.
pub struct AppService {
    clock: ScheduleClock,
    presence: PresenceEvaluator,
    presenter: DisplayPresenter,
    committed: StatusSnapshot,
    started: bool,
    iterations: u64,
}

impl AppService {
    /// Construct the service from configuration, with `now_ms` as the
    /// reference point for both timers.
    ///
    /// Does **not** sample or render; call [`start`](Self::start) next.
    pub fn new(config: &SystemConfig, now_ms: u64) -> Self {
        Self {
            clock: ScheduleClock::new(config.rotation_period_ms, now_ms),
            presence: PresenceEvaluator::new(
                config.sensor_polarity,
                config.poll_period_ms,
                now_ms,
            ),
            presenter: DisplayPresenter::new(),
            committed: StatusSnapshot {
                day: DayIndex::SUNDAY,
                status: PillStatus::Present,
                sampled_at_ms: now_ms,
            },
            started: false,
            iterations: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Take the boot sample, render it and drive the alert, so every output
    /// is consistent before the first poll period elapses.
    pub fn start(
        &mut self,
        now_ms: u64,
        hw: &mut (impl SensorPort + AlertPort),
        display: &mut impl DisplayPort,
        sink: &mut impl EventSink,
    ) {
        let day = self.clock.day();
        let sample = self.presence.force_sample(now_ms, day, hw);
        self.commit(now_ms, sample, display, sink);
        alert::drive(self.committed.status, hw);
        self.started = true;
        sink.emit(&AppEvent::Started(self.committed));
        info!(
            "AppService started: {} / {}",
            self.committed.day, self.committed.status
        );
    }

    // ── Per-iteration orchestration ───────────────────────────

    /// Run steps 1–4 of a loop iteration: clock → sample → render → alert.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`AlertPort`], which avoids a double mutable borrow while keeping
    /// the port boundary explicit.
    pub fn tick(
        &mut self,
        now_ms: u64,
        hw: &mut (impl SensorPort + AlertPort),
        display: &mut impl DisplayPort,
        sink: &mut impl EventSink,
    ) -> TickOutcome {
        self.iterations += 1;
        let mut outcome = TickOutcome::default();

        // 1. Schedule clock
        let before = self.clock.day();
        let day = self.clock.tick(now_ms);
        if day != before {
            outcome.rotated = true;
            sink.emit(&AppEvent::DayAdvanced { from: before, to: day });
        }

        // 2–3. Interval-gated sample, render only when it fired
        if let Some(sample) = self.presence.sample(now_ms, day, hw) {
            outcome.sampled = true;
            self.commit(now_ms, sample, display, sink);
        }

        // 4. Alert follows the latest committed status every iteration
        alert::drive(self.committed.status, hw);

        outcome
    }

    fn commit(
        &mut self,
        now_ms: u64,
        sample: Sample,
        display: &mut impl DisplayPort,
        sink: &mut impl EventSink,
    ) {
        let previous = self.committed;
        self.committed = StatusSnapshot {
            day: sample.day,
            status: sample.status,
            sampled_at_ms: now_ms,
        };
        if sample.changed {
            sink.emit(&AppEvent::StatusChanged {
                day: sample.day,
                from: previous.status,
                to: sample.status,
            });
        }
        debug!("Sample @{}ms: {} / {}", now_ms, sample.day, sample.status);

        self.presenter.render(sample.day, sample.status, display);
        sink.emit(&AppEvent::Rendered(self.committed));
    }

    // ── Queries ───────────────────────────────────────────────

    /// The day/status every output currently reflects.
    pub fn snapshot(&self) -> StatusSnapshot {
        self.committed
    }

    /// Current schedule slot (may be ahead of the snapshot until the next
    /// poll fires).
    pub fn day(&self) -> DayIndex {
        self.clock.day()
    }

    pub fn status(&self) -> PillStatus {
        self.committed.status
    }

    /// Day and status the display was last drawn with.
    pub fn last_rendered(&self) -> Option<(DayIndex, PillStatus)> {
        self.presenter.last_rendered()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.presenter.frames()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Loop iterations executed since startup.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }
}
