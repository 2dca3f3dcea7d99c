//! Cooperative main loop.
//!
//! [`Device`] bundles the application service with every adapter it talks
//! to and runs one loop iteration per [`iterate`](Device::iterate) call:
//!
//! ```text
//!   1. ScheduleClock::tick          (rotation timer)
//!   2. PresenceEvaluator::sample    (poll timer)
//!   3. DisplayPresenter::render     (only if 2 fired)
//!   4. alert::drive                 (every iteration)
//!   5. StatusServer::poll_once      (at most one client)
//! ```
//!
//! Step 6, the stabilisation delay, belongs to the caller so that tests can
//! drive iterations back-to-back with a fake clock.

use core::time::Duration;

use crate::app::events::StatusSnapshot;
use crate::app::ports::{AlertPort, DisplayPort, EventSink, SensorPort};
use crate::app::service::{AppService, TickOutcome};
use crate::config::SystemConfig;
use crate::server::{PollOutcome, StatusServer};

/// What one iteration did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterationReport {
    pub tick: TickOutcome,
    pub server: PollOutcome,
    /// The snapshot the server would have served this iteration.
    pub snapshot: StatusSnapshot,
}

pub struct Device<H, D, S> {
    app: AppService,
    hw: H,
    display: D,
    server: StatusServer,
    sink: S,
    loop_delay: Duration,
}

impl<H, D, S> Device<H, D, S>
where
    H: SensorPort + AlertPort,
    D: DisplayPort,
    S: EventSink,
{
    pub fn new(
        config: &SystemConfig,
        now_ms: u64,
        hw: H,
        display: D,
        server: StatusServer,
        sink: S,
    ) -> Self {
        Self {
            app: AppService::new(config, now_ms),
            hw,
            display,
            server,
            sink,
            loop_delay: Duration::from_millis(u64::from(config.loop_delay_ms)),
        }
    }

    /// Boot sample + first render.
    pub fn start(&mut self, now_ms: u64) {
        self.app
            .start(now_ms, &mut self.hw, &mut self.display, &mut self.sink);
    }

    /// Run steps 1–5 once.  Never blocks except inside a bounded request read.
    pub fn iterate(&mut self, now_ms: u64) -> IterationReport {
        let tick = self
            .app
            .tick(now_ms, &mut self.hw, &mut self.display, &mut self.sink);
        let snapshot = self.app.snapshot();
        let server = self.server.poll_once(&snapshot, &mut self.sink);
        IterationReport {
            tick,
            server,
            snapshot,
        }
    }

    /// Delay the caller should sleep between iterations.
    pub fn loop_delay(&self) -> Duration {
        self.loop_delay
    }

    pub fn app(&self) -> &AppService {
        &self.app
    }

    pub fn hw(&self) -> &H {
        &self.hw
    }

    pub fn hw_mut(&mut self) -> &mut H {
        &mut self.hw
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn server(&self) -> &StatusServer {
        &self.server
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
