//! AppService → ports pipeline, driven by a fake millisecond clock.

use pillbox::app::events::AppEvent;
use pillbox::app::presence::PillStatus;
use pillbox::app::service::AppService;
use pillbox::config::{SensorPolarity, SystemConfig};
use pillbox::scheduler::DayIndex;

use crate::mock_hw::{MockDisplay, MockHardware, RecordingSink};

const ROTATION_MS: u64 = 5000;
const POLL_MS: u64 = 50;
const STEP_MS: u64 = 10;

fn test_config() -> SystemConfig {
    SystemConfig {
        rotation_period_ms: ROTATION_MS,
        poll_period_ms: POLL_MS,
        ..SystemConfig::default()
    }
}

struct Rig {
    app: AppService,
    hw: MockHardware,
    lcd: MockDisplay,
    sink: RecordingSink,
    now: u64,
}

impl Rig {
    fn with_config(config: &SystemConfig) -> Self {
        let mut rig = Self {
            app: AppService::new(config, 0),
            hw: MockHardware::new(),
            lcd: MockDisplay::new(),
            sink: RecordingSink::new(),
            now: 0,
        };
        rig.app.start(0, &mut rig.hw, &mut rig.lcd, &mut rig.sink);
        rig
    }

    fn new() -> Self {
        Self::with_config(&test_config())
    }

    /// Advance the fake clock in loop-sized steps up to `until_ms`.
    fn run_until(&mut self, until_ms: u64) {
        while self.now < until_ms {
            self.now = (self.now + STEP_MS).min(until_ms);
            self.app
                .tick(self.now, &mut self.hw, &mut self.lcd, &mut self.sink);
        }
    }
}

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn boot_shows_sunday_and_reminds() {
    let rig = Rig::new();
    assert_eq!(rig.app.day(), DayIndex::SUNDAY);
    assert_eq!(rig.lcd.row(0), "Day: Sunday");
    assert_eq!(rig.lcd.row(1), "Take the pill!");
    assert!(rig.hw.alert_writes.last().copied().unwrap_or(false));
    assert!(matches!(rig.sink.events.last(), Some(AppEvent::Started(_))));
}

// ── Rotation → sample → render → alert ───────────────────────

#[test]
fn rotation_then_taken_silences_alert() {
    let mut rig = Rig::new();

    rig.run_until(5001);
    assert_eq!(rig.app.day(), DayIndex::new(1));

    rig.hw.set_level(1, true);
    rig.run_until(5010 + POLL_MS);

    assert_eq!(rig.app.status(), PillStatus::Taken);
    assert_eq!(rig.lcd.row(0), "Day: Monday");
    assert_eq!(rig.lcd.row(1), "You're fine!");
    assert_eq!(rig.hw.alert_writes.last(), Some(&false));
}

#[test]
fn rotation_wraps_modulo_seven() {
    let mut rig = Rig::new();
    for n in 1..=15u64 {
        rig.run_until(n * (ROTATION_MS + STEP_MS));
        assert_eq!(rig.app.day(), DayIndex::new((n % 7) as usize), "after {n} rotations");
    }
}

#[test]
fn only_the_current_day_is_read() {
    let mut rig = Rig::new();
    rig.run_until(ROTATION_MS - STEP_MS);
    assert!(!rig.hw.reads.is_empty());
    assert!(rig.hw.reads.iter().all(|d| *d == DayIndex::SUNDAY));

    rig.hw.reads.clear();
    rig.run_until(2 * ROTATION_MS - STEP_MS);
    assert!(rig.hw.reads.iter().all(|d| *d == DayIndex::new(1)));
}

// ── Polling cadence ───────────────────────────────────────────

#[test]
fn sensor_is_read_only_when_poll_is_due() {
    let mut rig = Rig::new();
    rig.hw.reads.clear();
    rig.run_until(POLL_MS - STEP_MS);
    assert!(rig.hw.reads.is_empty(), "no read before the first period elapses");
    rig.run_until(POLL_MS);
    assert_eq!(rig.hw.reads.len(), 1);
}

#[test]
fn ten_quiet_polls_leave_state_unchanged() {
    let mut rig = Rig::new();
    let before = (rig.app.status(), rig.lcd.row(0).to_owned(), rig.lcd.row(1).to_owned());
    let frames_before = rig.app.frames_rendered();

    rig.run_until(10 * POLL_MS);

    assert_eq!(rig.app.frames_rendered(), frames_before + 10);
    assert_eq!(
        (rig.app.status(), rig.lcd.row(0).to_owned(), rig.lcd.row(1).to_owned()),
        before
    );
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::StatusChanged { .. })), 0);
}

#[test]
fn status_held_between_polls() {
    let mut rig = Rig::new();
    rig.run_until(POLL_MS);
    rig.hw.set_level(0, true);
    rig.run_until(2 * POLL_MS - STEP_MS);
    assert_eq!(rig.app.status(), PillStatus::Present, "no sample off-interval");
    rig.run_until(2 * POLL_MS);
    assert_eq!(rig.app.status(), PillStatus::Taken);
}

// ── Alert ─────────────────────────────────────────────────────

#[test]
fn alert_tracks_status_every_iteration() {
    let mut rig = Rig::new();
    rig.hw.set_level(0, true);
    rig.run_until(3 * POLL_MS);
    rig.hw.set_level(0, false);
    rig.run_until(6 * POLL_MS);

    // One alert write per iteration plus the boot write.
    assert_eq!(rig.hw.alert_writes.len() as u64, rig.app.iterations() + 1);
    assert_eq!(rig.app.status(), PillStatus::Present);
    assert_eq!(rig.hw.alert_writes.last(), Some(&true));
    assert!(rig.hw.alert_writes.contains(&false));
}

// ── Polarity ──────────────────────────────────────────────────

#[test]
fn active_low_polarity_inverts_mapping() {
    let config = SystemConfig {
        sensor_polarity: SensorPolarity::ActiveLow,
        ..test_config()
    };
    let mut rig = Rig::with_config(&config);
    // LOW is "active" now, so the idle mock level means taken.
    assert_eq!(rig.app.status(), PillStatus::Taken);

    rig.hw.set_level(0, true);
    rig.run_until(POLL_MS);
    assert_eq!(rig.app.status(), PillStatus::Present);
    assert_eq!(rig.lcd.row(1), "Take the pill!");
}

// ── Consistency ───────────────────────────────────────────────

#[test]
fn snapshot_matches_last_render() {
    let mut rig = Rig::new();
    for (t, level) in [(400, true), (900, false), (5300, true), (5600, false)] {
        rig.hw.levels = [level; 7];
        rig.run_until(t);
        let snap = rig.app.snapshot();
        assert_eq!(rig.app.last_rendered(), Some((snap.day, snap.status)));
        assert_eq!(rig.lcd.row(0), format!("Day: {}", snap.day.name()));
        assert_eq!(rig.lcd.row(1), snap.status.message());
    }
}
