//! Mock adapters for integration tests.
//!
//! Sensor levels are set directly by the test, every alert write is
//! recorded, and the display keeps an in-memory copy of what a 16x2 panel
//! would show.

use pillbox::app::events::AppEvent;
use pillbox::app::ports::{AlertPort, DisplayPort, EventSink, SensorPort};
use pillbox::scheduler::DayIndex;

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    /// Raw electrical level per day slot (`true` = HIGH).
    pub levels: [bool; 7],
    /// Every slot read, in order.
    pub reads: Vec<DayIndex>,
    /// Every level written to the alert output, in order.
    pub alert_writes: Vec<bool>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            levels: [false; 7],
            reads: Vec::new(),
            alert_writes: Vec::new(),
        }
    }

    pub fn set_level(&mut self, day: usize, high: bool) {
        self.levels[day] = high;
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_level(&mut self, day: DayIndex) -> bool {
        self.reads.push(day);
        self.levels[day.as_usize()]
    }
}

impl AlertPort for MockHardware {
    fn set_alert(&mut self, active: bool) {
        self.alert_writes.push(active);
    }

    fn is_alert_active(&self) -> bool {
        self.alert_writes.last().copied().unwrap_or(false)
    }
}

// ── MockDisplay ───────────────────────────────────────────────

const COLS: usize = 16;

pub struct MockDisplay {
    rows: [String; 2],
    cursor: (usize, usize),
    pub clears: usize,
}

#[allow(dead_code)]
impl MockDisplay {
    pub fn new() -> Self {
        Self {
            rows: [String::new(), String::new()],
            cursor: (0, 0),
            clears: 0,
        }
    }

    /// Visible text of `row`, without trailing blanks.
    pub fn row(&self, row: usize) -> &str {
        self.rows[row].trim_end()
    }
}

impl Default for MockDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayPort for MockDisplay {
    fn clear(&mut self) {
        self.rows = [String::new(), String::new()];
        self.cursor = (0, 0);
        self.clears += 1;
    }

    fn set_cursor(&mut self, row: u8, col: u8) {
        self.cursor = (usize::from(row).min(1), usize::from(col).min(COLS));
    }

    fn print(&mut self, text: &str) {
        let (row, col) = self.cursor;
        let mut cells: Vec<char> = self.rows[row].chars().collect();
        cells.resize(COLS, ' ');
        let mut at = col;
        for c in text.chars() {
            if at >= COLS {
                break;
            }
            cells[at] = c;
            at += 1;
        }
        self.rows[row] = cells.into_iter().collect();
        self.cursor = (row, at);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
