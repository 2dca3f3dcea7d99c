//! Display presenter: lays out day and status on the 16x2 LCD.
//!
//! ```text
//!   ┌────────────────┐
//!   │Day: Wednesday  │  row 0
//!   │Take the pill!  │  row 1
//!   └────────────────┘
//! ```

use core::fmt::Write as _;

use super::ports::DisplayPort;
use super::presence::PillStatus;
use crate::scheduler::DayIndex;

/// Visible columns per row.
pub const LCD_COLS: usize = 16;
/// Visible rows.
pub const LCD_ROWS: u8 = 2;

/// One row of display text, truncated to the visible width.
pub type RowText = heapless::String<LCD_COLS>;

/// Row 0: `"Day: "` + day name.
pub fn day_row(day: DayIndex) -> RowText {
    let mut row = RowText::new();
    // "Day: Wednesday" is the longest at 14 chars; truncation is harmless.
    let _ = write!(row, "Day: {}", day.name());
    row
}

/// Row 1: the status message.
pub fn status_row(status: PillStatus) -> RowText {
    let mut row = RowText::new();
    let _ = row.push_str(status.message());
    row
}

/// Boot splash shown while peripherals and the access point come up.
pub fn splash(display: &mut impl DisplayPort) {
    display.clear();
    display.set_cursor(0, 0);
    display.print("Pill Reminder");
    display.set_cursor(1, 0);
    display.print("Starting...");
}

/// Writes full frames to a [`DisplayPort`] and remembers the last one.
#[derive(Debug, Default)]
pub struct DisplayPresenter {
    last: Option<(DayIndex, PillStatus)>,
    frames: u64,
}

impl DisplayPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the display and rewrite both rows.
    pub fn render(&mut self, day: DayIndex, status: PillStatus, display: &mut impl DisplayPort) {
        display.clear();
        display.set_cursor(0, 0);
        display.print(&day_row(day));
        display.set_cursor(1, 0);
        display.print(&status_row(status));
        self.last = Some((day, status));
        self.frames += 1;
    }

    /// Day and status of the most recent [`render`](Self::render).
    pub fn last_rendered(&self) -> Option<(DayIndex, PillStatus)> {
        self.last
    }

    /// Frames rendered since boot.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}
