//! 16x2 HD44780 character LCD behind a PCF8574 I²C backpack.
//!
//! The backpack maps the expander's eight outputs onto the controller:
//!
//! ```text
//!   P7..P4  D7..D4   (4-bit data bus)
//!   P3      backlight
//!   P2      EN
//!   P1      RW       (always 0, write only)
//!   P0      RS       (0 = command, 1 = data)
//! ```
//!
//! Generic over `embedded_hal` 1.0 [`I2c`] and [`DelayNs`], so the same
//! driver runs on `esp_idf_hal::i2c::I2cDriver` and on a mock bus in
//! tests.  Bus errors never propagate out of the [`DisplayPort`] methods:
//! they are logged and counted, and the next render repaints the screen.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::warn;

use crate::app::ports::DisplayPort;
use crate::app::presenter::{LCD_COLS, LCD_ROWS};

const RS: u8 = 0x01;
const EN: u8 = 0x04;
const BACKLIGHT: u8 = 0x08;

const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE_INC: u8 = 0x06;
const CMD_DISPLAY_ON: u8 = 0x0C;
const CMD_FUNCTION_4BIT_2LINE: u8 = 0x28;
const CMD_SET_DDRAM: u8 = 0x80;

/// DDRAM address of column 0 on each row.
const ROW_OFFSETS: [u8; LCD_ROWS as usize] = [0x00, 0x40];

pub struct Lcd<I2C, D> {
    i2c: I2C,
    delay: D,
    addr: u8,
    col: u8,
    bus_errors: u32,
}

impl<I2C, D> Lcd<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    pub fn new(i2c: I2C, delay: D, addr: u8) -> Self {
        Self {
            i2c,
            delay,
            addr,
            col: 0,
            bus_errors: 0,
        }
    }

    /// Power-on initialisation into 4-bit, two-line mode.
    ///
    /// Unlike the port methods this reports the first bus error, so boot
    /// can tell a missing backpack from a working one.
    pub fn init(&mut self) -> Result<(), I2C::Error> {
        self.delay.delay_ms(50);
        for _ in 0..3 {
            self.write_nibble(0x30)?;
            self.delay.delay_us(4_500);
        }
        self.write_nibble(0x20)?;
        self.command(CMD_FUNCTION_4BIT_2LINE)?;
        self.command(CMD_DISPLAY_ON)?;
        self.command(CMD_ENTRY_MODE_INC)?;
        self.command(CMD_CLEAR)?;
        self.delay.delay_ms(2);
        self.col = 0;
        Ok(())
    }

    /// Failed bus transactions since construction.
    pub fn bus_errors(&self) -> u32 {
        self.bus_errors
    }

    /// Release the bus and delay provider.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    fn pulse(&mut self, bits: u8) -> Result<(), I2C::Error> {
        self.i2c.write(self.addr, &[bits | BACKLIGHT | EN])?;
        self.delay.delay_us(1);
        self.i2c.write(self.addr, &[bits | BACKLIGHT])?;
        self.delay.delay_us(50);
        Ok(())
    }

    fn write_nibble(&mut self, bits: u8) -> Result<(), I2C::Error> {
        self.pulse(bits & 0xF0)
    }

    fn send(&mut self, byte: u8, rs: u8) -> Result<(), I2C::Error> {
        self.pulse((byte & 0xF0) | rs)?;
        self.pulse(((byte << 4) & 0xF0) | rs)
    }

    fn command(&mut self, cmd: u8) -> Result<(), I2C::Error> {
        self.send(cmd, 0)
    }

    fn record(&mut self, op: &str, result: Result<(), I2C::Error>) {
        if let Err(e) = result {
            self.bus_errors = self.bus_errors.wrapping_add(1);
            warn!("LCD: {} failed: {:?}", op, e);
        }
    }
}

/// Map a char onto the HD44780 ROM; anything outside printable ASCII
/// becomes `?`.
fn rom_code(c: char) -> u8 {
    if c.is_ascii() && !c.is_ascii_control() {
        c as u8
    } else {
        b'?'
    }
}

impl<I2C, D> DisplayPort for Lcd<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    fn clear(&mut self) {
        let result = self.command(CMD_CLEAR);
        self.delay.delay_ms(2);
        self.col = 0;
        self.record("clear", result);
    }

    fn set_cursor(&mut self, row: u8, col: u8) {
        let row = usize::from(row.min(LCD_ROWS - 1));
        let col = col.min(LCD_COLS as u8);
        let result = self.command(CMD_SET_DDRAM | (ROW_OFFSETS[row] + col));
        self.col = col;
        self.record("set_cursor", result);
    }

    fn print(&mut self, text: &str) {
        let room = LCD_COLS.saturating_sub(usize::from(self.col));
        for c in text.chars().take(room) {
            let result = self.send(rom_code(c), RS);
            self.col += 1;
            if result.is_err() {
                self.record("print", result);
                return;
            }
        }
    }
}
