//! GPIO / peripheral pin assignments for the pillbox main board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Compartment presence sensors (one per day slot)
// ---------------------------------------------------------------------------

/// Presence sensor inputs, index-aligned with the day index
/// (0 = Sunday … 6 = Saturday).  Configured as pull-up inputs.
pub const SENSOR_GPIOS: [i32; 7] = [4, 5, 6, 7, 15, 16, 17];

// ---------------------------------------------------------------------------
// Alert output
// ---------------------------------------------------------------------------

/// Digital output driving the buzzer transistor (active HIGH).
pub const BUZZER_GPIO: i32 = 18;

// ---------------------------------------------------------------------------
// I²C bus (PCF8574 backpack for the 16x2 character LCD)
// ---------------------------------------------------------------------------

/// `main()` binds the typed HAL pins for these and asserts they match.
pub const I2C_SDA_GPIO: i32 = 8;
pub const I2C_SCL_GPIO: i32 = 9;
/// Standard-mode I²C is plenty for a character display.
pub const I2C_FREQ_HZ: u32 = 100_000;
/// Default 7-bit address of the PCF8574 backpack (A0..A2 pulled high).
pub const LCD_I2C_ADDR: u8 = 0x27;
