//! Pillbox Firmware: Main Entry Point
//!
//! Hexagonal architecture with a single cooperative loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter     Lcd             LogEventSink  Esp32Time   │
//! │  (Sensor + Alert)    (DisplayPort)   (EventSink)   (uptime)    │
//! │  WifiAdapter         StatusServer                              │
//! │  (soft AP)           (HTTP status page)                        │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  ScheduleClock · PresenceEvaluator · DisplayPresenter  │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```

use anyhow::Result;
use esp_idf_hal::delay::Ets;
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use log::{info, warn};

use pillbox::adapters::hardware::HardwareAdapter;
use pillbox::adapters::log_sink::LogEventSink;
use pillbox::adapters::time::Esp32TimeAdapter;
use pillbox::adapters::wifi::{ConnectivityPort, WifiAdapter};
use pillbox::app::presenter;
use pillbox::config::SystemConfig;
use pillbox::device::Device;
use pillbox::drivers::hw_init;
use pillbox::drivers::lcd::Lcd;
use pillbox::drivers::watchdog::{WATCHDOG_TIMEOUT_MS, Watchdog};
use pillbox::error::Error;
use pillbox::pins;
use pillbox::server::StatusServer;

// The HAL hands out pins as distinct types, so the I²C bus below names
// gpio8/gpio9 directly; this keeps them in step with the pin table.
const _: () = assert!(pins::I2C_SDA_GPIO == 8 && pins::I2C_SCL_GPIO == 9);

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Pillbox v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = SystemConfig::load();
    config.validate().map_err(Error::from)?;
    info!(
        "Config: rotation {} ms, poll {} ms, polarity {:?}",
        config.rotation_period_ms, config.poll_period_ms, config.sensor_polarity
    );

    // ── 3. GPIO peripherals ───────────────────────────────────
    hw_init::init_peripherals().map_err(Error::from)?;
    let time = Esp32TimeAdapter::new();

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    // ── 4. LCD + splash ───────────────────────────────────────
    let i2c_config = I2cConfig::new().baudrate(Hertz(pins::I2C_FREQ_HZ));
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio8,
        peripherals.pins.gpio9,
        &i2c_config,
    )?;
    info!(
        "LCD: I2C SDA=GPIO{} SCL=GPIO{} addr=0x{:02X}",
        pins::I2C_SDA_GPIO,
        pins::I2C_SCL_GPIO,
        pins::LCD_I2C_ADDR
    );
    let mut lcd = Lcd::new(i2c, Ets, pins::LCD_I2C_ADDR);
    match lcd.init() {
        Ok(()) => presenter::splash(&mut lcd),
        Err(e) => warn!("LCD init failed ({:?}), continuing without display", e),
    }

    // ── 5. Soft AP + status server ────────────────────────────
    let mut wifi = WifiAdapter::new(config.ap_channel);
    wifi.attach(peripherals.modem, sysloop, Some(nvs))
        .map_err(Error::from)?;
    wifi.set_credentials(&config.ap_ssid, &config.ap_password)
        .map_err(Error::from)?;
    wifi.start().map_err(Error::from)?;

    let server = StatusServer::bind(&config).map_err(Error::from)?;
    info!(
        "Status page: http://{}:{}/",
        wifi.gateway().unwrap_or("0.0.0.0"),
        config.http_port
    );

    // ── 6. Boot sample + first render ─────────────────────────
    let mut device = Device::new(
        &config,
        time.uptime_ms(),
        HardwareAdapter::from_pins(),
        lcd,
        server,
        LogEventSink::new(),
    );
    device.start(time.uptime_ms());
    let mut watchdog = Watchdog::new(WATCHDOG_TIMEOUT_MS);

    info!("Entering main loop");

    // ── 7. Cooperative loop ───────────────────────────────────
    loop {
        device.iterate(time.uptime_ms());
        watchdog.feed();
        std::thread::sleep(device.loop_delay());
    }
}
