//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements         | Connects to                 |
//! |------------|--------------------|-----------------------------|
//! | `hardware` | SensorPort         | Compartment sensor GPIOs    |
//! |            | AlertPort          | Buzzer GPIO                 |
//! | `log_sink` | EventSink          | Serial log output           |
//! | `time`     | (loop clock)       | ESP32 high-resolution timer |
//! | `wifi`     | ConnectivityPort   | ESP-IDF WiFi soft AP        |
//!
//! The character LCD implements `DisplayPort` directly in
//! [`drivers::lcd`](crate::drivers::lcd).

pub mod hardware;
pub mod log_sink;
pub mod time;
pub mod wifi;
