//! Pillbox firmware library.
//!
//! Exposes the pure-logic modules and the host-simulated adapters for
//! integration testing. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod device;
pub mod error;
pub mod pins;
pub mod scheduler;
pub mod server;
pub mod timer;

pub mod adapters;
pub mod drivers;
pub mod sensors;
