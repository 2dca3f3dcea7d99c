//! Unified error types for the pillbox firmware.
//!
//! A single `Error` enum that every subsystem can convert into, so that the
//! boot sequence in `main` can funnel failures through `anyhow` uniformly.
//! The cooperative loop itself never fails: network and sensor faults are
//! logged and retried on the next iteration.

use core::fmt;

use crate::adapters::wifi::ConnectivityError;
use crate::config::ConfigError;
use crate::drivers::hw_init::HwInitError;
use crate::server::ServerError;

/// Every fallible boot-time operation in the firmware funnels into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Peripheral initialisation failed.
    Init(HwInitError),
    /// Configuration is invalid.
    Config(ConfigError),
    /// The access point could not be brought up.
    Connectivity(ConnectivityError),
    /// The status server could not bind its listener.
    Server(ServerError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(e) => write!(f, "init: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Connectivity(e) => write!(f, "wifi: {e}"),
            Self::Server(e) => write!(f, "server: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<HwInitError> for Error {
    fn from(e: HwInitError) -> Self {
        Self::Init(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<ConnectivityError> for Error {
    fn from(e: ConnectivityError) -> Self {
        Self::Connectivity(e)
    }
}

impl From<ServerError> for Error {
    fn from(e: ServerError) -> Self {
        Self::Server(e)
    }
}

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
