//! System configuration parameters
//!
//! All tunable parameters for the pillbox firmware.  Defaults are compiled
//! in; access-point credentials and any other field can be overridden at
//! build time through environment variables (see `build.rs`):
//!
//! | Variable              | Effect                                     |
//! |-----------------------|--------------------------------------------|
//! | `PILLBOX_AP_SSID`     | Access-point name                          |
//! | `PILLBOX_AP_PASSWORD` | Access-point password (empty = open AP)    |
//! | `PILLBOX_CONFIG_JSON` | JSON object overriding any field below     |

use core::fmt;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::adapters::wifi::{validate_password, validate_ssid};

const DEFAULT_AP_SSID: &str = "PillReminder";
const DEFAULT_AP_PASSWORD: &str = "takeyourpills";

/// Production rotation period: one day.
pub const DAY_MS: u64 = 24 * 60 * 60 * 1000;

/// Electrical level a presence sensor reports when it is *active*.
///
/// An active sensor means the compartment is empty (pill taken).  The
/// mapping depends on the sensor module and wiring, so it is configuration
/// rather than domain logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorPolarity {
    /// HIGH = active (taken), LOW = inactive (pill present).
    ActiveHigh,
    /// LOW = active (taken), HIGH = inactive (pill present).
    ActiveLow,
}

impl SensorPolarity {
    /// Whether the raw GPIO level means "sensor active".
    pub fn is_active(self, level_high: bool) -> bool {
        match self {
            Self::ActiveHigh => level_high,
            Self::ActiveLow => !level_high,
        }
    }
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Access point ---
    /// Soft-AP network name (1-32 printable ASCII bytes)
    pub ap_ssid: heapless::String<32>,
    /// Soft-AP password; empty for an open network
    pub ap_password: heapless::String<64>,
    /// 2.4 GHz channel the AP advertises on
    pub ap_channel: u8,

    // --- Status page ---
    /// TCP port the status server listens on
    pub http_port: u16,
    /// Client-side page reload delay (milliseconds)
    pub page_refresh_ms: u32,
    /// Upper bound on the blocking request-line read (milliseconds)
    pub request_timeout_ms: u32,

    // --- Sensors ---
    /// Level mapping for every compartment sensor
    pub sensor_polarity: SensorPolarity,

    // --- Timing ---
    /// Day rotation period (milliseconds)
    pub rotation_period_ms: u64,
    /// Presence polling period (milliseconds)
    pub poll_period_ms: u64,
    /// Stabilisation delay at the end of each loop iteration (milliseconds)
    pub loop_delay_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Access point
            ap_ssid: valid_or(option_env!("PILLBOX_AP_SSID"), DEFAULT_AP_SSID, |s| {
                validate_ssid(s).is_ok()
            }),
            ap_password: valid_or(
                option_env!("PILLBOX_AP_PASSWORD"),
                DEFAULT_AP_PASSWORD,
                |s| validate_password(s).is_ok(),
            ),
            ap_channel: 1,

            // Status page
            http_port: 80,
            page_refresh_ms: 1000,
            request_timeout_ms: 2000,

            // Sensors
            sensor_polarity: SensorPolarity::ActiveHigh,

            // Timing
            rotation_period_ms: DAY_MS,
            poll_period_ms: 50,
            loop_delay_ms: 10,
        }
    }
}

/// Copy `s` into a fixed-capacity string, truncating at capacity.
fn bounded<const N: usize>(s: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// `candidate` if present and accepted by `valid`, otherwise `fallback`.
fn valid_or<const N: usize>(
    candidate: Option<&str>,
    fallback: &str,
    valid: impl Fn(&str) -> bool,
) -> heapless::String<N> {
    match candidate {
        Some(s) if s.len() <= N && valid(s) => bounded(s),
        _ => bounded(fallback),
    }
}

/// Errors from loading or validating [`SystemConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Override blob was not a valid JSON config object.
    Malformed,
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "config override is not valid JSON"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl SystemConfig {
    /// Build the effective configuration: compiled defaults overlaid with
    /// the `PILLBOX_CONFIG_JSON` build-time override, if any.
    ///
    /// An invalid override is logged and ignored; the device always boots.
    /// Invalid `PILLBOX_AP_*` credentials fall back to the built-in ones.
    pub fn load() -> Self {
        if option_env!("PILLBOX_AP_SSID").is_some_and(|s| validate_ssid(s).is_err()) {
            warn!("Config: PILLBOX_AP_SSID is invalid, using {:?}", DEFAULT_AP_SSID);
        }
        if option_env!("PILLBOX_AP_PASSWORD").is_some_and(|s| validate_password(s).is_err()) {
            warn!("Config: PILLBOX_AP_PASSWORD is invalid, using the built-in password");
        }
        let Some(json) = option_env!("PILLBOX_CONFIG_JSON") else {
            return Self::default();
        };
        match Self::from_json_overrides(json) {
            Ok(cfg) => {
                info!("Config: applied build-time overrides");
                cfg
            }
            Err(e) => {
                warn!("Config: ignoring build-time overrides ({})", e);
                Self::default()
            }
        }
    }

    /// Parse a JSON object whose present fields override the defaults,
    /// then validate the result.
    pub fn from_json_overrides(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json).map_err(|_| ConfigError::Malformed)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the main loop cannot operate with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_ssid(&self.ap_ssid)
            .map_err(|_| ConfigError::ValidationFailed("ap_ssid must be 1-32 printable ASCII"))?;
        validate_password(&self.ap_password).map_err(|_| {
            ConfigError::ValidationFailed("ap_password must be empty or 8-63 bytes")
        })?;
        if !(1..=13).contains(&self.ap_channel) {
            return Err(ConfigError::ValidationFailed("ap_channel must be 1-13"));
        }
        if self.rotation_period_ms == 0 {
            return Err(ConfigError::ValidationFailed("rotation_period_ms must be > 0"));
        }
        if self.poll_period_ms == 0 {
            return Err(ConfigError::ValidationFailed("poll_period_ms must be > 0"));
        }
        if self.poll_period_ms >= self.rotation_period_ms {
            return Err(ConfigError::ValidationFailed(
                "poll_period_ms must be shorter than rotation_period_ms",
            ));
        }
        if u64::from(self.loop_delay_ms) >= self.poll_period_ms {
            return Err(ConfigError::ValidationFailed(
                "loop_delay_ms must be shorter than poll_period_ms",
            ));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed("request_timeout_ms must be > 0"));
        }
        Ok(())
    }
}
