//! WiFi soft access-point adapter.
//!
//! The device hosts its own network: phones join the AP and open the
//! status page at the AP's gateway address.  There is no station mode and
//! no reconnection logic: once started, the AP stays up until reset.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver via `esp_idf_svc::wifi`.
//! - **all other targets**: simulation stubs for host-side tests.

use core::fmt;
use log::{error, info};

// ───────────────────────────────────────────────────────────────
// Port trait
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectivityError {
    InvalidSsid,
    InvalidPassword,
    InvalidChannel,
    /// Platform driver has not been handed the radio yet.
    NotAttached,
    StartFailed,
    AlreadyStarted,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => write!(f, "password invalid (must be 8-63 bytes for WPA2, or empty for open)"),
            Self::InvalidChannel => write!(f, "channel invalid (must be 1-13)"),
            Self::NotAttached => write!(f, "WiFi driver not attached to modem"),
            Self::StartFailed => write!(f, "access point failed to start"),
            Self::AlreadyStarted => write!(f, "access point already running"),
        }
    }
}

/// Hexagonal boundary for hosting the device's own network.
pub trait ConnectivityPort {
    fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError>;
    fn start(&mut self) -> Result<(), ConnectivityError>;
    fn stop(&mut self);
    fn is_up(&self) -> bool;
    /// Gateway address clients should browse to, once up.
    fn gateway(&self) -> Option<&str>;
}

// ───────────────────────────────────────────────────────────────
// AP state
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApState {
    Down,
    Up,
    Failed,
}

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

/// Printable ASCII only: space through tilde.
fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

pub(crate) fn validate_ssid(ssid: &str) -> Result<(), ConnectivityError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(ConnectivityError::InvalidSsid);
    }
    Ok(())
}

pub(crate) fn validate_password(password: &str) -> Result<(), ConnectivityError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 63 || !is_printable_ascii(password) {
        return Err(ConnectivityError::InvalidPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

/// ESP-IDF's default soft-AP interface address.
#[cfg(not(target_os = "espidf"))]
const SIM_GATEWAY: &str = "192.168.4.1";

pub struct WifiAdapter {
    state: ApState,
    ssid: heapless::String<32>,
    password: heapless::String<64>,
    channel: u8,
    gateway: heapless::String<16>,
    #[cfg(target_os = "espidf")]
    driver: Option<esp_idf_svc::wifi::BlockingWifi<esp_idf_svc::wifi::EspWifi<'static>>>,
}

impl WifiAdapter {
    pub fn new(channel: u8) -> Self {
        Self {
            state: ApState::Down,
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            channel,
            gateway: heapless::String::new(),
            #[cfg(target_os = "espidf")]
            driver: None,
        }
    }

    pub fn state(&self) -> ApState {
        self.state
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    /// Hand the radio to the adapter.  Must be called before
    /// [`start`](ConnectivityPort::start).
    #[cfg(target_os = "espidf")]
    pub fn attach(
        &mut self,
        modem: esp_idf_hal::modem::Modem,
        sysloop: esp_idf_svc::eventloop::EspSystemEventLoop,
        nvs: Option<esp_idf_svc::nvs::EspDefaultNvsPartition>,
    ) -> Result<(), ConnectivityError> {
        use esp_idf_svc::wifi::{BlockingWifi, EspWifi};

        let esp_wifi = EspWifi::new(modem, sysloop.clone(), nvs).map_err(|e| {
            error!("WiFi: driver init failed: {}", e);
            ConnectivityError::StartFailed
        })?;
        let wifi = BlockingWifi::wrap(esp_wifi, sysloop).map_err(|e| {
            error!("WiFi: event loop wrap failed: {}", e);
            ConnectivityError::StartFailed
        })?;
        self.driver = Some(wifi);
        Ok(())
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_start(&mut self) -> Result<(), ConnectivityError> {
        use core::fmt::Write as _;
        use esp_idf_svc::wifi::{AccessPointConfiguration, AuthMethod, Configuration};

        let wifi = self.driver.as_mut().ok_or(ConnectivityError::NotAttached)?;
        let auth_method = if self.password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let config = Configuration::AccessPoint(AccessPointConfiguration {
            ssid: self.ssid.clone(),
            password: self.password.clone(),
            auth_method,
            channel: self.channel,
            ..Default::default()
        });

        let started = wifi
            .set_configuration(&config)
            .and_then(|()| wifi.start())
            .and_then(|()| wifi.wait_netif_up());
        if let Err(e) = started {
            error!("WiFi: AP bring-up failed: {}", e);
            return Err(ConnectivityError::StartFailed);
        }

        self.gateway.clear();
        match wifi.wifi().ap_netif().get_ip_info() {
            Ok(ip_info) => {
                let _ = write!(self.gateway, "{}", ip_info.ip);
            }
            Err(e) => log::warn!("WiFi: AP address unavailable: {}", e),
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_start(&mut self) -> Result<(), ConnectivityError> {
        self.gateway.clear();
        let _ = self.gateway.push_str(SIM_GATEWAY);
        info!("WiFi(sim): AP '{}' on channel {}", self.ssid, self.channel);
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_stop(&mut self) {
        if let Some(wifi) = self.driver.as_mut() {
            if let Err(e) = wifi.stop() {
                log::warn!("WiFi: stop failed: {}", e);
            }
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_stop(&mut self) {
        info!("WiFi(sim): AP stopped");
    }
}

// ───────────────────────────────────────────────────────────────
// ConnectivityPort
// ───────────────────────────────────────────────────────────────

impl ConnectivityPort for WifiAdapter {
    fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        self.ssid.clear();
        self.ssid.push_str(ssid).map_err(|()| ConnectivityError::InvalidSsid)?;
        self.password.clear();
        self.password
            .push_str(password)
            .map_err(|()| ConnectivityError::InvalidPassword)?;
        Ok(())
    }

    fn start(&mut self) -> Result<(), ConnectivityError> {
        if self.state == ApState::Up {
            return Err(ConnectivityError::AlreadyStarted);
        }
        validate_ssid(&self.ssid)?;
        if !(1..=13).contains(&self.channel) {
            return Err(ConnectivityError::InvalidChannel);
        }

        match self.platform_start() {
            Ok(()) => {
                self.state = ApState::Up;
                info!(
                    "WiFi: AP '{}' up ({}), gateway {}",
                    self.ssid,
                    if self.password.is_empty() { "open" } else { "WPA2" },
                    self.gateway
                );
                Ok(())
            }
            Err(e) => {
                error!("WiFi: AP start failed: {}", e);
                self.state = ApState::Failed;
                Err(e)
            }
        }
    }

    fn stop(&mut self) {
        self.platform_stop();
        self.state = ApState::Down;
        self.gateway.clear();
    }

    fn is_up(&self) -> bool {
        self.state == ApState::Up
    }

    fn gateway(&self) -> Option<&str> {
        if self.is_up() && !self.gateway.is_empty() {
            Some(&self.gateway)
        } else {
            None
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
