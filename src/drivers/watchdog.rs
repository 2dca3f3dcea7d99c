//! Task Watchdog Timer (TWDT) driver.
//!
//! Resets the device if the cooperative loop stops iterating, e.g. a
//! client that holds the status server inside a read longer than the
//! socket timeouts allow.  The loop calls [`Watchdog::feed`] once per
//! iteration.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use log::{info, warn};

/// Loop stall tolerated before the TWDT panics and reboots.
pub const WATCHDOG_TIMEOUT_MS: u32 = 10_000;

pub struct Watchdog {
    timeout_ms: u32,
    subscribed: bool,
    feeds: u64,
}

impl Watchdog {
    /// Initialise and subscribe the current task to the TWDT.
    ///
    /// A failed subscription is logged; the device keeps running unguarded.
    pub fn new(timeout_ms: u32) -> Self {
        let subscribed = Self::subscribe(timeout_ms);
        if subscribed {
            info!("Watchdog: subscribed ({} ms timeout, panic on trigger)", timeout_ms);
        }
        Self {
            timeout_ms,
            subscribed,
            feeds: 0,
        }
    }

    #[cfg(target_os = "espidf")]
    fn subscribe(timeout_ms: u32) -> bool {
        // SAFETY: called once from main() before the loop; the config struct
        // outlives the call and a null handle means "current task".
        unsafe {
            let cfg = esp_task_wdt_config_t {
                timeout_ms,
                idle_core_mask: 0,
                trigger_panic: true,
            };
            let ret = esp_task_wdt_reconfigure(&cfg);
            if ret != ESP_OK {
                warn!("TWDT reconfigure returned {} (may already be configured)", ret);
            }
            let ret = esp_task_wdt_add(core::ptr::null_mut());
            if ret != ESP_OK {
                warn!("Watchdog: failed to subscribe ({})", ret);
                return false;
            }
        }
        true
    }

    #[cfg(not(target_os = "espidf"))]
    fn subscribe(_timeout_ms: u32) -> bool {
        warn!("Watchdog(sim): not armed");
        false
    }

    /// Feed the watchdog.  Must be called at least once per timeout.
    pub fn feed(&mut self) {
        self.feeds = self.feeds.wrapping_add(1);
        #[cfg(target_os = "espidf")]
        if self.subscribed {
            // SAFETY: the current task was subscribed in `new`.
            unsafe {
                esp_task_wdt_reset();
            }
        }
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    pub fn is_armed(&self) -> bool {
        self.subscribed
    }

    pub fn feeds(&self) -> u64 {
        self.feeds
    }
}
