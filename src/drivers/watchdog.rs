//! Task Watchdog Timer (TWDT) driver.
//!
//! Resets the device if the main loop stops polling.  The loop sleeps
//! only `poll_interval_ms` between polls and a tick is bounded by the echo
//! timeout, so the timeout only trips on a genuine hang.
//!
//! The main loop must call `feed()` on every poll iteration.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

/// TWDT timeout.  Comfortably above one tick; the loop never waits on Wi-Fi.
pub const WATCHDOG_TIMEOUT_MS: u32 = 15_000;

pub struct Watchdog {
    #[cfg(target_os = "espidf")]
    subscribed: bool,
    feeds: u64,
}

impl Default for Watchdog {
    fn default() -> Self {
        Self::new()
    }
}

impl Watchdog {
    /// Initialise and subscribe the current task to the TWDT.
    pub fn new() -> Self {
        #[cfg(target_os = "espidf")]
        {
            unsafe {
                let cfg = esp_task_wdt_config_t {
                    timeout_ms: WATCHDOG_TIMEOUT_MS,
                    idle_core_mask: 0,
                    trigger_panic: true,
                };
                let ret = esp_task_wdt_reconfigure(&cfg);
                if ret != ESP_OK as i32 {
                    log::warn!(
                        "TWDT reconfigure returned {} (may already be configured)",
                        ret
                    );
                }

                let ret = esp_task_wdt_add(core::ptr::null_mut());
                let subscribed = ret == ESP_OK as i32;
                if subscribed {
                    log::info!("Watchdog: subscribed ({} ms timeout)", WATCHDOG_TIMEOUT_MS);
                } else {
                    log::warn!("Watchdog: failed to subscribe ({})", ret);
                }

                Self {
                    subscribed,
                    feeds: 0,
                }
            }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            log::info!("Watchdog(sim): no-op");
            Self { feeds: 0 }
        }
    }

    pub fn feed(&mut self) {
        #[cfg(target_os = "espidf")]
        {
            if self.subscribed {
                unsafe {
                    esp_task_wdt_reset();
                }
            }
        }
        self.feeds += 1;
    }

    pub fn feed_count(&self) -> u64 {
        self.feeds
    }
}
