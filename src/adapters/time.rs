//! ESP32 time adapter.
//!
//! Provides monotonic time for the scheduler, the echo timer and status
//! timestamps.
//!
//! - **`target_os = "espidf"`**: wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microsecond precision, monotonic).
//! - **`not(target_os = "espidf")`**: uses `std::time::Instant` for
//!   host-side testing and simulation.

use crate::app::ports::ClockPort;

/// Monotonic clock for the ESP32 platform.
#[derive(Clone, Copy)]
pub struct Esp32TimeAdapter {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for Esp32TimeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Esp32TimeAdapter {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }
}

impl ClockPort for Esp32TimeAdapter {
    #[cfg(target_os = "espidf")]
    fn uptime_us(&self) -> u64 {
        // esp_timer counts up from boot and never goes negative.
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
    }

    #[cfg(not(target_os = "espidf"))]
    fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_clock_is_monotonic() {
        let clock = Esp32TimeAdapter::new();
        let a = clock.uptime_us();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = clock.uptime_us();
        assert!(b > a);
        assert_eq!(clock.uptime_ms(), clock.uptime_us() / 1000);
    }
}
