//! HC-SR04 ultrasonic range sensor driver.
//!
//! A 10 µs HIGH pulse on TRIG starts a measurement; the module then holds
//! ECHO HIGH for the round-trip time of the ping.  The echo is timed by
//! polling the input against a microsecond clock, with every wait bounded
//! by `timeout_us`.
//!
//! ## Dual-target design
//!
//! Generic over `embedded-hal` 1.0 pins and delay.  On ESP-IDF the pins
//! are [`GpioLine`](crate::drivers::hw_init::GpioLine)s; in host tests
//! they are mocks driven by a simulated clock.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use log::{debug, warn};

use super::DistanceSample;
use crate::app::ports::{ClockPort, DistancePort};

pub struct UltrasonicSensor<T, E, D, C> {
    trigger: T,
    echo: E,
    delay: D,
    clock: C,
    timeout_us: u32,
    max_mm: f32,
    timeouts: u32,
}

impl<T, E, D, C> UltrasonicSensor<T, E, D, C>
where
    T: OutputPin,
    E: InputPin,
    D: DelayNs,
    C: ClockPort,
{
    pub fn new(trigger: T, echo: E, delay: D, clock: C, timeout_us: u32, max_mm: f32) -> Self {
        Self {
            trigger,
            echo,
            delay,
            clock,
            timeout_us,
            max_mm,
            timeouts: 0,
        }
    }

    /// Fire one ping and time the echo.  Returns 0 on timeout or pin error.
    pub fn echo_duration_us(&mut self) -> u32 {
        if self.pulse_trigger().is_err() {
            warn!("ultrasonic: trigger pin write failed");
            return 0;
        }

        let start = self.clock.uptime_us();
        let timeout = u64::from(self.timeout_us);

        // A previous echo may still be in flight; let it finish first.
        if self.wait_for_level(false, start, timeout).is_none() {
            return 0;
        }
        let Some(rise) = self.wait_for_level(true, start, timeout) else {
            return 0;
        };
        let Some(fall) = self.wait_for_level(false, start, timeout) else {
            return 0;
        };
        (fall - rise) as u32
    }

    /// Number of measurements that ended in a timeout since boot.
    pub fn timeout_count(&self) -> u32 {
        self.timeouts
    }

    fn pulse_trigger(&mut self) -> Result<(), T::Error> {
        self.trigger.set_low()?;
        self.delay.delay_us(2);
        self.trigger.set_high()?;
        self.delay.delay_us(10);
        self.trigger.set_low()
    }

    /// Spin until ECHO reads `high`, returning the clock value at the edge.
    /// `None` if the deadline passes or the pin cannot be read.
    fn wait_for_level(&mut self, high: bool, start: u64, timeout: u64) -> Option<u64> {
        loop {
            let now = self.clock.uptime_us();
            match self.echo.is_high() {
                Ok(level) if level == high => return Some(now),
                Ok(_) => {}
                Err(_) => {
                    warn!("ultrasonic: echo pin read failed");
                    return None;
                }
            }
            if now.saturating_sub(start) > timeout {
                return None;
            }
        }
    }
}

impl<T, E, D, C> DistancePort for UltrasonicSensor<T, E, D, C>
where
    T: OutputPin,
    E: InputPin,
    D: DelayNs,
    C: ClockPort,
{
    fn measure(&mut self) -> DistanceSample {
        let duration = self.echo_duration_us();
        if duration == 0 {
            self.timeouts = self.timeouts.wrapping_add(1);
        }
        let sample = DistanceSample::from_echo_us(duration, self.max_mm);
        debug!(
            "ultrasonic: echo={}us distance={:.2}mm clamped={}",
            duration,
            sample.mm(),
            sample.was_clamped()
        );
        sample
    }
}
