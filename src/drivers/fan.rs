//! Exhaust/suction fan driver (logic-level MOSFET on an LEDC channel).
//!
//! The fan has no feedback line; this driver is a dumb actuator that
//! clamps the requested duty to the channel resolution and remembers
//! what it last wrote.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: writes the LEDC duty register via hw_init.
//! On host/test: the write lands in the simulated LEDC channel.

use log::warn;

use crate::drivers::hw_init;

pub struct FanDriver {
    channel: u32,
    max_duty: u32,
    hw_duty: u32,
}

impl FanDriver {
    /// `max_duty` is the full-scale count for the configured resolution.
    pub fn new(channel: u32, max_duty: u32) -> Self {
        Self {
            channel,
            max_duty,
            hw_duty: 0,
        }
    }

    pub fn set_duty(&mut self, duty: u32) {
        let clamped = duty.min(self.max_duty);
        if clamped != duty {
            warn!("Fan duty {} exceeds max {}, clamped", duty, self.max_duty);
        }
        hw_init::ledc_set(self.channel, clamped);
        self.hw_duty = clamped;
    }

    pub fn stop(&mut self) {
        self.set_duty(0);
    }

    pub fn current_duty(&self) -> u32 {
        self.hw_duty
    }

    pub fn is_running(&self) -> bool {
        self.hw_duty > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duty_is_clamped_to_resolution() {
        let mut fan = FanDriver::new(hw_init::LEDC_CH_FAN, 1023);
        fan.set_duty(5000);
        assert_eq!(fan.current_duty(), 1023);
        assert!(fan.is_running());
    }

    #[test]
    fn stop_zeroes_duty() {
        let mut fan = FanDriver::new(hw_init::LEDC_CH_FAN, 1023);
        fan.set_duty(400);
        fan.stop();
        assert_eq!(fan.current_duty(), 0);
        assert!(!fan.is_running());
    }
}
