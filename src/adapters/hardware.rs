//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the ultrasonic sensor and both actuator drivers, exposing them
//! through [`DistancePort`] and [`ActuatorPort`].  This is the only
//! module in the system that touches actual hardware.  On non-espidf
//! targets, the underlying drivers use cfg-gated simulation stubs.

use crate::app::ports::{ActuatorPort, DistancePort};
use crate::config::SystemConfig;
use crate::drivers::fan::FanDriver;
use crate::drivers::hw_init::{self, BusyDelay, GpioLine};
use crate::drivers::uv_light::UvLightDriver;
use crate::sensors::DistanceSample;
use crate::sensors::ultrasonic::UltrasonicSensor;

use super::time::Esp32TimeAdapter;

/// The HC-SR04 wired to raw GPIO lines.
pub type BoardSensor = UltrasonicSensor<GpioLine, GpioLine, BusyDelay, Esp32TimeAdapter>;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    sensor: BoardSensor,
    fan: FanDriver,
    uv: UvLightDriver,
}

impl HardwareAdapter {
    pub fn new(sensor: BoardSensor, fan: FanDriver, uv: UvLightDriver) -> Self {
        Self { sensor, fan, uv }
    }

    /// Wire the board from configuration.  Peripherals must already be
    /// set up by [`hw_init::init_peripherals`].
    pub fn from_config(config: &SystemConfig, clock: Esp32TimeAdapter) -> Self {
        let sensor = UltrasonicSensor::new(
            GpioLine::new(config.pins.trigger_gpio),
            GpioLine::new(config.pins.echo_gpio),
            BusyDelay,
            clock,
            config.timing.echo_timeout_us,
            config.thresholds.max_mm,
        );
        Self::new(
            sensor,
            FanDriver::new(hw_init::LEDC_CH_FAN, config.pwm.max_duty()),
            UvLightDriver::new(config.pins.uv_light_gpio),
        )
    }

    /// Echo timeouts since boot, for diagnostics.
    pub fn sensor_timeouts(&self) -> u32 {
        self.sensor.timeout_count()
    }

    pub fn fan_duty(&self) -> u32 {
        self.fan.current_duty()
    }

    pub fn is_light_on(&self) -> bool {
        self.uv.is_on()
    }

    /// Fan off, light off.
    pub fn all_off(&mut self) {
        self.fan.stop();
        self.uv.set(false);
    }
}

// ── DistancePort implementation ───────────────────────────────

impl DistancePort for HardwareAdapter {
    fn measure(&mut self) -> DistanceSample {
        self.sensor.measure()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for HardwareAdapter {
    fn set_fan_duty(&mut self, duty: u32) {
        self.fan.set_duty(duty);
    }

    fn set_light(&mut self, on: bool) {
        self.uv.set(on);
    }
}
