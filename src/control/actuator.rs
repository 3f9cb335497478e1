//! Actuator controller: the single owner of what is currently commanded.
//!
//! [`ActuatorController`] translates a [`FanMode`] into a raw PWM duty via
//! the configured [`FanDutyTable`] and drives the UV light, recording both
//! in [`ActuatorState`].  Hardware is reached only through
//! [`ActuatorPort`], injected at each call site.
//!
//! Every call re-asserts the output even when the value is unchanged, so
//! repeating a command is harmless.

use core::fmt;

use crate::app::ports::ActuatorPort;
use crate::config::FanDutyTable;

/// Named fan speeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FanMode {
    Off,
    Low,
    High,
}

impl FanMode {
    /// Wire name used in status payloads.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Low => "LOW",
            Self::High => "HIGH",
        }
    }
}

impl fmt::Display for FanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Last-commanded actuator outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorState {
    pub fan: FanMode,
    pub light_on: bool,
}

impl ActuatorState {
    /// State forced at boot before the first tick: gentle airflow, UV on.
    pub const BASELINE: Self = Self {
        fan: FanMode::Low,
        light_on: true,
    };
}

impl Default for ActuatorState {
    fn default() -> Self {
        Self::BASELINE
    }
}

pub struct ActuatorController {
    duty: FanDutyTable,
    state: ActuatorState,
}

impl ActuatorController {
    pub fn new(duty: FanDutyTable) -> Self {
        Self {
            duty,
            state: ActuatorState::BASELINE,
        }
    }

    /// Set the fan PWM duty for `mode` and record it.
    pub fn apply(&mut self, mode: FanMode, hw: &mut impl ActuatorPort) {
        hw.set_fan_duty(self.duty.duty_for(mode));
        self.state.fan = mode;
    }

    /// Drive the UV light output and record it.
    pub fn set_light(&mut self, on: bool, hw: &mut impl ActuatorPort) {
        hw.set_light(on);
        self.state.light_on = on;
    }

    /// Apply a full fan + light state in one step.
    pub fn apply_state(&mut self, target: ActuatorState, hw: &mut impl ActuatorPort) {
        self.apply(target.fan, hw);
        self.set_light(target.light_on, hw);
    }

    /// Swap the duty table (hot config reload).  Takes effect on the next
    /// [`apply`](Self::apply); the fan is not re-driven here.
    pub fn set_duty_table(&mut self, duty: FanDutyTable) {
        self.duty = duty;
    }

    pub fn state(&self) -> ActuatorState {
        self.state
    }

    pub fn current_duty(&self) -> u32 {
        self.duty.duty_for(self.state.fan)
    }
}
