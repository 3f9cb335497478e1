//! System configuration parameters
//!
//! All tunable parameters for the SmartTrap controller.
//! Values can be overridden via NVS (non-volatile storage); the compiled-in
//! defaults match the reference trap hardware.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::control::actuator::FanMode;
use crate::pins;

/// Upper bound on the echo wait so a misconfigured timeout cannot stall the
/// control loop for more than a second.
pub const MAX_ECHO_TIMEOUT_US: u32 = 1_000_000;

/// Core system configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    pub network: NetworkConfig,
    pub pins: PinConfig,
    pub pwm: PwmConfig,
    pub fan_duty: FanDutyTable,
    pub thresholds: DistanceThresholds,
    pub timing: TimingConfig,
}

// ---------------------------------------------------------------------------
// Network
// ---------------------------------------------------------------------------

/// Station-mode WiFi credentials and the bounded connect policy used at boot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub ssid: heapless::String<32>,
    pub password: heapless::String<64>,
    /// Connect attempts at boot before the loop starts without a network.
    pub connect_attempts: u8,
    /// Delay between boot-time connect attempts (milliseconds).
    pub retry_delay_ms: u32,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            connect_attempts: 10,
            retry_delay_ms: 500,
        }
    }
}

// ---------------------------------------------------------------------------
// Pins
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinConfig {
    pub fan_pwm_gpio: i32,
    pub uv_light_gpio: i32,
    pub trigger_gpio: i32,
    pub echo_gpio: i32,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            fan_pwm_gpio: pins::FAN_PWM_GPIO,
            uv_light_gpio: pins::UV_LIGHT_GPIO,
            trigger_gpio: pins::SENSOR_TRIGGER_GPIO,
            echo_gpio: pins::SENSOR_ECHO_GPIO,
        }
    }
}

impl PinConfig {
    fn all(&self) -> [i32; 4] {
        [
            self.fan_pwm_gpio,
            self.uv_light_gpio,
            self.trigger_gpio,
            self.echo_gpio,
        ]
    }
}

// ---------------------------------------------------------------------------
// PWM
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PwmConfig {
    /// LEDC base frequency for the fan MOSFET (Hz).
    pub frequency_hz: u32,
    /// LEDC timer resolution (bits).
    pub resolution_bits: u8,
}

impl Default for PwmConfig {
    fn default() -> Self {
        Self {
            frequency_hz: pins::FAN_PWM_FREQ_HZ,
            resolution_bits: pins::FAN_PWM_RESOLUTION_BITS,
        }
    }
}

impl PwmConfig {
    /// Largest duty value the configured resolution can express.
    pub fn max_duty(&self) -> u32 {
        (1u32 << self.resolution_bits) - 1
    }
}

// ---------------------------------------------------------------------------
// Fan duty table
// ---------------------------------------------------------------------------

/// Raw LEDC duty for each [`FanMode`], on the scale of [`PwmConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanDutyTable {
    pub off: u32,
    /// ~40% of full scale, power-saving airflow.
    pub low: u32,
    /// ~90% of full scale, maximum suction.
    pub high: u32,
}

impl Default for FanDutyTable {
    fn default() -> Self {
        Self {
            off: 0,
            low: 400,
            high: 900,
        }
    }
}

impl FanDutyTable {
    pub fn duty_for(&self, mode: FanMode) -> u32 {
        match mode {
            FanMode::Off => self.off,
            FanMode::Low => self.low,
            FanMode::High => self.high,
        }
    }
}

// ---------------------------------------------------------------------------
// Distance thresholds
// ---------------------------------------------------------------------------

/// Fullness thresholds in millimetres, measured from the sensor face down
/// to the catch surface. A 100 mm chamber reads `max_mm` when empty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceThresholds {
    /// At or below this distance the trap is FULL.
    pub full_mm: f32,
    /// At or below this distance (and above `full_mm`) the trap is FILLING.
    pub filling_mm: f32,
    /// Empty-chamber distance; timeouts and over-range reads clamp here.
    pub max_mm: f32,
}

impl Default for DistanceThresholds {
    fn default() -> Self {
        Self {
            full_mm: 30.0,
            filling_mm: 60.0,
            max_mm: 100.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Control tick period (milliseconds).
    pub tick_period_ms: u32,
    /// Maximum time spent waiting for an echo edge (microseconds).
    pub echo_timeout_us: u32,
    /// Sleep between scheduler polls in the main loop (milliseconds).
    pub poll_interval_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: 30_000, // 30 s
            echo_timeout_us: 30_000,
            poll_interval_ms: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// Build-time overrides
// ---------------------------------------------------------------------------

/// Settings baked into the firmware image for provisioning.
///
/// `SMARTTRAP_WIFI_SSID`, `SMARTTRAP_WIFI_PASSWORD` and
/// `SMARTTRAP_TICK_PERIOD_MS` are read when the firmware is compiled.  At
/// boot they are layered over the stored config and the result is written
/// back to NVS, so later builds without them keep the provisioned values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigOverrides<'a> {
    pub ssid: Option<&'a str>,
    pub password: Option<&'a str>,
    pub tick_period_ms: Option<&'a str>,
}

impl ConfigOverrides<'static> {
    pub fn from_build_env() -> Self {
        Self {
            ssid: option_env!("SMARTTRAP_WIFI_SSID"),
            password: option_env!("SMARTTRAP_WIFI_PASSWORD"),
            tick_period_ms: option_env!("SMARTTRAP_TICK_PERIOD_MS"),
        }
    }
}

impl ConfigOverrides<'_> {
    /// `base` with the overrides applied, or `None` when that changes
    /// nothing.  The result is validated as a whole.
    pub fn apply(&self, base: &SystemConfig) -> Result<Option<SystemConfig>, ConfigError> {
        let mut cfg = base.clone();
        if let Some(ssid) = self.ssid {
            cfg.network.ssid.clear();
            cfg.network
                .ssid
                .push_str(ssid)
                .map_err(|_| ConfigError::ValidationFailed("ssid longer than 32 bytes"))?;
        }
        if let Some(password) = self.password {
            cfg.network.password.clear();
            cfg.network
                .password
                .push_str(password)
                .map_err(|_| ConfigError::ValidationFailed("password longer than 64 bytes"))?;
        }
        if let Some(period) = self.tick_period_ms {
            cfg.timing.tick_period_ms = period
                .trim()
                .parse()
                .map_err(|_| ConfigError::ValidationFailed("tick_period_ms is not a number"))?;
        }
        cfg.validate()?;
        Ok((cfg != *base).then_some(cfg))
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

impl SystemConfig {
    /// Range-check every field. Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.thresholds;
        if !t.full_mm.is_finite() || !t.filling_mm.is_finite() || !t.max_mm.is_finite() {
            return Err(ConfigError::ValidationFailed(
                "distance thresholds must be finite",
            ));
        }
        if !(t.full_mm > 0.0) {
            return Err(ConfigError::ValidationFailed("full_mm must be > 0"));
        }
        if t.full_mm >= t.filling_mm {
            return Err(ConfigError::ValidationFailed(
                "full_mm must be < filling_mm",
            ));
        }
        if t.filling_mm > t.max_mm {
            return Err(ConfigError::ValidationFailed(
                "filling_mm must be <= max_mm",
            ));
        }

        if !(1..=14).contains(&self.pwm.resolution_bits) {
            return Err(ConfigError::ValidationFailed(
                "pwm resolution_bits must be 1–14",
            ));
        }
        if self.pwm.frequency_hz == 0 {
            return Err(ConfigError::ValidationFailed("pwm frequency_hz must be > 0"));
        }
        let max = self.pwm.max_duty();
        let d = &self.fan_duty;
        if d.off > max || d.low > max || d.high > max {
            return Err(ConfigError::ValidationFailed(
                "fan duty exceeds PWM full scale",
            ));
        }

        if self.timing.tick_period_ms == 0 {
            return Err(ConfigError::ValidationFailed("tick_period_ms must be > 0"));
        }
        if !(1..=MAX_ECHO_TIMEOUT_US).contains(&self.timing.echo_timeout_us) {
            return Err(ConfigError::ValidationFailed(
                "echo_timeout_us must be 1–1000000",
            ));
        }

        let gpios = self.pins.all();
        if gpios.iter().any(|p| !(0..=pins::MAX_GPIO).contains(p)) {
            return Err(ConfigError::ValidationFailed("GPIO number must be 0–39"));
        }
        for (i, a) in gpios.iter().enumerate() {
            if gpios[i + 1..].contains(a) {
                return Err(ConfigError::ValidationFailed(
                    "each GPIO may be assigned to one line only",
                ));
            }
        }

        if self.network.connect_attempts == 0 {
            return Err(ConfigError::ValidationFailed(
                "connect_attempts must be >= 1",
            ));
        }
        Ok(())
    }
}
