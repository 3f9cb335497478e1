//! One-shot hardware peripheral initialization and raw line access.
//!
//! Configures GPIO directions and the fan LEDC timer/channel using raw
//! ESP-IDF sys calls.  Called once from `main()` before the control loop
//! starts.  Pin numbers and PWM parameters come from
//! [`SystemConfig`](crate::config::SystemConfig), not compile-time constants.
//!
//! [`GpioLine`] and [`BusyDelay`] wrap the raw helpers in `embedded-hal`
//! traits so the ultrasonic driver stays hardware-agnostic.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use crate::config::{PinConfig, PwmConfig};

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    LedcTimerFailed(i32),
    LedcChannelFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcTimerFailed(rc) => write!(f, "LEDC timer config failed (rc={})", rc),
            Self::LedcChannelFailed(rc) => write!(f, "LEDC channel config failed (rc={})", rc),
        }
    }
}

/// LEDC channel driving the fan MOSFET.
pub const LEDC_CH_FAN: u32 = 0;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
pub fn init_peripherals(pins: &PinConfig, pwm: &PwmConfig) -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        init_gpio_outputs(&[pins.trigger_gpio, pins.uv_light_gpio])?;
        init_gpio_input(pins.echo_gpio)?;
        init_ledc(pins.fan_pwm_gpio, pwm)?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals(pins: &PinConfig, pwm: &PwmConfig) -> Result<(), HwInitError> {
    log::info!(
        "hw_init(sim): fan=GPIO{} uv=GPIO{} trig=GPIO{} echo=GPIO{} pwm={}Hz/{}bit",
        pins.fan_pwm_gpio,
        pins.uv_light_gpio,
        pins.trigger_gpio,
        pins.echo_gpio,
        pwm.frequency_hz,
        pwm.resolution_bits
    );
    Ok(())
}

// ── GPIO ──────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs(output_pins: &[i32]) -> Result<(), HwInitError> {
    for &pin in output_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
            ..Default::default()
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
        unsafe { gpio_set_level(pin, 0) };
    }
    info!("hw_init: GPIO outputs configured {:?}", output_pins);
    Ok(())
}

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_input(pin: i32) -> Result<(), HwInitError> {
    // The HC-SR04 drives ECHO push-pull; no pull resistor.
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        ..Default::default()
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    info!("hw_init: GPIO{} input configured", pin);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: pin was configured as an output in init_gpio_outputs();
    // only the main task writes outputs.
    unsafe {
        gpio_set_level(pin, u32::from(high));
    }
}

// Host simulation: output writes land in a bitmask that reads see, so a
// test can both observe actuator lines and drive the echo input.
#[cfg(not(target_os = "espidf"))]
static SIM_GPIO_LEVELS: core::sync::atomic::AtomicU64 = core::sync::atomic::AtomicU64::new(0);

/// Bit for `pin` in the simulated bank; pins the bank cannot hold map to 0.
#[cfg(not(target_os = "espidf"))]
fn sim_pin_mask(pin: i32) -> u64 {
    u32::try_from(pin)
        .ok()
        .and_then(|p| 1u64.checked_shl(p))
        .unwrap_or(0)
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(pin: i32) -> bool {
    SIM_GPIO_LEVELS.load(core::sync::atomic::Ordering::Relaxed) & sim_pin_mask(pin) != 0
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(pin: i32, high: bool) {
    use core::sync::atomic::Ordering;
    let mask = sim_pin_mask(pin);
    if high {
        SIM_GPIO_LEVELS.fetch_or(mask, Ordering::Relaxed);
    } else {
        SIM_GPIO_LEVELS.fetch_and(!mask, Ordering::Relaxed);
    }
}

// ── LEDC PWM ─────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_ledc(fan_gpio: i32, pwm: &PwmConfig) -> Result<(), HwInitError> {
    let timer = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: u32::from(pwm.resolution_bits),
        freq_hz: pwm.frequency_hz,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    let ret = unsafe { ledc_timer_config(&timer) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::LedcTimerFailed(ret));
    }

    let ret = unsafe {
        ledc_channel_config(&ledc_channel_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel: ledc_channel_t_LEDC_CHANNEL_0,
            timer_sel: ledc_timer_t_LEDC_TIMER_0,
            gpio_num: fan_gpio,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        })
    };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::LedcChannelFailed(ret));
    }

    info!(
        "hw_init: LEDC fan=CH{} GPIO{} {}Hz {}-bit",
        LEDC_CH_FAN, fan_gpio, pwm.frequency_hz, pwm.resolution_bits
    );
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn ledc_set(channel: u32, duty: u32) {
    // SAFETY: the channel was configured in init_ledc(); only the main
    // loop writes duty registers.
    unsafe {
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, duty);
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
    }
}

#[cfg(not(target_os = "espidf"))]
static SIM_LEDC_DUTY: core::sync::atomic::AtomicU32 = core::sync::atomic::AtomicU32::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set(_channel: u32, duty: u32) {
    SIM_LEDC_DUTY.store(duty, core::sync::atomic::Ordering::Relaxed);
}

/// Last duty written to the simulated LEDC channel.
#[cfg(not(target_os = "espidf"))]
pub fn sim_ledc_duty() -> u32 {
    SIM_LEDC_DUTY.load(core::sync::atomic::Ordering::Relaxed)
}

// ── embedded-hal wrappers ─────────────────────────────────────

/// A configured GPIO line addressed by number.
#[derive(Debug, Clone, Copy)]
pub struct GpioLine {
    pin: i32,
}

impl GpioLine {
    pub fn new(pin: i32) -> Self {
        Self { pin }
    }
}

impl ErrorType for GpioLine {
    type Error = Infallible;
}

impl OutputPin for GpioLine {
    fn set_low(&mut self) -> Result<(), Infallible> {
        gpio_write(self.pin, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        gpio_write(self.pin, true);
        Ok(())
    }
}

impl InputPin for GpioLine {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(gpio_read(self.pin))
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!gpio_read(self.pin))
    }
}

/// Microsecond busy-wait used for the trigger pulse.
#[derive(Debug, Clone, Copy, Default)]
pub struct BusyDelay;

impl DelayNs for BusyDelay {
    #[cfg(target_os = "espidf")]
    fn delay_ns(&mut self, ns: u32) {
        // SAFETY: ROM busy-wait, no shared state.
        unsafe { esp_rom_delay_us(ns.div_ceil(1000)) };
    }

    #[cfg(not(target_os = "espidf"))]
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }
}
