//! Default GPIO / peripheral pin assignments for the SmartTrap board.
//!
//! These seed [`PinConfig::default`](crate::config::PinConfig) and
//! [`PwmConfig::default`](crate::config::PwmConfig); a config stored in NVS
//! overrides them without a rebuild.

/// Highest GPIO number on the ESP32 (GPIO0 – GPIO39).
pub const MAX_GPIO: i32 = 39;

// ---------------------------------------------------------------------------
// Fan (logic-level MOSFET, low side)
// ---------------------------------------------------------------------------

/// LEDC PWM output to the fan MOSFET gate.
pub const FAN_PWM_GPIO: i32 = 14;

// ---------------------------------------------------------------------------
// UV attractant LED driver
// ---------------------------------------------------------------------------

/// Digital output: HIGH = UV LEDs on.
pub const UV_LIGHT_GPIO: i32 = 13;

// ---------------------------------------------------------------------------
// HC-SR04 ultrasonic sensor
// ---------------------------------------------------------------------------

/// Digital output: 10 µs trigger pulse.
pub const SENSOR_TRIGGER_GPIO: i32 = 5;
/// Digital input: echo pulse, HIGH for the round-trip time.
pub const SENSOR_ECHO_GPIO: i32 = 18;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC base frequency for the fan (5 kHz).
pub const FAN_PWM_FREQ_HZ: u32 = 5_000;
/// LEDC timer resolution (bits).  10-bit gives 0 – 1023 duty levels.
pub const FAN_PWM_RESOLUTION_BITS: u8 = 10;
