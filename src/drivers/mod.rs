//! Actuator drivers, hardware initialisation, and peripheral helpers.

pub mod fan;
pub mod hw_init;
pub mod uv_light;
pub mod watchdog;
